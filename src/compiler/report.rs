//! Human-readable renderings of a compilation, plus the object code file
//! format the PM/0 machine loads.
use term_grid::{Cell, Direction, Filling, Grid, GridOptions};

use super::code::Instruction;
use super::symbols::SymbolTable;

/// One `OP L M` line per instruction, in program order.
pub fn object_code(code: &[Instruction]) -> String {
    code.iter()
        .map(|ins| {
            let (op, l, m) = ins.encode();
            format!("{} {} {}\n", op, l, m)
        })
        .collect()
}

/// The assembly listing: index, mnemonic, level and operand.
pub fn listing(code: &[Instruction]) -> String {
    let mut grid = new_grid();
    for header in ["Line", "OP", "L", "M"].iter() {
        grid.add(Cell::from(header.to_string()));
    }

    for (idx, ins) in code.iter().enumerate() {
        grid.add(Cell::from(format!("{:3}", idx)));
        grid.add(Cell::from(ins.mnemonic().to_string()));
        grid.add(Cell::from(ins.level().to_string()));
        grid.add(Cell::from(ins.operand().to_string()));
    }

    grid.fit_into_columns(4).to_string()
}

pub fn symbol_report(symbols: &SymbolTable) -> String {
    let mut grid = new_grid();
    for header in ["Kind", "Name", "Value", "Level", "Address", "Mark"].iter() {
        grid.add(Cell::from(header.to_string()));
    }

    for sym in symbols.iter() {
        grid.add(Cell::from(sym.kind.to_string()));
        grid.add(Cell::from(sym.name.clone()));
        grid.add(Cell::from(sym.value.to_string()));
        grid.add(Cell::from(sym.level.to_string()));
        grid.add(Cell::from(sym.address.to_string()));
        grid.add(Cell::from(if sym.mark { "1" } else { "0" }.to_string()));
    }

    grid.fit_into_columns(6).to_string()
}

fn new_grid() -> Grid {
    Grid::new(GridOptions {
        filling:   Filling::Spaces(3),
        direction: Direction::LeftToRight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::code::{Opr, Sys};
    use super::super::symbols::{Scoping, SymbolKind};

    #[test]
    fn test_object_code() {
        let code = vec![
            Instruction::JMP(1),
            Instruction::INC(4),
            Instruction::LOD(0, 3),
            Instruction::OPR(Opr::NEQ),
            Instruction::CAL(0, 1),
            Instruction::SYS(Sys::Halt),
        ];
        assert_eq!(object_code(&code), "7 0 3\n6 0 4\n3 0 3\n2 0 6\n5 0 3\n9 0 3\n");
        assert_eq!(object_code(&[]), "");
    }

    #[test]
    fn test_listing() {
        let code = vec![Instruction::JMP(1), Instruction::INC(3), Instruction::SYS(Sys::Halt)];
        let out = listing(&code);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Line"));
        let row: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(row, vec!["0", "JMP", "0", "3"]);
        let row: Vec<&str> = lines[3].split_whitespace().collect();
        assert_eq!(row, vec!["2", "SYS", "0", "3"]);
    }

    #[test]
    fn test_symbol_report() {
        let mut table = SymbolTable::new(Scoping::Flat, 4);
        table.declare(SymbolKind::Constant, "limit", 10, 0).unwrap();
        table.declare(SymbolKind::Variable, "count", 3, 0).unwrap();
        table.mark_all_visible(0);

        let out = symbol_report(&table);
        let rows: Vec<Vec<&str>> = out.lines().map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(rows, vec![
            vec!["Kind", "Name", "Value", "Level", "Address", "Mark"],
            vec!["1", "limit", "10", "0", "0", "1"],
            vec!["2", "count", "0", "0", "3", "1"],
        ]);
    }
}
