//! The symbol table: an append-only list of every constant, variable and
//! procedure the program declares, each stamped with its lexical level.
//!
//! Symbols are never removed. Leaving a scope only sets their `mark`; whether
//! lookups respect that depends on the table's `Scoping`.
use std::fmt;

use super::error::{Diagnostic, Error, Fault};

/// Variable addresses start after the static link, dynamic link and
/// return address of each frame.
pub const FRAME_BASE: i32 = 3;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    Constant  = 1,
    Variable  = 2,
    Procedure = 3,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as i32)
    }
}

/// How names are resolved.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Scoping {
    /// The oldest declaration of a name wins and marks are never consulted.
    /// A name can only ever be declared once per program.
    Flat,
    /// The innermost unmarked declaration wins, closing a procedure hides
    /// its declarations, and inner levels may shadow outer names.
    Block,
}

impl Default for Scoping {
    fn default() -> Self {
        Scoping::Flat
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Symbol {
    pub kind:    SymbolKind,
    pub name:    String,
    pub value:   i32,
    pub level:   usize,
    pub address: i32,
    pub mark:    bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SymbolTable {
    symbols:  Vec<Symbol>,
    scoping:  Scoping,
    capacity: usize,
}

impl SymbolTable {
    pub fn new(scoping: Scoping, capacity: usize) -> Self {
        SymbolTable { symbols: Vec::new(), scoping, capacity }
    }

    /// Declares a name at `level`. `value_or_address` is the value of a
    /// constant or the address of a variable or procedure.
    pub fn declare(&mut self, kind: SymbolKind, name: &str, value_or_address: i32, level: usize) -> Result<&Symbol, Error> {
        self.ensure_undeclared(name, level)?;
        if self.symbols.len() >= self.capacity {
            return Err(Fault::SymbolCapacity(self.capacity).into());
        }

        let (value, address) = match kind {
            SymbolKind::Constant => (value_or_address, 0),
            SymbolKind::Variable | SymbolKind::Procedure => (0, value_or_address),
        };
        debug!("declare {:?} `{}` level {} value {} address {}", kind, name, level, value, address);

        self.symbols.push(Symbol { kind, name: name.to_owned(), value, level, address, mark: false });
        let idx = self.symbols.len() - 1;
        Ok(&self.symbols[idx])
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        match self.scoping {
            Scoping::Flat  => self.symbols.iter().find(|s| s.name == name),
            Scoping::Block => self.symbols.iter().rev().find(|s| !s.mark && s.name == name),
        }
    }

    /// Marks the symbols of a scope that is being left. Flat scoping marks
    /// every symbol; block scoping only those at `level` or deeper.
    pub fn mark_all_visible(&mut self, level: usize) {
        let floor = match self.scoping {
            Scoping::Flat  => 0,
            Scoping::Block => level,
        };
        for sym in self.symbols.iter_mut().filter(|s| s.level >= floor) {
            sym.mark = true;
        }
    }

    pub fn scoping(&self) -> Scoping {
        self.scoping
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Fails if declaring `name` at `level` would clash with a visible symbol.
    pub fn ensure_undeclared(&self, name: &str, level: usize) -> Result<(), Error> {
        let taken = match self.scoping {
            Scoping::Flat  => self.lookup(name).is_some(),
            Scoping::Block => self.symbols.iter().any(|s| !s.mark && s.level == level && s.name == name),
        };
        if taken {
            Err(Diagnostic::SymbolPreviouslyDeclared.into())
        } else {
            Ok(())
        }
    }
}
