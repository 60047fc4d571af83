//! The Compiler module is in charge of taking a PL/0
//! program and producing PM/0 object code.
//!
//! Source text goes through the lexer (or a token list through
//! `token::read_token_list`), then a single recursive-descent pass
//! checks the grammar and generates code at the same time.

pub mod code;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod symbols;
pub mod token;

use code::Instruction;
use error::{Error, Fault};
use symbols::{Scoping, SymbolTable};
use token::Token;

pub const MAX_SYMBOLS: usize = 500;
pub const MAX_INSTRUCTIONS: usize = 500;
pub const MAX_TOKENS: usize = 2048;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Config {
    pub scoping:     Scoping,
    pub max_symbols: usize,
    pub max_code:    usize,
    pub max_tokens:  usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scoping: Scoping::default(),
            max_symbols: MAX_SYMBOLS,
            max_code: MAX_INSTRUCTIONS,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// The result of a successful pass.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Compiled {
    pub code:    Vec<Instruction>,
    pub symbols: SymbolTable,
}

pub fn compile(tokens: Vec<Token>, config: &Config) -> Result<Compiled, Error> {
    if tokens.len() > config.max_tokens {
        return Err(Fault::TokenCapacity(config.max_tokens).into());
    }
    parser::Parser::new(tokens, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::code::{Opr, Sys};
    use super::error::Diagnostic;

    #[test]
    fn test_compile_token_list() {
        // var x; begin read x; write x * 2 end.
        let tokens = token::read_token_list("29 2 x 17 20 32 2 x 17 31 2 x 6 3 2 21 18").unwrap();
        let out = compile(tokens, &Config::default()).unwrap();
        assert_eq!(out.code, vec![
            Instruction::JMP(1),
            Instruction::INC(4),
            Instruction::SYS(Sys::Read),
            Instruction::STO(0, 3),
            Instruction::LOD(0, 3),
            Instruction::LIT(2),
            Instruction::OPR(Opr::MUL),
            Instruction::SYS(Sys::Write),
            Instruction::SYS(Sys::Halt),
        ]);
    }

    #[test]
    fn test_lexical_error_after_period() {
        let tokens = token::read_token_list("31 3 1 18 1").unwrap();
        assert_eq!(compile(tokens, &Config::default()), Err(Error::Diagnostic(Diagnostic::LexicalError)));

        let tokens = lexer::tokenize("write 1. !").unwrap();
        assert_eq!(compile(tokens, &Config::default()), Err(Error::Diagnostic(Diagnostic::LexicalError)));

        let tokens = token::read_token_list("31 3 123456 18").unwrap();
        assert_eq!(compile(tokens, &Config::default()), Err(Error::Diagnostic(Diagnostic::LexicalError)));
    }

    #[test]
    fn test_token_capacity() {
        let config = Config { max_tokens: 2, ..Config::default() };
        let tokens = lexer::tokenize("write 1.").unwrap();
        assert_eq!(compile(tokens, &config), Err(Error::Fault(Fault::TokenCapacity(2))));
    }

    #[test]
    fn test_demo_program() {
        let scanned = lexer::tokenize(include_str!("../../demos/factorial.pl0")).unwrap();
        let listed = token::read_token_list(include_str!("../../demos/factorial.tok")).unwrap();
        assert_eq!(scanned, listed);

        let out = compile(scanned, &Config::default()).unwrap();
        assert_eq!(out.code.first(), Some(&Instruction::JMP(19)));
        assert_eq!(out.code.last(), Some(&Instruction::SYS(Sys::Halt)));
        assert_eq!(out.symbols.lookup("fact").map(|s| s.address), Some(1));
    }

    #[test]
    fn test_scanned_and_listed_tokens_agree() {
        let source = "const n = 10; var i; while i < n do i := i + 1.";
        let scanned = lexer::tokenize(source).unwrap();
        let listed = token::read_token_list(&token::write_token_list(&scanned)).unwrap();
        assert_eq!(
            compile(scanned, &Config::default()),
            compile(listed, &Config::default())
        );
    }
}
