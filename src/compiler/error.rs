//! Every failure ends the compilation. A `Diagnostic` is the user's fault and
//! carries the single message reported for the run; a `Fault` is ours.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),

    #[error("internal fault: {0}")]
    Fault(#[from] Fault),
}

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Error: program must end with period")]
    PeriodMissing,

    #[error("Error: const, var, read, procedure, and call keywords must be followed by identifier")]
    IdentifierMissing,

    #[error("Error: symbol name has already been declared")]
    SymbolPreviouslyDeclared,

    #[error("Error: constants must be assigned with =")]
    ConstNotAssigned,

    #[error("Error: constants must be assigned an integer value")]
    ConstNotInteger,

    #[error("Error: constant and variable declarations must be followed by a semicolon")]
    DeclarationNoSemicolon,

    #[error("Error: undeclared identifier")]
    UndeclaredIdentifier,

    #[error("Error: only variable values may be altered")]
    NonVariableAltered,

    #[error("Error: assignment statements must use :=")]
    WrongAssignmentSymbol,

    #[error("Error: begin must be followed by end")]
    BeginNoEnd,

    #[error("Error: if must be followed by then")]
    IfNoThen,

    #[error("Error: else must be followed by fi")]
    ElseNoFi,

    #[error("Error: if statement must include else clause")]
    IfNoElse,

    #[error("Error: while must be followed by do")]
    WhileNoDo,

    #[error("Error: condition must contain comparison operator")]
    NoComparison,

    #[error("Error: right parenthesis must follow left parenthesis")]
    IncompleteParenthesis,

    #[error("Error: arithmetic equations must contain operands, parentheses, numbers, or symbols")]
    IncompleteArithmetic,

    #[error("Error: call must be followed by a procedure identifier")]
    CallOfNonProcedure,

    #[error("Error: procedure declarations must be followed by a semicolon")]
    ProcedureNoSemicolon,

    #[error("Error: Scanning error detected by lexer (skipsym present)")]
    LexicalError,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Fault {
    #[error("symbol table is full ({0} entries)")]
    SymbolCapacity(usize),

    #[error("instruction buffer is full ({0} instructions)")]
    CodeCapacity(usize),

    #[error("token stream exceeds {0} tokens")]
    TokenCapacity(usize),

    #[error("instruction slot {0} was never patched")]
    UnpatchedSlot(usize),

    #[error("instruction slot {0} is not an open placeholder")]
    SlotRewritten(usize),

    #[error("scanner pattern does not compile: {0}")]
    ScannerPattern(String),

    #[error("malformed token list: {0}")]
    MalformedTokenList(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_message() {
        let err = Error::from(Diagnostic::PeriodMissing);
        assert_eq!(err.to_string(), "Error: program must end with period");
    }

    #[test]
    fn test_fault_message() {
        let err = Error::from(Fault::CodeCapacity(500));
        assert_eq!(err.to_string(), "internal fault: instruction buffer is full (500 instructions)");
    }
}
