//! The Parser module walks a token stream and generates PM/0 code as it goes.
//!
//! There is one method per grammar production and a single token of
//! lookahead. Declarations fill the symbol table, statements append to the
//! code buffer, and forward jumps are reserved and patched once their
//! target is known. The first error ends the pass; nothing after it is read.
//!
//! ```text
//! program    := block "."
//! block      := [const-decl] [var-decl] {proc-decl} statement
//! const-decl := "const" ident "=" number {"," ident "=" number} ";"
//! var-decl   := "var" ident {"," ident} ";"
//! proc-decl  := "procedure" ident ";" block ";"
//! statement  := [ ident ":=" expression
//!               | "call" ident
//!               | "begin" statement {";" statement} "end"
//!               | "if" condition "then" statement "else" statement "fi"
//!               | "while" condition "do" statement
//!               | "read" ident
//!               | "write" expression ]
//! condition  := "even" expression | expression rel-op expression
//! expression := term {("+" | "-") term}
//! term       := factor {("*" | "/") factor}
//! factor     := ident | number | "(" expression ")"
//! ```
use super::code::{CodeBuffer, Instruction, Level, Opr, Sys};
use super::error::{Diagnostic, Error};
use super::symbols::{Scoping, SymbolKind, SymbolTable, FRAME_BASE};
use super::token::{Kind, Token};
use super::{Compiled, Config};

pub struct Parser {
    tokens:  Vec<Token>,
    cursor:  usize,
    level:   usize,
    symbols: SymbolTable,
    code:    CodeBuffer,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, config: &Config) -> Self {
        Parser {
            tokens,
            cursor: 0,
            level: 0,
            symbols: SymbolTable::new(config.scoping, config.max_symbols),
            code: CodeBuffer::new(config.max_code),
        }
    }

    /// Run the parser, consuming itself and returning the generated code
    /// alongside the final symbol table.
    pub fn run(mut self) -> Result<Compiled, Error> {
        // A scanning error anywhere rejects the whole stream, even past the final period.
        if let Some(pos) = self.tokens.iter().position(|t| t.kind().is_lexical_error()) {
            debug!("lexical error token at position {}", pos);
            return Err(Diagnostic::LexicalError.into());
        }

        self.program()?;
        info!("Generated {} instruction(s) and {} symbol(s).", self.code.pc(), self.symbols.len());

        Ok(Compiled {
            code: self.code.finish()?,
            symbols: self.symbols,
        })
    }

    fn program(&mut self) -> Result<(), Error> {
        self.block()?;
        self.expect(Kind::Period, Diagnostic::PeriodMissing)?;
        self.code.emit(Instruction::SYS(Sys::Halt))?;
        self.symbols.mark_all_visible(0);
        Ok(())
    }

    fn block(&mut self) -> Result<(), Error> {
        self.const_decl()?;
        let locals = self.var_decl()?;

        // Jump over the bodies of nested procedures.
        let skip = self.code.reserve()?;
        self.proc_decl()?;
        let body = self.code.pc();
        self.code.patch(skip, Instruction::JMP(body))?;
        self.code.emit(Instruction::INC(FRAME_BASE + locals))?;

        self.statement()
    }

    fn const_decl(&mut self) -> Result<(), Error> {
        if !self.eat(Kind::Const)? {
            return Ok(());
        }

        loop {
            let name = self.ident()?;
            self.symbols.ensure_undeclared(&name, self.level)?;
            self.expect(Kind::Eq, Diagnostic::ConstNotAssigned)?;
            let value = self.number()?;
            self.symbols.declare(SymbolKind::Constant, &name, value, self.level)?;

            if !self.eat(Kind::Comma)? {
                break;
            }
        }

        self.expect(Kind::Semicolon, Diagnostic::DeclarationNoSemicolon)
    }

    /// Returns the number of variables declared.
    fn var_decl(&mut self) -> Result<i32, Error> {
        if !self.eat(Kind::Var)? {
            return Ok(0);
        }

        let mut count = 0;
        loop {
            let name = self.ident()?;
            self.symbols.declare(SymbolKind::Variable, &name, FRAME_BASE + count, self.level)?;
            count += 1;

            if !self.eat(Kind::Comma)? {
                break;
            }
        }

        self.expect(Kind::Semicolon, Diagnostic::DeclarationNoSemicolon)?;
        Ok(count)
    }

    fn proc_decl(&mut self) -> Result<(), Error> {
        while self.eat(Kind::Procedure)? {
            let name = self.ident()?;
            // The nested block starts at the next instruction.
            let entry = self.code.pc();
            self.symbols.declare(SymbolKind::Procedure, &name, entry as i32, self.level)?;

            self.level += 1;
            self.expect(Kind::Semicolon, Diagnostic::ProcedureNoSemicolon)?;
            self.block()?;
            self.expect(Kind::Semicolon, Diagnostic::ProcedureNoSemicolon)?;
            self.code.emit(Instruction::OPR(Opr::RTN))?;
            self.symbols.mark_all_visible(self.level);
            self.level -= 1;
        }
        Ok(())
    }

    fn statement(&mut self) -> Result<(), Error> {
        match self.peek()? {
            Kind::Ident => {
                let name = self.ident()?;
                let (level, address) = self.variable(&name)?;
                self.expect(Kind::Becomes, Diagnostic::WrongAssignmentSymbol)?;
                self.expression()?;
                self.code.emit(Instruction::STO(level, address))?;
            },

            Kind::Call => {
                self.consume();
                let name = self.ident()?;
                let sym = self.symbols.lookup(&name).ok_or(Diagnostic::UndeclaredIdentifier)?;
                if sym.kind != SymbolKind::Procedure {
                    return Err(Diagnostic::CallOfNonProcedure.into());
                }
                let call = Instruction::CAL(self.distance(sym.level), sym.address as usize);
                self.code.emit(call)?;
            },

            Kind::Begin => {
                self.consume();
                self.statement()?;
                while self.eat(Kind::Semicolon)? {
                    self.statement()?;
                }
                self.expect(Kind::End, Diagnostic::BeginNoEnd)?;
            },

            Kind::If => {
                self.consume();
                self.condition()?;
                self.expect(Kind::Then, Diagnostic::IfNoThen)?;

                let on_false = self.code.reserve()?;
                self.statement()?;
                let skip_else = self.code.reserve()?;
                let else_branch = self.code.pc();
                self.code.patch(on_false, Instruction::JPC(else_branch))?;

                self.expect(Kind::Else, Diagnostic::IfNoElse)?;
                self.statement()?;
                let after = self.code.pc();
                self.code.patch(skip_else, Instruction::JMP(after))?;
                self.expect(Kind::Fi, Diagnostic::ElseNoFi)?;
            },

            Kind::While => {
                self.consume();
                let entry = self.code.pc();
                self.condition()?;
                let exit = self.code.reserve()?;
                self.expect(Kind::Do, Diagnostic::WhileNoDo)?;
                self.statement()?;
                self.code.emit(Instruction::JMP(entry))?;
                let after = self.code.pc();
                self.code.patch(exit, Instruction::JPC(after))?;
            },

            Kind::Read => {
                self.consume();
                let name = self.ident()?;
                let (level, address) = self.variable(&name)?;
                self.code.emit(Instruction::SYS(Sys::Read))?;
                self.code.emit(Instruction::STO(level, address))?;
            },

            Kind::Write => {
                self.consume();
                self.expression()?;
                self.code.emit(Instruction::SYS(Sys::Write))?;
            },

            // The empty statement consumes nothing.
            _ => {},
        }
        Ok(())
    }

    fn condition(&mut self) -> Result<(), Error> {
        if self.eat(Kind::Even)? {
            self.expression()?;
            self.code.emit(Instruction::OPR(Opr::EVEN))?;
            return Ok(());
        }

        self.expression()?;
        let op = match self.peek()? {
            Kind::Eq  => Opr::EQL,
            Kind::Neq => Opr::NEQ,
            Kind::Lss => Opr::LSS,
            Kind::Leq => Opr::LEQ,
            Kind::Gtr => Opr::GTR,
            Kind::Geq => Opr::GEQ,
            _ => return Err(Diagnostic::NoComparison.into()),
        };
        self.consume();
        self.expression()?;
        self.code.emit(Instruction::OPR(op))?;
        Ok(())
    }

    fn expression(&mut self) -> Result<(), Error> {
        self.term()?;
        loop {
            let op = match self.peek()? {
                Kind::Plus  => Opr::ADD,
                Kind::Minus => Opr::SUB,
                _ => return Ok(()),
            };
            self.consume();
            self.term()?;
            self.code.emit(Instruction::OPR(op))?;
        }
    }

    fn term(&mut self) -> Result<(), Error> {
        self.factor()?;
        loop {
            let op = match self.peek()? {
                Kind::Mult  => Opr::MUL,
                Kind::Slash => Opr::DIV,
                _ => return Ok(()),
            };
            self.consume();
            self.factor()?;
            self.code.emit(Instruction::OPR(op))?;
        }
    }

    fn factor(&mut self) -> Result<(), Error> {
        match self.peek()? {
            Kind::Ident => {
                let name = self.ident()?;
                let sym = self.symbols.lookup(&name).ok_or(Diagnostic::UndeclaredIdentifier)?;
                let load = match sym.kind {
                    SymbolKind::Variable  => Instruction::LOD(self.distance(sym.level), sym.address),
                    SymbolKind::Constant  => Instruction::LIT(sym.value),
                    // A procedure has no value.
                    SymbolKind::Procedure => return Err(Diagnostic::IncompleteArithmetic.into()),
                };
                self.code.emit(load)?;
            },
            Kind::Number => {
                let value = self.number()?;
                self.code.emit(Instruction::LIT(value))?;
            },
            Kind::LParen => {
                self.consume();
                self.expression()?;
                self.expect(Kind::RParen, Diagnostic::IncompleteParenthesis)?;
            },
            _ => return Err(Diagnostic::IncompleteArithmetic.into()),
        }
        Ok(())
    }

    /// Resolves the target of an assignment or read.
    fn variable(&self, name: &str) -> Result<(Level, i32), Error> {
        let sym = self.symbols.lookup(name).ok_or(Diagnostic::UndeclaredIdentifier)?;
        if sym.kind != SymbolKind::Variable {
            return Err(Diagnostic::NonVariableAltered.into());
        }
        Ok((self.distance(sym.level), sym.address))
    }

    /// Static links to follow from the current level to a symbol's frame.
    fn distance(&self, declared: usize) -> Level {
        match self.symbols.scoping() {
            Scoping::Flat  => 0,
            Scoping::Block => (self.level - declared) as Level,
        }
    }

    fn ident(&mut self) -> Result<String, Error> {
        self.peek()?;
        match self.tokens.get(self.cursor) {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.consume();
                Ok(name)
            },
            _ => Err(Diagnostic::IdentifierMissing.into()),
        }
    }

    fn number(&mut self) -> Result<i32, Error> {
        self.peek()?;
        match self.tokens.get(self.cursor) {
            Some(Token::Number(value)) => {
                let value = *value;
                self.consume();
                Ok(value)
            },
            _ => Err(Diagnostic::ConstNotInteger.into()),
        }
    }

    fn expect(&mut self, kind: Kind, otherwise: Diagnostic) -> Result<(), Error> {
        if self.eat(kind)? {
            Ok(())
        } else {
            Err(otherwise.into())
        }
    }

    /// Consumes the current token if it is of `kind`.
    fn eat(&mut self, kind: Kind) -> Result<bool, Error> {
        if self.peek()? == kind {
            self.consume();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Returns the kind of the current token without consuming it. Running
    /// off the end reads as end-of-input; a scanning error stops the pass.
    fn peek(&self) -> Result<Kind, Error> {
        match self.tokens.get(self.cursor).map(Token::kind) {
            Some(kind) if kind.is_lexical_error() => Err(Diagnostic::LexicalError.into()),
            Some(kind) => Ok(kind),
            None => Ok(Kind::EndOfFile),
        }
    }

    #[inline]
    fn consume(&mut self) {
        trace!("consume {:?}", self.tokens.get(self.cursor));
        self.cursor += 1;
    }
}
