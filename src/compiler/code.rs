//! PM/0 instructions and the buffer the parser emits them into.
//!
//! Every instruction is a triple `OP L M`. Jump and call targets are held as
//! instruction indices and only scaled to the machine's byte-offset
//! convention when the operand is encoded.
//!
//! ```text
//! LIT 0 M   push M
//! OPR 0 M   arithmetic/relational operation M, or return when M = 0
//! LOD L M   push the value at offset M of the frame L levels down
//! STO L M   pop into offset M of the frame L levels down
//! CAL L M   call the procedure at M
//! INC 0 M   reserve M stack slots
//! JMP 0 M   jump to M
//! JPC 0 M   pop, jump to M if the value is zero
//! SYS 0 M   write (1), read (2), or halt (3)
//! ```
use std::fmt;

use super::error::{Error, Fault};

/// Bytes per instruction in the machine's address space.
pub const ADDRESS_STRIDE: i32 = 3;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Opr {
    RTN  = 0,
    ADD  = 1,
    SUB  = 2,
    MUL  = 3,
    DIV  = 4,
    EQL  = 5,
    NEQ  = 6,
    LSS  = 7,
    LEQ  = 8,
    GTR  = 9,
    GEQ  = 10,
    EVEN = 11,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Sys {
    Write = 1,
    Read  = 2,
    Halt  = 3,
}

/// Frame levels to walk down the static link.
pub type Level = i32;
/// An index into the instruction buffer.
pub type Label = usize;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    LIT(i32),
    OPR(Opr),
    LOD(Level, i32),
    STO(Level, i32),
    CAL(Level, Label),
    INC(i32),
    JMP(Label),
    JPC(Label),
    SYS(Sys),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.mnemonic(), self.level(), self.operand())
    }
}

impl Instruction {
    /// Encodes the instruction as the `(OP, L, M)` triple the machine loads.
    pub fn encode(&self) -> (i32, i32, i32) {
        (self.opcode(), self.level(), self.operand())
    }

    pub fn opcode(&self) -> i32 {
        use Instruction::*;
        match self {
            LIT(_)    => 1,
            OPR(_)    => 2,
            LOD(_, _) => 3,
            STO(_, _) => 4,
            CAL(_, _) => 5,
            INC(_)    => 6,
            JMP(_)    => 7,
            JPC(_)    => 8,
            SYS(_)    => 9,
        }
    }

    pub fn level(&self) -> i32 {
        use Instruction::*;
        match self {
            LOD(l, _) | STO(l, _) | CAL(l, _) => *l,
            _ => 0,
        }
    }

    pub fn operand(&self) -> i32 {
        use Instruction::*;
        match self {
            LIT(m) | INC(m)               => *m,
            LOD(_, m) | STO(_, m)         => *m,
            OPR(op)                       => *op as i32,
            SYS(call)                     => *call as i32,
            CAL(_, target) | JMP(target) |
            JPC(target)                   => *target as i32 * ADDRESS_STRIDE,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        use Instruction::*;
        match self {
            LIT(_)    => "LIT",
            OPR(_)    => "OPR",
            LOD(_, _) => "LOD",
            STO(_, _) => "STO",
            CAL(_, _) => "CAL",
            INC(_)    => "INC",
            JMP(_)    => "JMP",
            JPC(_)    => "JPC",
            SYS(_)    => "SYS",
        }
    }
}

/// A dense, index-addressed instruction buffer. Its length is the program
/// counter. Reserved slots stay empty until patched, and a slot is written
/// at most twice: once reserved, once patched.
#[derive(Debug)]
pub struct CodeBuffer {
    slots:    Vec<Option<Instruction>>,
    capacity: usize,
}

impl CodeBuffer {
    pub fn new(capacity: usize) -> Self {
        CodeBuffer { slots: Vec::with_capacity(capacity), capacity }
    }

    /// The index the next emitted instruction will occupy.
    #[inline]
    pub fn pc(&self) -> Label {
        self.slots.len()
    }

    pub fn emit(&mut self, ins: Instruction) -> Result<Label, Error> {
        let idx = self.push(Some(ins))?;
        debug!("{:4} {}", idx, ins);
        Ok(idx)
    }

    /// Reserves a slot for an instruction whose operand is not known yet.
    pub fn reserve(&mut self) -> Result<Label, Error> {
        let idx = self.push(None)?;
        debug!("{:4} <reserved>", idx);
        Ok(idx)
    }

    pub fn patch(&mut self, idx: Label, ins: Instruction) -> Result<(), Error> {
        match self.slots.get_mut(idx) {
            Some(slot) if slot.is_none() => {
                debug!("{:4} {} (patched)", idx, ins);
                *slot = Some(ins);
                Ok(())
            },
            _ => Err(Fault::SlotRewritten(idx).into()),
        }
    }

    /// Consumes the buffer, returning the instructions in program order.
    pub fn finish(self) -> Result<Vec<Instruction>, Error> {
        self.slots.into_iter()
            .enumerate()
            .map(|(idx, slot)| slot.ok_or_else(|| Fault::UnpatchedSlot(idx).into()))
            .collect()
    }

    fn push(&mut self, slot: Option<Instruction>) -> Result<Label, Error> {
        if self.slots.len() >= self.capacity {
            return Err(Fault::CodeCapacity(self.capacity).into());
        }
        self.slots.push(slot);
        Ok(self.slots.len() - 1)
    }
}
