use serde::{Deserialize, Serialize};

use crate::cursor::{ByteCursor, OutOfBounds};

/// The mod-reg-rm triple plus any displacement that followed it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonFields {
    pub mode: u8,
    pub reg: u8,
    pub rm: u8,
    pub disp: i16,
}

impl CommonFields {
    pub const REGISTER_MODE: u8 = 0b11;

    pub fn is_register_direct(&self) -> bool {
        self.mode == Self::REGISTER_MODE
    }

    /// `mod=00, rm=110`: a bare 16-bit address instead of `[bp]`.
    pub fn is_direct_address(&self) -> bool {
        self.mode == 0b00 && self.rm == 0b110
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovKind {
    RegMemToFromReg,
    ImmToReg,
    ImmToRegMem,
    MemToAcc,
    AccToMem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mov {
    pub kind: MovKind,
    pub d: bool,
    pub w: bool,
    pub fields: CommonFields,
    pub data: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithKind {
    RegMemWithReg,
    ImmToRegMem,
    ImmToAcc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Cmp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arithmetic {
    pub kind: ArithKind,
    pub op: ArithOp,
    pub d: bool,
    pub s: bool,
    pub w: bool,
    pub fields: CommonFields,
    pub data: u16,
    pub opcode: u8,
}

impl Arithmetic {
    /// Immediate was a single byte sign-extended to a word.
    pub fn is_sign_extended(&self) -> bool {
        self.kind == ArithKind::ImmToRegMem && self.s && self.w
    }
}

/// Conditional jump (`0111cccc`) or loop family (`111000cc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpOrLoop {
    pub opcode: u8,
    pub inc: i8,
}

impl JumpOrLoop {
    pub fn is_loop(&self) -> bool {
        self.opcode >> 2 == 0b11_1000
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Mov(Mov),
    Arithmetic(Arithmetic),
    JumpOrLoop(JumpOrLoop),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
    #[error("unknown instruction: {bytes:02x?}")]
    UnknownInstruction { bytes: Vec<u8> },
    #[error("invalid instruction {bytes:02x?}: {reason}")]
    InvalidInstruction { bytes: Vec<u8>, reason: &'static str },
}

pub trait Decoder {
    /// Decode one instruction starting at the cursor, leaving the cursor just
    /// past its last byte.
    fn decode(&self, cur: &mut ByteCursor<'_>) -> Result<Instruction, DecodeError>;
}
