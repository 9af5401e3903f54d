use crate::decoder::ArithOp;

pub const REGISTERS_8: [&str; 8] = ["al", "cl", "dl", "bl", "ah", "ch", "dh", "bh"];
pub const REGISTERS_16: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];

/// Base-register expressions for memory operands, indexed by `rm`.
pub const EA_BASES: [&str; 8] = [
    "bx + si", "bx + di", "bp + si", "bp + di", "si", "di", "bp", "bx",
];

/// `0111cccc`, indexed by the low four bits.
pub const JUMP_MNEMONICS: [&str; 16] = [
    "jo", "jno", "jb", "jnb", "jz", "jnz", "jbe", "jnbe", "js", "jns", "jp", "jnp", "jl", "jnl",
    "jle", "jnle",
];

/// `111000cc`, indexed by the low two bits.
pub const LOOP_MNEMONICS: [&str; 4] = ["loopnz", "loopz", "loop", "jcxz"];

pub const OPCODE_JZ: u8 = 0x74;
pub const OPCODE_JNZ: u8 = 0x75;

#[derive(Debug, Clone, Copy)]
pub struct ArithDesc {
    pub op: ArithOp,
    pub mnemonic: &'static str,
    /// Three-bit operation code: bits 5..3 of `00ooo0dw`/`00ooo10w`, and the
    /// `reg` extension of `100000sw`.
    pub ext: u8,
}

pub const ARITH_TABLE: &[ArithDesc] = &[
    ArithDesc {
        op: ArithOp::Add,
        mnemonic: "add",
        ext: 0b000,
    },
    ArithDesc {
        op: ArithOp::Sub,
        mnemonic: "sub",
        ext: 0b101,
    },
    ArithDesc {
        op: ArithOp::Cmp,
        mnemonic: "cmp",
        ext: 0b111,
    },
];

pub fn arith_by_ext(ext: u8) -> Option<&'static ArithDesc> {
    ARITH_TABLE.iter().find(|d| d.ext == ext)
}

impl ArithOp {
    pub fn desc(self) -> &'static ArithDesc {
        match self {
            ArithOp::Add => &ARITH_TABLE[0],
            ArithOp::Sub => &ARITH_TABLE[1],
            ArithOp::Cmp => &ARITH_TABLE[2],
        }
    }

    pub fn mnemonic(self) -> &'static str {
        self.desc().mnemonic
    }
}

pub fn jump_mnemonic(opcode: u8) -> &'static str {
    if opcode >> 4 == 0b0111 {
        JUMP_MNEMONICS[(opcode & 0b1111) as usize]
    } else {
        LOOP_MNEMONICS[(opcode & 0b11) as usize]
    }
}
