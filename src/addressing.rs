//! Operand resolution shared by the formatter and the executor, so both name
//! operands the same way.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decoder::CommonFields;
use crate::instructions::{EA_BASES, REGISTERS_16, REGISTERS_8};

/// A logical register: an index 0..8 and a width.
///
/// With `wide == false`, indices 0..4 are the low bytes of ax..bx and 4..8
/// their high bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub index: u8,
    pub wide: bool,
}

impl Register {
    pub const AX: Register = Register::new(0, true);
    pub const AL: Register = Register::new(0, false);

    pub const fn new(index: u8, wide: bool) -> Self {
        Self {
            index: index & 0b111,
            wide,
        }
    }

    /// The accumulator at the given width.
    pub const fn accumulator(wide: bool) -> Self {
        if wide {
            Self::AX
        } else {
            Self::AL
        }
    }

    pub fn name(&self) -> &'static str {
        if self.wide {
            REGISTERS_16[self.index as usize]
        } else {
            REGISTERS_8[self.index as usize]
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Register(Register),
    /// `base` indexes [`EA_BASES`]; `None` is a direct address.
    Memory { base: Option<u8>, disp: i16 },
}

impl Operand {
    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::Memory { .. })
    }

    pub fn as_register(&self) -> Option<Register> {
        match self {
            Operand::Register(r) => Some(*r),
            Operand::Memory { .. } => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operand::Register(r) => write!(f, "{r}"),
            Operand::Memory { base: None, disp } => write!(f, "[{}]", disp as u16),
            Operand::Memory {
                base: Some(b),
                disp,
            } => {
                let base = EA_BASES[b as usize];
                match disp {
                    0 => write!(f, "[{base}]"),
                    d if d < 0 => write!(f, "[{base} - {}]", d.unsigned_abs()),
                    d => write!(f, "[{base} + {d}]"),
                }
            }
        }
    }
}

/// The operand named by the `rm` side of a mod-reg-rm triple.
pub fn resolve(fields: &CommonFields, wide: bool) -> Operand {
    if fields.is_register_direct() {
        Operand::Register(Register::new(fields.rm, wide))
    } else if fields.is_direct_address() {
        Operand::Memory {
            base: None,
            disp: fields.disp,
        }
    } else {
        Operand::Memory {
            base: Some(fields.rm & 0b111),
            disp: fields.disp,
        }
    }
}

/// A direct-address memory operand, as used by the accumulator moves.
pub fn direct(addr: u16) -> Operand {
    Operand::Memory {
        base: None,
        disp: addr as i16,
    }
}
