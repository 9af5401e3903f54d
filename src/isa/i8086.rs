use crate::cursor::ByteCursor;
use crate::decoder::{
    ArithKind, Arithmetic, CommonFields, DecodeError, Decoder, Instruction, JumpOrLoop, Mov,
    MovKind,
};
use crate::instructions::arith_by_ext;

/// Decoder for the supported 8086 subset: MOV, ADD/SUB/CMP, conditional
/// jumps and the loop family.
#[derive(Debug, Default, Clone, Copy)]
pub struct I8086Decoder;

impl I8086Decoder {
    pub fn new() -> Self {
        Self
    }
}

// Bytes reported alongside a decode failure.
const REPORT_LEN: usize = 4;

fn bit(b: u8, n: u8) -> bool {
    (b >> n) & 1 == 1
}

impl Decoder for I8086Decoder {
    fn decode(&self, cur: &mut ByteCursor<'_>) -> Result<Instruction, DecodeError> {
        let bytes = cur.peek(REPORT_LEN);
        let invalid = |reason: &'static str| DecodeError::InvalidInstruction {
            bytes: bytes.to_vec(),
            reason,
        };
        let op = cur.read()?;

        match op {
            // MOV r/m <-> reg: 100010dw
            b if b >> 2 == 0b10_0010 => {
                let fields = mod_reg_rm(cur)?;
                Ok(Instruction::Mov(Mov {
                    kind: MovKind::RegMemToFromReg,
                    d: bit(b, 1),
                    w: bit(b, 0),
                    fields,
                    data: 0,
                }))
            }
            // MOV sreg forms share the 1000_11x0 prefix but address segment registers.
            0b1000_1100 | 0b1000_1110 => Err(invalid("segment register moves are not supported")),
            // MOV imm -> reg: 1011wreg
            b if b >> 4 == 0b1011 => {
                let w = bit(b, 3);
                let data = cur.read16_or_8(w)?;
                Ok(Instruction::Mov(Mov {
                    kind: MovKind::ImmToReg,
                    d: false,
                    w,
                    fields: CommonFields {
                        reg: b & 0b111,
                        ..CommonFields::default()
                    },
                    data,
                }))
            }
            // MOV imm -> r/m: 1100011w
            b if b >> 1 == 0b110_0011 => {
                let w = bit(b, 0);
                let fields = mod_reg_rm(cur)?;
                if fields.reg != 0 {
                    return Err(invalid("mov immediate requires reg field 000"));
                }
                let data = cur.read16_or_8(w)?;
                Ok(Instruction::Mov(Mov {
                    kind: MovKind::ImmToRegMem,
                    d: false,
                    w,
                    fields,
                    data,
                }))
            }
            // MOV mem -> acc: 1010000w, acc -> mem: 1010001w
            b if b >> 2 == 0b10_1000 => {
                let kind = if bit(b, 1) {
                    MovKind::AccToMem
                } else {
                    MovKind::MemToAcc
                };
                let data = cur.read16()?;
                Ok(Instruction::Mov(Mov {
                    kind,
                    d: false,
                    w: bit(b, 0),
                    fields: CommonFields::default(),
                    data,
                }))
            }
            // ADD/SUB/CMP imm -> r/m: 100000sw, operation in reg
            b if b >> 2 == 0b10_0000 => {
                let s = bit(b, 1);
                let w = bit(b, 0);
                let fields = mod_reg_rm(cur)?;
                let desc = arith_by_ext(fields.reg)
                    .ok_or_else(|| invalid("immediate group operation outside add/sub/cmp"))?;
                let data = match (s, w) {
                    (false, true) => cur.read16()?,
                    (true, true) => cur.read_i8()? as i16 as u16,
                    (_, false) => u16::from(cur.read()?),
                };
                Ok(Instruction::Arithmetic(Arithmetic {
                    kind: ArithKind::ImmToRegMem,
                    op: desc.op,
                    d: false,
                    s,
                    w,
                    fields,
                    data,
                    opcode: b,
                }))
            }
            // 00ooo0dw r/m with reg, 00ooo10w imm -> acc
            b if b >> 6 == 0 && b & 0b110 != 0b110 => {
                let Some(desc) = arith_by_ext((b >> 3) & 0b111) else {
                    return Err(DecodeError::UnknownInstruction {
                        bytes: bytes.to_vec(),
                    });
                };
                let w = bit(b, 0);
                if bit(b, 2) {
                    let data = cur.read16_or_8(w)?;
                    Ok(Instruction::Arithmetic(Arithmetic {
                        kind: ArithKind::ImmToAcc,
                        op: desc.op,
                        d: false,
                        s: false,
                        w,
                        fields: CommonFields::default(),
                        data,
                        opcode: b,
                    }))
                } else {
                    let fields = mod_reg_rm(cur)?;
                    Ok(Instruction::Arithmetic(Arithmetic {
                        kind: ArithKind::RegMemWithReg,
                        op: desc.op,
                        d: bit(b, 1),
                        s: false,
                        w,
                        fields,
                        data: 0,
                        opcode: b,
                    }))
                }
            }
            // Jcc: 0111cccc, LOOP/JCXZ: 111000cc
            b if b >> 4 == 0b0111 || b >> 2 == 0b11_1000 => {
                let inc = cur.read_i8()?;
                Ok(Instruction::JumpOrLoop(JumpOrLoop { opcode: b, inc }))
            }
            _ => Err(DecodeError::UnknownInstruction {
                bytes: bytes.to_vec(),
            }),
        }
    }
}

/// Reads the mod-reg-rm byte and whatever displacement its mode implies.
fn mod_reg_rm(cur: &mut ByteCursor<'_>) -> Result<CommonFields, DecodeError> {
    let b = cur.read()?;
    let mut fields = CommonFields {
        mode: b >> 6,
        reg: (b >> 3) & 0b111,
        rm: b & 0b111,
        disp: 0,
    };
    fields.disp = match fields.mode {
        0b01 => i16::from(cur.read_i8()?),
        0b10 => cur.read16()? as i16,
        0b00 if fields.rm == 0b110 => cur.read16()? as i16,
        _ => 0,
    };
    Ok(fields)
}
