use crate::addressing::{direct, resolve, Operand, Register};
use crate::cursor::ByteCursor;
use crate::decoder::{ArithKind, Arithmetic, DecodeError, Decoder, Instruction, JumpOrLoop, Mov, MovKind};
use crate::instructions::jump_mnemonic;
use crate::isa::i8086::I8086Decoder;

pub fn fmt_instruction(i: &Instruction) -> String {
    match i {
        Instruction::Mov(m) => fmt_mov(m),
        Instruction::Arithmetic(a) => fmt_arith(a),
        Instruction::JumpOrLoop(j) => fmt_jump(j),
    }
}

/// Destination and source of an r/m-with-reg form, honouring `d`.
pub fn reg_mem_operands(reg: u8, rm: Operand, d: bool, wide: bool) -> (Operand, Operand) {
    let reg = Operand::Register(Register::new(reg, wide));
    if d {
        (reg, rm)
    } else {
        (rm, reg)
    }
}

fn size_keyword(wide: bool) -> &'static str {
    if wide {
        "word"
    } else {
        "byte"
    }
}

fn fmt_mov(m: &Mov) -> String {
    match m.kind {
        MovKind::RegMemToFromReg => {
            let (dst, src) =
                reg_mem_operands(m.fields.reg, resolve(&m.fields, m.w), m.d, m.w);
            format!("mov {dst}, {src}")
        }
        MovKind::ImmToReg => format!("mov {}, {}", Register::new(m.fields.reg, m.w), m.data),
        MovKind::ImmToRegMem => {
            let dst = resolve(&m.fields, m.w);
            if dst.is_memory() {
                format!("mov {dst}, {} {}", size_keyword(m.w), m.data)
            } else {
                format!("mov {dst}, {}", m.data)
            }
        }
        MovKind::MemToAcc => format!("mov {}, {}", Register::accumulator(m.w), direct(m.data)),
        MovKind::AccToMem => format!("mov {}, {}", direct(m.data), Register::accumulator(m.w)),
    }
}

fn fmt_arith(a: &Arithmetic) -> String {
    let mn = a.op.mnemonic();
    let imm = if a.is_sign_extended() {
        (a.data as i16).to_string()
    } else {
        a.data.to_string()
    };
    match a.kind {
        ArithKind::RegMemWithReg => {
            let (dst, src) =
                reg_mem_operands(a.fields.reg, resolve(&a.fields, a.w), a.d, a.w);
            format!("{mn} {dst}, {src}")
        }
        ArithKind::ImmToRegMem => {
            let dst = resolve(&a.fields, a.w);
            if dst.is_memory() {
                format!("{mn} {} {dst}, {imm}", size_keyword(a.w))
            } else {
                format!("{mn} {dst}, {imm}")
            }
        }
        ArithKind::ImmToAcc => format!("{mn} {}, {imm}", Register::accumulator(a.w)),
    }
}

fn fmt_jump(j: &JumpOrLoop) -> String {
    // nasm's `$` is the start of the instruction; the offset counts from its end.
    format!("{} $+2{:+}", jump_mnemonic(j.opcode), j.inc)
}

/// Decodes the whole buffer into a `bits 16` listing, one instruction per
/// line.
pub fn disassemble(bytes: &[u8]) -> Result<String, DecodeError> {
    let dec = I8086Decoder::new();
    let mut cur = ByteCursor::new(bytes);
    let mut out = String::from("bits 16\n");
    while !cur.is_at_end() {
        let i = dec.decode(&mut cur)?;
        out.push_str(&fmt_instruction(&i));
        out.push('\n');
    }
    Ok(out)
}
