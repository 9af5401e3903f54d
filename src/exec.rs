use crate::addressing::{resolve, Register};
use crate::cpu::{Cpu, Flags, Trap};
use crate::decoder::{ArithKind, ArithOp, Arithmetic, Instruction, JumpOrLoop, Mov, MovKind};
use crate::disasm::{fmt_instruction, reg_mem_operands};
use crate::instructions::{jump_mnemonic, OPCODE_JNZ, OPCODE_JZ};

pub trait Executor {
    /// Applies `instr` to `cpu`. `ip` has already been advanced past the
    /// instruction; `at` is where it started.
    fn exec(&self, cpu: &mut Cpu, instr: &Instruction, at: u16) -> Result<(), Trap>;
}

/// Register-level executor: register and immediate operands only, Z/S flags,
/// and the zero-flag conditional jumps.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntExecutor;

impl Executor for IntExecutor {
    fn exec(&self, cpu: &mut Cpu, instr: &Instruction, at: u16) -> Result<(), Trap> {
        let unsupported = || Trap::Unsupported {
            ip: at,
            what: fmt_instruction(instr),
        };
        match instr {
            Instruction::Mov(m) => exec_mov(cpu, m).ok_or_else(unsupported),
            Instruction::Arithmetic(a) => exec_arith(cpu, a).ok_or_else(unsupported),
            Instruction::JumpOrLoop(j) => {
                exec_jump(cpu, j);
                Ok(())
            }
        }
    }
}

// `None` when an operand lives in memory.
fn exec_mov(cpu: &mut Cpu, m: &Mov) -> Option<()> {
    match m.kind {
        MovKind::ImmToReg => {
            cpu.set_reg(Register::new(m.fields.reg, m.w), m.data);
        }
        MovKind::ImmToRegMem => {
            let dst = resolve(&m.fields, m.w).as_register()?;
            cpu.set_reg(dst, m.data);
        }
        MovKind::RegMemToFromReg => {
            let (dst, src) = reg_mem_operands(m.fields.reg, resolve(&m.fields, m.w), m.d, m.w);
            let (dst, src) = (dst.as_register()?, src.as_register()?);
            let val = cpu.reg(src);
            cpu.set_reg(dst, val);
        }
        MovKind::MemToAcc | MovKind::AccToMem => return None,
    }
    Some(())
}

fn exec_arith(cpu: &mut Cpu, a: &Arithmetic) -> Option<()> {
    let (target, source) = match a.kind {
        ArithKind::RegMemWithReg => {
            let (dst, src) = reg_mem_operands(a.fields.reg, resolve(&a.fields, a.w), a.d, a.w);
            let (dst, src) = (dst.as_register()?, src.as_register()?);
            (dst, cpu.reg(src))
        }
        ArithKind::ImmToRegMem => (resolve(&a.fields, a.w).as_register()?, a.data),
        ArithKind::ImmToAcc => (Register::accumulator(a.w), a.data),
    };
    let lhs = cpu.reg(target);
    let result = match a.op {
        ArithOp::Add => lhs.wrapping_add(source),
        ArithOp::Sub | ArithOp::Cmp => lhs.wrapping_sub(source),
    };
    if a.op != ArithOp::Cmp {
        cpu.set_reg(target, result);
    }
    cpu.set_result_flags(result);
    Some(())
}

fn exec_jump(cpu: &mut Cpu, j: &JumpOrLoop) {
    let taken = match j.opcode {
        OPCODE_JZ => cpu.flags.contains(Flags::Z),
        OPCODE_JNZ => !cpu.flags.contains(Flags::Z),
        op => {
            tracing::debug!(
                mnemonic = jump_mnemonic(op),
                "branch condition not modeled, falling through"
            );
            false
        }
    };
    if taken {
        cpu.ip = cpu.ip.wrapping_add_signed(i16::from(j.inc));
    }
}
