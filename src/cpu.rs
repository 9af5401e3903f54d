use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::addressing::Register;
use crate::cursor::ByteCursor;
use crate::decoder::{DecodeError, Decoder, Instruction};
use crate::exec::Executor;
use crate::instructions::REGISTERS_16;
use crate::memory::{LinearMemory, MemoryError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CpuConfig {
    /// Memory is sized to the larger of this and the program.
    pub min_mem_size: usize,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self { min_mem_size: 4096 }
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags: u16 {
const Z = 1 << 6; // Zero
const S = 1 << 7; // Sign
}
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Flags::Z) {
            f.write_str("Z")?;
        }
        if self.contains(Flags::S) {
            f.write_str("S")?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("decode failed at ip {ip:#06x}: {source}")]
    Decode {
        ip: u16,
        #[source]
        source: DecodeError,
    },
    #[error("unsupported instruction at ip {ip:#06x}: {what}")]
    Unsupported { ip: u16, what: String },
    #[error("step limit of {steps} reached")]
    StepLimit { steps: u64 },
}

/// Register file, flags and ip at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub regs: [u16; 8],
    pub flags: Flags,
    pub ip: u16,
}

// ax, bx, cx, dx, sp, bp, si, di
const DUMP_ORDER: [usize; 8] = [0, 3, 1, 2, 4, 5, 6, 7];

impl Snapshot {
    pub fn dump_regs(&self) -> String {
        let mut out = String::from("Final registers:\n");
        for idx in DUMP_ORDER {
            let val = self.regs[idx];
            if val != 0 {
                out.push_str(&format!("  {}: {val:#06x} ({val})\n", REGISTERS_16[idx]));
            }
        }
        out.push_str(&format!("  ip: {:#06x} ({})\n", self.ip, self.ip));
        out
    }

    pub fn dump_flags(&self) -> String {
        format!("Flags: {}\n", self.flags)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegChange {
    pub index: u8,
    pub old: u16,
    pub new: u16,
}

/// State delta produced by executing one instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub regs: Vec<RegChange>,
    pub ip: (u16, u16),
    pub flags: Option<(Flags, Flags)>,
}

impl Trace {
    pub fn between(before: &Snapshot, after: &Snapshot) -> Self {
        let regs = before
            .regs
            .iter()
            .zip(after.regs.iter())
            .enumerate()
            .filter(|(_, (old, new))| old != new)
            .map(|(index, (&old, &new))| RegChange {
                index: index as u8,
                old,
                new,
            })
            .collect();
        let flags = (before.flags != after.flags).then_some((before.flags, after.flags));
        Self {
            regs,
            ip: (before.ip, after.ip),
            flags,
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.regs {
            write!(f, "{}:{:#x}->{:#x} ", REGISTERS_16[r.index as usize], r.old, r.new)?;
        }
        write!(f, "ip:{:#x}->{:#x}", self.ip.0, self.ip.1)?;
        if let Some((old, new)) = self.flags {
            write!(f, " flags:{old}->{new}")?;
        }
        Ok(())
    }
}

/// One decoded instruction together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fetched {
    pub offset: u16,
    pub bytes: Vec<u8>,
    pub instruction: Instruction,
}

impl Fetched {
    pub fn size(&self) -> u16 {
        self.bytes.len() as u16
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub regs: [u16; 8], // ax, cx, dx, bx, sp, bp, si, di
    pub flags: Flags,
    pub ip: u16,
    pub mem: LinearMemory,
    program_len: usize,
    // Set when ip ran past 0xFFFF; a full 64 KiB program ends there.
    wrapped: bool,
    pub cfg: CpuConfig,
}

impl Cpu {
    /// Fresh state with `program` loaded at offset 0 and ip pointing at it.
    pub fn load(cfg: CpuConfig, program: &[u8]) -> Result<Self, MemoryError> {
        Ok(Self {
            regs: [0; 8],
            flags: Flags::empty(),
            ip: 0,
            mem: LinearMemory::with_program(program, cfg.min_mem_size)?,
            program_len: program.len(),
            wrapped: false,
            cfg,
        })
    }

    pub fn is_done(&self) -> bool {
        self.wrapped || usize::from(self.ip) >= self.program_len
    }

    /// Moves `ip` past a fetched instruction.
    pub fn advance(&mut self, size: u16) {
        let (ip, wrapped) = self.ip.overflowing_add(size);
        self.ip = ip;
        self.wrapped |= wrapped;
    }

    pub fn reg(&self, r: Register) -> u16 {
        let idx = r.index as usize;
        if r.wide {
            return self.regs[idx];
        }
        let full = self.regs[idx % 4];
        if idx < 4 {
            full & 0x00FF
        } else {
            full >> 8
        }
    }

    /// Writes `val` (truncated to a byte for narrow registers), leaving the
    /// other half of a partial register untouched.
    pub fn set_reg(&mut self, r: Register, val: u16) {
        let idx = r.index as usize;
        if r.wide {
            self.regs[idx] = val;
            return;
        }
        let full = &mut self.regs[idx % 4];
        if idx < 4 {
            *full = (*full & 0xFF00) | (val & 0x00FF);
        } else {
            *full = (*full & 0x00FF) | ((val & 0x00FF) << 8);
        }
    }

    /// Recomputes Z and S from a 16-bit result.
    pub fn set_result_flags(&mut self, result: u16) {
        self.flags.set(Flags::Z, result == 0);
        self.flags.set(Flags::S, result > 0x7FFF);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            regs: self.regs,
            flags: self.flags,
            ip: self.ip,
        }
    }

    /// Decodes the instruction at `ip` without changing any state. `None`
    /// once `ip` has reached the end of the program.
    pub fn fetch<D: Decoder>(&self, dec: &D) -> Result<Option<Fetched>, Trap> {
        if self.is_done() {
            return Ok(None);
        }
        let ip = self.ip;
        let code = self.mem.slice(usize::from(ip), self.program_len);
        let mut cur = ByteCursor::new(code);
        let instruction = dec
            .decode(&mut cur)
            .map_err(|source| Trap::Decode { ip, source })?;
        Ok(Some(Fetched {
            offset: ip,
            bytes: code[..cur.position()].to_vec(),
            instruction,
        }))
    }

    /// Fetches, advances `ip` past the instruction and executes it.
    pub fn step<D: Decoder, X: Executor>(
        &mut self,
        dec: &D,
        exec: &X,
    ) -> Result<Option<(Fetched, Trace)>, Trap> {
        let Some(fetched) = self.fetch(dec)? else {
            return Ok(None);
        };
        let before = self.snapshot();
        self.advance(fetched.size());
        exec.exec(self, &fetched.instruction, before.ip)?;
        let trace = Trace::between(&before, &self.snapshot());
        Ok(Some((fetched, trace)))
    }
}
