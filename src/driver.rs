//! Fetch-decode-execute loop and the listing it produces.

use serde::{Deserialize, Serialize};

use crate::cpu::{Cpu, CpuConfig, Fetched, Snapshot, Trace, Trap};
use crate::decoder::{Decoder, Instruction};
use crate::disasm::fmt_instruction;
use crate::exec::{Executor, IntExecutor};
use crate::isa::i8086::I8086Decoder;
use crate::memory::MemoryError;

/// Switches that choose what a run prints or invokes. None of them change
/// how instructions decode or execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Print each decoded instruction's structure ahead of its line.
    pub debug: bool,
    /// Simulate instructions instead of only listing them.
    pub execute: bool,
    /// Reassemble the listing and compare it with the input.
    pub check: bool,
    /// Stop with [`Trap::StepLimit`] after this many instructions.
    pub max_steps: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            debug: false,
            execute: false,
            check: false,
            max_steps: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub offset: u16,
    pub bytes: Vec<u8>,
    pub instruction: Instruction,
    pub text: String,
    pub trace: Option<Trace>,
}

impl Step {
    fn new(fetched: Fetched, trace: Option<Trace>) -> Self {
        Self {
            text: fmt_instruction(&fetched.instruction),
            offset: fetched.offset,
            bytes: fetched.bytes,
            instruction: fetched.instruction,
            trace,
        }
    }

    /// The listing line, with the trace appended as a comment.
    pub fn render(&self, cfg: &RunConfig) -> String {
        let mut out = String::new();
        if cfg.debug {
            out.push_str(&format!("; {:?}\n", self.instruction));
        }
        out.push_str(&self.text);
        if let Some(t) = &self.trace {
            out.push_str(&format!(" ; {t}"));
        }
        out
    }
}

pub struct Driver<D: Decoder, X: Executor> {
    cpu: Cpu,
    dec: D,
    exec: X,
    cfg: RunConfig,
    steps: u64,
}

impl Driver<I8086Decoder, IntExecutor> {
    pub fn new(program: &[u8], cfg: RunConfig) -> Result<Self, MemoryError> {
        Self::with_parts(program, cfg, CpuConfig::default(), I8086Decoder, IntExecutor)
    }
}

impl<D: Decoder, X: Executor> Driver<D, X> {
    pub fn with_parts(
        program: &[u8],
        cfg: RunConfig,
        cpu_cfg: CpuConfig,
        dec: D,
        exec: X,
    ) -> Result<Self, MemoryError> {
        Ok(Self {
            cpu: Cpu::load(cpu_cfg, program)?,
            dec,
            exec,
            cfg,
            steps: 0,
        })
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Runs one instruction. `Ok(None)` once `ip` reaches the end of the
    /// program. After an error the driver must not be stepped again.
    pub fn step(&mut self) -> Result<Option<Step>, Trap> {
        if self.cpu.is_done() {
            return Ok(None);
        }
        if self.steps >= self.cfg.max_steps {
            tracing::warn!(steps = self.steps, ip = self.cpu.ip, "step limit reached");
            return Err(Trap::StepLimit { steps: self.steps });
        }
        self.steps += 1;

        let step = if self.cfg.execute {
            match self.cpu.step(&self.dec, &self.exec) {
                Ok(Some((fetched, trace))) => Step::new(fetched, Some(trace)),
                Ok(None) => return Ok(None),
                Err(trap) => {
                    tracing::warn!(%trap, "execution stopped");
                    return Err(trap);
                }
            }
        } else {
            let Some(fetched) = self.cpu.fetch(&self.dec)? else {
                return Ok(None);
            };
            self.cpu.advance(fetched.size());
            Step::new(fetched, None)
        };
        tracing::trace!(offset = step.offset, text = %step.text, "step");
        Ok(Some(step))
    }

    /// Steps until the end of the program.
    pub fn run(mut self) -> Result<Listing, Trap> {
        let mut steps = Vec::new();
        while let Some(step) = self.step()? {
            steps.push(step);
        }
        Ok(Listing {
            steps,
            final_state: self.cfg.execute.then(|| self.cpu.snapshot()),
        })
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub steps: Vec<Step>,
    /// Present only when the run executed instructions.
    pub final_state: Option<Snapshot>,
}

impl Listing {
    /// Plain assembly: `bits 16` and one instruction per line.
    pub fn asm_text(&self) -> String {
        let mut out = String::from("bits 16\n");
        for s in &self.steps {
            out.push_str(&s.text);
            out.push('\n');
        }
        out
    }

    /// Listing with traces and, after an executing run, the final register
    /// and flag dump.
    pub fn render(&self, cfg: &RunConfig) -> String {
        let mut out = String::from("bits 16\n");
        for s in &self.steps {
            out.push_str(&s.render(cfg));
            out.push('\n');
        }
        if let Some(state) = &self.final_state {
            out.push('\n');
            out.push_str(&state.dump_regs());
            out.push_str(&state.dump_flags());
        }
        out
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] MemoryError),
    #[error(transparent)]
    Trap(#[from] Trap),
}

/// Decodes (and with `cfg.execute`, simulates) `program` to completion.
pub fn run(program: &[u8], cfg: &RunConfig) -> Result<Listing, RunError> {
    Ok(Driver::new(program, *cfg)?.run()?)
}
