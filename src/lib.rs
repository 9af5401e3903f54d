pub mod addressing;
pub mod cpu;
pub mod cursor;
pub mod decoder;
pub mod disasm;
pub mod driver;
pub mod exec;
pub mod instructions;
pub mod memory;

pub mod isa {
    pub mod i8086; // 8086 real-mode subset
}

pub use cpu::{Cpu, CpuConfig, Flags, Trap};
pub use driver::{run, Driver, Listing, RunConfig, RunError};
pub use memory::LinearMemory;
