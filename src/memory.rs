use serde::{Deserialize, Serialize};

/// Size of the 8086's 16-bit offset space.
pub const ADDRESS_SPACE: usize = 0x1_0000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("program of {len} bytes does not fit the 64 KiB address space")]
    ProgramTooLarge { len: usize },
}

/// Flat, zero-initialised memory image holding the loaded program at offset 0.
#[derive(Clone, Serialize, Deserialize)]
pub struct LinearMemory {
    pub mem: Vec<u8>,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self { mem: vec![0; size] }
    }

    /// Memory of at least `min_size` bytes (capped at the address space)
    /// with `program` copied to the start.
    pub fn with_program(program: &[u8], min_size: usize) -> Result<Self, MemoryError> {
        if program.len() > ADDRESS_SPACE {
            return Err(MemoryError::ProgramTooLarge { len: program.len() });
        }
        let mut m = Self::new(program.len().max(min_size.min(ADDRESS_SPACE)));
        m.mem[..program.len()].copy_from_slice(program);
        Ok(m)
    }

    pub fn len(&self) -> usize {
        self.mem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    /// `[start, end)` clamped to the image; empty when `start` is past it.
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        let end = end.min(self.mem.len());
        let start = start.min(end);
        &self.mem[start..end]
    }
}

impl std::fmt::Debug for LinearMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearMemory")
            .field("len", &self.mem.len())
            .finish()
    }
}
