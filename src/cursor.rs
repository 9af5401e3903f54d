/// A read past the end of the instruction buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("read of {want} byte(s) at offset {pos} runs past end of buffer (len {len})")]
pub struct OutOfBounds {
    pub pos: usize,
    pub want: usize,
    pub len: usize,
}

/// Sequential reader over an immutable byte buffer.
///
/// The position never leaves `[0, len]`: a read that would cross the end
/// fails without consuming anything.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Up to `n` bytes from the current position, clamped to what is left.
    pub fn peek(&self, n: usize) -> &'a [u8] {
        let end = self.pos + n.min(self.remaining());
        &self.buf[self.pos..end]
    }

    pub fn read(&mut self) -> Result<u8, OutOfBounds> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, OutOfBounds> {
        self.read().map(|b| b as i8)
    }

    /// Two bytes, low byte first.
    pub fn read16(&mut self) -> Result<u16, OutOfBounds> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// One byte zero-extended when `wide` is false, otherwise a 16-bit word.
    pub fn read16_or_8(&mut self, wide: bool) -> Result<u16, OutOfBounds> {
        if wide {
            self.read16()
        } else {
            self.read().map(u16::from)
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], OutOfBounds> {
        if n > self.remaining() {
            return Err(OutOfBounds {
                pos: self.pos,
                want: n,
                len: self.buf.len(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }
}
