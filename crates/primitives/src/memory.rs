//! Byte-addressed, zero-extending memory with a hard size cap.
//!
//! Memory never shrinks within an execution: every read or write first
//! [`expand`](Memory::expand)s the buffer to cover the touched range with
//! zero bytes, then operates on it directly.

use alloy::primitives::U256;

use crate::errors::{EvmErrors, EvmResult};

/// Not an EVM protocol constant — a safety quota so a pathological program
/// cannot force an unbounded allocation.
pub const MAX_MEMORY_BYTES: usize = 10_000_000;

/// Narrows a word-sized offset/length to `usize`, treating anything that
/// cannot fit (or that would exceed the cap regardless) as `OutOfMemory`
/// rather than introducing a separate truncation error — at this size
/// the two conditions always coincide in practice.
pub fn word_to_offset(w: U256) -> EvmResult<usize> {
    usize::try_from(w)
        .ok()
        .filter(|&n| n <= MAX_MEMORY_BYTES)
        .ok_or(EvmErrors::OutOfMemory(MAX_MEMORY_BYTES))
}

/// Narrows a word-sized offset into an immutable, zero-extending data
/// source (calldata, code, return data) rather than this capped memory
/// buffer. Those reads are defined as zero past the end of the source no
/// matter how large the offset is, so an offset that doesn't fit `usize`
/// saturates to `usize::MAX` instead of erroring — the subsequent
/// zero-extended read then correctly finds the offset past the source's
/// length and returns zeros.
pub fn word_to_data_offset(w: U256) -> usize {
    usize::try_from(w).unwrap_or(usize::MAX)
}

#[derive(Default, Debug, Clone)]
pub struct Memory {
    pub data: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        Memory { data: Vec::new() }
    }

    pub fn new_with_data(data: Vec<u8>) -> Self {
        Memory { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grows the buffer with zero bytes so it is at least `size` bytes
    /// long. No-op if already that long or longer.
    pub fn expand(&mut self, size: usize) -> EvmResult<()> {
        if size > MAX_MEMORY_BYTES {
            return Err(EvmErrors::OutOfMemory(MAX_MEMORY_BYTES));
        }
        if self.data.len() < size {
            self.data.resize(size, 0);
        }
        Ok(())
    }

    fn checked_end(offset: usize, len: usize) -> EvmResult<usize> {
        offset
            .checked_add(len)
            .filter(|&end| end <= MAX_MEMORY_BYTES)
            .ok_or(EvmErrors::OutOfMemory(MAX_MEMORY_BYTES))
    }

    /// Reads `len` bytes starting at `offset`, expanding (zero-filling) as
    /// needed first.
    pub fn read(&mut self, offset: usize, len: usize) -> EvmResult<Vec<u8>> {
        let end = Self::checked_end(offset, len)?;
        self.expand(end)?;
        Ok(self.data[offset..end].to_vec())
    }

    /// Writes `bytes` starting at `offset`, expanding as needed first.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> EvmResult<()> {
        let end = Self::checked_end(offset, bytes.len())?;
        self.expand(end)?;
        self.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn store_word(&mut self, offset: usize, word: U256) -> EvmResult<()> {
        self.write(offset, &word.to_be_bytes::<32>())
    }

    pub fn load_word(&mut self, offset: usize) -> EvmResult<U256> {
        let bytes = self.read(offset, 32)?;
        Ok(U256::from_be_slice(&bytes))
    }

    pub fn store_byte(&mut self, offset: usize, byte: u8) -> EvmResult<()> {
        self.write(offset, &[byte])
    }

    pub fn load_byte(&mut self, offset: usize) -> EvmResult<u8> {
        Ok(self.read(offset, 1)?[0])
    }

    /// Copies `length` bytes from `src` to `dst` within this buffer.
    pub fn copy_within(&mut self, dst: usize, src: usize, length: usize) -> EvmResult<()> {
        let bytes = self.read(src, length)?;
        self.write(dst, &bytes)
    }
}
