use crate::constants::{MEMORY_SIZE, SPRITE_SHEET};
use crate::error::{Fault, Result};

/// 4K of byte addressable memory.
///
/// Layout:
///   0x000-0x04f  hexadecimal digit sprites
///   0x050-0x1ff  reserved for the interpreter
///   0x200-0xfff  program
///
/// Every access is bounds checked; addresses are u16 as per the chip-8, lengths are usize.
#[derive(Copy, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the sprite sheet installed at 0x000
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or_else(|| Fault::memory(addr as usize))
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        let cell = self
            .bytes
            .get_mut(addr as usize)
            .ok_or_else(|| Fault::memory(addr as usize))?;
        *cell = value;
        Ok(())
    }

    /// Copy `data` into memory starting at `offset`.
    /// Nothing is written unless the whole of `data` fits.
    pub fn load(&mut self, offset: u16, data: &[u8]) -> Result<()> {
        self.slice_mut(offset, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// Get a two-byte big endian word, e.g. an instruction
    pub fn word(&self, addr: u16) -> Result<u16> {
        let bytes = self.slice(addr, 2)?;
        Ok(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    /// Get a r/o slice of `len` bytes starting at `addr`
    pub fn slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let range = Memory::range(addr, len)?;
        Ok(&self.bytes[range])
    }

    /// Get a r/w slice of `len` bytes starting at `addr`
    pub fn slice_mut(&mut self, addr: u16, len: usize) -> Result<&mut [u8]> {
        let range = Memory::range(addr, len)?;
        Ok(&mut self.bytes[range])
    }

    fn range(addr: u16, len: usize) -> Result<std::ops::Range<usize>> {
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            // report the first cell that doesn't exist
            return Err(Fault::memory(start.max(MEMORY_SIZE)));
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
