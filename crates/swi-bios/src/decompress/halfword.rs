//! Byte-to-halfword assembly shared by the decoders
//!
//! Video RAM drops byte stores, so the halfword variants hold each low byte
//! until its high byte arrives and then store both at once.

use super::Width;
use swi_memory::MemoryPort;

/// Pairs a held low byte with the next high byte
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfwordAssembler {
    pending: u16,
}

impl HalfwordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. A low byte is held; a high byte completes the halfword.
    pub fn feed(&mut self, byte: u8, high: bool) -> Option<u16> {
        if high {
            self.pending |= (byte as u16) << 8;
            Some(self.pending)
        } else {
            self.pending = byte as u16;
            None
        }
    }

    /// The held low byte with a zero high byte
    pub fn pending(&self) -> u16 {
        self.pending & 0xFF
    }
}

/// Byte-granular output cursor that stores in units of `width`.
///
/// In halfword mode the parity of the destination decides whether a byte is
/// held or completes a store.
#[derive(Debug, Clone, Copy)]
pub struct UnitWriter {
    dest: u32,
    width: Width,
    assembler: HalfwordAssembler,
}

impl UnitWriter {
    pub fn new(dest: u32, width: Width) -> Self {
        Self {
            dest,
            width,
            assembler: HalfwordAssembler::new(),
        }
    }

    /// Current destination address
    pub fn dest(&self) -> u32 {
        self.dest
    }

    /// Emit one output byte and advance the destination
    pub fn push(&mut self, memory: &mut dyn MemoryPort, byte: u8) {
        match self.width {
            Width::Byte => memory.store8(self.dest, byte),
            Width::Halfword => {
                if let Some(halfword) = self.assembler.feed(byte, self.dest & 1 != 0) {
                    memory.store16(self.dest ^ 1, halfword);
                }
            }
        }
        self.dest = self.dest.wrapping_add(1);
    }

    /// Store a held low byte, zero-extended, without advancing the destination
    pub fn finish(&mut self, memory: &mut dyn MemoryPort) {
        if self.width == Width::Halfword && self.dest & 1 != 0 {
            memory.store16(self.dest ^ 1, self.assembler.pending());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swi_memory::{constants::*, MemoryManager};

    #[test]
    fn test_assembler_pairs_bytes() {
        let mut asm = HalfwordAssembler::new();
        assert_eq!(asm.feed(0x34, false), None);
        assert_eq!(asm.feed(0x12, true), Some(0x1234));
        assert_eq!(asm.feed(0x78, false), None);
        assert_eq!(asm.pending(), 0x78);
    }

    #[test]
    fn test_halfword_writer_holds_low_byte() {
        let mut mem = MemoryManager::new();
        let mut out = UnitWriter::new(BASE_VRAM, Width::Halfword);

        out.push(&mut mem, 0xAA);
        assert_eq!(mem.load_u16(BASE_VRAM), 0);
        out.push(&mut mem, 0xBB);
        assert_eq!(mem.load_u16(BASE_VRAM), 0xBBAA);
        assert_eq!(out.dest(), BASE_VRAM + 2);
    }

    #[test]
    fn test_finish_flushes_odd_tail() {
        let mut mem = MemoryManager::new();
        mem.store16(BASE_VRAM + 2, 0xFFFF);
        let mut out = UnitWriter::new(BASE_VRAM, Width::Halfword);
        for byte in [1, 2, 3] {
            out.push(&mut mem, byte);
        }
        out.finish(&mut mem);

        assert_eq!(mem.load_u16(BASE_VRAM + 2), 0x0003);
        assert_eq!(out.dest(), BASE_VRAM + 3);
    }

    #[test]
    fn test_byte_writer() {
        let mut mem = MemoryManager::new();
        let mut out = UnitWriter::new(BASE_WORKING_RAM + 1, Width::Byte);
        out.push(&mut mem, 0x11);
        out.finish(&mut mem);
        assert_eq!(mem.load_u8(BASE_WORKING_RAM + 1), 0x11);
        assert_eq!(out.dest(), BASE_WORKING_RAM + 2);
    }
}
