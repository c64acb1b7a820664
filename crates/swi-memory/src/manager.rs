//! Memory manager implementation

use crate::constants::*;
use crate::port::MemoryPort;
use crate::region::Region;
use swi_core::error::MemoryError;
use tracing::{debug, trace};

/// Backing store for the console's address map.
///
/// Work RAM and the small video tables mirror across their whole region the
/// way the hardware address decoder does. Firmware and cartridge ROM are
/// read-only; unmapped reads return zero and unmapped writes are dropped.
pub struct MemoryManager {
    bios: Vec<u8>,
    wram: Vec<u8>,
    iwram: Vec<u8>,
    palette: Vec<u8>,
    vram: Vec<u8>,
    oam: Vec<u8>,
    rom: Vec<u8>,
}

impl MemoryManager {
    /// Create a memory map with zeroed RAM, an empty firmware region and no cartridge
    pub fn new() -> Self {
        Self {
            bios: vec![0; SIZE_BIOS as usize],
            wram: vec![0; SIZE_WORKING_RAM as usize],
            iwram: vec![0; SIZE_WORKING_IRAM as usize],
            palette: vec![0; SIZE_PALETTE_RAM as usize],
            vram: vec![0; SIZE_VRAM as usize],
            oam: vec![0; SIZE_OAM as usize],
            rom: Vec::new(),
        }
    }

    /// Install a firmware image
    pub fn load_bios(&mut self, image: &[u8]) -> Result<(), MemoryError> {
        if image.len() != SIZE_BIOS as usize {
            return Err(MemoryError::BadFirmwareSize {
                expected: SIZE_BIOS as usize,
                actual: image.len(),
            });
        }
        self.bios.copy_from_slice(image);
        debug!("Loaded firmware image ({} bytes)", image.len());
        Ok(())
    }

    /// Install a cartridge ROM image
    pub fn load_rom(&mut self, image: &[u8]) -> Result<(), MemoryError> {
        if image.len() > SIZE_CART0 as usize {
            return Err(MemoryError::RomTooLarge(image.len()));
        }
        self.rom = image.to_vec();
        debug!("Loaded cartridge image ({} bytes)", image.len());
        Ok(())
    }

    /// Read a run of bytes
    pub fn read_bytes(&self, addr: u32, size: u32) -> Vec<u8> {
        (0..size)
            .map(|i| self.read_byte(addr.wrapping_add(i)))
            .collect()
    }

    /// Write a run of bytes. Read-only and unmapped bytes are dropped.
    pub fn write_bytes(&mut self, addr: u32, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(i as u32), byte);
        }
    }

    fn read_byte(&self, addr: u32) -> u8 {
        let (buffer, offset) = match Region::from_address(addr) {
            Region::Bios => (&self.bios, addr as usize),
            Region::WorkingRam => (&self.wram, (addr & (SIZE_WORKING_RAM - 1)) as usize),
            Region::WorkingIram => (&self.iwram, (addr & (SIZE_WORKING_IRAM - 1)) as usize),
            Region::PaletteRam => (&self.palette, (addr & (SIZE_PALETTE_RAM - 1)) as usize),
            Region::Vram => (&self.vram, vram_offset(addr)),
            Region::Oam => (&self.oam, (addr & (SIZE_OAM - 1)) as usize),
            Region::Cart0 | Region::Cart1 | Region::Cart2 => {
                (&self.rom, (addr & (SIZE_CART0 - 1)) as usize)
            }
            Region::Io | Region::CartSram | Region::Invalid => return 0,
        };
        buffer.get(offset).copied().unwrap_or(0)
    }

    fn write_byte(&mut self, addr: u32, value: u8) {
        let (buffer, offset) = match Region::from_address(addr) {
            Region::WorkingRam => (&mut self.wram, (addr & (SIZE_WORKING_RAM - 1)) as usize),
            Region::WorkingIram => (&mut self.iwram, (addr & (SIZE_WORKING_IRAM - 1)) as usize),
            Region::PaletteRam => (&mut self.palette, (addr & (SIZE_PALETTE_RAM - 1)) as usize),
            Region::Vram => (&mut self.vram, vram_offset(addr)),
            Region::Oam => (&mut self.oam, (addr & (SIZE_OAM - 1)) as usize),
            region => {
                trace!("Dropped store to {} at 0x{:08x}", region, addr);
                return;
            }
        };
        buffer[offset] = value;
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}

/// VRAM is 96 KiB mirrored in 128 KiB steps; the upper 32 KiB of each step
/// repeats the last 32 KiB bank.
fn vram_offset(addr: u32) -> usize {
    let offset = addr & 0x1_FFFF;
    if offset >= SIZE_VRAM {
        (offset - 0x8000) as usize
    } else {
        offset as usize
    }
}

impl MemoryPort for MemoryManager {
    fn load_u8(&self, addr: u32) -> u8 {
        self.read_byte(addr)
    }

    fn load_u16(&self, addr: u32) -> u16 {
        let addr = addr & !1;
        u16::from_le_bytes([self.read_byte(addr), self.read_byte(addr | 1)])
    }

    fn load32(&self, addr: u32) -> u32 {
        let aligned = addr & !3;
        let word = u32::from_le_bytes([
            self.read_byte(aligned),
            self.read_byte(aligned | 1),
            self.read_byte(aligned | 2),
            self.read_byte(aligned | 3),
        ]);
        // Misaligned word loads rotate the aligned word
        word.rotate_right((addr & 3) * 8)
    }

    fn store8(&mut self, addr: u32, value: u8) {
        self.write_byte(addr, value);
    }

    fn store16(&mut self, addr: u32, value: u16) {
        let addr = addr & !1;
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(addr, lo);
        self.write_byte(addr | 1, hi);
    }

    fn store32(&mut self, addr: u32, value: u32) {
        let addr = addr & !3;
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_byte(addr | i as u32, byte);
        }
    }
}
