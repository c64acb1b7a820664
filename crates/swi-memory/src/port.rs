//! Typed memory port consumed by firmware call implementations

use crate::region::Region;

/// Byte addressable, little-endian memory as seen by the CPU.
///
/// Implementors decide alignment and mirroring; the firmware call code only
/// relies on the typed loads and stores below.
pub trait MemoryPort {
    /// Load an unsigned byte
    fn load_u8(&self, addr: u32) -> u8;

    /// Load an unsigned halfword
    fn load_u16(&self, addr: u32) -> u16;

    /// Load a word
    fn load32(&self, addr: u32) -> u32;

    /// Store a byte
    fn store8(&mut self, addr: u32, value: u8);

    /// Store a halfword
    fn store16(&mut self, addr: u32, value: u16);

    /// Store a word
    fn store32(&mut self, addr: u32, value: u32);

    /// Load a sign-extended byte
    fn load8(&self, addr: u32) -> i8 {
        self.load_u8(addr) as i8
    }

    /// Load a sign-extended halfword
    fn load16(&self, addr: u32) -> i16 {
        self.load_u16(addr) as i16
    }

    /// Region an address belongs to
    fn region_of(&self, addr: u32) -> Region {
        Region::from_address(addr)
    }
}
