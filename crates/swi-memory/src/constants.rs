//! Address map constants

/// Bits to shift an address right by to get its region index
pub const BASE_OFFSET: u32 = 24;

/// Firmware image
pub const BASE_BIOS: u32 = 0x0000_0000;
pub const SIZE_BIOS: u32 = 0x4000;

/// External (on-board) work RAM
pub const BASE_WORKING_RAM: u32 = 0x0200_0000;
pub const SIZE_WORKING_RAM: u32 = 0x4_0000;

/// Internal (on-chip) work RAM
pub const BASE_WORKING_IRAM: u32 = 0x0300_0000;
pub const SIZE_WORKING_IRAM: u32 = 0x8000;

/// I/O registers
pub const BASE_IO: u32 = 0x0400_0000;

/// Palette RAM
pub const BASE_PALETTE_RAM: u32 = 0x0500_0000;
pub const SIZE_PALETTE_RAM: u32 = 0x400;

/// Video RAM
pub const BASE_VRAM: u32 = 0x0600_0000;
pub const SIZE_VRAM: u32 = 0x1_8000;

/// Object attribute memory
pub const BASE_OAM: u32 = 0x0700_0000;
pub const SIZE_OAM: u32 = 0x400;

/// Cartridge ROM, wait state 0 mirror
pub const BASE_CART0: u32 = 0x0800_0000;
/// Cartridge ROM, wait state 1 mirror
pub const BASE_CART1: u32 = 0x0A00_0000;
/// Cartridge ROM, wait state 2 mirror
pub const BASE_CART2: u32 = 0x0C00_0000;
pub const SIZE_CART0: u32 = 0x0200_0000;

/// Cartridge save RAM
pub const BASE_CART_SRAM: u32 = 0x0E00_0000;

/// Checksum of the retail firmware image
pub const GBA_BIOS_CHECKSUM: u32 = 0xBAAE_187F;

/// Checksum of the firmware image found on the handheld's successor in compatibility mode
pub const GBA_DS_BIOS_CHECKSUM: u32 = 0xBAAE_1880;
