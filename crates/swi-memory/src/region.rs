//! Region classification

use crate::constants::*;

/// Address range an address falls in, derived from its top byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Bios,
    WorkingRam,
    WorkingIram,
    Io,
    PaletteRam,
    Vram,
    Oam,
    Cart0,
    Cart1,
    Cart2,
    CartSram,
    /// Anything the address decoder leaves unmapped
    Invalid,
}

impl Region {
    /// Classify an address by its high bits
    pub fn from_address(addr: u32) -> Self {
        match addr >> BASE_OFFSET {
            0x0 => Self::Bios,
            0x2 => Self::WorkingRam,
            0x3 => Self::WorkingIram,
            0x4 => Self::Io,
            0x5 => Self::PaletteRam,
            0x6 => Self::Vram,
            0x7 => Self::Oam,
            0x8 | 0x9 => Self::Cart0,
            0xA | 0xB => Self::Cart1,
            0xC | 0xD => Self::Cart2,
            0xE => Self::CartSram,
            _ => Self::Invalid,
        }
    }

    /// Whether a firmware decompression call may write to this region
    pub fn is_decompress_target(&self) -> bool {
        matches!(self, Self::WorkingRam | Self::WorkingIram | Self::Vram)
    }

    /// Human readable region name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bios => "BIOS",
            Self::WorkingRam => "EWRAM",
            Self::WorkingIram => "IWRAM",
            Self::Io => "I/O",
            Self::PaletteRam => "Palette",
            Self::Vram => "VRAM",
            Self::Oam => "OAM",
            Self::Cart0 => "Cart (WS0)",
            Self::Cart1 => "Cart (WS1)",
            Self::Cart2 => "Cart (WS2)",
            Self::CartSram => "SRAM",
            Self::Invalid => "Invalid",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
