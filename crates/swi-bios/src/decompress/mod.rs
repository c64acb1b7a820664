//! Firmware decompression calls
//!
//! Every codec starts with a 32-bit header at the source address: the low
//! byte is a signature (0x10 LZ77, 0x20 Huffman, 0x30 RLE, 0x8x filter) and
//! the upper 24 bits are the decompressed length. Signatures are trusted, as
//! they are by the firmware itself.

mod halfword;
pub mod huffman;
pub mod lz77;
pub mod rle;
pub mod unfilter;

pub use halfword::{HalfwordAssembler, UnitWriter};
pub use huffman::un_huffman;
pub use lz77::un_lz77;
pub use rle::un_rl;
pub use unfilter::un_filter;

/// Width of one store to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Byte stores, for work RAM
    Byte,
    /// Halfword stores, for video RAM which ignores byte writes
    Halfword,
}

impl Width {
    pub fn bytes(&self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Halfword => 2,
        }
    }
}

/// Source and destination positions after a decoder finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    pub source: u32,
    pub dest: u32,
}

/// Decompressed length field of a stream header
pub fn decompressed_length(header: u32) -> u32 {
    header >> 8
}
