//! LZ77 decompression (LZ77UnCompWram / LZ77UnCompVram)

use super::{decompressed_length, Cursors, UnitWriter, Width};
use swi_memory::MemoryPort;

/// Shortest back-reference the token format can express
pub const MIN_MATCH: u32 = 3;
/// Longest back-reference the token format can express
pub const MAX_MATCH: u32 = 18;
/// Furthest back a reference can reach
pub const WINDOW_SIZE: u32 = 0x1000;

/// Split a back-reference token into (displacement, length).
///
/// The token is read as two bytes: the high nibble of the first is
/// `length - 3`, the low nibble and the second byte form a 12-bit
/// displacement where 0 means the previous byte.
pub fn back_reference(first: u8, second: u8) -> (u32, u32) {
    let disp = (((first & 0x0F) as u32) << 8) | second as u32;
    let length = ((first >> 4) as u32) + MIN_MATCH;
    (disp, length)
}

/// Decode an LZ77 stream from `source` to `dest`.
///
/// One flag byte precedes each group of eight units, most significant bit
/// first: clear is a literal byte, set is a back-reference into the output
/// already written. Decoding stops as soon as the header length has been
/// produced, which may be in the middle of a group or a reference.
pub fn un_lz77(memory: &mut dyn MemoryPort, source: u32, dest: u32, width: Width) -> Cursors {
    let mut remaining = decompressed_length(memory.load32(source));
    let mut source = source.wrapping_add(4);
    let mut out = UnitWriter::new(dest, width);
    let mut flags = 0u8;
    let mut units_left = 0;

    while remaining > 0 {
        if units_left == 0 {
            flags = memory.load_u8(source);
            source = source.wrapping_add(1);
            units_left = 8;
            continue;
        }

        if flags & 0x80 != 0 {
            let (disp, length) = back_reference(
                memory.load_u8(source),
                memory.load_u8(source.wrapping_add(1)),
            );
            source = source.wrapping_add(2);
            let mut window = out.dest().wrapping_sub(disp).wrapping_sub(1);
            for _ in 0..length {
                if remaining == 0 {
                    break;
                }
                remaining -= 1;
                let byte = memory.load_u8(window);
                window = window.wrapping_add(1);
                out.push(memory, byte);
            }
        } else {
            let byte = memory.load_u8(source);
            source = source.wrapping_add(1);
            out.push(memory, byte);
            remaining -= 1;
        }

        flags <<= 1;
        units_left -= 1;
    }

    out.finish(memory);
    Cursors {
        source,
        dest: out.dest(),
    }
}
