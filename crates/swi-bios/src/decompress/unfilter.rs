//! Differential filter decoding (Diff8bitUnFilterWram/Vram, Diff16bitUnFilter)

use super::{decompressed_length, Cursors, HalfwordAssembler, Width};
use swi_memory::MemoryPort;

/// Undo a differential filter from `source` to `dest`.
///
/// Each sample is the previous decoded sample plus a delta read from the
/// stream, wrapping at the input width. When the output is wider than the
/// input, two decoded bytes are stored per halfword; the store happens on the
/// byte read from an odd source address.
pub fn un_filter(
    memory: &mut dyn MemoryPort,
    source: u32,
    dest: u32,
    in_width: Width,
    out_width: Width,
) -> Cursors {
    let mut source = source & !3;
    let mut remaining = decompressed_length(memory.load32(source)) as i32;
    source = source.wrapping_add(4);
    let mut dest = dest;
    let mut assembler = HalfwordAssembler::new();
    let mut previous = 0u16;

    while remaining > 0 {
        let delta = match in_width {
            Width::Byte => memory.load_u8(source) as u16,
            Width::Halfword => memory.load_u16(source),
        };
        let sample = delta.wrapping_add(previous);

        match (in_width, out_width) {
            (Width::Byte, Width::Halfword) => {
                if let Some(halfword) = assembler.feed(sample as u8, source & 1 != 0) {
                    memory.store16(dest, halfword);
                    dest = dest.wrapping_add(2);
                    remaining -= 2;
                }
            }
            (_, Width::Byte) => {
                memory.store8(dest, sample as u8);
                dest = dest.wrapping_add(1);
                remaining -= 1;
            }
            (Width::Halfword, Width::Halfword) => {
                memory.store16(dest, sample);
                dest = dest.wrapping_add(2);
                remaining -= 2;
            }
        }

        previous = sample;
        source = source.wrapping_add(in_width.bytes());
    }

    Cursors { source, dest }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swi_memory::{constants::*, MemoryManager};

    #[test]
    fn test_byte_deltas_wrap() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        let dst = BASE_WORKING_IRAM;
        mem.store32(src, (4 << 8) | 0x81);
        mem.write_bytes(src + 4, &[0xFE, 0x01, 0x01, 0x01]);

        let cursors = un_filter(&mut mem, src, dst, Width::Byte, Width::Byte);

        assert_eq!(mem.read_bytes(dst, 4), [0xFE, 0xFF, 0x00, 0x01]);
        assert_eq!(cursors, Cursors { source: src + 8, dest: dst + 4 });
    }

    #[test]
    fn test_zero_deltas_repeat_first_sample() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        let dst = BASE_WORKING_IRAM;
        mem.store32(src, (6 << 8) | 0x82);
        mem.store16(src + 4, 0x1234);

        let cursors = un_filter(&mut mem, src, dst, Width::Halfword, Width::Halfword);

        for i in 0..3 {
            assert_eq!(mem.load_u16(dst + i * 2), 0x1234);
        }
        assert_eq!(cursors, Cursors { source: src + 10, dest: dst + 6 });
    }

    #[test]
    fn test_halfword_deltas_wrap() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        let dst = BASE_WORKING_IRAM;
        mem.store32(src, (4 << 8) | 0x82);
        mem.store16(src + 4, 0xFFFF);
        mem.store16(src + 6, 0x0002);

        un_filter(&mut mem, src, dst, Width::Halfword, Width::Halfword);

        assert_eq!(mem.load_u16(dst), 0xFFFF);
        assert_eq!(mem.load_u16(dst + 2), 0x0001);
    }

    #[test]
    fn test_byte_to_halfword_pairs() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        let dst = BASE_VRAM;
        mem.store32(src, (4 << 8) | 0x81);
        mem.write_bytes(src + 4, &[0x10, 0x01, 0x01, 0x01]);

        let cursors = un_filter(&mut mem, src, dst, Width::Byte, Width::Halfword);

        assert_eq!(mem.load_u16(dst), 0x1110);
        assert_eq!(mem.load_u16(dst + 2), 0x1312);
        assert_eq!(cursors, Cursors { source: src + 8, dest: dst + 4 });
    }
}
