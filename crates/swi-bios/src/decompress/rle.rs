//! Run-length decompression (RLUnCompWram / RLUnCompVram)

use super::{decompressed_length, Cursors, UnitWriter, Width};
use swi_memory::MemoryPort;

/// Decode a run-length stream from `source` to `dest`.
///
/// Each flag byte with bit 7 set is followed by one byte repeated
/// `(flag & 0x7F) + 3` times; otherwise `flag + 1` literal bytes follow.
/// The output is zero padded to a multiple of four bytes of the header length.
pub fn un_rl(memory: &mut dyn MemoryPort, source: u32, dest: u32, width: Width) -> Cursors {
    let mut source = source & !3;
    let mut remaining = decompressed_length(memory.load32(source));
    let padding = 4u32.wrapping_sub(remaining) & 3;
    source = source.wrapping_add(4);
    let mut out = UnitWriter::new(dest, width);

    while remaining > 0 {
        let flag = memory.load_u8(source);
        source = source.wrapping_add(1);

        if flag & 0x80 != 0 {
            let run = (flag & 0x7F) as u32 + 3;
            let byte = memory.load_u8(source);
            source = source.wrapping_add(1);
            for _ in 0..run {
                if remaining == 0 {
                    break;
                }
                remaining -= 1;
                out.push(memory, byte);
            }
        } else {
            let run = flag as u32 + 1;
            for _ in 0..run {
                if remaining == 0 {
                    break;
                }
                remaining -= 1;
                let byte = memory.load_u8(source);
                source = source.wrapping_add(1);
                out.push(memory, byte);
            }
        }
    }

    for _ in 0..padding {
        out.push(memory, 0);
    }
    out.finish(memory);

    Cursors {
        source,
        dest: out.dest(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swi_memory::{constants::*, MemoryManager};

    #[test]
    fn test_runs_and_literals() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        let dst = BASE_WORKING_IRAM;
        mem.store32(src, (8 << 8) | 0x30);
        // 5 x 'z', then 3 literals
        mem.write_bytes(src + 4, &[0x82, b'z', 0x02, b'a', b'b', b'c']);

        let cursors = un_rl(&mut mem, src, dst, Width::Byte);

        assert_eq!(mem.read_bytes(dst, 8), b"zzzzzabc");
        assert_eq!(cursors, Cursors { source: src + 10, dest: dst + 8 });
    }

    #[test]
    fn test_pads_to_word() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        let dst = BASE_WORKING_IRAM;
        mem.write_bytes(dst, &[0xEE; 9]);
        mem.store32(src, (5 << 8) | 0x30);
        mem.write_bytes(src + 4, &[0x84, 0x11]);

        let cursors = un_rl(&mut mem, src, dst, Width::Byte);

        assert_eq!(mem.read_bytes(dst, 9), [0x11, 0x11, 0x11, 0x11, 0x11, 0, 0, 0, 0xEE]);
        assert_eq!(cursors.dest, dst + 8);
        assert_eq!(cursors.source, src + 6);
    }

    #[test]
    fn test_halfword_odd_length_pads() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        let dst = BASE_VRAM;
        mem.write_bytes(dst, &[0xEE; 10]);
        mem.store32(src, (3 << 8) | 0x30);
        mem.write_bytes(src + 4, &[0x02, 1, 2, 3]);

        let cursors = un_rl(&mut mem, src, dst, Width::Halfword);

        assert_eq!(mem.read_bytes(dst, 5), [1, 2, 3, 0, 0xEE]);
        assert_eq!(cursors.dest, dst + 4);
    }

    #[test]
    fn test_halfword_odd_destination() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        let dst = BASE_VRAM + 1;
        mem.write_bytes(BASE_VRAM, &[0xEE; 8]);
        mem.store32(src, (2 << 8) | 0x30);
        mem.write_bytes(src + 4, &[0x01, 0x0A, 0x0B]);

        let cursors = un_rl(&mut mem, src, dst, Width::Halfword);

        // The byte below the start is cleared by the first halfword store
        assert_eq!(mem.read_bytes(BASE_VRAM, 8), [0x00, 0x0A, 0x0B, 0x00, 0x00, 0x00, 0xEE, 0xEE]);
        // Two bytes of padding, and the cursor stops one past the last pushed byte
        assert_eq!(cursors.dest, dst + 4);
        assert_eq!(cursors.source, src + 7);
    }

    #[test]
    fn test_source_is_word_aligned() {
        let mut mem = MemoryManager::new();
        let src = BASE_WORKING_RAM;
        mem.store32(src, (4 << 8) | 0x30);
        mem.write_bytes(src + 4, &[0x81, 0x7F]);

        let cursors = un_rl(&mut mem, src + 3, BASE_WORKING_IRAM, Width::Byte);

        assert_eq!(mem.read_bytes(BASE_WORKING_IRAM, 4), [0x7F; 4]);
        assert_eq!(cursors.source, src + 6);
    }
}
