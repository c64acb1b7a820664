//! Shared helpers for firmware call integration tests

#![allow(dead_code)]

use swi_bios::decompress::lz77::{MAX_MATCH, MIN_MATCH, WINDOW_SIZE};
use swi_bios::{CpuState, RecordingSink, RegisterFile, SwiDispatcher};
use swi_memory::{constants::*, MemoryManager};

/// Stream header: signature byte plus 24-bit decompressed length
pub fn header(signature: u8, length: usize) -> Vec<u8> {
    let word = ((length as u32) << 8) | signature as u32;
    word.to_le_bytes().to_vec()
}

/// Greedy LZ77 encoder. `min_distance` of 2 keeps references away from the
/// byte still being assembled when decoding with halfword stores.
pub fn compress_lz77(data: &[u8], min_distance: usize) -> Vec<u8> {
    let mut out = header(0x10, data.len());
    let mut pos = 0;

    while pos < data.len() {
        let flag_index = out.len();
        out.push(0);

        for bit in 0..8 {
            if pos >= data.len() {
                break;
            }

            let mut best = (0, 0);
            let max_distance = pos.min(WINDOW_SIZE as usize);
            for distance in min_distance..=max_distance {
                let mut length = 0;
                while length < MAX_MATCH as usize
                    && pos + length < data.len()
                    && data[pos + length - distance] == data[pos + length]
                {
                    length += 1;
                }
                if length > best.0 {
                    best = (length, distance);
                }
            }

            if best.0 >= MIN_MATCH as usize {
                let (length, distance) = best;
                let disp = distance - 1;
                out[flag_index] |= 0x80 >> bit;
                out.push((((length - MIN_MATCH as usize) << 4) | (disp >> 8)) as u8);
                out.push((disp & 0xFF) as u8);
                pos += length;
            } else {
                out.push(data[pos]);
                pos += 1;
            }
        }
    }

    out
}

/// Run-length encoder using runs of 3-130 and literal blocks of 1-128
pub fn compress_rle(data: &[u8]) -> Vec<u8> {
    fn flush(out: &mut Vec<u8>, literals: &mut Vec<u8>) {
        if !literals.is_empty() {
            out.push((literals.len() - 1) as u8);
            out.append(literals);
        }
    }

    let mut out = header(0x30, data.len());
    let mut literals = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let byte = data[pos];
        let mut run = 1;
        while run < 130 && pos + run < data.len() && data[pos + run] == byte {
            run += 1;
        }

        if run >= 3 {
            flush(&mut out, &mut literals);
            out.push(0x80 | (run - 3) as u8);
            out.push(byte);
            pos += run;
        } else {
            literals.push(byte);
            pos += 1;
            if literals.len() == 128 {
                flush(&mut out, &mut literals);
            }
        }
    }
    flush(&mut out, &mut literals);

    out
}

/// Deterministic test data with plenty of repeats and some noise
pub fn sample_data(length: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    let mut data = Vec::with_capacity(length);
    while data.len() < length {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
        let byte = (state >> 16) as u8;
        let repeat = if byte & 0x80 != 0 { (byte & 0x0F) as usize + 1 } else { 1 };
        for _ in 0..repeat {
            if data.len() < length {
                data.push(byte & 0x1F);
            }
        }
    }
    data
}

/// Place `stream` in cartridge ROM and run call `number` with r1 = `dest`
pub fn run_from_rom(number: u8, stream: &[u8], dest: u32) -> (MemoryManager, CpuState, RecordingSink) {
    let mut mem = MemoryManager::new();
    mem.load_rom(stream).unwrap();
    let (cpu, log) = run_call(&mut mem, number, [BASE_CART0, dest, 0, 0]);
    (mem, cpu, log)
}

/// Run call `number` with r0-r3 preloaded
pub fn run_call(mem: &mut MemoryManager, number: u8, args: [u32; 4]) -> (CpuState, RecordingSink) {
    let mut dispatcher = SwiDispatcher::new();
    let mut cpu = CpuState::new(RegisterFile::with_args(args));
    let mut log = RecordingSink::new();
    dispatcher.dispatch(number, &mut cpu, mem, &mut log);
    (cpu, log)
}
