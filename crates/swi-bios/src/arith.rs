//! Arithmetic service calls
//!
//! All of these are pure functions of their register inputs; the dispatcher
//! moves values between the register file and these helpers.

use std::f32::consts::PI;
use swi_memory::MemoryPort;

/// Result of a firmware division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivResult {
    pub quotient: i32,
    pub remainder: i32,
    pub abs_quotient: u32,
}

/// Signed division truncating toward zero.
///
/// A zero divisor yields a quotient of +/-1 following the dividend's sign
/// (zero counts as positive), the dividend as remainder and 1 as the
/// absolute quotient. The real firmware hangs for most of those inputs.
pub fn div(num: i32, denom: i32) -> DivResult {
    if denom == 0 {
        return DivResult {
            quotient: if num < 0 { -1 } else { 1 },
            remainder: num,
            abs_quotient: 1,
        };
    }

    let quotient = num.wrapping_div(denom);
    DivResult {
        quotient,
        remainder: num.wrapping_rem(denom),
        abs_quotient: quotient.unsigned_abs(),
    }
}

/// Wrapping sum of the words in `[base, base + size)`
pub fn checksum(memory: &dyn MemoryPort, base: u32, size: u32) -> u32 {
    (0..size)
        .step_by(4)
        .fold(0u32, |sum, offset| sum.wrapping_add(memory.load32(base.wrapping_add(offset))))
}

/// Integer square root, truncated
pub fn sqrt(value: u32) -> u32 {
    (value as f64).sqrt() as u32
}

/// Four-quadrant arctangent of `y / x` as a fraction of a turn scaled to 0x10000.
///
/// Inputs are 1.1.14 fixed point. Angles in the lower half-plane come out
/// negative.
pub fn arc_tan2(x: i32, y: i32) -> i32 {
    let x = x as f32 / 16384.0;
    let y = y as f32 / 16384.0;
    (y.atan2(x) / (2.0 * PI) * 65536.0) as i32
}

/// Equal-tempered frequency for a MIDI key relative to key 180.
///
/// `fine` is a fraction of a semitone in 1/256ths.
pub fn midi_key_to_freq(base_freq: u32, key: i32, fine: i32) -> u32 {
    let semitones = 180.0 - key as f32 - fine as f32 / 256.0;
    (base_freq as f32 / 2f32.powf(semitones / 12.0)) as u32
}
