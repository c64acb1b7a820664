//! Affine parameter setup calls
//!
//! Both calls turn packed scale/rotation records into the 8.8 fixed point
//! matrices the video hardware consumes:
//!
//! ```text
//! [ sx  0 ]   [ cos -sin ]   [ pa pb ]
//! [  0 sy ] * [ sin  cos ] = [ pc pd ]
//! ```
//!
//! The background variant also solves for the reference point so that the
//! screen-space center lands on the texture-space origin.

use std::f32::consts::PI;
use swi_memory::MemoryPort;

/// Size of one background source record
pub const BG_SOURCE_STRIDE: u32 = 20;
/// Size of one background destination record
pub const BG_DEST_STRIDE: u32 = 16;
/// Size of one object source record
pub const OBJ_SOURCE_STRIDE: u32 = 8;

/// Linear part of an affine transform, in floating point
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
}

impl Matrix {
    /// Scale after rotating by `angle`, a fraction of a turn in the high byte
    fn rotate_scale(sx: f32, sy: f32, angle: u16) -> Self {
        let theta = (angle >> 8) as f32 / 128.0 * PI;
        let (sin, cos) = theta.sin_cos();
        Self {
            a: cos * sx,
            b: sin * -sx,
            c: sin * sy,
            d: cos * sy,
        }
    }
}

/// 8.8 fixed point, truncated toward zero
fn fixed16(value: f32) -> u16 {
    (value * 256.0) as i32 as u16
}

/// 24.8 fixed point, truncated toward zero
fn fixed32(value: f32) -> u32 {
    (value * 256.0) as i32 as u32
}

/// BgAffineSet: expand `count` background records at `source` into
/// matrix + reference point records at `dest`.
///
/// Source layout: origin x/y (24.8), center x/y (i16), scale x/y (8.8),
/// angle (u16). Destination layout: pa, pb, pc, pd (8.8), x, y (24.8).
pub fn bg_affine_set(memory: &mut dyn MemoryPort, source: u32, dest: u32, count: u32) {
    let mut offset = source;
    let mut destination = dest;

    for _ in 0..count {
        let ox = memory.load32(offset) as i32 as f32 / 256.0;
        let oy = memory.load32(offset.wrapping_add(4)) as i32 as f32 / 256.0;
        let cx = memory.load16(offset.wrapping_add(8)) as f32;
        let cy = memory.load16(offset.wrapping_add(10)) as f32;
        let sx = memory.load16(offset.wrapping_add(12)) as f32 / 256.0;
        let sy = memory.load16(offset.wrapping_add(14)) as f32 / 256.0;
        let angle = memory.load_u16(offset.wrapping_add(16));
        offset = offset.wrapping_add(BG_SOURCE_STRIDE);

        let m = Matrix::rotate_scale(sx, sy, angle);
        let rx = ox - (m.a * cx + m.b * cy);
        let ry = oy - (m.c * cx + m.d * cy);

        memory.store16(destination, fixed16(m.a));
        memory.store16(destination.wrapping_add(2), fixed16(m.b));
        memory.store16(destination.wrapping_add(4), fixed16(m.c));
        memory.store16(destination.wrapping_add(6), fixed16(m.d));
        memory.store32(destination.wrapping_add(8), fixed32(rx));
        memory.store32(destination.wrapping_add(12), fixed32(ry));
        destination = destination.wrapping_add(BG_DEST_STRIDE);
    }
}

/// ObjAffineSet: expand `count` object records at `source` into matrices.
///
/// Source layout: scale x/y (8.8), angle (u16), padding. Consecutive matrix
/// entries are written `stride` bytes apart so they can be interleaved with
/// object attributes (stride 8) or packed (stride 2).
pub fn obj_affine_set(memory: &mut dyn MemoryPort, source: u32, dest: u32, count: u32, stride: u32) {
    let mut offset = source;
    let mut destination = dest;

    for _ in 0..count {
        let sx = memory.load16(offset) as f32 / 256.0;
        let sy = memory.load16(offset.wrapping_add(2)) as f32 / 256.0;
        let angle = memory.load_u16(offset.wrapping_add(4));
        offset = offset.wrapping_add(OBJ_SOURCE_STRIDE);

        let m = Matrix::rotate_scale(sx, sy, angle);

        memory.store16(destination, fixed16(m.a));
        memory.store16(destination.wrapping_add(stride), fixed16(m.b));
        memory.store16(destination.wrapping_add(stride.wrapping_mul(2)), fixed16(m.c));
        memory.store16(destination.wrapping_add(stride.wrapping_mul(3)), fixed16(m.d));
        destination = destination.wrapping_add(stride.wrapping_mul(4));
    }
}
