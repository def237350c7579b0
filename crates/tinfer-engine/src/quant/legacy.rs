//! Legacy 32-wide block formats: Q4_0, Q5_0, Q8_0.
//!
//! Q4_0 and Q8_0 dots run on an integer-accumulator path: the dense input
//! block is quantized to (scale, 32 x i8) once, then weight and input
//! byte streams multiply in i32 with a single f32 scale per block.
//! Element order within Q4_0/Q5_0 bytes is interleaved: the low nibble is
//! element 2j, the high nibble element 2j+1.

use crate::mmap::TensorView;
use crate::quant::{block_bytes, f16_from};
use crate::simd;

pub const BLOCK: usize = 32;
pub const Q4_0_SIZE: usize = 18;
pub const Q5_0_SIZE: usize = 22;
pub const Q8_0_SIZE: usize = 34;

// ---- element access ----

pub fn get_q4_0(view: &TensorView, i: usize) -> f32 {
    let block = i / BLOCK;
    let within = i % BLOCK;
    let base = block * Q4_0_SIZE;
    let d = view.f16_at(base);
    let byte = view.u8_at(base + 2 + within / 2);
    let nib = if within % 2 == 0 { byte & 0x0F } else { byte >> 4 };
    (nib as i32 - 8) as f32 * d
}

pub fn get_q5_0(view: &TensorView, i: usize) -> f32 {
    let block = i / BLOCK;
    let within = i % BLOCK;
    let base = block * Q5_0_SIZE;
    let d = view.f16_at(base);
    let qh = view.u32_at(base + 2);
    let byte = view.u8_at(base + 6 + within / 2);
    let nib = if within % 2 == 0 { byte & 0x0F } else { byte >> 4 };
    let high = ((qh >> within) & 1) as u8;
    ((nib | (high << 4)) as i32 - 16) as f32 * d
}

pub fn get_q8_0(view: &TensorView, i: usize) -> f32 {
    let block = i / BLOCK;
    let within = i % BLOCK;
    let base = block * Q8_0_SIZE;
    let d = view.f16_at(base);
    view.i8_at(base + 2 + within) as f32 * d
}

// ---- block dequantization ----

pub fn dequant_q4_0(block: &[u8], out: &mut [f32; BLOCK]) {
    debug_assert!(block.len() >= Q4_0_SIZE);
    let d = f16_from(block, 0);
    for (j, &byte) in block[2..18].iter().enumerate() {
        out[j * 2] = ((byte & 0x0F) as i32 - 8) as f32 * d;
        out[j * 2 + 1] = ((byte >> 4) as i32 - 8) as f32 * d;
    }
}

pub fn dequant_q5_0(block: &[u8], out: &mut [f32; BLOCK]) {
    debug_assert!(block.len() >= Q5_0_SIZE);
    let d = f16_from(block, 0);
    let qh = u32::from_le_bytes([block[2], block[3], block[4], block[5]]);
    for j in 0..16 {
        let byte = block[6 + j];
        let lo = byte & 0x0F;
        let hi = byte >> 4;
        let h0 = ((qh >> (2 * j)) & 1) as u8;
        let h1 = ((qh >> (2 * j + 1)) & 1) as u8;
        out[j * 2] = ((lo | (h0 << 4)) as i32 - 16) as f32 * d;
        out[j * 2 + 1] = ((hi | (h1 << 4)) as i32 - 16) as f32 * d;
    }
}

pub fn dequant_q8_0(block: &[u8], out: &mut [f32; BLOCK]) {
    debug_assert!(block.len() >= Q8_0_SIZE);
    let d = f16_from(block, 0);
    for (o, &byte) in out.iter_mut().zip(&block[2..34]) {
        *o = byte as i8 as f32 * d;
    }
}

// ---- activation quantization (Q8 companion blocks) ----

/// Quantize one dense block of 32 values to (scale, i8[32]).
#[inline]
fn quantize_block_q8(x: &[f32], out: &mut [i8; BLOCK]) -> f32 {
    debug_assert_eq!(x.len(), BLOCK);
    let amax = x.iter().fold(0.0f32, |m, &v| m.max(v.abs()));
    if amax == 0.0 {
        out.fill(0);
        return 0.0;
    }
    let scale = amax / 127.0;
    let inv = 127.0 / amax;
    for (o, &v) in out.iter_mut().zip(x.iter()) {
        *o = (v * inv).round() as i8;
    }
    scale
}

// ---- dots ----

pub fn dot_q4_0(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    let mut raw = [0u8; Q4_0_SIZE];
    let mut xq = [0i8; BLOCK];
    for (bi, xs) in x.chunks_exact(BLOCK).enumerate() {
        let block = block_bytes(view, offset / BLOCK + bi, Q4_0_SIZE, &mut raw);
        let d = f16_from(block, 0);
        let xscale = quantize_block_q8(xs, &mut xq);

        let mut isum = 0i32;
        for (j, &byte) in block[2..18].iter().enumerate() {
            let lo = (byte & 0x0F) as i32 - 8;
            let hi = (byte >> 4) as i32 - 8;
            isum += lo * xq[j * 2] as i32 + hi * xq[j * 2 + 1] as i32;
        }
        acc += d * xscale * isum as f32;
    }
    acc
}

pub fn dot_q5_0(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    let mut raw = [0u8; Q5_0_SIZE];
    let mut buf = [0.0f32; BLOCK];
    for (bi, xs) in x.chunks_exact(BLOCK).enumerate() {
        let block = block_bytes(view, offset / BLOCK + bi, Q5_0_SIZE, &mut raw);
        dequant_q5_0(block, &mut buf);
        acc += simd::dot(&buf, xs);
    }
    acc
}

pub fn dot_q8_0(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    let mut raw = [0u8; Q8_0_SIZE];
    let mut xq = [0i8; BLOCK];
    for (bi, xs) in x.chunks_exact(BLOCK).enumerate() {
        let block = block_bytes(view, offset / BLOCK + bi, Q8_0_SIZE, &mut raw);
        let d = f16_from(block, 0);
        let xscale = quantize_block_q8(xs, &mut xq);

        let mut isum = 0i32;
        for (j, &q) in block[2..34].iter().enumerate() {
            isum += (q as i8 as i32) * xq[j] as i32;
        }
        acc += d * xscale * isum as f32;
    }
    acc
}
