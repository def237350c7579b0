//! MXFP4: 32-wide blocks of FP4 values under a shared E8M0 exponent.
//!
//! Byte 0 holds the exponent e; the block scale is 2^(e-127). Exponent
//! bytes 0 and 255 mark a zero block. Nibbles use the split layout: low
//! nibbles fill positions 0..16, high nibbles 16..32.

use crate::mmap::TensorView;
use crate::quant::block_bytes;
use crate::quant::tables::FP4_TABLE;
use crate::simd;

pub const BLOCK: usize = 32;
pub const SIZE: usize = 17;

#[inline]
fn block_scale(exp: u8) -> f32 {
    if exp == 0 || exp == 255 {
        0.0
    } else {
        (2.0f32).powi(exp as i32 - 127)
    }
}

pub fn dequant(block: &[u8], out: &mut [f32; BLOCK]) {
    debug_assert!(block.len() >= SIZE);
    let scale = block_scale(block[0]);
    for j in 0..16 {
        let byte = block[1 + j];
        out[j] = FP4_TABLE[(byte & 0xF) as usize] * scale;
        out[j + 16] = FP4_TABLE[(byte >> 4) as usize] * scale;
    }
}

pub fn get(view: &TensorView, i: usize) -> f32 {
    let block = i / BLOCK;
    let within = i % BLOCK;
    let base = block * SIZE;
    let scale = block_scale(view.u8_at(base));
    let byte = view.u8_at(base + 1 + within % 16);
    let nib = if within < 16 { byte & 0xF } else { byte >> 4 };
    FP4_TABLE[nib as usize] * scale
}

pub fn dot(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    let mut raw = [0u8; SIZE];
    let mut buf = [0.0f32; BLOCK];
    for (bi, xs) in x.chunks_exact(BLOCK).enumerate() {
        let block = block_bytes(view, offset / BLOCK + bi, SIZE, &mut raw);
        dequant(block, &mut buf);
        acc += simd::dot(&buf, xs);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmap::{SegmentedMmap, TensorView};
    use std::io::Write;
    use std::sync::Arc;

    fn view_over(bytes: &[u8]) -> TensorView {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f.flush().unwrap();
        let file = f.reopen().unwrap();
        let mmap = Arc::new(SegmentedMmap::map(&file).unwrap());
        TensorView::new(mmap, 0, bytes.len() as u64)
    }

    #[test]
    fn exponent_127_is_unit_scale() {
        let mut block = vec![0u8; SIZE];
        block[0] = 127;
        block[1] = 0x72; // low nibble 2 -> 1.0, high nibble 7 -> 6.0
        let view = view_over(&block);
        assert_eq!(get(&view, 0), 1.0);
        assert_eq!(get(&view, 16), 6.0);
        assert_eq!(get(&view, 1), 0.0);
    }

    #[test]
    fn degenerate_exponents_zero_block() {
        for exp in [0u8, 255] {
            let mut block = vec![0xFFu8; SIZE];
            block[0] = exp;
            let view = view_over(&block);
            for i in 0..BLOCK {
                assert_eq!(get(&view, i), 0.0);
            }
        }
    }

    #[test]
    fn dot_matches_reference() {
        let mut bytes = Vec::new();
        for b in 0..3u8 {
            let mut block = vec![0u8; SIZE];
            block[0] = 125 + b; // scales 0.25, 0.5, 1.0
            for (j, q) in block[1..17].iter_mut().enumerate() {
                *q = ((j as u8).wrapping_mul(0x4D)) ^ b;
            }
            bytes.extend(block);
        }
        let view = view_over(&bytes);
        let x: Vec<f32> = (0..96).map(|i| ((i % 7) as f32 - 3.0) * 0.4).collect();
        let fast = dot(&view, 0, &x);
        let slow: f32 = x.iter().enumerate().map(|(i, &xi)| get(&view, i) * xi).sum();
        assert!((fast - slow).abs() / slow.abs().max(1.0) < 1e-4);
    }
}
