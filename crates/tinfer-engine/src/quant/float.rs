//! Unquantized float formats: F32, F16, BF16.

use crate::mmap::TensorView;
use crate::simd;

const CHUNK: usize = 256;

#[inline]
pub fn get_f32(view: &TensorView, i: usize) -> f32 {
    view.f32_at(i * 4)
}

#[inline]
pub fn get_f16(view: &TensorView, i: usize) -> f32 {
    view.f16_at(i * 2)
}

#[inline]
pub fn get_bf16(view: &TensorView, i: usize) -> f32 {
    view.bf16_at(i * 2)
}

pub fn dot_f32(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
    // Fast path: reinterpret the mapped bytes when alignment permits.
    if let Some(bytes) = view.contiguous(offset * 4, x.len() * 4) {
        let (head, mid, _tail) = unsafe { bytes.align_to::<f32>() };
        if head.is_empty() && mid.len() == x.len() {
            return simd::dot(mid, x);
        }
    }

    let mut acc = 0.0f32;
    let mut buf = [0.0f32; CHUNK];
    for (c, xs) in x.chunks(CHUNK).enumerate() {
        let base = offset + c * CHUNK;
        for (j, b) in buf[..xs.len()].iter_mut().enumerate() {
            *b = view.f32_at((base + j) * 4);
        }
        acc += simd::dot(&buf[..xs.len()], xs);
    }
    acc
}

pub fn dot_f16(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    let mut buf = [0.0f32; CHUNK];
    for (c, xs) in x.chunks(CHUNK).enumerate() {
        let base = offset + c * CHUNK;
        if let Some(bytes) = view.contiguous(base * 2, xs.len() * 2) {
            for (j, b) in buf[..xs.len()].iter_mut().enumerate() {
                *b = half::f16::from_le_bytes([bytes[j * 2], bytes[j * 2 + 1]]).to_f32();
            }
        } else {
            for (j, b) in buf[..xs.len()].iter_mut().enumerate() {
                *b = view.f16_at((base + j) * 2);
            }
        }
        acc += simd::dot(&buf[..xs.len()], xs);
    }
    acc
}

pub fn dot_bf16(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    let mut buf = [0.0f32; CHUNK];
    for (c, xs) in x.chunks(CHUNK).enumerate() {
        let base = offset + c * CHUNK;
        if let Some(bytes) = view.contiguous(base * 2, xs.len() * 2) {
            for (j, b) in buf[..xs.len()].iter_mut().enumerate() {
                *b = half::bf16::from_le_bytes([bytes[j * 2], bytes[j * 2 + 1]]).to_f32();
            }
        } else {
            for (j, b) in buf[..xs.len()].iter_mut().enumerate() {
                *b = view.bf16_at((base + j) * 2);
            }
        }
        acc += simd::dot(&buf[..xs.len()], xs);
    }
    acc
}
