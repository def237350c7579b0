//! K-quant super-block formats: Q2_K through Q6_K.
//!
//! All five store 256 weights per super-block with 4- or 6-bit
//! sub-block scales. Dots dequantize one super-block into a stack
//! scratch buffer and run the dense kernel against the matching input
//! slice.

use crate::mmap::TensorView;
use crate::quant::{block_bytes, f16_from};
use crate::simd;

pub const QK_K: usize = 256;
pub const Q2K_SIZE: usize = 84;
pub const Q3K_SIZE: usize = 110;
pub const Q4K_SIZE: usize = 144;
pub const Q5K_SIZE: usize = 176;
pub const Q6K_SIZE: usize = 210;

// ---- Q2_K: 16 scale/min nibble pairs, 2-bit quants ----
// Layout: scales[16] | qs[64] | d f16 | dmin f16

pub fn dequant_q2k(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= Q2K_SIZE);
    let scales = &block[0..16];
    let qs = &block[16..80];
    let d = f16_from(block, 80);
    let dmin = f16_from(block, 82);

    let mut y = 0usize;
    let mut is = 0usize;
    for half in 0..2 {
        let q = &qs[half * 32..half * 32 + 32];
        for shift_group in 0..4 {
            let shift = shift_group * 2;
            for sub in 0..2 {
                let sc = scales[is];
                is += 1;
                let dl = d * (sc & 0xF) as f32;
                let ml = dmin * (sc >> 4) as f32;
                for l in 0..16 {
                    let quant = (q[sub * 16 + l] >> shift) & 3;
                    out[y] = dl * quant as f32 - ml;
                    y += 1;
                }
            }
        }
    }
}

// ---- Q3_K: 2-bit low quants + high-bit mask, 6-bit scales ----
// Layout: hmask[32] | qs[64] | scales[12] | d f16

/// Unpack the 12 packed scale bytes into 16 signed 6-bit values.
pub fn unpack_q3k_scales(packed: &[u8]) -> [i8; 16] {
    debug_assert!(packed.len() >= 12);
    const KMASK1: u32 = 0x0303_0303;
    const KMASK2: u32 = 0x0f0f_0f0f;

    let mut aux = [0u32; 4];
    aux[0] = u32::from_le_bytes([packed[0], packed[1], packed[2], packed[3]]);
    aux[1] = u32::from_le_bytes([packed[4], packed[5], packed[6], packed[7]]);
    let tmp = u32::from_le_bytes([packed[8], packed[9], packed[10], packed[11]]);
    aux[2] = ((aux[0] >> 4) & KMASK2) | (((tmp >> 4) & KMASK1) << 4);
    aux[3] = ((aux[1] >> 4) & KMASK2) | (((tmp >> 6) & KMASK1) << 4);
    aux[0] = (aux[0] & KMASK2) | ((tmp & KMASK1) << 4);
    aux[1] = (aux[1] & KMASK2) | (((tmp >> 2) & KMASK1) << 4);

    let mut scales = [0i8; 16];
    for (i, a) in aux.iter().enumerate() {
        for (j, b) in a.to_le_bytes().iter().enumerate() {
            scales[i * 4 + j] = *b as i8;
        }
    }
    scales
}

/// Inverse of `unpack_q3k_scales`; used by the synthetic test fixtures.
pub fn pack_q3k_scales(scales: &[i8; 16]) -> [u8; 12] {
    let mut packed = [0u8; 12];
    for (j, &sc) in scales.iter().enumerate() {
        let sc = sc as u8;
        let low4 = sc & 0xF;
        let high2 = (sc >> 4) & 3;
        if j < 8 {
            packed[j] |= low4;
        } else {
            packed[j - 8] |= low4 << 4;
        }
        packed[8 + j % 4] |= high2 << (2 * (j / 4));
    }
    packed
}

pub fn dequant_q3k(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= Q3K_SIZE);
    let hmask = &block[0..32];
    let qs = &block[32..96];
    let scales = unpack_q3k_scales(&block[96..108]);
    let d = f16_from(block, 108);

    let mut y = 0usize;
    let mut is = 0usize;
    for half in 0..2u8 {
        let q = &qs[half as usize * 32..half as usize * 32 + 32];
        for shift_group in 0..4u8 {
            let shift = shift_group * 2;
            let m = 1u8 << (half * 4 + shift_group);
            for sub in 0..2 {
                let dl = d * (scales[is] as i32 - 32) as f32;
                is += 1;
                for l in 0..16 {
                    let idx = sub * 16 + l;
                    let low = ((q[idx] >> shift) & 3) as i32;
                    let high = if hmask[idx] & m != 0 { 4 } else { 0 };
                    out[y] = dl * (low + high - 4) as f32;
                    y += 1;
                }
            }
        }
    }
}

// ---- Q4_K / Q5_K shared 6-bit (scale, min) pairs ----
// Q4_K layout: d f16 | dmin f16 | scales[12] | qs[128]
// Q5_K layout: d f16 | dmin f16 | scales[12] | qh[32] | qs[128]

#[inline]
pub fn scale_min_k4(j: usize, scales: &[u8]) -> (u8, u8) {
    if j < 4 {
        (scales[j] & 63, scales[j + 4] & 63)
    } else {
        let sc = (scales[j + 4] & 0xF) | ((scales[j - 4] >> 6) << 4);
        let m = (scales[j + 4] >> 4) | ((scales[j] >> 6) << 4);
        (sc, m)
    }
}

pub fn dequant_q4k(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= Q4K_SIZE);
    let d = f16_from(block, 0);
    let dmin = f16_from(block, 2);
    let scales = &block[4..16];
    let qs = &block[16..144];

    let mut y = 0usize;
    for chunk in 0..4 {
        let q = &qs[chunk * 32..chunk * 32 + 32];
        let (sc1, m1) = scale_min_k4(chunk * 2, scales);
        let (sc2, m2) = scale_min_k4(chunk * 2 + 1, scales);
        let d1 = d * sc1 as f32;
        let min1 = dmin * m1 as f32;
        let d2 = d * sc2 as f32;
        let min2 = dmin * m2 as f32;
        for &byte in q {
            out[y] = d1 * (byte & 0xF) as f32 - min1;
            y += 1;
        }
        for &byte in q {
            out[y] = d2 * (byte >> 4) as f32 - min2;
            y += 1;
        }
    }
}

pub fn dequant_q5k(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= Q5K_SIZE);
    let d = f16_from(block, 0);
    let dmin = f16_from(block, 2);
    let scales = &block[4..16];
    let qh = &block[16..48];
    let qs = &block[48..176];

    let mut y = 0usize;
    let mut u1 = 1u8;
    let mut u2 = 2u8;
    for chunk in 0..4 {
        let q = &qs[chunk * 32..chunk * 32 + 32];
        let (sc1, m1) = scale_min_k4(chunk * 2, scales);
        let (sc2, m2) = scale_min_k4(chunk * 2 + 1, scales);
        let d1 = d * sc1 as f32;
        let min1 = dmin * m1 as f32;
        let d2 = d * sc2 as f32;
        let min2 = dmin * m2 as f32;
        for (l, &byte) in q.iter().enumerate() {
            let hi = if qh[l] & u1 != 0 { 16 } else { 0 };
            out[y] = d1 * ((byte & 0xF) + hi) as f32 - min1;
            y += 1;
        }
        for (l, &byte) in q.iter().enumerate() {
            let hi = if qh[l] & u2 != 0 { 16 } else { 0 };
            out[y] = d2 * ((byte >> 4) + hi) as f32 - min2;
            y += 1;
        }
        u1 <<= 2;
        u2 <<= 2;
    }
}

// ---- Q6_K: 4-bit low + 2-bit high, signed 8-bit sub-scales ----
// Layout: ql[128] | qh[64] | scales i8[16] | d f16

pub fn dequant_q6k(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= Q6K_SIZE);
    let ql = &block[0..128];
    let qh = &block[128..192];
    let scales = &block[192..208];
    let d = f16_from(block, 208);

    for half in 0..2 {
        let base = half * 128;
        let l_q = &ql[half * 64..half * 64 + 64];
        let h_q = &qh[half * 32..half * 32 + 32];
        let sc = &scales[half * 8..half * 8 + 8];
        for l in 0..32 {
            let is = l / 16;
            let q1 = ((l_q[l] & 0xF) as i32 | (((h_q[l] as i32) & 3) << 4)) - 32;
            let q2 = ((l_q[l + 32] & 0xF) as i32 | ((((h_q[l] as i32) >> 2) & 3) << 4)) - 32;
            let q3 = ((l_q[l] >> 4) as i32 | ((((h_q[l] as i32) >> 4) & 3) << 4)) - 32;
            let q4 = ((l_q[l + 32] >> 4) as i32 | ((((h_q[l] as i32) >> 6) & 3) << 4)) - 32;
            out[base + l] = d * (sc[is] as i8 as i32 * q1) as f32;
            out[base + l + 32] = d * (sc[is + 2] as i8 as i32 * q2) as f32;
            out[base + l + 64] = d * (sc[is + 4] as i8 as i32 * q3) as f32;
            out[base + l + 96] = d * (sc[is + 6] as i8 as i32 * q4) as f32;
        }
    }
}

// ---- get / dot through the shared block-scratch pattern ----

macro_rules! kquant_accessors {
    ($get:ident, $dot:ident, $dequant:ident, $size:expr) => {
        pub fn $get(view: &TensorView, i: usize) -> f32 {
            let mut raw = [0u8; $size];
            let mut buf = [0.0f32; QK_K];
            let block = block_bytes(view, i / QK_K, $size, &mut raw);
            $dequant(block, &mut buf);
            buf[i % QK_K]
        }

        pub fn $dot(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
            let mut acc = 0.0f32;
            let mut raw = [0u8; $size];
            let mut buf = [0.0f32; QK_K];
            for (bi, xs) in x.chunks_exact(QK_K).enumerate() {
                let block = block_bytes(view, offset / QK_K + bi, $size, &mut raw);
                $dequant(block, &mut buf);
                acc += simd::dot(&buf, xs);
            }
            acc
        }
    };
}

kquant_accessors!(get_q2k, dot_q2k, dequant_q2k, Q2K_SIZE);
kquant_accessors!(get_q3k, dot_q3k, dequant_q3k, Q3K_SIZE);
kquant_accessors!(get_q4k, dot_q4k, dequant_q4k, Q4K_SIZE);
kquant_accessors!(get_q5k, dot_q5k, dequant_q5k, Q5K_SIZE);
kquant_accessors!(get_q6k, dot_q6k, dequant_q6k, Q6K_SIZE);
