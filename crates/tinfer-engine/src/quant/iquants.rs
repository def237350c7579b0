//! I-quant formats: IQ4_NL, IQ4_XS, IQ3_XXS, IQ3_S, IQ2_S.
//!
//! The 4-bit variants map nibbles through a non-linear level table with
//! the split layout (low nibbles fill positions 0..16, high nibbles
//! 16..32). The 2/3-bit variants store codebook indices into the grid
//! tables plus separate sign bits.

use crate::mmap::TensorView;
use crate::quant::tables::{
    IQ2S_GRID, IQ3S_GRID, IQ3XXS_GRID, KMASK_IQ2XS, KSIGNS_IQ2XS, KVALUES_IQ4NL,
};
use crate::quant::{block_bytes, f16_from};
use crate::simd;

pub const QK_K: usize = 256;
pub const IQ4NL_BLOCK: usize = 32;
pub const IQ4NL_SIZE: usize = 18;
pub const IQ4XS_SIZE: usize = 136;
pub const IQ3XXS_SIZE: usize = 98;
pub const IQ3S_SIZE: usize = 110;
pub const IQ2S_SIZE: usize = 82;

// ---- IQ4_NL: f16 scale + 16 split-layout nibble bytes ----

pub fn dequant_iq4nl(block: &[u8], out: &mut [f32; IQ4NL_BLOCK]) {
    debug_assert!(block.len() >= IQ4NL_SIZE);
    let d = f16_from(block, 0);
    for j in 0..16 {
        let byte = block[2 + j];
        out[j] = d * KVALUES_IQ4NL[(byte & 0xF) as usize] as f32;
        out[j + 16] = d * KVALUES_IQ4NL[(byte >> 4) as usize] as f32;
    }
}

// ---- IQ4_XS: 256-wide with per-32 6-bit scales ----
// Layout: d f16 | scales_h u16 | scales_l[4] | qs[128]

pub fn dequant_iq4xs(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= IQ4XS_SIZE);
    let d = f16_from(block, 0);
    let scales_h = u16::from_le_bytes([block[2], block[3]]);
    let scales_l = &block[4..8];
    let qs = &block[8..136];

    for ib in 0..8 {
        let low4 = (scales_l[ib / 2] >> (4 * (ib % 2))) & 0xF;
        let high2 = ((scales_h >> (2 * ib)) & 3) as u8;
        let ls = (low4 | (high2 << 4)) as i32;
        let dl = d * (ls - 32) as f32;
        let q = &qs[16 * ib..16 * ib + 16];
        for j in 0..16 {
            out[32 * ib + j] = dl * KVALUES_IQ4NL[(q[j] & 0xF) as usize] as f32;
            out[32 * ib + j + 16] = dl * KVALUES_IQ4NL[(q[j] >> 4) as usize] as f32;
        }
    }
}

// ---- IQ3_XXS: grid indices + packed scale/sign words ----
// Layout: d f16 | qs[64] grid indices | 8 x u32 (4-bit scale, 4 x 7-bit signs)

pub fn dequant_iq3xxs(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= IQ3XXS_SIZE);
    let d = f16_from(block, 0);
    let qs = &block[2..66];
    let sas = &block[66..98];

    for ib32 in 0..8 {
        let aux = u32::from_le_bytes([
            sas[4 * ib32],
            sas[4 * ib32 + 1],
            sas[4 * ib32 + 2],
            sas[4 * ib32 + 3],
        ]);
        let db = d * (0.5 + (aux >> 28) as f32) * 0.5;
        for l in 0..4 {
            let signs = KSIGNS_IQ2XS[((aux >> (7 * l)) & 127) as usize];
            let grid1 = IQ3XXS_GRID[qs[8 * ib32 + 2 * l] as usize].to_le_bytes();
            let grid2 = IQ3XXS_GRID[qs[8 * ib32 + 2 * l + 1] as usize].to_le_bytes();
            let base = 32 * ib32 + 8 * l;
            for j in 0..4 {
                let s1 = if signs & KMASK_IQ2XS[j] != 0 { -1.0 } else { 1.0 };
                let s2 = if signs & KMASK_IQ2XS[j + 4] != 0 { -1.0 } else { 1.0 };
                out[base + j] = db * grid1[j] as f32 * s1;
                out[base + 4 + j] = db * grid2[j] as f32 * s2;
            }
        }
    }
}

// ---- IQ3_S: 9-bit grid indices, direct sign bytes, 4-bit scales ----
// Layout: d f16 | qs[64] | qh[8] | signs[32] | scales[4]

pub fn dequant_iq3s(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= IQ3S_SIZE);
    let d = f16_from(block, 0);
    let qs = &block[2..66];
    let qh = &block[66..74];
    let signs = &block[74..106];
    let scales = &block[106..110];

    for ib32 in 0..8 {
        let nib = (scales[ib32 / 2] >> (4 * (ib32 % 2))) & 0xF;
        let db = d * (1 + 2 * nib as i32) as f32;
        let qh_b = qh[ib32] as usize;
        for l in 0..4 {
            let idx1 = qs[8 * ib32 + 2 * l] as usize | ((qh_b << (8 - 2 * l)) & 256);
            let idx2 = qs[8 * ib32 + 2 * l + 1] as usize | ((qh_b << (7 - 2 * l)) & 256);
            let grid1 = IQ3S_GRID[idx1].to_le_bytes();
            let grid2 = IQ3S_GRID[idx2].to_le_bytes();
            let sign_byte = signs[4 * ib32 + l];
            let base = 32 * ib32 + 8 * l;
            for j in 0..4 {
                let s1 = if sign_byte & KMASK_IQ2XS[j] != 0 { -1.0 } else { 1.0 };
                let s2 = if sign_byte & KMASK_IQ2XS[j + 4] != 0 { -1.0 } else { 1.0 };
                out[base + j] = db * grid1[j] as f32 * s1;
                out[base + 4 + j] = db * grid2[j] as f32 * s2;
            }
        }
    }
}

// ---- IQ2_S: 10-bit grid indices, direct sign bytes, 4-bit scales ----
// Layout: d f16 | qs[32] | signs[32] | qh[8] | scales[8]

pub fn dequant_iq2s(block: &[u8], out: &mut [f32; QK_K]) {
    debug_assert!(block.len() >= IQ2S_SIZE);
    let d = f16_from(block, 0);
    let qs = &block[2..34];
    let signs = &block[34..66];
    let qh = &block[66..74];
    let scales = &block[74..82];

    for ib32 in 0..8 {
        let db_lo = d * (0.5 + (scales[ib32] & 0xF) as f32) * 0.25;
        let db_hi = d * (0.5 + (scales[ib32] >> 4) as f32) * 0.25;
        let qh_b = qh[ib32] as usize;
        for l in 0..4 {
            let dl = if l < 2 { db_lo } else { db_hi };
            let idx = qs[4 * ib32 + l] as usize | (((qh_b >> (2 * l)) & 3) << 8);
            let grid = IQ2S_GRID[idx].to_le_bytes();
            let sign_byte = signs[4 * ib32 + l];
            let base = 32 * ib32 + 8 * l;
            for j in 0..8 {
                let s = if sign_byte & KMASK_IQ2XS[j] != 0 { -1.0 } else { 1.0 };
                out[base + j] = dl * grid[j] as f32 * s;
            }
        }
    }
}

// ---- get / dot via the shared block-scratch pattern ----

macro_rules! iquant_accessors {
    ($get:ident, $dot:ident, $dequant:ident, $size:expr, $bs:expr) => {
        pub fn $get(view: &TensorView, i: usize) -> f32 {
            let mut raw = [0u8; $size];
            let mut buf = [0.0f32; $bs];
            let block = block_bytes(view, i / $bs, $size, &mut raw);
            $dequant(block, &mut buf);
            buf[i % $bs]
        }

        pub fn $dot(view: &TensorView, offset: usize, x: &[f32]) -> f32 {
            let mut acc = 0.0f32;
            let mut raw = [0u8; $size];
            let mut buf = [0.0f32; $bs];
            for (bi, xs) in x.chunks_exact($bs).enumerate() {
                let block = block_bytes(view, offset / $bs + bi, $size, &mut raw);
                $dequant(block, &mut buf);
                acc += simd::dot(&buf, xs);
            }
            acc
        }
    };
}

iquant_accessors!(get_iq4nl, dot_iq4nl, dequant_iq4nl, IQ4NL_SIZE, IQ4NL_BLOCK);
iquant_accessors!(get_iq4xs, dot_iq4xs, dequant_iq4xs, IQ4XS_SIZE, QK_K);
iquant_accessors!(get_iq3xxs, dot_iq3xxs, dequant_iq3xxs, IQ3XXS_SIZE, QK_K);
iquant_accessors!(get_iq3s, dot_iq3s, dequant_iq3s, IQ3S_SIZE, QK_K);
iquant_accessors!(get_iq2s, dot_iq2s, dequant_iq2s, IQ2S_SIZE, QK_K);
