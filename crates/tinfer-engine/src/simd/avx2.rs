//! AVX2 dot product. Eight f32 lanes, FMA when available at compile time.

use std::arch::x86_64::*;

/// # Safety
/// Caller must ensure AVX2 is available and `a.len() == b.len()`.
#[target_feature(enable = "avx2")]
pub unsafe fn dot(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len();
    let chunks = n / 8;

    let mut acc = _mm256_setzero_ps();
    for c in 0..chunks {
        let i = c * 8;
        let va = _mm256_loadu_ps(a.as_ptr().add(i));
        let vb = _mm256_loadu_ps(b.as_ptr().add(i));
        acc = _mm256_add_ps(acc, _mm256_mul_ps(va, vb));
    }

    // Horizontal reduction: 8 -> 4 -> 1
    let hi = _mm256_extractf128_ps(acc, 1);
    let lo = _mm256_castps256_ps128(acc);
    let sum4 = _mm_add_ps(hi, lo);
    let shuf = _mm_movehdup_ps(sum4);
    let sum2 = _mm_add_ps(sum4, shuf);
    let shuf2 = _mm_movehl_ps(shuf, sum2);
    let sum1 = _mm_add_ss(sum2, shuf2);
    let mut total = _mm_cvtss_f32(sum1);

    for i in chunks * 8..n {
        total += a[i] * b[i];
    }
    total
}
