//! SIMD acceleration for the hot dense kernels.
//!
//! Platform-specific intrinsics behind a runtime feature check, with a
//! scalar fallback that the quantized dot kernels also use for their
//! block scratch buffers.

#[cfg(target_arch = "x86_64")]
mod avx2;

/// Dot product — dispatches to SIMD when the CPU supports it.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("avx2") {
            // Safety: feature checked above; slices are equal length.
            return unsafe { avx2::dot(a, b) };
        }
    }

    dot_scalar(a, b)
}

/// Scalar baseline, unrolled by four accumulators to keep a fixed
/// reduction order that matches the SIMD lane layout.
#[inline]
pub fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut acc = [0.0f32; 4];
    let chunks = a.len() / 4;
    for c in 0..chunks {
        let i = c * 4;
        acc[0] += a[i] * b[i];
        acc[1] += a[i + 1] * b[i + 1];
        acc[2] += a[i + 2] * b[i + 2];
        acc[3] += a[i + 3] * b[i + 3];
    }
    let mut sum = (acc[0] + acc[2]) + (acc[1] + acc[3]);
    for i in chunks * 4..a.len() {
        sum += a[i] * b[i];
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_matches_scalar() {
        let a: Vec<f32> = (0..259).map(|i| (i as f32 * 0.37).sin()).collect();
        let b: Vec<f32> = (0..259).map(|i| (i as f32 * 0.91).cos()).collect();
        let fast = dot(&a, &b);
        let slow: f32 = a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum();
        assert!((fast - slow).abs() / slow.abs().max(1.0) < 1e-4);
    }

    #[test]
    fn empty_and_short_inputs() {
        assert_eq!(dot(&[], &[]), 0.0);
        assert!((dot(&[2.0], &[3.0]) - 6.0).abs() < 1e-6);
        assert!((dot(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]) - 6.0).abs() < 1e-6);
    }
}
