//! Dense vector kernels — dot, saxpy, rmsnorm, softmax, activations.
//!
//! Leaf operations on `f32` slices: no locking, no allocation. Quantized
//! dot products dequantize into a scratch block and land here.

/// Dot product of two equal-length slices.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    crate::simd::dot(a, b)
}

/// y[i] += alpha * x[i]
#[inline]
pub fn saxpy(alpha: f32, x: &[f32], y: &mut [f32]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
}

/// RMS normalization: out[i] = x[i] * w[i] / sqrt(mean(x^2) + eps).
pub fn rmsnorm(output: &mut [f32], input: &[f32], weight: &[f32], eps: f32) {
    let n = input.len();
    debug_assert_eq!(output.len(), n);
    debug_assert_eq!(weight.len(), n);

    let ss: f32 = input.iter().map(|&x| x * x).sum::<f32>() / n as f32;
    let inv_rms = 1.0 / (ss + eps).sqrt();

    for i in 0..n {
        output[i] = input[i] * inv_rms * weight[i];
    }
}

/// In-place RMS normalization over one head slice with shared weights.
/// Used by per-head Q/K norms where `weight.len() == head_size`.
pub fn rmsnorm_in_place(values: &mut [f32], weight: &[f32], eps: f32) {
    let n = values.len();
    debug_assert_eq!(weight.len(), n);

    let ss: f32 = values.iter().map(|&x| x * x).sum::<f32>() / n as f32;
    let inv_rms = 1.0 / (ss + eps).sqrt();

    for i in 0..n {
        values[i] *= inv_rms * weight[i];
    }
}

/// Numerically stable softmax in place.
pub fn softmax(values: &mut [f32]) {
    if values.is_empty() {
        return;
    }

    let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0f32;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    let inv_sum = 1.0 / sum;
    for v in values.iter_mut() {
        *v *= inv_sum;
    }
}

/// SiLU (Swish) activation in place: x * sigmoid(x).
pub fn silu(values: &mut [f32]) {
    for v in values.iter_mut() {
        *v = *v / (1.0 + (-*v).exp());
    }
}

/// Tanh-approximated GELU in place. Gemma's GeGLU gate activation.
pub fn gelu_tanh(values: &mut [f32]) {
    const SQRT_2_OVER_PI: f32 = 0.797_884_6;
    for v in values.iter_mut() {
        let x = *v;
        let inner = SQRT_2_OVER_PI * (x + 0.044_715 * x * x * x);
        *v = 0.5 * x * (1.0 + inner.tanh());
    }
}

/// Element-wise multiply: a[i] *= b[i]
pub fn elementwise_mul(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());
    for (x, &y) in a.iter_mut().zip(b.iter()) {
        *x *= y;
    }
}

/// Element-wise add: y[i] += x[i]
pub fn accumulate(y: &mut [f32], x: &[f32]) {
    debug_assert_eq!(y.len(), x.len());
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi += xi;
    }
}

/// Multiply every element by alpha.
pub fn scale(values: &mut [f32], alpha: f32) {
    for v in values.iter_mut() {
        *v *= alpha;
    }
}

/// Copy values from src to dst.
pub fn copy(dst: &mut [f32], src: &[f32]) {
    debug_assert_eq!(dst.len(), src.len());
    dst.copy_from_slice(src);
}

/// L2-normalize in place. Used by the embedding endpoint.
pub fn l2_normalize(values: &mut [f32]) {
    let norm: f32 = values.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        let inv = 1.0 / norm;
        for v in values.iter_mut() {
            *v *= inv;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let mut v = vec![1.0, 2.0, 3.0];
        softmax(&mut v);
        let sum: f32 = v.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        // Ordering preserved
        assert!(v[2] > v[1] && v[1] > v[0]);
        assert!(v.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_softmax_large_logits_stable() {
        let mut v = vec![1000.0, 1001.0, 1002.0];
        softmax(&mut v);
        assert!(v.iter().all(|p| p.is_finite()));
        let sum: f32 = v.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rmsnorm_unit_weights_norm() {
        // With unit weights, ||out||^2 ~= n regardless of input scale.
        for scale_factor in [0.01f32, 1.0, 100.0] {
            let input: Vec<f32> = (1..=8).map(|i| i as f32 * scale_factor).collect();
            let weight = vec![1.0f32; 8];
            let mut output = vec![0.0f32; 8];
            rmsnorm(&mut output, &input, &weight, 1e-6);
            let norm_sq: f32 = output.iter().map(|&x| x * x).sum();
            assert!((norm_sq - 8.0).abs() < 1e-2, "norm_sq={norm_sq}");
        }
    }

    #[test]
    fn test_dot_and_saxpy() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        assert!((dot(&a, &b) - 32.0).abs() < 1e-6);

        let mut y = vec![1.0, 1.0, 1.0];
        saxpy(2.0, &a, &mut y);
        assert_eq!(y, vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_silu() {
        let mut v = vec![0.0, 1.0, -1.0];
        silu(&mut v);
        assert!((v[0] - 0.0).abs() < 1e-6);
        assert!(v[1] > 0.0);
        assert!(v[2] < 0.0);
    }

    #[test]
    fn test_gelu_tanh_known_points() {
        let mut v = vec![0.0f32, 1.0];
        gelu_tanh(&mut v);
        assert!((v[0] - 0.0).abs() < 1e-6);
        // gelu(1.0) ~ 0.8412
        assert!((v[1] - 0.8412).abs() < 1e-3);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }
}
