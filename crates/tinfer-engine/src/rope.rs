//! Rotary position embeddings with YaRN extension scaling.
//!
//! Cos/sin tables are precomputed per (position, pair) at state-init
//! time. Two pair layouts exist: NORMAL rotates adjacent elements
//! (v[2i], v[2i+1]); NEOX rotates split halves (v[i], v[half+i]). Only
//! the first `rope_dim` dimensions of each head rotate; the rest pass
//! through (partial RoPE).
//!
//! YaRN blends the original ("extrapolated") and compressed
//! ("interpolated") frequencies per pair through a ramp between the
//! correction dims, and compensates attention magnitude with `mscale`,
//! which the attention modules consume as `mscale^2 / sqrt(head_dim)`.

use crate::config::{ModelConfig, RopeType};

/// Ramp boundaries default to the llama.cpp beta values.
const BETA_FAST: f32 = 32.0;
const BETA_SLOW: f32 = 1.0;

/// Precomputed rotation tables for one model.
pub struct RopeTable {
    cos: Vec<f32>,
    sin: Vec<f32>,
    half: usize,
    rope_dim: usize,
    layout: RopeType,
    mscale: f32,
}

fn yarn_corr_dim(rope_dim: usize, orig_ctx: usize, beta: f32, theta: f32) -> f32 {
    let n = rope_dim as f32;
    n * (orig_ctx as f32 / (beta * 2.0 * std::f32::consts::PI)).ln() / (2.0 * theta.ln())
}

impl RopeTable {
    /// Build tables for positions `0..max_seq_len`.
    ///
    /// `freq_factors` are optional per-pair divisors (Llama-3 long-rope);
    /// `rope_dim_override` lets MLA use the rope sub-dimension rather than
    /// the full head size.
    pub fn new(
        cfg: &ModelConfig,
        rope_dim: usize,
        max_seq_len: usize,
        freq_factors: Option<&[f32]>,
    ) -> Self {
        let half = rope_dim / 2;
        let theta = cfg.rope_freq_base;
        let scaling_factor = cfg.rope_scaling_factor;
        let use_yarn = scaling_factor > 1.0 && cfg.rope_orig_context > 0;
        let freq_scale = if use_yarn { 1.0 / scaling_factor } else { 1.0 };

        let (corr_low, corr_high) = if use_yarn {
            (
                yarn_corr_dim(rope_dim, cfg.rope_orig_context, BETA_FAST, theta).floor(),
                yarn_corr_dim(rope_dim, cfg.rope_orig_context, BETA_SLOW, theta).ceil(),
            )
        } else {
            (0.0, 0.0)
        };

        let mscale = if use_yarn {
            let attn_factor = 1.0 + 0.1 * cfg.yarn_log_mul * scaling_factor.ln();
            attn_factor * (1.0 + 0.1 * (1.0 / freq_scale).ln())
        } else {
            1.0
        };

        // Per-pair frequencies, shared across positions.
        let mut freqs = vec![0.0f32; half];
        for (i, f) in freqs.iter_mut().enumerate() {
            let mut base = theta.powf(-2.0 * i as f32 / rope_dim as f32);
            if let Some(&factor) = freq_factors.and_then(|f| f.get(i)) {
                base /= factor;
            }
            *f = if use_yarn {
                let span = (corr_high - corr_low).max(1e-3);
                let ramp = 1.0 - ((i as f32 - corr_low) / span).clamp(0.0, 1.0);
                let interp = freq_scale * base;
                let extrap = base;
                interp * (1.0 - ramp) + extrap * ramp
            } else {
                base
            };
        }

        let mut cos = vec![0.0f32; max_seq_len * half];
        let mut sin = vec![0.0f32; max_seq_len * half];
        for pos in 0..max_seq_len {
            for i in 0..half {
                let angle = pos as f32 * freqs[i];
                cos[pos * half + i] = angle.cos();
                sin[pos * half + i] = angle.sin();
            }
        }

        Self {
            cos,
            sin,
            half,
            rope_dim,
            layout: cfg.rope_type,
            mscale,
        }
    }

    /// Attention magnitude correction (1.0 without YaRN).
    pub fn mscale(&self) -> f32 {
        self.mscale
    }

    /// Replacement for the standard `1/sqrt(head_dim)` attention scale.
    pub fn attn_scale(&self, head_dim: usize) -> f32 {
        self.mscale * self.mscale / (head_dim as f32).sqrt()
    }

    pub fn rope_dim(&self) -> usize {
        self.rope_dim
    }

    /// Rotate the first `rope_dim` dims of every head in `values`
    /// (`n_heads * head_dim` elements) at position `pos`.
    pub fn apply(&self, values: &mut [f32], n_heads: usize, head_dim: usize, pos: usize) {
        debug_assert_eq!(values.len(), n_heads * head_dim);
        debug_assert!(self.rope_dim <= head_dim);
        for h in 0..n_heads {
            let head = &mut values[h * head_dim..h * head_dim + head_dim];
            self.apply_single(&mut head[..self.rope_dim], pos);
        }
    }

    /// Rotate one `rope_dim`-length vector at position `pos`.
    pub fn apply_single(&self, values: &mut [f32], pos: usize) {
        debug_assert_eq!(values.len(), self.rope_dim);
        let table_base = pos * self.half;
        match self.layout {
            RopeType::Normal => {
                for i in 0..self.half {
                    let cos = self.cos[table_base + i];
                    let sin = self.sin[table_base + i];
                    let v0 = values[2 * i];
                    let v1 = values[2 * i + 1];
                    values[2 * i] = v0 * cos - v1 * sin;
                    values[2 * i + 1] = v0 * sin + v1 * cos;
                }
            }
            RopeType::Neox => {
                for i in 0..self.half {
                    let cos = self.cos[table_base + i];
                    let sin = self.sin[table_base + i];
                    let v0 = values[i];
                    let v1 = values[self.half + i];
                    values[i] = v0 * cos - v1 * sin;
                    values[self.half + i] = v0 * sin + v1 * cos;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Arch;

    fn test_config(rope_type: RopeType) -> ModelConfig {
        ModelConfig {
            arch: Arch::Llama,
            dim: 32,
            n_layers: 1,
            n_heads: 4,
            n_kv_heads: 4,
            key_length: 8,
            value_length: 8,
            hidden_dim: 64,
            vocab_size: 16,
            context_length: 64,
            rope_dim: 8,
            rope_type,
            rope_freq_base: 10000.0,
            rms_norm_eps: 1e-5,
            rope_scaling_factor: 1.0,
            rope_orig_context: 0,
            yarn_log_mul: 0.0,
            final_logit_softcap: 0.0,
            logit_scale: 1.0,
            embedding_scale: 1.0,
            kv_lora_rank: 0,
            expert_count: 0,
            expert_used_count: 0,
            expert_shared_count: 0,
            expert_ffn_length: 0,
            leading_dense_block_count: 0,
            norm_topk_prob: true,
            bos_token_id: None,
            eos_token_id: None,
            extra_stop_ids: Vec::new(),
        }
    }

    #[test]
    fn identity_at_position_zero() {
        for layout in [RopeType::Normal, RopeType::Neox] {
            let cfg = test_config(layout);
            let rope = RopeTable::new(&cfg, 8, 64, None);
            let mut v: Vec<f32> = (0..32).map(|i| i as f32 * 0.5 - 4.0).collect();
            let original = v.clone();
            rope.apply(&mut v, 4, 8, 0);
            for (a, b) in v.iter().zip(original.iter()) {
                assert!((a - b).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn partial_rotation_leaves_tail_untouched() {
        let cfg = test_config(RopeType::Neox);
        // rope_dim 4 < head_dim 8
        let rope = RopeTable::new(&cfg, 4, 64, None);
        let mut v: Vec<f32> = (0..8).map(|i| i as f32 + 1.0).collect();
        let original = v.clone();
        rope.apply(&mut v, 1, 8, 5);
        assert_eq!(&v[4..], &original[4..]);
        assert!(v[..4] != original[..4]);
    }

    #[test]
    fn rotation_preserves_pair_norms() {
        let cfg = test_config(RopeType::Normal);
        let rope = RopeTable::new(&cfg, 8, 64, None);
        let mut v: Vec<f32> = vec![3.0, 4.0, 1.0, -2.0, 0.5, 0.5, -1.0, 2.0];
        let before: f32 = v.iter().map(|x| x * x).sum();
        rope.apply_single(&mut v, 17);
        let after: f32 = v.iter().map(|x| x * x).sum();
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn yarn_mscale_formula() {
        let mut cfg = test_config(RopeType::Neox);
        cfg.rope_scaling_factor = 40.0;
        cfg.rope_orig_context = 4096;
        cfg.yarn_log_mul = 0.0707;
        let rope = RopeTable::new(&cfg, 8, 16, None);

        let ln40 = 40.0f32.ln();
        let attn_factor = 1.0 + 0.1 * 0.0707 * ln40;
        let expected = attn_factor * (1.0 + 0.1 * ln40);
        assert!((rope.mscale() - expected).abs() < 1e-5);

        let scale = rope.attn_scale(64);
        assert!((scale - expected * expected / 8.0).abs() < 1e-5);
    }

    #[test]
    fn mscale_is_one_without_scaling() {
        let cfg = test_config(RopeType::Normal);
        let rope = RopeTable::new(&cfg, 8, 16, None);
        assert_eq!(rope.mscale(), 1.0);
        assert!((rope.attn_scale(16) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn freq_factors_divide_frequencies() {
        let cfg = test_config(RopeType::Neox);
        let plain = RopeTable::new(&cfg, 8, 16, None);
        let factors = vec![2.0f32; 4];
        let halved = RopeTable::new(&cfg, 8, 16, Some(&factors));
        // Halving every frequency means pos 2 in the scaled table matches
        // pos 1 in the plain table.
        for i in 0..4 {
            assert!((halved.cos[2 * 4 + i] - plain.cos[4 + i]).abs() < 1e-4);
        }
    }
}
