//! Weight directory — GGUF tensor names resolved into typed per-layer
//! records.
//!
//! Canonical names follow the `blk.{i}.` convention
//! (`blk.3.ffn_gate_exps.weight`, `blk.0.attn_kv_a_mqa.weight`, ...).
//! Small vectors (norms, biases) are materialized to f32 once at load;
//! matmul weights stay quantized behind `QuantTensor`. Required-slot
//! validation happens here so a missing tensor fails the load with its
//! canonical name instead of surfacing mid-forward.

use tinfer_core::error::{EngineError, Result};

use crate::config::ModelConfig;
use crate::gpu::CpuPlacementGuard;
use crate::mmap::MmapModel;
use crate::quant::QuantTensor;

/// Weights of one transformer layer. Presence/absence of the norm slots
/// drives the block composition (pre, pre+post, post-only, parallel FFN).
pub struct LayerWeights {
    pub attn_norm: Option<Vec<f32>>,
    pub ffn_norm: Option<Vec<f32>>,
    pub post_attn_norm: Option<Vec<f32>>,
    pub post_ffn_norm: Option<Vec<f32>>,

    // Attention
    pub wq: Option<QuantTensor>,
    pub wk: Option<QuantTensor>,
    pub wv: Option<QuantTensor>,
    pub wqkv: Option<QuantTensor>,
    pub wo: Option<QuantTensor>,
    pub q_bias: Option<Vec<f32>>,
    pub k_bias: Option<Vec<f32>>,
    pub v_bias: Option<Vec<f32>>,
    pub q_norm: Option<Vec<f32>>,
    pub k_norm: Option<Vec<f32>>,

    // MLA (DeepSeek2)
    pub wkv_a: Option<QuantTensor>,
    pub wkv_b: Option<QuantTensor>,
    pub kv_a_norm: Option<Vec<f32>>,

    // Dense FFN
    pub ffn_gate: Option<QuantTensor>,
    pub ffn_up: Option<QuantTensor>,
    pub ffn_down: Option<QuantTensor>,

    // MoE
    pub ffn_gate_inp: Option<QuantTensor>,
    pub ffn_gate_exps: Option<QuantTensor>,
    pub ffn_up_exps: Option<QuantTensor>,
    pub ffn_down_exps: Option<QuantTensor>,
    pub ffn_gate_shexp: Option<QuantTensor>,
    pub ffn_up_shexp: Option<QuantTensor>,
    pub ffn_down_shexp: Option<QuantTensor>,
}

impl LayerWeights {
    /// Dense FFN packs gate and up into one matmul when only `ffn_up`
    /// exists with doubled output rows.
    pub fn has_packed_gate_up(&self, hidden_dim: usize) -> bool {
        self.ffn_gate.is_none()
            && self
                .ffn_up
                .as_ref()
                .is_some_and(|t| t.rows() == 2 * hidden_dim)
    }

    pub fn is_moe(&self) -> bool {
        self.ffn_gate_inp.is_some() && self.ffn_gate_exps.is_some()
    }
}

/// Global weights plus the per-layer records.
pub struct ModelWeights {
    pub token_embd: QuantTensor,
    pub output_norm: Vec<f32>,
    pub output: QuantTensor,
    /// True when `output.weight` was absent and the embedding is reused.
    pub output_tied: bool,
    /// Optional per-pair RoPE frequency divisors.
    pub rope_freqs: Option<Vec<f32>>,
    pub layers: Vec<LayerWeights>,
}

fn quant_tensor(model: &MmapModel, name: &str) -> Result<Option<QuantTensor>> {
    let Some((idx, info)) = model.gguf.find_tensor(name) else {
        return Ok(None);
    };
    let view = model.tensor_view(idx)?;
    let tensor = QuantTensor::from_view(
        info.ggml_type,
        view,
        info.element_count() as usize,
        info.rows(),
        info.cols(),
    )?;
    Ok(Some(tensor))
}

fn require(model: &MmapModel, name: &str) -> Result<QuantTensor> {
    quant_tensor(model, name)?.ok_or_else(|| EngineError::MissingTensor(name.to_string()))
}

/// Materialize a small tensor (norm weights, biases) to f32.
fn small_vec(model: &MmapModel, name: &str) -> Result<Option<Vec<f32>>> {
    Ok(quant_tensor(model, name)?.map(|t| t.to_vec()))
}

impl ModelWeights {
    pub fn load(model: &MmapModel, cfg: &ModelConfig) -> Result<Self> {
        let token_embd = require(model, "token_embd.weight")?;
        let output_norm = small_vec(model, "output_norm.weight")?
            .ok_or_else(|| EngineError::MissingTensor("output_norm.weight".to_string()))?;

        let (output, output_tied) = match quant_tensor(model, "output.weight")? {
            Some(t) => (t, false),
            None => {
                tracing::info!("no output.weight; tying output projection to token_embd.weight");
                (token_embd.clone(), true)
            }
        };

        let rope_freqs = small_vec(model, "rope_freqs.weight")?;

        let mut layers = Vec::with_capacity(cfg.n_layers);
        for l in 0..cfg.n_layers {
            let name = |suffix: &str| format!("blk.{l}.{suffix}");

            // Expert banks stay CPU-resident under the MoE placement
            // policy; everything else may go through the GPU hook.
            let (gate_exps, up_exps, down_exps) = {
                let _cpu = CpuPlacementGuard::new();
                (
                    quant_tensor(model, &name("ffn_gate_exps.weight"))?,
                    quant_tensor(model, &name("ffn_up_exps.weight"))?,
                    quant_tensor(model, &name("ffn_down_exps.weight"))?,
                )
            };

            let layer = LayerWeights {
                attn_norm: small_vec(model, &name("attn_norm.weight"))?,
                ffn_norm: small_vec(model, &name("ffn_norm.weight"))?,
                post_attn_norm: small_vec(model, &name("post_attention_norm.weight"))?,
                post_ffn_norm: small_vec(model, &name("post_ffn_norm.weight"))?,
                wq: quant_tensor(model, &name("attn_q.weight"))?,
                wk: quant_tensor(model, &name("attn_k.weight"))?,
                wv: quant_tensor(model, &name("attn_v.weight"))?,
                wqkv: quant_tensor(model, &name("attn_qkv.weight"))?,
                wo: quant_tensor(model, &name("attn_output.weight"))?,
                q_bias: small_vec(model, &name("attn_q.bias"))?,
                k_bias: small_vec(model, &name("attn_k.bias"))?,
                v_bias: small_vec(model, &name("attn_v.bias"))?,
                q_norm: small_vec(model, &name("attn_q_norm.weight"))?,
                k_norm: small_vec(model, &name("attn_k_norm.weight"))?,
                wkv_a: quant_tensor(model, &name("attn_kv_a_mqa.weight"))?,
                wkv_b: quant_tensor(model, &name("attn_kv_b.weight"))?,
                kv_a_norm: small_vec(model, &name("attn_kv_a_norm.weight"))?,
                ffn_gate: quant_tensor(model, &name("ffn_gate.weight"))?,
                ffn_up: quant_tensor(model, &name("ffn_up.weight"))?,
                ffn_down: quant_tensor(model, &name("ffn_down.weight"))?,
                ffn_gate_inp: quant_tensor(model, &name("ffn_gate_inp.weight"))?,
                ffn_gate_exps: gate_exps,
                ffn_up_exps: up_exps,
                ffn_down_exps: down_exps,
                ffn_gate_shexp: quant_tensor(model, &name("ffn_gate_shexp.weight"))?,
                ffn_up_shexp: quant_tensor(model, &name("ffn_up_shexp.weight"))?,
                ffn_down_shexp: quant_tensor(model, &name("ffn_down_shexp.weight"))?,
            };
            validate_layer(cfg, l, &layer)?;
            layers.push(layer);
        }

        Ok(Self {
            token_embd,
            output_norm,
            output,
            output_tied,
            rope_freqs,
            layers,
        })
    }
}

fn missing(l: usize, suffix: &str) -> EngineError {
    EngineError::MissingTensor(format!("blk.{l}.{suffix}"))
}

/// Every architecture needs a working attention projection set, an
/// output projection, and either a dense FFN or a complete MoE set.
fn validate_layer(cfg: &ModelConfig, l: usize, layer: &LayerWeights) -> Result<()> {
    if layer.wo.is_none() {
        return Err(missing(l, "attn_output.weight"));
    }

    if cfg.arch.uses_mla() {
        if layer.wq.is_none() {
            return Err(missing(l, "attn_q.weight"));
        }
        if layer.wkv_a.is_none() {
            return Err(missing(l, "attn_kv_a_mqa.weight"));
        }
        if layer.wkv_b.is_none() {
            return Err(missing(l, "attn_kv_b.weight"));
        }
        if layer.kv_a_norm.is_none() {
            return Err(missing(l, "attn_kv_a_norm.weight"));
        }
    } else if layer.wqkv.is_none() {
        if layer.wq.is_none() {
            return Err(missing(l, "attn_q.weight"));
        }
        if layer.wk.is_none() {
            return Err(missing(l, "attn_k.weight"));
        }
        if layer.wv.is_none() {
            return Err(missing(l, "attn_v.weight"));
        }
    }

    if cfg.layer_is_moe(l) && layer.is_moe() {
        if layer.ffn_up_exps.is_none() {
            return Err(missing(l, "ffn_up_exps.weight"));
        }
        if layer.ffn_down_exps.is_none() {
            return Err(missing(l, "ffn_down_exps.weight"));
        }
        if cfg.expert_shared_count > 0 {
            if layer.ffn_up_shexp.is_none() {
                return Err(missing(l, "ffn_up_shexp.weight"));
            }
            if layer.ffn_down_shexp.is_none() {
                return Err(missing(l, "ffn_down_shexp.weight"));
            }
        }
    } else {
        if layer.ffn_up.is_none() {
            return Err(missing(l, "ffn_up.weight"));
        }
        if layer.ffn_down.is_none() {
            return Err(missing(l, "ffn_down.weight"));
        }
        if layer.ffn_gate.is_none() && !layer.has_packed_gate_up(cfg.hidden_dim) {
            return Err(missing(l, "ffn_gate.weight"));
        }
    }

    Ok(())
}
