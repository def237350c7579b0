//! Loaded model and the per-family forward pipelines.
//!
//! Three pipelines cover the supported families: `standard` (dense GQA
//! transformers), `mla` (DeepSeek2 latent attention + MoE), and `moe`
//! (GQA attention with dense-prefix/MoE hybrid FFNs). All three share
//! embedding lookup and the output head; the registry picks one from the
//! architecture.

pub mod mla;
pub mod moe;
pub mod standard;

use std::path::Path;

use tinfer_core::error::Result;

use crate::config::ModelConfig;
use crate::mmap::MmapModel;
use crate::rope::RopeTable;
use crate::state::InferenceState;
use crate::tensor;
use crate::weights::ModelWeights;

/// Which forward pipeline drives a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Standard,
    Mla,
    MoeHybrid,
}

/// A fully resolved model: mmap, config, weight directory, RoPE tables.
pub struct Model {
    pub mmap: MmapModel,
    pub config: ModelConfig,
    pub weights: ModelWeights,
    pub rope: RopeTable,
    max_seq_len: usize,
}

impl Model {
    /// Load a GGUF file and resolve everything needed for inference.
    /// `max_context` bounds the KV cache and RoPE tables; it is clamped
    /// to the model's trained context length.
    pub fn load(path: &Path, max_context: usize) -> Result<Self> {
        let mmap = MmapModel::load(path)?;
        let config = ModelConfig::from_gguf(&mmap.gguf)?;
        let weights = ModelWeights::load(&mmap, &config)?;
        let max_seq_len = max_context.clamp(1, config.context_length);
        let rope = RopeTable::new(
            &config,
            config.rope_dim,
            max_seq_len,
            weights.rope_freqs.as_deref(),
        );

        tracing::info!(
            "model ready: arch={:?} layers={} dim={} heads={}/{} ctx={} experts={}",
            config.arch,
            config.n_layers,
            config.dim,
            config.n_heads,
            config.n_kv_heads,
            max_seq_len,
            config.expert_count,
        );

        Ok(Self {
            mmap,
            config,
            weights,
            rope,
            max_seq_len,
        })
    }

    pub fn engine_kind(&self) -> EngineKind {
        if self.config.arch.uses_mla() {
            EngineKind::Mla
        } else if self.config.expert_count > 0 {
            EngineKind::MoeHybrid
        } else {
            EngineKind::Standard
        }
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    pub fn new_state(&self) -> InferenceState {
        InferenceState::new(&self.config, self.max_seq_len)
    }

    /// Run one token at `pos`; logits land in `st.logits` (and `st.xb`
    /// keeps the final-norm hidden state for the embedding endpoint).
    pub fn forward(&self, st: &mut InferenceState, token: u32, pos: usize) {
        debug_assert!(pos < self.max_seq_len);
        match self.engine_kind() {
            EngineKind::Standard => standard::forward(self, st, token, pos),
            EngineKind::Mla => mla::forward(self, st, token, pos),
            EngineKind::MoeHybrid => moe::forward(self, st, token, pos),
        }
        st.cur_pos = pos + 1;
    }
}

/// Copy the token's embedding row into the residual stream, applying the
/// Gemma sqrt(dim) scale when configured.
pub(crate) fn embed_token(model: &Model, st: &mut InferenceState, token: u32) {
    model
        .weights
        .token_embd
        .read_row(token as usize, &mut st.x[..model.config.dim]);
    if model.config.embedding_scale != 1.0 {
        tensor::scale(&mut st.x[..model.config.dim], model.config.embedding_scale);
    }
}

/// Final norm, output projection, logit scaling and optional soft-cap.
pub(crate) fn project_logits(model: &Model, st: &mut InferenceState) {
    let cfg = &model.config;
    let (xb, x) = (&mut st.xb[..cfg.dim], &st.x[..cfg.dim]);
    tensor::rmsnorm(xb, x, &model.weights.output_norm, cfg.rms_norm_eps);

    model.weights.output.matmul(&mut st.logits, &st.xb[..cfg.dim]);

    if cfg.logit_scale != 1.0 {
        tensor::scale(&mut st.logits, cfg.logit_scale);
    }
    if cfg.final_logit_softcap > 0.0 {
        let cap = cfg.final_logit_softcap;
        for logit in st.logits.iter_mut() {
            *logit = cap * (*logit / cap).tanh();
        }
    }
}
