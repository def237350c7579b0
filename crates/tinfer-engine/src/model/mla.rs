//! DeepSeek2 pipeline: multi-head latent attention with a dense-prefix
//! MoE FFN stack.
//!
//! K/V are reconstructed per token from the low-rank latent `c_kv`
//! (`kv_lora_rank` wide) plus the shared RoPE tail; attention scales by
//! `mscale^2 / sqrt(key_length)` (YaRN magnitude correction). FFN layers
//! before `leading_dense_block_count` run dense, the rest route through
//! the expert banks with optional shared experts.

use crate::block::{self, AttnKind};
use crate::model::{embed_token, project_logits, Model};
use crate::state::InferenceState;

pub fn forward(model: &Model, st: &mut InferenceState, token: u32, pos: usize) {
    embed_token(model, st, token);

    for (layer, lw) in model.weights.layers.iter().enumerate() {
        block::forward_block(&model.config, &model.rope, lw, st, layer, pos, AttnKind::Mla);
    }

    project_logits(model, st);
}
