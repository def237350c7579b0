//! GQA + MoE hybrid pipeline: Qwen3-MoE, Llama4, GPT-OSS.
//!
//! Attention is the standard grouped-query module; FFNs are
//! dense for the leading `leading_dense_block_count` layers and
//! top-K-routed expert banks afterwards. Expert weights stay on the CPU
//! side of the placement hook; router and attention may sit on the GPU.

use crate::block::{self, AttnKind};
use crate::model::{embed_token, project_logits, Model};
use crate::state::InferenceState;

pub fn forward(model: &Model, st: &mut InferenceState, token: u32, pos: usize) {
    embed_token(model, st, token);

    for (layer, lw) in model.weights.layers.iter().enumerate() {
        block::forward_block(
            &model.config,
            &model.rope,
            lw,
            st,
            layer,
            pos,
            AttnKind::Standard,
        );
    }

    project_logits(model, st);
}
