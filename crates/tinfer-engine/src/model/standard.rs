//! Standard dense pipeline: Llama, Qwen, Gemma, GLM4, Phi3, Mistral3,
//! Command-R, OLMo2.
//!
//! Per-layer variation (merged QKV, QK-norm, biases, post norms,
//! parallel FFN) is carried entirely by the weight record; the pipeline
//! itself is a straight pre/post-norm GQA stack.

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
