//! Transformer block composition.
//!
//! Which residual wiring a layer uses follows from which norm tensors
//! resolved at load time:
//!
//! - pre-norm only:   `attn_norm` set, `post_attention_norm` absent
//! - pre + post:      both set (GLM4, Gemma)
//! - post-norm only:  `attn_norm` absent, post norms set (OLMo2)
//! - parallel FFN:    `ffn_norm` and `post_ffn_norm` absent while
//!   `attn_norm` is set (Command-R); attention and FFN consume the same
//!   normalized input and both outputs add to the residual stream.

use crate::attention;
use crate::config::ModelConfig;
use crate::ffn;
use crate::rope::RopeTable;
use crate::state::InferenceState;
use crate::tensor;
use crate::weights::LayerWeights;

/// Attention flavor selected by the engine pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttnKind {
    Standard,
    Mla,
}

/// Run one transformer layer in place over `st.x`.
pub fn forward_block(
    cfg: &ModelConfig,
    rope: &RopeTable,
    lw: &LayerWeights,
    st: &mut InferenceState,
    layer: usize,
    pos: usize,
    attn_kind: AttnKind,
) {
    let dim = cfg.dim;
    let parallel_ffn =
        lw.ffn_norm.is_none() && lw.post_ffn_norm.is_none() && lw.attn_norm.is_some();

    // Attention input.
    if let Some(w) = &lw.attn_norm {
        let (xb, x) = (&mut st.xb[..dim], &st.x[..dim]);
        tensor::rmsnorm(xb, x, w, cfg.rms_norm_eps);
    } else {
        st.xb[..dim].copy_from_slice(&st.x[..dim]);
    }
    if parallel_ffn {
        st.xn[..dim].copy_from_slice(&st.xb[..dim]);
    }

    match attn_kind {
        AttnKind::Standard => attention::forward_standard(cfg, rope, lw, st, layer, pos),
        AttnKind::Mla => attention::forward_mla(cfg, rope, lw, st, layer, pos),
    }

    if let Some(w) = &lw.post_attn_norm {
        tensor::rmsnorm_in_place(&mut st.xb2[..dim], w, cfg.rms_norm_eps);
    }

    let (x, xb2) = (&mut st.x[..dim], &st.xb2[..dim]);
    tensor::accumulate(x, xb2);

    // FFN input.
    if parallel_ffn {
        st.xb[..dim].copy_from_slice(&st.xn[..dim]);
    } else if let Some(w) = &lw.ffn_norm {
        let (xb, x) = (&mut st.xb[..dim], &st.x[..dim]);
        tensor::rmsnorm(xb, x, w, cfg.rms_norm_eps);
    } else {
        st.xb[..dim].copy_from_slice(&st.x[..dim]);
    }

    if cfg.layer_is_moe(layer) && lw.is_moe() {
        ffn::forward_moe(cfg, lw, st);
    } else {
        ffn::forward_dense(cfg, lw, st);
    }

    if let Some(w) = &lw.post_ffn_norm {
        tensor::rmsnorm_in_place(&mut st.xb2[..dim], w, cfg.rms_norm_eps);
    }

    let (x, xb2) = (&mut st.x[..dim], &st.xb2[..dim]);
    tensor::accumulate(x, xb2);
}
