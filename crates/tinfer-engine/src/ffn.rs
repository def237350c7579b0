//! Feed-forward modules: gated dense FFN and mixture-of-experts.
//!
//! Dense layers run SwiGLU (or GeGLU for Gemma) with separate or packed
//! gate/up projections. MoE layers softmax the router over the full
//! expert set, pick top-K with a stable lower-index tie-break, compute
//! the selected experts in parallel into disjoint buffers, then
//! accumulate sequentially in selection order so the reduction order is
//! fixed.

use rayon::prelude::*;

use crate::config::ModelConfig;
use crate::quant::QuantTensor;
use crate::state::InferenceState;
use crate::tensor;
use crate::weights::LayerWeights;

fn activate(values: &mut [f32], geglu: bool) {
    if geglu {
        tensor::gelu_tanh(values);
    } else {
        tensor::silu(values);
    }
}

/// Dense gated FFN. Consumes `st.xb`, leaves the projected output in
/// `st.xb2[..dim]`.
pub fn forward_dense(cfg: &ModelConfig, lw: &LayerWeights, st: &mut InferenceState) {
    let hidden = cfg.hidden_dim;
    let geglu = cfg.arch.uses_geglu();

    if lw.has_packed_gate_up(hidden) {
        // One matmul yields [gate | up].
        let up = lw.ffn_up.as_ref().expect("validated at load");
        up.matmul(&mut st.gate_up[..2 * hidden], &st.xb[..cfg.dim]);
        st.hb[..hidden].copy_from_slice(&st.gate_up[..hidden]);
        st.hb2[..hidden].copy_from_slice(&st.gate_up[hidden..2 * hidden]);
    } else {
        let gate = lw.ffn_gate.as_ref().expect("validated at load");
        let up = lw.ffn_up.as_ref().expect("validated at load");
        gate.matmul(&mut st.hb[..hidden], &st.xb[..cfg.dim]);
        up.matmul(&mut st.hb2[..hidden], &st.xb[..cfg.dim]);
    }

    activate(&mut st.hb[..hidden], geglu);
    let (hb, hb2) = (&mut st.hb[..hidden], &st.hb2[..hidden]);
    tensor::elementwise_mul(hb, hb2);

    let down = lw.ffn_down.as_ref().expect("validated at load");
    down.matmul(&mut st.xb2[..cfg.dim], &st.hb[..hidden]);
}

/// Router softmax + stable top-K selection over `logits`.
///
/// Returns (expert index, weight) pairs in selection order; weights are
/// renormalized to sum to 1 when `norm_topk` is set.
pub fn route_top_k(logits: &mut [f32], k: usize, norm_topk: bool) -> Vec<(usize, f32)> {
    tensor::softmax(logits);

    let mut order: Vec<usize> = (0..logits.len()).collect();
    order.sort_by(|&a, &b| logits[b].total_cmp(&logits[a]).then(a.cmp(&b)));
    order.truncate(k.min(logits.len()));

    let mut selected: Vec<(usize, f32)> = order.into_iter().map(|i| (i, logits[i])).collect();
    if norm_topk {
        let sum: f32 = selected.iter().map(|&(_, w)| w).sum();
        if sum > 0.0 {
            for s in selected.iter_mut() {
                s.1 /= sum;
            }
        }
    }
    selected
}

/// MoE FFN with optional shared experts. Consumes `st.xb`, accumulates
/// the weighted expert outputs into `st.xb2[..dim]`.
pub fn forward_moe(cfg: &ModelConfig, lw: &LayerWeights, st: &mut InferenceState) {
    let dim = cfg.dim;
    let ffn_len = if cfg.expert_ffn_length > 0 {
        cfg.expert_ffn_length
    } else {
        cfg.hidden_dim
    };
    let geglu = cfg.arch.uses_geglu();

    st.moe_input[..dim].copy_from_slice(&st.xb[..dim]);

    let router = lw.ffn_gate_inp.as_ref().expect("validated at load");
    router.matmul(&mut st.router[..cfg.expert_count], &st.xb[..dim]);
    let selected = route_top_k(
        &mut st.router[..cfg.expert_count],
        cfg.expert_used_count,
        cfg.norm_topk_prob,
    );

    let gate_exps = lw.ffn_gate_exps.as_ref().expect("validated at load");
    let up_exps = lw.ffn_up_exps.as_ref().expect("validated at load");
    let down_exps = lw.ffn_down_exps.as_ref().expect("validated at load");
    let moe_input = &st.moe_input[..dim];

    // Parallel expert compute into disjoint buffers; each expert `e`'s
    // rows start at element e * out_rows * cols of the 3-D bank.
    st.expert_out[..selected.len()]
        .par_iter_mut()
        .zip(selected.par_iter())
        .for_each(|(out, &(expert, _))| {
            let mut gate = vec![0.0f32; ffn_len];
            let mut up = vec![0.0f32; ffn_len];
            expert_matmul(gate_exps, expert, &mut gate, moe_input, ffn_len, dim);
            expert_matmul(up_exps, expert, &mut up, moe_input, ffn_len, dim);
            activate(&mut gate, geglu);
            tensor::elementwise_mul(&mut gate, &up);
            expert_matmul(down_exps, expert, &mut out[..dim], &gate, dim, ffn_len);
        });

    // Sequential weighted accumulation keeps the reduction order fixed.
    st.xb2[..dim].fill(0.0);
    for (slot, &(_, weight)) in selected.iter().enumerate() {
        let expert_out = &st.expert_out[slot];
        tensor::saxpy(weight, &expert_out[..dim], &mut st.xb2[..dim]);
    }

    // Shared experts run a plain gated FFN on the saved input.
    if let (Some(gate_sh), Some(up_sh), Some(down_sh)) =
        (&lw.ffn_gate_shexp, &lw.ffn_up_shexp, &lw.ffn_down_shexp)
    {
        let shared_len = gate_sh.rows();
        gate_sh.matmul(&mut st.hb[..shared_len], &st.moe_input[..dim]);
        up_sh.matmul(&mut st.hb2[..shared_len], &st.moe_input[..dim]);
        activate(&mut st.hb[..shared_len], geglu);
        let (hb, hb2) = (&mut st.hb[..shared_len], &st.hb2[..shared_len]);
        tensor::elementwise_mul(hb, hb2);
        down_sh.matmul(&mut st.hb2[..dim], &st.hb[..shared_len]);
        let (xb2, hb2) = (&mut st.xb2[..dim], &st.hb2[..dim]);
        tensor::accumulate(xb2, hb2);
    }
}

#[inline]
fn expert_matmul(
    bank: &QuantTensor,
    expert: usize,
    out: &mut [f32],
    x: &[f32],
    rows: usize,
    cols: usize,
) {
    let base = expert * rows * cols;
    bank.matmul_at(base, out, x, rows, cols);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_k_is_stable_on_ties() {
        let mut logits = vec![1.0f32, 2.0, 2.0, 0.5];
        let selected = route_top_k(&mut logits, 2, false);
        // Equal logits tie-break to the lower index.
        assert_eq!(selected[0].0, 1);
        assert_eq!(selected[1].0, 2);
    }

    #[test]
    fn renormalized_weights_sum_to_one() {
        let mut logits = vec![0.1f32, 3.0, 1.5, -2.0, 0.7, 2.2];
        let selected = route_top_k(&mut logits, 3, true);
        let sum: f32 = selected.iter().map(|&(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn unnormalized_weights_stay_sub_unit() {
        let mut logits = vec![0.1f32, 3.0, 1.5, -2.0, 0.7, 2.2];
        let selected = route_top_k(&mut logits, 3, false);
        let sum: f32 = selected.iter().map(|&(_, w)| w).sum();
        assert!(sum < 1.0);
        assert!(sum > 0.0);
        // Still ordered by weight.
        assert!(selected[0].1 >= selected[1].1);
    }

    #[test]
    fn k_larger_than_expert_count_is_clamped() {
        let mut logits = vec![1.0f32, 2.0];
        let selected = route_top_k(&mut logits, 8, true);
        assert_eq!(selected.len(), 2);
    }
}
