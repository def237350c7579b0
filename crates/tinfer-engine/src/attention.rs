//! Attention modules: standard grouped-query attention and multi-head
//! latent attention (DeepSeek2).
//!
//! Both share the head-parallel score/softmax/weighted-sum core; they
//! differ in how Q/K/V come into existence. Heads run on the rayon pool,
//! each writing its own output slot and score row.

use rayon::prelude::*;

use crate::config::ModelConfig;
use crate::kv_cache::KvCache;
use crate::rope::RopeTable;
use crate::state::InferenceState;
use crate::tensor;
use crate::weights::LayerWeights;

/// Head-parallel attention over cached K/V.
///
/// For each query head `h`, scores `q_h` against the kv head
/// `h / kv_group` at positions `0..=pos`, softmaxes, then weighted-sums
/// values into `out[h]`. `out` holds `n_heads * value_length`, `att` one
/// `max_seq_len` score row per head.
#[allow(clippy::too_many_arguments)]
pub fn attention_heads(
    out: &mut [f32],
    att: &mut [f32],
    q: &[f32],
    cache: &KvCache,
    layer: usize,
    pos: usize,
    n_heads: usize,
    kv_group: usize,
    key_length: usize,
    value_length: usize,
    scale: f32,
) {
    let seq_len = pos + 1;
    let keys = cache.keys(layer, seq_len);
    let values = cache.values(layer, seq_len);
    let k_dim = cache.k_dim();
    let v_dim = cache.v_dim();
    let max_seq_len = cache.max_seq_len();

    debug_assert_eq!(out.len(), n_heads * value_length);
    debug_assert_eq!(q.len(), n_heads * key_length);
    debug_assert!(att.len() >= n_heads * max_seq_len);

    out.par_chunks_mut(value_length)
        .zip(att.par_chunks_mut(max_seq_len))
        .enumerate()
        .for_each(|(h, (head_out, att_row))| {
            let kv_head = h / kv_group;
            let q_h = &q[h * key_length..(h + 1) * key_length];

            for t in 0..seq_len {
                let k_off = t * k_dim + kv_head * key_length;
                let k_t = &keys[k_off..k_off + key_length];
                att_row[t] = tensor::dot(q_h, k_t) * scale;
            }
            tensor::softmax(&mut att_row[..seq_len]);

            head_out.fill(0.0);
            for t in 0..seq_len {
                let v_off = t * v_dim + kv_head * value_length;
                let v_t = &values[v_off..v_off + value_length];
                tensor::saxpy(att_row[t], v_t, head_out);
            }
        });
}

/// Standard GQA attention for one layer. Consumes the normalized input in
/// `st.xb` and leaves the projected output in `st.xb2[..dim]`.
pub fn forward_standard(
    cfg: &ModelConfig,
    rope: &RopeTable,
    lw: &LayerWeights,
    st: &mut InferenceState,
    layer: usize,
    pos: usize,
) {
    let q_dim = cfg.n_heads * cfg.key_length;
    let kv_dim = cfg.kv_dim();
    let v_kv_dim = cfg.n_kv_heads * cfg.value_length;

    // Projections: merged wqkv or separate matrices.
    if let Some(wqkv) = &lw.wqkv {
        wqkv.matmul(&mut st.qkv[..q_dim + kv_dim + v_kv_dim], &st.xb[..cfg.dim]);
        st.q.copy_from_slice(&st.qkv[..q_dim]);
        st.k[..kv_dim].copy_from_slice(&st.qkv[q_dim..q_dim + kv_dim]);
        st.v[..v_kv_dim].copy_from_slice(&st.qkv[q_dim + kv_dim..q_dim + kv_dim + v_kv_dim]);
    } else {
        let wq = lw.wq.as_ref().expect("validated at load");
        let wk = lw.wk.as_ref().expect("validated at load");
        let wv = lw.wv.as_ref().expect("validated at load");
        wq.matmul(&mut st.q, &st.xb[..cfg.dim]);
        wk.matmul(&mut st.k[..kv_dim], &st.xb[..cfg.dim]);
        wv.matmul(&mut st.v[..v_kv_dim], &st.xb[..cfg.dim]);
    }

    if let Some(bias) = &lw.q_bias {
        tensor::accumulate(&mut st.q, bias);
    }
    if let Some(bias) = &lw.k_bias {
        tensor::accumulate(&mut st.k[..kv_dim], bias);
    }
    if let Some(bias) = &lw.v_bias {
        tensor::accumulate(&mut st.v[..v_kv_dim], bias);
    }

    // Per-head QK-norm with shared head-sized weights.
    if let Some(w) = &lw.q_norm {
        for head in st.q.chunks_exact_mut(cfg.key_length) {
            tensor::rmsnorm_in_place(head, w, cfg.rms_norm_eps);
        }
    }
    if let Some(w) = &lw.k_norm {
        for head in st.k[..kv_dim].chunks_exact_mut(cfg.key_length) {
            tensor::rmsnorm_in_place(head, w, cfg.rms_norm_eps);
        }
    }

    rope.apply(&mut st.q, cfg.n_heads, cfg.key_length, pos);
    rope.apply(&mut st.k[..kv_dim], cfg.n_kv_heads, cfg.key_length, pos);

    st.kv_cache.key_at_mut(layer, pos).copy_from_slice(&st.k[..kv_dim]);
    st.kv_cache
        .value_at_mut(layer, pos)
        .copy_from_slice(&st.v[..v_kv_dim]);

    let attn_out_len = cfg.n_heads * cfg.value_length;
    attention_heads(
        &mut st.xb[..attn_out_len],
        &mut st.att,
        &st.q,
        &st.kv_cache,
        layer,
        pos,
        cfg.n_heads,
        cfg.kv_group_size(),
        cfg.key_length,
        cfg.value_length,
        rope.attn_scale(cfg.key_length),
    );

    let wo = lw.wo.as_ref().expect("validated at load");
    wo.matmul(&mut st.xb2[..cfg.dim], &st.xb[..attn_out_len]);
}

/// Multi-head latent attention for one layer. K/V are reconstructed from
/// the low-rank latent `c_kv` plus a shared RoPE-rotated tail; the full
/// per-head K/V land in the MLA cache. Output in `st.xb2[..dim]`.
pub fn forward_mla(
    cfg: &ModelConfig,
    rope: &RopeTable,
    lw: &LayerWeights,
    st: &mut InferenceState,
    layer: usize,
    pos: usize,
) {
    let key_len = cfg.key_length;
    let value_len = cfg.value_length;
    let rope_dim = cfg.rope_dim;
    let nope = key_len - rope_dim;
    let rank = cfg.kv_lora_rank;

    // Full-rank Q per head.
    let wq = lw.wq.as_ref().expect("validated at load");
    wq.matmul(&mut st.q, &st.xb[..cfg.dim]);

    // Latent projection: [rank | rope_dim].
    let wkv_a = lw.wkv_a.as_ref().expect("validated at load");
    wkv_a.matmul(&mut st.c_kv, &st.xb[..cfg.dim]);

    let kv_a_norm = lw.kv_a_norm.as_ref().expect("validated at load");
    let (c_latent, k_rope) = st.c_kv.split_at_mut(rank);
    tensor::rmsnorm_in_place(c_latent, kv_a_norm, cfg.rms_norm_eps);

    // Decompress to per-head (nope + value) vectors.
    let wkv_b = lw.wkv_b.as_ref().expect("validated at load");
    wkv_b.matmul(&mut st.kv_decomp, c_latent);

    // Shared rope tail, rotated once; per-head Q tails rotate in place.
    rope.apply_single(k_rope, pos);
    for head in st.q.chunks_exact_mut(key_len) {
        rope.apply_single(&mut head[nope..], pos);
    }

    // Assemble the full K/V rows in the cache.
    let head_stride = nope + value_len;
    let k_slot = st.kv_cache.key_at_mut(layer, pos);
    for h in 0..cfg.n_heads {
        let decomp = &st.kv_decomp[h * head_stride..(h + 1) * head_stride];
        let k_h = &mut k_slot[h * key_len..(h + 1) * key_len];
        k_h[..nope].copy_from_slice(&decomp[..nope]);
        k_h[nope..].copy_from_slice(k_rope);
    }
    let v_slot = st.kv_cache.value_at_mut(layer, pos);
    for h in 0..cfg.n_heads {
        let decomp = &st.kv_decomp[h * head_stride..(h + 1) * head_stride];
        v_slot[h * value_len..(h + 1) * value_len].copy_from_slice(&decomp[nope..]);
    }

    let attn_out_len = cfg.n_heads * value_len;
    attention_heads(
        &mut st.xb[..attn_out_len],
        &mut st.att,
        &st.q,
        &st.kv_cache,
        layer,
        pos,
        cfg.n_heads,
        1, // every head owns its decompressed K/V
        key_len,
        value_len,
        rope.attn_scale(key_len),
    );

    let wo = lw.wo.as_ref().expect("validated at load");
    wo.matmul(&mut st.xb2[..cfg.dim], &st.xb[..attn_out_len]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv_cache::KvCache;

    #[test]
    fn single_kv_entry_returns_value() {
        // With one cached position, softmax over one score is 1.0 and the
        // output equals the value vector regardless of scores.
        let head_dim = 4;
        let mut cache = KvCache::with_dims(1, 4, head_dim, head_dim);
        cache.key_at_mut(0, 0).copy_from_slice(&[1.0, 0.0, 0.0, 0.0]);
        cache.value_at_mut(0, 0).copy_from_slice(&[0.0, 1.0, 0.0, 0.0]);

        let q = vec![1.0, 0.0, 0.0, 0.0];
        let mut out = vec![0.0; head_dim];
        let mut att = vec![0.0; 4];
        attention_heads(&mut out, &mut att, &q, &cache, 0, 0, 1, 1, head_dim, head_dim, 0.5);

        assert!((out[0] - 0.0).abs() < 1e-5);
        assert!((out[1] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn gqa_routes_heads_to_shared_kv() {
        // 16 query heads over 2 kv heads: head 9 must read kv head 1.
        let n_heads = 16;
        let n_kv = 2;
        let head_dim = 4;
        let kv_group = n_heads / n_kv;
        let mut cache = KvCache::with_dims(1, 2, n_kv * head_dim, n_kv * head_dim);

        // kv head 0 value = [1,1,1,1], kv head 1 value = [5,6,7,8]
        cache.value_at_mut(0, 0)[..head_dim].fill(1.0);
        cache.value_at_mut(0, 0)[head_dim..].copy_from_slice(&[5.0, 6.0, 7.0, 8.0]);
        cache.key_at_mut(0, 0).fill(1.0);

        let q = vec![1.0; n_heads * head_dim];
        let mut out = vec![0.0; n_heads * head_dim];
        let mut att = vec![0.0; n_heads * 2];
        attention_heads(
            &mut out, &mut att, &q, &cache, 0, 0, n_heads, kv_group, head_dim, head_dim, 0.5,
        );

        // At pos 0 the attention output equals V[kv_head] exactly.
        assert_eq!(&out[9 * head_dim..10 * head_dim], &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(&out[3 * head_dim..4 * head_dim], &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn later_positions_attend_over_prefix() {
        let head_dim = 2;
        let mut cache = KvCache::with_dims(1, 4, head_dim, head_dim);
        // Two positions with orthogonal keys.
        cache.key_at_mut(0, 0).copy_from_slice(&[10.0, 0.0]);
        cache.value_at_mut(0, 0).copy_from_slice(&[1.0, 0.0]);
        cache.key_at_mut(0, 1).copy_from_slice(&[0.0, 10.0]);
        cache.value_at_mut(0, 1).copy_from_slice(&[0.0, 1.0]);

        // Query aligned with position 1's key dominates the softmax.
        let q = vec![0.0, 1.0];
        let mut out = vec![0.0; head_dim];
        let mut att = vec![0.0; 4];
        attention_heads(&mut out, &mut att, &q, &cache, 0, 1, 1, 1, head_dim, head_dim, 1.0);
        assert!(out[1] > 0.99);
        let weights_sum = att[0] + att[1];
        assert!((weights_sum - 1.0).abs() < 1e-5);
    }
}
