//! Per-generation inference state.
//!
//! Owns every scratch buffer the forward passes touch plus one KV cache.
//! A state is exclusively owned by one generation at a time; the
//! conversation cache hands whole states back and forth to enable
//! prefix reuse.

use crate::config::ModelConfig;
use crate::kv_cache::KvCache;

pub struct InferenceState {
    /// Current residual stream.
    pub x: Vec<f32>,
    /// Normalized input to attention/FFN.
    pub xb: Vec<f32>,
    /// Secondary scratch (attention head outputs, projection results).
    pub xb2: Vec<f32>,
    /// Query projection (`n_heads * key_length`).
    pub q: Vec<f32>,
    /// Key projection for the current position.
    pub k: Vec<f32>,
    /// Value projection for the current position.
    pub v: Vec<f32>,
    /// Packed QKV output when the model carries a merged wqkv.
    pub qkv: Vec<f32>,
    /// Attention scores, one row of `max_seq_len` per head.
    pub att: Vec<f32>,
    /// FFN gate scratch.
    pub hb: Vec<f32>,
    /// FFN up scratch.
    pub hb2: Vec<f32>,
    /// Packed gate+up output when gate and up share one matmul.
    pub gate_up: Vec<f32>,
    /// Saved normalized input for parallel-FFN blocks.
    pub xn: Vec<f32>,
    /// Saved FFN input for MoE expert dispatch and shared experts.
    pub moe_input: Vec<f32>,
    /// Router logits over the full expert set.
    pub router: Vec<f32>,
    /// Per-selected-expert output buffers, written in parallel and
    /// accumulated sequentially.
    pub expert_out: Vec<Vec<f32>>,
    /// MLA: latent `c_kv` projection (`kv_lora_rank + rope_dim`).
    pub c_kv: Vec<f32>,
    /// MLA: decompressed per-head (nope + value) vectors.
    pub kv_decomp: Vec<f32>,
    /// Output logits.
    pub logits: Vec<f32>,

    pub kv_cache: KvCache,
    /// Number of positions already computed into the KV cache.
    pub cur_pos: usize,
    max_seq_len: usize,
}

impl InferenceState {
    pub fn new(cfg: &ModelConfig, max_seq_len: usize) -> Self {
        let max_seq_len = max_seq_len.min(cfg.context_length).max(1);
        let q_dim = cfg.n_heads * cfg.key_length;
        let kv_dim = cfg.kv_dim();
        let v_total = cfg.n_heads * cfg.value_length;
        // Shared experts widen the FFN scratch beyond the per-expert dim.
        let shared_hidden = cfg.expert_ffn_length * cfg.expert_shared_count.max(1);
        let hidden = cfg.hidden_dim.max(cfg.expert_ffn_length).max(shared_hidden);
        let mla = cfg.arch.uses_mla();

        let kv_cache = if mla {
            KvCache::mla(cfg, max_seq_len)
        } else {
            KvCache::standard(cfg, max_seq_len)
        };

        let experts_used = cfg.expert_used_count.max(1);

        Self {
            x: vec![0.0; cfg.dim],
            xb: vec![0.0; cfg.dim.max(v_total)],
            xb2: vec![0.0; cfg.dim.max(v_total).max(q_dim)],
            q: vec![0.0; q_dim],
            k: vec![0.0; kv_dim.max(1)],
            v: vec![0.0; cfg.n_kv_heads * cfg.value_length.max(1)],
            qkv: vec![0.0; q_dim + kv_dim + cfg.n_kv_heads * cfg.value_length],
            att: vec![0.0; cfg.n_heads * max_seq_len],
            hb: vec![0.0; hidden],
            hb2: vec![0.0; hidden],
            gate_up: vec![0.0; 2 * hidden],
            xn: vec![0.0; cfg.dim],
            moe_input: vec![0.0; cfg.dim],
            router: vec![0.0; cfg.expert_count.max(1)],
            expert_out: if cfg.expert_count > 0 {
                (0..experts_used).map(|_| vec![0.0; cfg.dim]).collect()
            } else {
                Vec::new()
            },
            c_kv: vec![0.0; cfg.kv_lora_rank + cfg.rope_dim],
            kv_decomp: if mla {
                let nope = cfg.key_length - cfg.rope_dim;
                vec![0.0; cfg.n_heads * (nope + cfg.value_length)]
            } else {
                Vec::new()
            },
            logits: vec![0.0; cfg.vocab_size],
            kv_cache,
            cur_pos: 0,
            max_seq_len,
        }
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    /// Drop all progress; the KV cache content becomes garbage.
    pub fn reset(&mut self) {
        self.cur_pos = 0;
        self.kv_cache.reset();
    }

    /// Rewind to `pos` computed positions, keeping the prefix KV intact.
    /// Used by the prefix-reuse path.
    pub fn rewind_to(&mut self, pos: usize) {
        debug_assert!(pos <= self.cur_pos);
        self.cur_pos = pos;
    }

    /// Approximate resident size of scratch buffers plus KV cache.
    pub fn memory_bytes(&self) -> usize {
        let scratch = self.x.len()
            + self.xb.len()
            + self.xb2.len()
            + self.q.len()
            + self.k.len()
            + self.v.len()
            + self.qkv.len()
            + self.att.len()
            + self.hb.len()
            + self.hb2.len()
            + self.gate_up.len()
            + self.xn.len()
            + self.moe_input.len()
            + self.router.len()
            + self.expert_out.iter().map(Vec::len).sum::<usize>()
            + self.c_kv.len()
            + self.kv_decomp.len()
            + self.logits.len();
        scratch * std::mem::size_of::<f32>() + self.kv_cache.memory_bytes()
    }
}
