//! KV cache for attention layers.
//!
//! One flat f32 array per side, indexed [layer][position][kv_dim].
//! Standard attention stores `n_kv_heads * key_length` per position; MLA
//! stores the fully decompressed per-head K and V, whose widths differ.
//! Only the owning `InferenceState` mutates the cache, and only at
//! positions `0..cur_pos`.

use crate::config::ModelConfig;

pub struct KvCache {
    key: Vec<f32>,
    value: Vec<f32>,
    n_layers: usize,
    max_seq_len: usize,
    k_dim: usize,
    v_dim: usize,
}

impl KvCache {
    /// Cache for standard GQA attention.
    pub fn standard(cfg: &ModelConfig, max_seq_len: usize) -> Self {
        let k_dim = cfg.kv_dim();
        let v_dim = cfg.n_kv_heads * cfg.value_length;
        Self::with_dims(cfg.n_layers, max_seq_len, k_dim, v_dim)
    }

    /// Cache for MLA attention: per-head K and V are materialized after
    /// latent decompression.
    pub fn mla(cfg: &ModelConfig, max_seq_len: usize) -> Self {
        let k_dim = cfg.n_heads * cfg.key_length;
        let v_dim = cfg.n_heads * cfg.value_length;
        Self::with_dims(cfg.n_layers, max_seq_len, k_dim, v_dim)
    }

    pub fn with_dims(n_layers: usize, max_seq_len: usize, k_dim: usize, v_dim: usize) -> Self {
        Self {
            key: vec![0.0; n_layers * max_seq_len * k_dim],
            value: vec![0.0; n_layers * max_seq_len * v_dim],
            n_layers,
            max_seq_len,
            k_dim,
            v_dim,
        }
    }

    pub fn k_dim(&self) -> usize {
        self.k_dim
    }

    pub fn v_dim(&self) -> usize {
        self.v_dim
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    pub fn key_at_mut(&mut self, layer: usize, pos: usize) -> &mut [f32] {
        debug_assert!(layer < self.n_layers && pos < self.max_seq_len);
        let offset = (layer * self.max_seq_len + pos) * self.k_dim;
        &mut self.key[offset..offset + self.k_dim]
    }

    pub fn value_at_mut(&mut self, layer: usize, pos: usize) -> &mut [f32] {
        debug_assert!(layer < self.n_layers && pos < self.max_seq_len);
        let offset = (layer * self.max_seq_len + pos) * self.v_dim;
        &mut self.value[offset..offset + self.v_dim]
    }

    /// All key vectors for a layer up to `seq_len` positions.
    pub fn keys(&self, layer: usize, seq_len: usize) -> &[f32] {
        let offset = layer * self.max_seq_len * self.k_dim;
        &self.key[offset..offset + seq_len * self.k_dim]
    }

    /// All value vectors for a layer up to `seq_len` positions.
    pub fn values(&self, layer: usize, seq_len: usize) -> &[f32] {
        let offset = layer * self.max_seq_len * self.v_dim;
        &self.value[offset..offset + seq_len * self.v_dim]
    }

    pub fn reset(&mut self) {
        self.key.fill(0.0);
        self.value.fill(0.0);
    }

    pub fn memory_bytes(&self) -> usize {
        (self.key.len() + self.value.len()) * std::mem::size_of::<f32>()
    }
}
