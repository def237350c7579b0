#![allow(dead_code)]
//! Synthetic GGUF fixtures for integration tests.
//!
//! Builds tiny but structurally complete model files on disk, with
//! deterministic pseudo-random weights, so the full load -> forward ->
//! sample path runs without any real model download.

use std::io::Write;
use std::path::PathBuf;

use tinfer_core::traits::PromptTokenizer;

pub const ALIGNMENT: usize = 32;

pub enum MetaVal {
    U32(u32),
    F32(f32),
    Bool(bool),
    Str(String),
}

pub enum TensorData {
    F32(Vec<f32>),
    Q8_0(Vec<f32>),
}

pub struct GgufBuilder {
    metadata: Vec<(String, MetaVal)>,
    tensors: Vec<(String, Vec<u64>, TensorData)>,
}

impl GgufBuilder {
    pub fn new(arch: &str) -> Self {
        let mut b = Self {
            metadata: Vec::new(),
            tensors: Vec::new(),
        };
        b.meta_str("general.architecture", arch);
        b
    }

    pub fn meta_u32(&mut self, key: &str, v: u32) -> &mut Self {
        self.metadata.push((key.to_string(), MetaVal::U32(v)));
        self
    }

    pub fn meta_f32(&mut self, key: &str, v: f32) -> &mut Self {
        self.metadata.push((key.to_string(), MetaVal::F32(v)));
        self
    }

    pub fn meta_bool(&mut self, key: &str, v: bool) -> &mut Self {
        self.metadata.push((key.to_string(), MetaVal::Bool(v)));
        self
    }

    pub fn meta_str(&mut self, key: &str, v: &str) -> &mut Self {
        self.metadata
            .push((key.to_string(), MetaVal::Str(v.to_string())));
        self
    }

    /// dims are GGUF order: dims[0] = cols (contiguous), dims[1] = rows.
    pub fn tensor_f32(&mut self, name: &str, dims: &[u64], data: Vec<f32>) -> &mut Self {
        assert_eq!(dims.iter().product::<u64>() as usize, data.len());
        self.tensors
            .push((name.to_string(), dims.to_vec(), TensorData::F32(data)));
        self
    }

    /// Quantizes the given f32 data to Q8_0 blocks (cols must be a
    /// multiple of 32).
    pub fn tensor_q8_0(&mut self, name: &str, dims: &[u64], data: Vec<f32>) -> &mut Self {
        assert_eq!(dims.iter().product::<u64>() as usize, data.len());
        assert_eq!(data.len() % 32, 0);
        self.tensors
            .push((name.to_string(), dims.to_vec(), TensorData::Q8_0(data)));
        self
    }

    /// Serialize to a temp file and return its path (plus the guard that
    /// keeps it alive).
    pub fn write(&self) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.gguf");

        let mut buf: Vec<u8> = Vec::new();
        buf.extend_from_slice(&0x4655_4747u32.to_le_bytes());
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(&(self.tensors.len() as u64).to_le_bytes());
        buf.extend_from_slice(&(self.metadata.len() as u64).to_le_bytes());

        for (key, val) in &self.metadata {
            push_str(&mut buf, key);
            match val {
                MetaVal::U32(v) => {
                    buf.extend_from_slice(&4u32.to_le_bytes());
                    buf.extend_from_slice(&v.to_le_bytes());
                }
                MetaVal::F32(v) => {
                    buf.extend_from_slice(&6u32.to_le_bytes());
                    buf.extend_from_slice(&v.to_le_bytes());
                }
                MetaVal::Bool(v) => {
                    buf.extend_from_slice(&7u32.to_le_bytes());
                    buf.push(*v as u8);
                }
                MetaVal::Str(v) => {
                    buf.extend_from_slice(&8u32.to_le_bytes());
                    push_str(&mut buf, v);
                }
            }
        }

        // Encode tensor payloads first so offsets are known.
        let mut payloads: Vec<Vec<u8>> = Vec::new();
        let mut offsets: Vec<u64> = Vec::new();
        let mut cursor = 0usize;
        for (_, _, data) in &self.tensors {
            let bytes = match data {
                TensorData::F32(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
                TensorData::Q8_0(values) => quantize_q8_0(values),
            };
            cursor = cursor.div_ceil(ALIGNMENT) * ALIGNMENT;
            offsets.push(cursor as u64);
            cursor += bytes.len();
            payloads.push(bytes);
        }

        for (i, (name, dims, data)) in self.tensors.iter().enumerate() {
            push_str(&mut buf, name);
            buf.extend_from_slice(&(dims.len() as u32).to_le_bytes());
            for d in dims {
                buf.extend_from_slice(&d.to_le_bytes());
            }
            let type_id: u32 = match data {
                TensorData::F32(_) => 0,
                TensorData::Q8_0(_) => 8,
            };
            buf.extend_from_slice(&type_id.to_le_bytes());
            buf.extend_from_slice(&offsets[i].to_le_bytes());
        }

        // Alignment padding before the data section.
        while buf.len() % ALIGNMENT != 0 {
            buf.push(0);
        }
        let mut data_cursor = 0usize;
        for payload in &payloads {
            while data_cursor % ALIGNMENT != 0 {
                buf.push(0);
                data_cursor += 1;
            }
            buf.extend_from_slice(payload);
            data_cursor += payload.len();
        }

        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&buf).unwrap();
        f.flush().unwrap();
        (dir, path)
    }
}

fn push_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn quantize_q8_0(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::new();
    for block in values.chunks_exact(32) {
        let amax = block.iter().fold(0.0f32, |m, &v| m.max(v.abs()));
        let scale = if amax == 0.0 { 0.0 } else { amax / 127.0 };
        out.extend_from_slice(&half::f16::from_f32(scale).to_le_bytes());
        let inv = if scale == 0.0 { 0.0 } else { 1.0 / scale };
        for &v in block {
            out.push((v * inv).round().clamp(-127.0, 127.0) as i8 as u8);
        }
    }
    out
}

/// Deterministic small weights in [-0.1, 0.1).
pub fn pseudo_weights(n: usize, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(2654435761).wrapping_add(1);
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            ((state >> 9) as f32 / (1 << 23) as f32 - 1.0) * 0.1
        })
        .collect()
}

pub struct TinyDims {
    pub dim: usize,
    pub n_layers: usize,
    pub n_heads: usize,
    pub n_kv_heads: usize,
    pub hidden: usize,
    pub vocab: usize,
    pub ctx: usize,
}

impl Default for TinyDims {
    fn default() -> Self {
        Self {
            dim: 8,
            n_layers: 2,
            n_heads: 2,
            n_kv_heads: 1,
            hidden: 16,
            vocab: 12,
            ctx: 32,
        }
    }
}

/// A structurally complete tiny llama-style GGUF (tied output weights).
pub fn tiny_llama_builder(d: &TinyDims) -> GgufBuilder {
    let head_dim = d.dim / d.n_heads;
    let kv_dim = d.n_kv_heads * head_dim;

    let mut b = GgufBuilder::new("llama");
    b.meta_u32("llama.embedding_length", d.dim as u32)
        .meta_u32("llama.block_count", d.n_layers as u32)
        .meta_u32("llama.attention.head_count", d.n_heads as u32)
        .meta_u32("llama.attention.head_count_kv", d.n_kv_heads as u32)
        .meta_u32("llama.feed_forward_length", d.hidden as u32)
        .meta_u32("llama.vocab_size", d.vocab as u32)
        .meta_u32("llama.context_length", d.ctx as u32)
        .meta_f32("llama.attention.layer_norm_rms_epsilon", 1e-5)
        .meta_f32("llama.rope.freq_base", 10000.0)
        .meta_u32("tokenizer.ggml.bos_token_id", 1)
        // Outside the vocabulary so synthetic generations never stop
        // early; EOS handling is covered at the config level.
        .meta_u32("tokenizer.ggml.eos_token_id", 999);

    b.tensor_f32(
        "token_embd.weight",
        &[d.dim as u64, d.vocab as u64],
        pseudo_weights(d.vocab * d.dim, 11),
    );
    b.tensor_f32("output_norm.weight", &[d.dim as u64], vec![1.0; d.dim]);

    for l in 0..d.n_layers {
        let seed = (l as u32 + 1) * 100;
        let name = |s: &str| format!("blk.{l}.{s}");
        b.tensor_f32(&name("attn_norm.weight"), &[d.dim as u64], vec![1.0; d.dim]);
        b.tensor_f32(
            &name("attn_q.weight"),
            &[d.dim as u64, d.dim as u64],
            pseudo_weights(d.dim * d.dim, seed + 1),
        );
        b.tensor_f32(
            &name("attn_k.weight"),
            &[d.dim as u64, kv_dim as u64],
            pseudo_weights(kv_dim * d.dim, seed + 2),
        );
        b.tensor_f32(
            &name("attn_v.weight"),
            &[d.dim as u64, kv_dim as u64],
            pseudo_weights(kv_dim * d.dim, seed + 3),
        );
        b.tensor_f32(
            &name("attn_output.weight"),
            &[d.dim as u64, d.dim as u64],
            pseudo_weights(d.dim * d.dim, seed + 4),
        );
        b.tensor_f32(&name("ffn_norm.weight"), &[d.dim as u64], vec![1.0; d.dim]);
        b.tensor_f32(
            &name("ffn_gate.weight"),
            &[d.dim as u64, d.hidden as u64],
            pseudo_weights(d.hidden * d.dim, seed + 5),
        );
        b.tensor_f32(
            &name("ffn_up.weight"),
            &[d.dim as u64, d.hidden as u64],
            pseudo_weights(d.hidden * d.dim, seed + 6),
        );
        b.tensor_f32(
            &name("ffn_down.weight"),
            &[d.hidden as u64, d.dim as u64],
            pseudo_weights(d.dim * d.hidden, seed + 7),
        );
    }
    b
}

/// Byte-level tokenizer for tests: each char maps into the tail of the
/// vocabulary, away from BOS/EOS.
pub struct ByteTokenizer {
    pub vocab: u32,
}

impl PromptTokenizer for ByteTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.bytes().map(|b| 3 + (b as u32) % (self.vocab - 3)).collect()
    }

    fn decode(&self, tokens: &[u32]) -> String {
        tokens.iter().map(|t| format!("<{t}>")).collect()
    }
}
