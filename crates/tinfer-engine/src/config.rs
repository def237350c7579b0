//! Model configuration extracted from GGUF metadata.
//!
//! Metadata keys live under the architecture prefix, e.g.
//! `llama.embedding_length` or `deepseek2.attention.kv_lora_rank`.

use tinfer_core::error::{EngineError, Result};

use crate::gguf::{GgufFile, GgufValue};

/// Supported architecture families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Llama,
    Qwen2,
    Qwen3,
    Qwen3Moe,
    DeepSeek2,
    Glm4,
    Phi3,
    Mistral3,
    Gemma2,
    Gemma3,
    CommandR,
    Olmo2,
    Llama4,
    GptOss,
}

impl Arch {
    /// Map `general.architecture` to a family.
    pub fn from_metadata_string(s: &str) -> Option<Self> {
        match s {
            "llama" => Some(Self::Llama),
            "qwen2" => Some(Self::Qwen2),
            "qwen3" => Some(Self::Qwen3),
            "qwen3moe" => Some(Self::Qwen3Moe),
            "deepseek2" => Some(Self::DeepSeek2),
            "glm4" => Some(Self::Glm4),
            "phi3" => Some(Self::Phi3),
            "mistral3" => Some(Self::Mistral3),
            "gemma2" => Some(Self::Gemma2),
            "gemma3" => Some(Self::Gemma3),
            "command-r" => Some(Self::CommandR),
            "olmo2" => Some(Self::Olmo2),
            "llama4" => Some(Self::Llama4),
            "gpt-oss" => Some(Self::GptOss),
            _ => None,
        }
    }

    /// The metadata key prefix, identical to the wire string.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Llama => "llama",
            Self::Qwen2 => "qwen2",
            Self::Qwen3 => "qwen3",
            Self::Qwen3Moe => "qwen3moe",
            Self::DeepSeek2 => "deepseek2",
            Self::Glm4 => "glm4",
            Self::Phi3 => "phi3",
            Self::Mistral3 => "mistral3",
            Self::Gemma2 => "gemma2",
            Self::Gemma3 => "gemma3",
            Self::CommandR => "command-r",
            Self::Olmo2 => "olmo2",
            Self::Llama4 => "llama4",
            Self::GptOss => "gpt-oss",
        }
    }

    /// RoPE pair layout for this family.
    pub fn rope_type(&self) -> RopeType {
        match self {
            Self::Llama | Self::Mistral3 | Self::Llama4 | Self::CommandR => RopeType::Normal,
            _ => RopeType::Neox,
        }
    }

    /// Gemma scales the embedding by sqrt(dim) at lookup time.
    pub fn scales_embedding(&self) -> bool {
        matches!(self, Self::Gemma2 | Self::Gemma3)
    }

    /// GeGLU (tanh-GELU gate) instead of SwiGLU.
    pub fn uses_geglu(&self) -> bool {
        matches!(self, Self::Gemma2 | Self::Gemma3)
    }

    /// Latent-attention family.
    pub fn uses_mla(&self) -> bool {
        matches!(self, Self::DeepSeek2)
    }

    /// Families that can carry MoE layers.
    pub fn may_use_moe(&self) -> bool {
        matches!(
            self,
            Self::Qwen3Moe | Self::DeepSeek2 | Self::Llama4 | Self::GptOss
        )
    }
}

/// RoPE application layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopeType {
    /// Adjacent pairs (v[2i], v[2i+1]).
    Normal = 0,
    /// Split-half pairs (v[i], v[half + i]).
    Neox = 2,
}

/// Typed model hyperparameters.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub arch: Arch,
    /// Embedding dimension.
    pub dim: usize,
    pub n_layers: usize,
    pub n_heads: usize,
    pub n_kv_heads: usize,
    /// Per-head K dimension (equals `dim / n_heads` unless overridden).
    pub key_length: usize,
    /// Per-head V dimension.
    pub value_length: usize,
    pub hidden_dim: usize,
    pub vocab_size: usize,
    pub context_length: usize,
    pub rope_dim: usize,
    pub rope_type: RopeType,
    pub rope_freq_base: f32,
    pub rms_norm_eps: f32,

    // YaRN / long-rope scaling
    pub rope_scaling_factor: f32,
    pub rope_orig_context: usize,
    pub yarn_log_mul: f32,

    // Output shaping
    pub final_logit_softcap: f32,
    pub logit_scale: f32,
    pub embedding_scale: f32,

    // MLA
    pub kv_lora_rank: usize,

    // MoE
    pub expert_count: usize,
    pub expert_used_count: usize,
    pub expert_shared_count: usize,
    pub expert_ffn_length: usize,
    pub leading_dense_block_count: usize,
    pub norm_topk_prob: bool,

    // Token plumbing
    pub bos_token_id: Option<u32>,
    pub eos_token_id: Option<u32>,
    pub extra_stop_ids: Vec<u32>,
}

impl ModelConfig {
    /// Build the configuration from GGUF metadata. Missing dims fall back
    /// to conventional derivations; a missing architecture is fatal.
    pub fn from_gguf(gguf: &GgufFile) -> Result<Self> {
        let arch_str = gguf
            .architecture()
            .ok_or_else(|| EngineError::UnsupportedArchitecture("<missing>".into()))?;
        let arch = Arch::from_metadata_string(arch_str)
            .ok_or_else(|| EngineError::UnsupportedArchitecture(arch_str.to_string()))?;
        let p = arch.prefix();

        let key = |suffix: &str| format!("{p}.{suffix}");

        let dim = gguf
            .get_u32(&key("embedding_length"))
            .ok_or_else(|| EngineError::ModelLoad(format!("missing {p}.embedding_length")))?
            as usize;
        let n_layers = gguf
            .get_u32(&key("block_count"))
            .ok_or_else(|| EngineError::ModelLoad(format!("missing {p}.block_count")))?
            as usize;
        let n_heads = gguf
            .get_u32(&key("attention.head_count"))
            .ok_or_else(|| EngineError::ModelLoad(format!("missing {p}.attention.head_count")))?
            as usize;
        let n_kv_heads = gguf
            .get_u32(&key("attention.head_count_kv"))
            .map(|v| v as usize)
            .unwrap_or(n_heads);

        let default_head = if n_heads > 0 { dim / n_heads } else { 0 };
        let key_length = gguf
            .get_u32(&key("attention.key_length"))
            .map(|v| v as usize)
            .unwrap_or(default_head);
        let value_length = gguf
            .get_u32(&key("attention.value_length"))
            .map(|v| v as usize)
            .unwrap_or(default_head);

        let vocab_size = gguf
            .get_u32(&key("vocab_size"))
            .map(|v| v as usize)
            .or_else(|| {
                gguf.metadata
                    .get("tokenizer.ggml.tokens")
                    .and_then(GgufValue::as_array)
                    .map(|a| a.len())
            })
            .ok_or_else(|| EngineError::ModelLoad(format!("missing {p}.vocab_size")))?;

        let expert_count = gguf.get_u32(&key("expert_count")).unwrap_or(0) as usize;
        let norm_topk_prob = match gguf.get_bool(&key("expert_weights_norm")) {
            Some(v) => v,
            None if expert_count > 0 => {
                // DeepSeek-V2 routes with raw softmax weights; later MoE
                // families renormalize the selected set.
                let default = !matches!(arch, Arch::DeepSeek2);
                tracing::warn!(
                    "no {p}.expert_weights_norm in metadata; defaulting norm_topk_prob={default} for {p}"
                );
                default
            }
            None => true,
        };

        let mut extra_stop_ids = Vec::new();
        for extra_key in ["tokenizer.ggml.eot_token_id", "tokenizer.ggml.eom_token_id"] {
            if let Some(id) = gguf.get_u32(extra_key) {
                extra_stop_ids.push(id);
            }
        }
        if extra_stop_ids.is_empty() {
            // Heuristic fallback: some fine-tunes stop on <|end|> without
            // declaring it. Prefer the explicit ids above when present.
            if let Some(tokens) = gguf
                .metadata
                .get("tokenizer.ggml.tokens")
                .and_then(GgufValue::as_array)
            {
                if let Some(pos) = tokens
                    .iter()
                    .position(|t| t.as_str() == Some("<|end|>"))
                {
                    tracing::warn!(
                        "no explicit stop-token ids; using vocabulary scan hit <|end|> = {pos}"
                    );
                    extra_stop_ids.push(pos as u32);
                }
            }
        }

        Ok(Self {
            arch,
            dim,
            n_layers,
            n_heads,
            n_kv_heads,
            key_length,
            value_length,
            hidden_dim: gguf
                .get_u32(&key("feed_forward_length"))
                .map(|v| v as usize)
                .unwrap_or(4 * dim),
            vocab_size,
            context_length: gguf
                .get_u32(&key("context_length"))
                .map(|v| v as usize)
                .unwrap_or(2048),
            rope_dim: gguf
                .get_u32(&key("rope.dimension_count"))
                .map(|v| v as usize)
                .unwrap_or(key_length),
            rope_type: arch.rope_type(),
            rope_freq_base: gguf.get_f32(&key("rope.freq_base")).unwrap_or(10000.0),
            rms_norm_eps: gguf
                .get_f32(&key("attention.layer_norm_rms_epsilon"))
                .unwrap_or(1e-5),
            rope_scaling_factor: gguf.get_f32(&key("rope.scaling.factor")).unwrap_or(1.0),
            rope_orig_context: gguf
                .get_u32(&key("rope.scaling.original_context_length"))
                .map(|v| v as usize)
                .unwrap_or(0),
            yarn_log_mul: gguf
                .get_f32(&key("rope.scaling.yarn_log_multiplier"))
                .unwrap_or(0.0),
            final_logit_softcap: gguf.get_f32(&key("final_logit_softcapping")).unwrap_or(0.0),
            logit_scale: gguf.get_f32(&key("logit_scale")).unwrap_or(1.0),
            embedding_scale: if arch.scales_embedding() {
                (dim as f32).sqrt()
            } else {
                1.0
            },
            kv_lora_rank: gguf
                .get_u32(&key("attention.kv_lora_rank"))
                .unwrap_or(0) as usize,
            expert_count,
            expert_used_count: gguf.get_u32(&key("expert_used_count")).unwrap_or(0) as usize,
            expert_shared_count: gguf.get_u32(&key("expert_shared_count")).unwrap_or(0) as usize,
            expert_ffn_length: gguf
                .get_u32(&key("expert_feed_forward_length"))
                .unwrap_or(0) as usize,
            leading_dense_block_count: gguf
                .get_u32(&key("leading_dense_block_count"))
                .unwrap_or(0) as usize,
            norm_topk_prob,
            bos_token_id: gguf.get_u32("tokenizer.ggml.bos_token_id"),
            eos_token_id: gguf.get_u32("tokenizer.ggml.eos_token_id"),
            extra_stop_ids,
        })
    }

    /// KV width per cached position for standard attention.
    pub fn kv_dim(&self) -> usize {
        self.n_kv_heads * self.key_length
    }

    /// Query heads per KV head.
    pub fn kv_group_size(&self) -> usize {
        if self.n_kv_heads == 0 {
            1
        } else {
            self.n_heads / self.n_kv_heads
        }
    }

    /// True when this id terminates generation.
    pub fn is_stop_token(&self, id: u32) -> bool {
        self.eos_token_id == Some(id) || self.extra_stop_ids.contains(&id)
    }

    /// MoE layers exist and `layer` is past the dense prefix.
    pub fn layer_is_moe(&self, layer: usize) -> bool {
        self.expert_count > 0 && layer >= self.leading_dense_block_count
    }
}
