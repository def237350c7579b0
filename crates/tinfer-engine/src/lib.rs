//! tinfer-engine — CPU inference for quantized GGUF transformer models.
//!
//! The engine memory-maps a GGUF file, resolves weights into
//! block-quantized tensor views, and runs per-token forward passes for
//! three architecture families: standard dense GQA transformers,
//! DeepSeek2-style MLA + MoE, and dense-prefix/MoE hybrids. Sampling and
//! a prefix-reuse conversation cache sit on top; tokenization and chat
//! templating are external collaborators (see `tinfer-core::traits`).

pub mod attention;
pub mod block;
pub mod config;
pub mod convo_cache;
pub mod ffn;
pub mod generate;
pub mod gguf;
pub mod gpu;
pub mod kv_cache;
pub mod mmap;
pub mod model;
pub mod quant;
pub mod rope;
pub mod sampler;
pub mod simd;
pub mod state;
pub mod tensor;
pub mod weights;

pub use config::{Arch, ModelConfig};
pub use generate::{GenerateRequest, LlmEngine};
pub use gguf::GgufFile;
pub use mmap::{MmapModel, TensorView};
pub use quant::{GgmlType, QuantTensor};
pub use sampler::{Sampler, SamplerConfig};
pub use state::InferenceState;
