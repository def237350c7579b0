//! Error taxonomy for model loading and generation.
//!
//! Load-time failures (GGUF parsing, missing tensors, unknown
//! architectures) are fatal; `ContextOverflow` and `Interrupted` are
//! recoverable and the facade maps them to non-fatal results.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Structured failures while decoding the GGUF container.
#[derive(Debug, Error)]
pub enum GgufError {
    #[error("bad magic 0x{found:08x}, expected \"GGUF\"")]
    BadMagic { found: u32 },

    #[error("unsupported GGUF version {0} (supported: 2, 3)")]
    UnsupportedVersion(u32),

    #[error("truncated file while reading {context}")]
    Truncated { context: &'static str },

    #[error("tensor '{name}' data out of bounds: offset={offset}, len={len}, file={file_len}")]
    TensorOutOfBounds {
        name: String,
        offset: u64,
        len: u64,
        file_len: u64,
    },

    #[error("unknown quantization type id {0}")]
    UnknownQuantType(u32),

    #[error("unknown metadata value type id {0}")]
    UnknownValueType(u32),
}

/// Top-level error for the inference engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Gguf(#[from] GgufError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("quant type {quant} is not usable for {path}")]
    UnsupportedQuant { quant: String, path: &'static str },

    #[error("missing required tensor: {0}")]
    MissingTensor(String),

    #[error("prompt of {prompt_len} tokens does not fit in context of {max} (one decode slot required)")]
    ContextOverflow { prompt_len: usize, max: usize },

    #[error("invalid sampler config: {0}")]
    InvalidSamplerConfig(String),

    #[error("generation interrupted by caller")]
    Interrupted,

    #[error("model load failed: {0}")]
    ModelLoad(String),
}

impl EngineError {
    /// True for errors the facade reports as a non-fatal, empty response.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::ContextOverflow { .. } | EngineError::Interrupted
        )
    }
}
