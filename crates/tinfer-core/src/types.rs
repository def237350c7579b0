//! Request and response types shared between the engine and its callers.

use serde::{Deserialize, Serialize};

/// One turn of a conversation, already rendered by the chat-template
/// collaborator before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Knobs for one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum number of tokens to generate.
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    /// RNG seed; a fixed seed with a fixed worker count reproduces the
    /// exact token sequence.
    pub seed: u64,
    /// Stop sequences checked by substring match against accumulated text.
    #[serde(default)]
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.9,
            repeat_penalty: 1.1,
            seed: 42,
            stop: Vec::new(),
        }
    }
}

/// Outcome of one generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    /// Generated token count (excludes the prompt).
    pub token_count: usize,
    pub prompt_token_count: usize,
    pub tokens_per_second: f64,
    pub elapsed_ms: u64,
    /// True when generation ended on an EOS token rather than a limit.
    pub eos_reached: bool,
}
