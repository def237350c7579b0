//! Collaborator contracts.
//!
//! The tokenizer lives outside the engine; the engine only needs encode
//! and decode over token ids. BOS/EOS ids come from GGUF metadata, not
//! from the tokenizer itself.

/// Tokenizer contract consumed by the engine facade.
pub trait PromptTokenizer: Send + Sync {
    /// Encode text into token ids (no BOS prepended; the engine does that).
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode a token sequence into text.
    fn decode(&self, tokens: &[u32]) -> String;

    /// Decode a single token into its text piece.
    fn decode_token(&self, token: u32) -> String {
        self.decode(&[token])
    }
}
