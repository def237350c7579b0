//! Engine facade: prompt-in, streamed-tokens-out.
//!
//! Coordinates tokenization hand-off, BOS prepending, conversation-cache
//! take/put, prefill with prefix reuse, the decode loop with streaming
//! callback and stop handling, and the embedding endpoint. Generations
//! are serialized per engine instance; intra-operator parallelism lives
//! below the forward pass.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use tinfer_core::error::{EngineError, Result};
use tinfer_core::traits::PromptTokenizer;
use tinfer_core::types::{ChatMessage, GenerationParams, GenerationResult};

use crate::convo_cache::{CacheStats, ConversationCache};
use crate::model::Model;
use crate::sampler::{Sampler, SamplerConfig};
use crate::state::InferenceState;
use crate::tensor;

/// One generation request. `prompt` is the chat-template-rendered text;
/// `messages` only feeds the conversation fingerprint.
pub struct GenerateRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub prompt: &'a str,
    pub params: GenerationParams,
}

/// Callback invoked per generated token; returning false cancels the
/// generation cleanly between tokens.
pub type TokenCallback<'a> = dyn FnMut(&str, u32) -> bool + 'a;

pub struct LlmEngine {
    model: Model,
    cache: ConversationCache,
    /// Serializes generations; concurrent callers queue here.
    generation_lock: Mutex<()>,
}

impl LlmEngine {
    pub fn load(path: &Path, max_context: usize) -> Result<Self> {
        let model = Model::load(path, max_context)?;
        Ok(Self {
            model,
            cache: ConversationCache::default(),
            generation_lock: Mutex::new(()),
        })
    }

    pub fn from_model(model: Model) -> Self {
        Self {
            model,
            cache: ConversationCache::default(),
            generation_lock: Mutex::new(()),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Deterministic fingerprint of the message history, used as the
    /// conversation-cache key.
    pub fn cache_key(messages: &[ChatMessage]) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        for m in messages {
            m.role.hash(&mut hasher);
            m.content.hash(&mut hasher);
        }
        format!("{:016x}", hasher.finish())
    }

    /// Run one generation. Returns a non-fatal empty result when the
    /// prompt does not fit the context window.
    pub fn generate(
        &self,
        req: &GenerateRequest,
        tokenizer: &dyn PromptTokenizer,
        on_token: &mut TokenCallback,
    ) -> Result<GenerationResult> {
        let _serialize = self.generation_lock.lock().expect("generation lock poisoned");
        let started = Instant::now();
        let cfg = &self.model.config;

        // BOS + rendered prompt.
        let mut tokens = Vec::new();
        if let Some(bos) = cfg.bos_token_id {
            tokens.push(bos);
        }
        tokens.extend(tokenizer.encode(req.prompt));
        let prompt_len = tokens.len();

        let max_seq = self.model.max_seq_len();
        if prompt_len >= max_seq {
            tracing::warn!(
                "prompt of {prompt_len} tokens overflows context of {max_seq}; returning empty"
            );
            return Ok(GenerationResult {
                prompt_token_count: prompt_len,
                ..Default::default()
            });
        }

        // Prefix reuse: resume a cached state when the histories share a
        // prefix; always re-execute the last prompt token for logits.
        let cache_key = Self::cache_key(req.messages);
        let (mut state, prefill_start) = match self.cache.take(&cache_key) {
            Some(entry) if entry.state.max_seq_len() == max_seq => {
                let lcp = longest_common_prefix(&entry.prompt_tokens, &tokens);
                let lcp = lcp.min(entry.state.cur_pos);
                if lcp == 0 {
                    // Key matched but the token streams diverge from the
                    // start: drop the cached progress and prefill fully.
                    tracing::debug!("cache key {cache_key} matched with no shared prefix");
                    let mut state = entry.state;
                    state.reset();
                    (state, 0)
                } else {
                    let start = lcp.min(prompt_len - 1);
                    tracing::debug!(
                        "prefix reuse: {start}/{prompt_len} prompt tokens skip prefill"
                    );
                    let mut state = entry.state;
                    state.rewind_to(start);
                    (state, start)
                }
            }
            _ => (self.model.new_state(), 0),
        };

        let mut sampler = Sampler::new(SamplerConfig {
            temperature: req.params.temperature,
            top_p: req.params.top_p,
            top_k: req.params.top_k,
            repeat_penalty: req.params.repeat_penalty,
            repeat_last_n: 64,
            seed: req.params.seed,
        })?;

        // Prefill; only the final position's logits matter.
        for i in prefill_start..prompt_len {
            self.model.forward(&mut state, tokens[i], i);
        }
        let prefill_elapsed = started.elapsed();
        tracing::debug!(
            "prefill of {} tokens took {:.1} ms",
            prompt_len - prefill_start,
            prefill_elapsed.as_secs_f64() * 1000.0
        );

        // Decode loop.
        let mut generated: Vec<u32> = Vec::new();
        let mut text = String::new();
        let mut eos_reached = false;
        'decode: while generated.len() < req.params.max_tokens {
            let next = sampler.sample(&mut state.logits, &generated);

            if cfg.is_stop_token(next) {
                eos_reached = true;
                break;
            }

            generated.push(next);
            let piece = tokenizer.decode_token(next);
            text.push_str(&piece);

            if !on_token(&piece, next) {
                tracing::debug!("generation interrupted by callback");
                break;
            }
            for stop in &req.params.stop {
                if !stop.is_empty() && text.contains(stop.as_str()) {
                    break 'decode;
                }
            }

            let pos = prompt_len + generated.len() - 1;
            if pos + 1 >= max_seq {
                tracing::debug!("context window exhausted at position {pos}");
                break;
            }
            self.model.forward(&mut state, next, pos + 1);
        }

        // Park the state for the next turn of this conversation.
        let mut history = tokens;
        history.extend_from_slice(&generated);
        self.cache.put(cache_key, state, history);

        let elapsed = started.elapsed();
        let token_count = generated.len();
        Ok(GenerationResult {
            text,
            token_count,
            prompt_token_count: prompt_len,
            tokens_per_second: token_count as f64 / elapsed.as_secs_f64().max(1e-9),
            elapsed_ms: elapsed.as_millis() as u64,
            eos_reached,
        })
    }

    /// Embedding endpoint: prefill the text and return the L2-normalized
    /// final-norm hidden state.
    pub fn embed(&self, text: &str, tokenizer: &dyn PromptTokenizer) -> Result<Vec<f32>> {
        let _serialize = self.generation_lock.lock().expect("generation lock poisoned");
        let cfg = &self.model.config;

        let mut tokens = Vec::new();
        if let Some(bos) = cfg.bos_token_id {
            tokens.push(bos);
        }
        tokens.extend(tokenizer.encode(text));
        if tokens.len() > self.model.max_seq_len() {
            return Err(EngineError::ContextOverflow {
                prompt_len: tokens.len(),
                max: self.model.max_seq_len(),
            });
        }

        let mut state = self.model.new_state();
        for (i, &t) in tokens.iter().enumerate() {
            self.model.forward(&mut state, t, i);
        }

        let mut embedding = state.xb[..cfg.dim].to_vec();
        tensor::l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

/// Length of the shared prefix of two token streams.
pub fn longest_common_prefix(a: &[u32], b: &[u32]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
