//! Temperature + top-k/top-p sampling with repetition penalty.
//!
//! Sampling order: repetition penalty, temperature, top-K cut, softmax,
//! nucleus (top-P) cut with renormalization, then one draw from the
//! seeded RNG. Temperature <= 0 short-circuits to argmax. A fixed seed
//! reproduces the token sequence exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use tinfer_core::error::{EngineError, Result};

/// Sampler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
    pub repeat_last_n: usize,
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.1,
            repeat_last_n: 64,
            seed: 42,
        }
    }
}

impl SamplerConfig {
    /// Reject configurations outside the meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(EngineError::InvalidSamplerConfig(format!(
                "top_p must be in [0,1], got {}",
                self.top_p
            )));
        }
        if self.temperature < 0.0 || !self.temperature.is_finite() {
            return Err(EngineError::InvalidSamplerConfig(format!(
                "temperature must be finite and >= 0, got {}",
                self.temperature
            )));
        }
        if self.repeat_penalty <= 0.0 {
            return Err(EngineError::InvalidSamplerConfig(format!(
                "repeat_penalty must be > 0, got {}",
                self.repeat_penalty
            )));
        }
        Ok(())
    }
}

/// Token sampler — selects the next token from logits.
pub struct Sampler {
    config: SamplerConfig,
    rng: StdRng,
}

impl Sampler {
    pub fn new(config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    /// Sample a token. `logits` is modified in place (penalty and
    /// temperature are applied destructively, as the buffer is rebuilt
    /// each forward pass anyway).
    pub fn sample(&mut self, logits: &mut [f32], last_tokens: &[u32]) -> u32 {
        // Repetition penalty over the recent window.
        if self.config.repeat_penalty != 1.0 {
            let n = last_tokens.len().min(self.config.repeat_last_n);
            for &token_id in &last_tokens[last_tokens.len() - n..] {
                let idx = token_id as usize;
                if idx < logits.len() {
                    if logits[idx] > 0.0 {
                        logits[idx] /= self.config.repeat_penalty;
                    } else {
                        logits[idx] *= self.config.repeat_penalty;
                    }
                }
            }
        }

        // Greedy path.
        if self.config.temperature <= 0.0 {
            return argmax(logits);
        }

        let inv_temp = 1.0 / self.config.temperature;
        for logit in logits.iter_mut() {
            *logit *= inv_temp;
        }

        // Sort candidates by logit, highest first.
        let mut indices: Vec<(usize, f32)> =
            logits.iter().enumerate().map(|(i, &v)| (i, v)).collect();
        indices.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        // Top-K cut.
        if self.config.top_k > 0 {
            indices.truncate((self.config.top_k as usize).min(indices.len()));
        }

        // Softmax over the kept set.
        let max_logit = indices[0].1;
        let mut probs: Vec<(usize, f32)> = indices
            .iter()
            .map(|&(i, v)| (i, (v - max_logit).exp()))
            .collect();
        let sum: f32 = probs.iter().map(|&(_, p)| p).sum();
        for p in probs.iter_mut() {
            p.1 /= sum;
        }

        // Nucleus cut: smallest prefix reaching top_p, then renormalize.
        if self.config.top_p < 1.0 {
            let mut cumulative = 0.0;
            let mut cutoff = probs.len();
            for (i, &(_, p)) in probs.iter().enumerate() {
                cumulative += p;
                if cumulative >= self.config.top_p {
                    cutoff = i + 1;
                    break;
                }
            }
            probs.truncate(cutoff);
            let sum: f32 = probs.iter().map(|&(_, p)| p).sum();
            for p in probs.iter_mut() {
                p.1 /= sum;
            }
        }

        // Draw.
        let r: f32 = self.rng.r#gen();
        let mut cumulative = 0.0;
        for &(idx, prob) in &probs {
            cumulative += prob;
            if r < cumulative {
                return idx as u32;
            }
        }
        probs.last().map(|&(idx, _)| idx as u32).unwrap_or(0)
    }
}

/// Index of the maximum value (greedy decoding).
fn argmax(values: &[f32]) -> u32 {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i as u32)
        .unwrap_or(0)
}
