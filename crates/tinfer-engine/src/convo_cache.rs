//! Conversation cache — saved inference states keyed by conversation
//! fingerprint, enabling prefix reuse across requests.
//!
//! `take` removes the entry, so the caller holds the state exclusively
//! until it `put`s it back after generation; concurrent requests for the
//! same conversation serialize through this discipline. Entries expire
//! after a 5 minute TTL, and the map holds at most 4 states (LRU
//! eviction by `last_access`).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::state::InferenceState;

pub const MAX_ENTRIES: usize = 4;
pub const TTL: Duration = Duration::from_secs(300);

/// A parked generation: the state plus the prompt tokens it has seen.
pub struct CacheEntry {
    pub state: InferenceState,
    pub prompt_tokens: Vec<u32>,
    last_access: Instant,
}

/// Cache counters, surfaced for diagnostics.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Thread-safe fingerprint -> state map.
pub struct ConversationCache {
    inner: Mutex<CacheInner>,
    ttl: Duration,
    max_entries: usize,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

impl Default for ConversationCache {
    fn default() -> Self {
        Self::new(MAX_ENTRIES, TTL)
    }
}

impl ConversationCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                stats: CacheStats::default(),
            }),
            ttl,
            max_entries,
        }
    }

    /// Atomically remove and return the entry for `key`. Misses and
    /// expired entries both return None.
    pub fn take(&self, key: &str) -> Option<CacheEntry> {
        let mut inner = self.inner.lock().expect("conversation cache poisoned");
        match inner.entries.remove(key) {
            Some(entry) if entry.last_access.elapsed() <= self.ttl => {
                inner.stats.hits += 1;
                tracing::debug!("conversation cache hit for {key}");
                Some(entry)
            }
            Some(_) => {
                inner.stats.misses += 1;
                tracing::debug!("conversation cache entry for {key} expired");
                None
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Insert (or replace) the entry for `key`, evicting expired entries
    /// first and then the least recently used one if the cache is full.
    pub fn put(&self, key: String, state: InferenceState, prompt_tokens: Vec<u32>) {
        let mut inner = self.inner.lock().expect("conversation cache poisoned");

        let ttl = self.ttl;
        let before = inner.entries.len();
        inner.entries.retain(|_, e| e.last_access.elapsed() <= ttl);
        inner.stats.evictions += (before - inner.entries.len()) as u64;

        while inner.entries.len() >= self.max_entries {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    inner.entries.remove(&k);
                    inner.stats.evictions += 1;
                }
                None => break,
            }
        }

        inner.entries.insert(
            key,
            CacheEntry {
                state,
                prompt_tokens,
                last_access: Instant::now(),
            },
        );
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().expect("conversation cache poisoned");
        let mut stats = inner.stats.clone();
        stats.entries = inner.entries.len();
        stats
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("conversation cache poisoned");
        inner.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Arch, ModelConfig, RopeType};

    fn tiny_config() -> ModelConfig {
        ModelConfig {
            arch: Arch::Llama,
            dim: 8,
            n_layers: 1,
            n_heads: 2,
            n_kv_heads: 2,
            key_length: 4,
            value_length: 4,
            hidden_dim: 16,
            vocab_size: 10,
            context_length: 8,
            rope_dim: 4,
            rope_type: RopeType::Normal,
            rope_freq_base: 10000.0,
            rms_norm_eps: 1e-5,
            rope_scaling_factor: 1.0,
            rope_orig_context: 0,
            yarn_log_mul: 0.0,
            final_logit_softcap: 0.0,
            logit_scale: 1.0,
            embedding_scale: 1.0,
            kv_lora_rank: 0,
            expert_count: 0,
            expert_used_count: 0,
            expert_shared_count: 0,
            expert_ffn_length: 0,
            leading_dense_block_count: 0,
            norm_topk_prob: true,
            bos_token_id: Some(1),
            eos_token_id: Some(2),
            extra_stop_ids: Vec::new(),
        }
    }

    fn state() -> InferenceState {
        InferenceState::new(&tiny_config(), 8)
    }

    #[test]
    fn take_removes_entry() {
        let cache = ConversationCache::default();
        cache.put("a".into(), state(), vec![1, 2, 3]);

        let entry = cache.take("a").unwrap();
        assert_eq!(entry.prompt_tokens, vec![1, 2, 3]);
        // Exclusive ownership: a second take misses.
        assert!(cache.take("a").is_none());
    }

    #[test]
    fn ttl_expires_entries() {
        let cache = ConversationCache::new(4, Duration::from_millis(0));
        cache.put("a".into(), state(), vec![1]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.take("a").is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn lru_eviction_at_capacity() {
        let cache = ConversationCache::new(2, Duration::from_secs(60));
        cache.put("a".into(), state(), vec![1]);
        std::thread::sleep(Duration::from_millis(2));
        cache.put("b".into(), state(), vec![2]);
        std::thread::sleep(Duration::from_millis(2));
        cache.put("c".into(), state(), vec![3]);

        // "a" was oldest and must be gone.
        assert!(cache.take("a").is_none());
        assert!(cache.take("c").is_some());
        assert!(cache.stats().evictions >= 1);
    }

    #[test]
    fn stats_track_hits_and_entries() {
        let cache = ConversationCache::default();
        assert!(cache.take("x").is_none());
        cache.put("x".into(), state(), vec![1]);
        assert_eq!(cache.stats().entries, 1);
        assert!(cache.take("x").is_some());
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 0);
    }
}
