//! In-process LRU cache for LLM prompt responses.
//!
//! Keys are SHA-256 digests of model name plus prompt text, so identical
//! prompts against the same model share one entry. Entries older than the
//! TTL are treated as missing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use reelcraft_core::hashing::sha256_hex;

pub const DEFAULT_CAPACITY: usize = 256;
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct Entry {
    value: String,
    inserted_at: Instant,
    last_used: u64,
}

struct Inner {
    entries: HashMap<String, Entry>,
    tick: u64,
}

pub struct PromptCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl PromptCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity),
                tick: 0,
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn key(model: &str, prompt: &str) -> String {
        sha256_hex(format!("{model}\n{prompt}").as_bytes())
    }

    /// Look up a fresh entry, refreshing its recency.
    pub fn get(&self, model: &str, prompt: &str) -> Option<String> {
        let key = Self::key(model, prompt);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.tick += 1;
        let tick = inner.tick;

        let expired = match inner.entries.get_mut(&key) {
            None => return None,
            Some(entry) if entry.inserted_at.elapsed() > self.ttl => true,
            Some(entry) => {
                entry.last_used = tick;
                return Some(entry.value.clone());
            }
        };
        if expired {
            inner.entries.remove(&key);
        }
        None
    }

    /// Store a response, evicting the least recently used entry when full.
    pub fn insert(&self, model: &str, prompt: &str, value: String) {
        let key = Self::key(model, prompt);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                inner.entries.remove(&oldest);
            }
        }
        inner.entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
                last_used: tick,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PromptCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
