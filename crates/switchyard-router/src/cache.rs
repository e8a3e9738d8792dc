// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, time-limited memoization of classification results.
//!
//! Entries expire lazily: an entry older than the TTL is treated as absent
//! and removed on the read that finds it. When an insert pushes the cache
//! past capacity, the oldest-inserted entry is evicted, regardless of how
//! often it has been read.
//!
//! Time comes from the tokio clock so paused-time tests can step over the TTL.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use switchyard_config::model::CacheConfig;
use switchyard_core::{ClassificationRequest, ClassificationResult};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::tier::Tier;

/// Build the cache key for a message at a given conversation depth.
///
/// Whitespace-trimmed, lowercased text joined to the history length with `:`.
/// The same text at a different depth is a different key.
pub fn cache_key(text: &str, history_length: usize) -> String {
    format!("{}:{history_length}", text.trim().to_lowercase())
}

struct CacheEntry {
    result: ClassificationResult,
    inserted_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<String>,
}

impl CacheState {
    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

/// Process-wide result cache shared by every routing call.
pub struct ResultCache {
    ttl: Duration,
    capacity: usize,
    state: Mutex<CacheState>,
}

impl ResultCache {
    /// Create a cache. A capacity of zero is raised to one.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Create a cache from the `[cache]` configuration section.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.max_entries)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Critical sections never leave the state half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a fresh entry. An expired entry is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<ClassificationResult> {
        let mut state = self.lock();
        let entry = state.entries.get(key)?;
        if entry.inserted_at.elapsed() < self.ttl {
            return Some(entry.result.clone());
        }
        state.forget(key);
        debug!(key, "cache entry expired");
        None
    }

    /// Store a result, replacing any entry under the same key.
    ///
    /// A replaced key counts as newly inserted for eviction order.
    pub fn put(&self, key: impl Into<String>, result: ClassificationResult) {
        let key = key.into();
        let mut state = self.lock();
        let entry = CacheEntry {
            result,
            inserted_at: Instant::now(),
        };
        if state.entries.insert(key.clone(), entry).is_some() {
            state.order.retain(|k| *k != key);
        }
        state.order.push_back(key);

        while state.entries.len() > self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
            debug!(key = %oldest, "cache entry evicted");
        }
    }

    /// Number of stored entries, including expired ones not yet collected.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut state = self.lock();
        let before = state.entries.len();
        let ttl = self.ttl;
        state
            .entries
            .retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        let CacheState { entries, order } = &mut *state;
        order.retain(|k| entries.contains_key(k));
        before - state.entries.len()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }
}

#[async_trait]
impl Tier for ResultCache {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn classify(&self, request: &ClassificationRequest) -> Option<ClassificationResult> {
        self.get(&cache_key(&request.text, request.history_length))
    }
}

/// Spawn a background task that purges expired entries every `interval`.
///
/// Lazy expiry already guarantees correctness; the sweeper only bounds
/// memory held by entries nobody reads again. Stops when `cancel` fires.
pub fn spawn_sweeper(
    cache: Arc<ResultCache>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Skip the first immediate tick.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = cache.purge_expired();
                    if removed > 0 {
                        debug!(removed, remaining = cache.len(), "cache sweep removed expired entries");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("cache sweeper shutting down");
                    break;
                }
            }
        }
    })
}
