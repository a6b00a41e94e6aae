//! Bounded taste-profile cache keyed by user and history generation.
//!
//! A profile is valid for exactly one generation of the user's history.
//! Any rating or watch signal change bumps the generation, so a stale
//! entry is never served; it is rebuilt on the next lookup. Eviction is
//! least-recently-used once the cache holds `capacity` users.

use crate::profile::TasteProfile;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

struct CachedProfile {
    generation: u64,
    profile: Arc<TasteProfile>,
    /// Tick of the last hit, for LRU eviction
    last_used: AtomicU64,
}

/// Hit/miss counters since the cache was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Concurrent profile cache; capacity 0 disables it.
pub struct ProfileCache {
    store: DashMap<String, CachedProfile>,
    capacity: usize,
    tick: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ProfileCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: DashMap::new(),
            capacity,
            tick: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Cached profile for `user_id` at `generation`, or build and store one.
    ///
    /// Concurrent misses for the same user may both build; the last insert
    /// wins and both results are equivalent.
    pub fn get_or_build<F>(&self, user_id: &str, generation: u64, build: F) -> Arc<TasteProfile>
    where
        F: FnOnce() -> TasteProfile,
    {
        if !self.is_enabled() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Arc::new(build());
        }

        // Fast path; the read guard is dropped before any write below
        let cached = self.store.get(user_id).and_then(|entry| {
            (entry.generation == generation).then(|| {
                entry.last_used.store(self.next_tick(), Ordering::Relaxed);
                Arc::clone(&entry.profile)
            })
        });
        if let Some(profile) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(user_id, generation, "Profile cache HIT");
            return profile;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(user_id, generation, "Profile cache MISS");

        let profile = Arc::new(build());
        if !self.store.contains_key(user_id) {
            self.evict_to_fit();
        }
        self.store.insert(
            user_id.to_string(),
            CachedProfile {
                generation,
                profile: Arc::clone(&profile),
                last_used: AtomicU64::new(self.next_tick()),
            },
        );
        profile
    }

    /// Drop the cached profile for one user
    pub fn invalidate(&self, user_id: &str) -> bool {
        let removed = self.store.remove(user_id).is_some();
        if removed {
            debug!(user_id, "Profile cache INVALIDATE");
        }
        removed
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.store.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }

    /// Evict least-recently-used entries until one more fits
    fn evict_to_fit(&self) {
        while self.store.len() >= self.capacity {
            let oldest = self
                .store
                .iter()
                .min_by_key(|entry| entry.last_used.load(Ordering::Relaxed))
                .map(|entry| entry.key().clone());
            let Some(user_id) = oldest else {
                break;
            };
            self.store.remove(&user_id);
            debug!(user_id = %user_id, "Profile cache EVICT");
        }
    }
}
