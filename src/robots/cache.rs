//! Robots policy caching implementation
//!
//! Policies are cached per origin with no expiry. An entry is created on the
//! first miss for a host and stays unchanged until the whole cache is cleared.
//! Each clear starts a new generation; a policy fetched under an older
//! generation is handed back to its caller but never stored.

use crate::robots::RobotsPolicy;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A cached policy with the time it was stored
#[derive(Debug, Clone)]
pub struct CachedPolicy {
    /// The policy for the origin
    pub policy: Arc<RobotsPolicy>,

    /// When the policy was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedPolicy {
    /// Creates a new CachedPolicy stamped with the current time
    pub fn new(policy: Arc<RobotsPolicy>) -> Self {
        Self {
            policy,
            fetched_at: Utc::now(),
        }
    }

    /// Returns how long ago the policy was fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}

/// Thread-safe origin → policy map shared by crawl workers
///
/// Readers only ever see fully built policies: entries are `Arc`s inserted
/// under the write lock and never mutated afterwards.
#[derive(Debug, Default)]
pub struct ComplianceCache {
    entries: RwLock<HashMap<String, CachedPolicy>>,
    // Only changed while the entries write lock is held
    generation: AtomicU64,
}

impl ComplianceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the policy for an origin
    pub fn get(&self, origin: &str) -> Option<Arc<RobotsPolicy>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(origin).map(|entry| Arc::clone(&entry.policy))
    }

    /// Stores a policy unless the origin already has one
    ///
    /// When two workers race on a miss for the same origin, the first
    /// insert wins and every caller gets the stored policy back, so all of
    /// them converge on one value.
    pub fn insert(&self, origin: &str, policy: RobotsPolicy) -> Arc<RobotsPolicy> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .entry(origin.to_string())
            .or_insert_with(|| CachedPolicy::new(Arc::new(policy)));
        Arc::clone(&entry.policy)
    }

    /// Current generation, bumped by every [`clear`](Self::clear)
    ///
    /// Read it before starting a fetch and pass it to
    /// [`insert_at`](Self::insert_at) afterwards.
    pub fn generation(&self) -> u64 {
        let _entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        self.generation.load(Ordering::Acquire)
    }

    /// Stores a policy fetched during `generation`, unless the cache was
    /// cleared since
    ///
    /// A stale policy is returned to the caller without being stored, so a
    /// fetch that straddles a clear cannot repopulate the cache with data
    /// from before it. Otherwise behaves like [`insert`](Self::insert).
    pub fn insert_at(
        &self,
        origin: &str,
        policy: RobotsPolicy,
        generation: u64,
    ) -> Arc<RobotsPolicy> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!("Cache cleared while fetching {}, not storing policy", origin);
            return match entries.get(origin) {
                Some(entry) => Arc::clone(&entry.policy),
                None => Arc::new(policy),
            };
        }

        let entry = entries
            .entry(origin.to_string())
            .or_insert_with(|| CachedPolicy::new(Arc::new(policy)));
        Arc::clone(&entry.policy)
    }

    /// Returns how long ago the origin's policy was fetched, if cached
    pub fn age(&self, origin: &str) -> Option<Duration> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(origin).map(CachedPolicy::age)
    }

    /// Lists the cached origins
    pub fn origins(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut origins: Vec<String> = entries.keys().cloned().collect();
        origins.sort();
        origins
    }

    /// Removes every entry and starts a new generation
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of distinct origins cached
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
