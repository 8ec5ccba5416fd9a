//! In-memory response cache keyed by request URL
//!
//! Entries carry an absolute expiry. Fresh reads only see live entries, while
//! the degraded-mode read returns whatever was last stored for a key so that
//! a failed network call can still show something.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Probability that a `put` triggers a sweep of expired entries
pub const DEFAULT_SWEEP_PROBABILITY: f64 = 0.1;

/// A single cached value with its expiry instant
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Time-expiring cache of API responses
///
/// The cache is advisory: a miss only means the caller should go to the
/// network. There is no size bound; the key space is the small set of
/// distinct request URLs an application issues.
///
/// All operations take `&self`. Writes, sweeps and clears are serialized by
/// an internal mutex, so a cache can be shared behind an `Arc` between the
/// UI loop and background fetch tasks.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    sweep_probability: f64,
}

impl<V: Clone> ResponseCache<V> {
    /// Creates an empty cache that sweeps on roughly one write in ten
    pub fn new() -> Self {
        Self::with_sweep_probability(DEFAULT_SWEEP_PROBABILITY)
    }

    /// Creates an empty cache with a custom sweep probability
    ///
    /// The probability is clamped to `0.0..=1.0`. `0.0` disables
    /// opportunistic sweeping entirely and `1.0` sweeps on every write.
    pub fn with_sweep_probability(probability: f64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            sweep_probability: probability.clamp(0.0, 1.0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave the map half-written,
        // so a poisoned guard is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached value if present and not yet expired
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    /// Same as [`get`](Self::get), evaluated at an explicit instant
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<V> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        if entry.is_fresh(now) {
            tracing::trace!(key, "response cache hit");
            Some(entry.value.clone())
        } else {
            tracing::trace!(key, "response cache entry expired");
            None
        }
    }

    /// Returns the cached value regardless of expiry
    ///
    /// Only meant as a fallback after a failed network attempt.
    pub fn get_ignoring_expiry(&self, key: &str) -> Option<V> {
        let entries = self.lock();
        let value = entries.get(key).map(|entry| entry.value.clone());
        if value.is_some() {
            tracing::trace!(key, "response cache stale read");
        }
        value
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry
    ///
    /// Occasionally sweeps expired entries afterwards.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Utc::now();
        self.put_at(key, value, ttl, now);
        if self.should_sweep() {
            self.sweep_at(now);
        }
    }

    /// Stores an entry as if written at `now`, without the random sweep
    pub fn put_at(&self, key: impl Into<String>, value: V, ttl: Duration, now: DateTime<Utc>) {
        let key = key.into();
        tracing::trace!(key = %key, ttl_secs = ttl.num_seconds(), "response cache put");
        self.lock().insert(
            key,
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    fn should_sweep(&self) -> bool {
        self.sweep_probability > 0.0 && rand::random::<f64>() < self.sweep_probability
    }

    /// Removes every entry whose expiry is at or before now
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Removes every entry whose expiry is at or before `now`
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "swept expired responses");
        }
        removed
    }

    /// Removes all entries unconditionally
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
