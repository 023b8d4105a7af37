//! Shared fitness cache.
//!
//! Elites and near-duplicates recur across generations; caching their
//! scores skips the conflict scan. The cache is shared across the worker
//! pool behind a `parking_lot` mutex and evicts least-recently-used
//! entries once full.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Cache key: one (day, slot) pair per course, (-1, -1) for unplaced.
pub type SolutionKey = Vec<(i16, i16)>;

#[derive(Debug)]
struct Entry {
    score: f64,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Inner {
    map: HashMap<SolutionKey, Entry>,
    tick: u64,
}

/// LRU-evicting fitness cache keyed by whole assignments.
#[derive(Debug)]
pub struct FitnessCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl FitnessCache {
    /// Creates a cache holding at most `capacity` assignments.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Looks up a score, refreshing the entry's recency.
    pub fn get(&self, key: &SolutionKey) -> Option<f64> {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;
        inner.map.get_mut(key).map(|entry| {
            entry.last_used = tick;
            entry.score
        })
    }

    /// Stores a score, evicting the least recently used entry when full.
    pub fn insert(&self, key: SolutionKey, score: f64) {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;

        if inner.map.len() >= self.capacity && !inner.map.contains_key(&key) {
            let oldest = inner
                .map
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                inner.map.remove(&oldest);
            }
        }

        inner.map.insert(
            key,
            Entry {
                score,
                last_used: tick,
            },
        );
    }

    /// Number of cached assignments.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
