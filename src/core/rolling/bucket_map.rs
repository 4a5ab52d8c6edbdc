use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{RollingCounter, WINDOW_SIZE};

/// Map-based counter: one bucket per second that has received an event.
///
/// The map grows between evictions; aggregates never depend on eviction
/// having run because reads re-filter by timestamp. Eviction runs after the
/// mutation lock is released, keeping the exclusive critical section to the
/// lookup-and-update itself.
pub struct BucketMapCounter {
    buckets: RwLock<HashMap<i64, i64>>,
}

impl BucketMapCounter {
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Record a high-water mark observation for second `now`.
    pub fn update_max(&self, now: i64, n: i64) {
        {
            let mut buckets = self
                .buckets
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let value = buckets.entry(now).or_insert(0);
            if n > *value {
                *value = n;
            }
        }
        self.evict(now);
    }

    /// Largest bucket value inside the window ending at `now`; 0 when empty.
    pub fn max(&self, now: i64) -> i64 {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        buckets
            .iter()
            .filter(|(&ts, _)| ts >= now - WINDOW_SIZE)
            .map(|(_, &value)| value)
            .max()
            .unwrap_or(0)
    }

    /// Drop buckets that have fallen out of the window. Liveness only; a
    /// stale bucket that survives until the next sweep is excluded by the
    /// timestamp filter on every read.
    fn evict(&self, now: i64) {
        let mut buckets = self
            .buckets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        buckets.retain(|&ts, _| ts > now - WINDOW_SIZE);
    }
}

impl Default for BucketMapCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingCounter for BucketMapCounter {
    fn increment(&self, now: i64) {
        {
            let mut buckets = self
                .buckets
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *buckets.entry(now).or_insert(0) += 1;
        }
        self.evict(now);
    }

    fn sum(&self, now: i64) -> i64 {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        buckets
            .iter()
            .filter(|(&ts, _)| ts >= now - WINDOW_SIZE)
            .map(|(_, &value)| value)
            .sum()
    }
}
