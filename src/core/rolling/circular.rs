use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use super::{RollingCounter, WINDOW_SIZE};

const SLOTS: usize = WINDOW_SIZE as usize;

struct Slot {
    window_start: AtomicI64,
    value: AtomicI64,
}

impl Slot {
    fn new() -> Self {
        Self {
            window_start: AtomicI64::new(0),
            value: AtomicI64::new(0),
        }
    }
}

/// Circular counter: a fixed ring of [`WINDOW_SIZE`] slots indexed by
/// `now mod WINDOW_SIZE`, so memory stays bounded and the same-second
/// increment never takes the exclusive lock.
///
/// Slot identity (`window_start`) changes only under the exclusive side of
/// `identity`; increments and readers hold the shared side, so an atomic add
/// can never land in a slot that is mid-repurpose. Invariant: a slot's
/// `window_start` is always congruent to its index modulo [`WINDOW_SIZE`].
pub struct CircularCounter {
    slots: [Slot; SLOTS],
    identity: RwLock<()>,
}

impl CircularCounter {
    /// Construct a counter pre-aligned to the window starting at `now`.
    pub fn new(now: i64) -> Self {
        let counter = Self {
            slots: std::array::from_fn(|_| Slot::new()),
            identity: RwLock::new(()),
        };
        counter.realign(now);
        counter
    }

    fn index(timestamp: i64) -> usize {
        timestamp.rem_euclid(WINDOW_SIZE) as usize
    }

    /// Re-seed every slot for the window `[now, now + WINDOW_SIZE)`,
    /// discarding all stale data. Callers other than the constructor must
    /// hold the exclusive identity guard.
    fn realign(&self, now: i64) {
        for timestamp in now..now + WINDOW_SIZE {
            let slot = &self.slots[Self::index(timestamp)];
            slot.window_start.store(timestamp, Ordering::Relaxed);
            slot.value.store(0, Ordering::Relaxed);
        }
    }
}

impl RollingCounter for CircularCounter {
    fn increment(&self, now: i64) {
        let slot = &self.slots[Self::index(now)];

        // Fast path: the slot already represents this second. The shared
        // guard excludes identity writers only, so concurrent increments and
        // readers proceed without contention.
        {
            let _shared = self
                .identity
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if slot.window_start.load(Ordering::Relaxed) == now {
                slot.value.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }

        let _exclusive = self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Re-check identity: another thread may have rolled this slot over
        // while we waited for the lock.
        let window_start = slot.window_start.load(Ordering::Relaxed);
        if window_start == now {
            slot.value.fetch_add(1, Ordering::Relaxed);
        } else if window_start == now - WINDOW_SIZE {
            // One full rotation stale: single-slot rollover.
            slot.window_start.store(now, Ordering::Relaxed);
            slot.value.store(1, Ordering::Relaxed);
        } else {
            // Idle for more than a rotation, or time moved backwards. None
            // of the stored data belongs to this window any more.
            self.realign(now);
            slot.value.store(1, Ordering::Relaxed);
        }
    }

    fn sum(&self, now: i64) -> i64 {
        let _shared = self
            .identity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        self.slots
            .iter()
            .filter(|slot| slot.window_start.load(Ordering::Relaxed) >= now - WINDOW_SIZE)
            .map(|slot| slot.value.load(Ordering::Relaxed))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_start_of(counter: &CircularCounter, timestamp: i64) -> i64 {
        counter.slots[CircularCounter::index(timestamp)]
            .window_start
            .load(Ordering::Relaxed)
    }

    #[test]
    fn test_constructor_seeds_congruent_window_starts() {
        let counter = CircularCounter::new(1_003);
        for (index, slot) in counter.slots.iter().enumerate() {
            let start = slot.window_start.load(Ordering::Relaxed);
            assert_eq!(start.rem_euclid(WINDOW_SIZE) as usize, index);
            assert!((1_003..1_013).contains(&start));
        }
        // The creation second itself maps onto its own slot.
        assert_eq!(window_start_of(&counter, 1_003), 1_003);
    }

    #[test]
    fn test_same_second_increments_accumulate() {
        let counter = CircularCounter::new(1_000);
        for _ in 0..7 {
            counter.increment(1_000);
        }
        assert_eq!(counter.sum(1_000), 7);
        assert_eq!(counter.avg(1_000), 0);
    }

    #[test]
    fn test_single_slot_rollover_discards_stale_count() {
        let counter = CircularCounter::new(1_000);
        counter.increment(1_000);
        counter.increment(1_000);
        counter.increment(1_010);
        assert_eq!(window_start_of(&counter, 1_010), 1_010);
        assert_eq!(counter.sum(1_010), 1);
    }

    #[test]
    fn test_idle_gap_realigns_every_slot() {
        let counter = CircularCounter::new(1_000);
        counter.increment(1_000);
        counter.increment(1_004);
        // Silence for more than a full rotation.
        counter.increment(1_027);
        assert_eq!(counter.sum(1_027), 1);
        for (index, slot) in counter.slots.iter().enumerate() {
            let start = slot.window_start.load(Ordering::Relaxed);
            assert_eq!(start.rem_euclid(WINDOW_SIZE) as usize, index);
            assert!((1_027..1_037).contains(&start));
        }
    }

    #[test]
    fn test_increment_after_realign_keeps_counting() {
        let counter = CircularCounter::new(1_001);
        counter.increment(1_030);
        counter.increment(1_030);
        counter.increment(1_030);
        assert_eq!(counter.sum(1_030), 3);
    }

    #[test]
    fn test_backwards_time_triggers_realign() {
        let counter = CircularCounter::new(1_000);
        counter.increment(1_000);
        counter.increment(997);
        assert_eq!(counter.sum(997), 1);
        assert_eq!(window_start_of(&counter, 997), 997);
    }

    #[test]
    fn test_negative_timestamps_index_safely() {
        let counter = CircularCounter::new(-7);
        counter.increment(-7);
        counter.increment(-7);
        assert_eq!(counter.sum(-7), 2);
        for (index, slot) in counter.slots.iter().enumerate() {
            let start = slot.window_start.load(Ordering::Relaxed);
            assert_eq!(start.rem_euclid(WINDOW_SIZE) as usize, index);
        }
    }
}
