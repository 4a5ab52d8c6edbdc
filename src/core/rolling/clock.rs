use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the integer-seconds timestamps threaded through the counters.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> i64;
}

#[derive(Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Deterministic clock for tests and injected reporter time: a fixed base
/// plus an adjustable offset.
pub struct ManualClock {
    base: i64,
    offset_secs: AtomicI64,
}

impl ManualClock {
    pub fn new(base: i64) -> Self {
        Self {
            base,
            offset_secs: AtomicI64::new(0),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.offset_secs.fetch_add(secs, Ordering::Relaxed);
    }

    pub fn set(&self, secs: i64) {
        self.offset_secs.store(secs, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.offset_secs.store(0, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.base + self.offset_secs.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_and_resets() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_secs(), 1_000);
        clock.advance(3);
        clock.advance(4);
        assert_eq!(clock.now_secs(), 1_007);
        clock.set(2);
        assert_eq!(clock.now_secs(), 1_002);
        clock.reset();
        assert_eq!(clock.now_secs(), 1_000);
    }

    #[test]
    fn test_manual_clock_can_move_backwards() {
        let clock = ManualClock::new(50);
        clock.advance(-60);
        assert_eq!(clock.now_secs(), -10);
    }
}
