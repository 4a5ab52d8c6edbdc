//! Sliding-window event counters.
//!
//! Two interchangeable backings track event counts over the trailing
//! [`WINDOW_SIZE`]-second window: [`BucketMapCounter`] grows a bucket per
//! active second and evicts lazily, [`CircularCounter`] reuses a fixed ring
//! of slots. Both take the current time as an explicit integer-seconds
//! parameter so callers (and tests) control the clock.

mod bucket_map;
mod circular;
mod clock;
mod reporter;

pub use bucket_map::BucketMapCounter;
pub use circular::CircularCounter;
pub use clock::{Clock, ManualClock, SystemClock};
pub use reporter::{MaxFn, ReporterError, WindowReporter};

/// Length of the trailing window, in seconds.
pub const WINDOW_SIZE: i64 = 10;

/// Shared contract of the two counter backings.
///
/// Every operation is total: any `now`, including negative or backwards
/// timestamps, is just a query against a different second.
pub trait RollingCounter: Send + Sync {
    /// Record one event at second `now`.
    fn increment(&self, now: i64);

    /// Sum of counts over entries with `timestamp >= now - WINDOW_SIZE`.
    fn sum(&self, now: i64) -> i64;

    /// Average over window capacity, not over populated entries. Integer
    /// division, so a burst inside a single second reads deliberately damped.
    fn avg(&self, now: i64) -> i64 {
        self.sum(now) / WINDOW_SIZE
    }
}
