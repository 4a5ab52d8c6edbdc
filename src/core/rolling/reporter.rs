use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use super::clock::Clock;
use super::RollingCounter;
use crate::core::config::model::ReportCfg;

/// Optional per-tick max aggregate, supplied by backings that track one
/// (the map variant); keeps the reporter agnostic of the backing.
pub type MaxFn = Box<dyn Fn(i64) -> i64 + Send>;

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("report interval must be greater than zero")]
    ZeroInterval,
    #[error("reporter worker thread failed to start: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Background health reporter: a worker thread that wakes every configured
/// interval and logs the window aggregates under `target = "metrics"`.
#[derive(Debug)]
pub struct WindowReporter {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl WindowReporter {
    /// Start the worker; `Ok(None)` when reporting is disabled by config.
    /// The max closure is consulted only when the config opts in.
    pub fn spawn(
        counter: Arc<dyn RollingCounter>,
        clock: Arc<dyn Clock>,
        cfg: &ReportCfg,
        max: Option<MaxFn>,
    ) -> Result<Option<Self>, ReporterError> {
        if !cfg.enabled {
            return Ok(None);
        }
        if cfg.interval_secs == 0 {
            return Err(ReporterError::ZeroInterval);
        }
        let max = if cfg.include_max { max } else { None };
        let interval = Duration::from_secs(cfg.interval_secs);
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = stop.clone();
        let handle = thread::Builder::new()
            .name("window-reporter".into())
            .spawn(move || {
                while !worker_stop.load(Ordering::Relaxed) {
                    thread::park_timeout(interval);
                    if worker_stop.load(Ordering::Relaxed) {
                        break;
                    }
                    let now = clock.now_secs();
                    let sum = counter.sum(now);
                    let avg = counter.avg(now);
                    match &max {
                        Some(max_fn) => {
                            tracing::info!(
                                target: "metrics",
                                now,
                                sum,
                                avg,
                                max = max_fn(now),
                                "window aggregates"
                            );
                        }
                        None => {
                            tracing::info!(target: "metrics", now, sum, avg, "window aggregates");
                        }
                    }
                }
            })?;
        Ok(Some(Self {
            stop,
            handle: Some(handle),
        }))
    }

    /// Signal the worker and wait for it to exit.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for WindowReporter {
    fn drop(&mut self) {
        // Dropping without an explicit stop() leaves the worker detached but
        // signals it to wind down on its next wakeup.
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
        }
    }
}
