use chrono::{DateTime, Duration, SecondsFormat, Utc};
use custody_canonical::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of block timestamps.
pub trait Clock: Send + Sync {
    /// Current time as a UTC timestamp with millisecond precision.
    fn now(&self) -> Timestamp;
}

fn format(instant: DateTime<Utc>) -> Timestamp {
    Timestamp::new(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        format(Utc::now())
    }
}

/// Deterministic clock: each call returns `start + n * step`.
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    step_ms: i64,
    ticks: AtomicI64,
}

impl SteppingClock {
    /// Clock starting at `start`, advancing `step_ms` per reading.
    pub fn new(start: DateTime<Utc>, step_ms: i64) -> Self {
        Self {
            start,
            step_ms,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Timestamp {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst);
        format(self.start + Duration::milliseconds(n * self.step_ms))
    }
}
