//! Wall-clock abstraction used to turn a server-declared reset instant into a cooldown.
//!
//! Quota windows reset at absolute Unix timestamps, so unlike interval timers the barrier needs
//! wall time rather than a monotonic clock.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Clock abstraction so the current wall time can be faked in tests.
pub trait WallClock: Send + Sync + std::fmt::Debug {
    /// Milliseconds since the Unix epoch. Negative before 1970.
    fn now_unix_millis(&self) -> i64;
}

/// Wall clock backed by `SystemTime::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_unix_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => i64::try_from(since.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
        }
    }
}

/// Manually driven clock for tests. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Start the clock at `unix_millis`.
    pub fn new(unix_millis: i64) -> Self {
        Self { now: Arc::new(AtomicI64::new(unix_millis)) }
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jump to an absolute instant.
    pub fn set(&self, unix_millis: i64) {
        self.now.store(unix_millis, Ordering::SeqCst);
    }
}

impl WallClock for ManualClock {
    fn now_unix_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
