#![allow(dead_code)]

use quotagate::{EndpointBarrier, ManualClock, QuotaInfo};
use std::future::Future;
use std::pin::Pin;

/// Fixed wall-clock instant the helpers pin barriers to (whole seconds).
pub const NOW_SECS: i64 = 1_700_000_000;
pub const NOW_MS: i64 = NOW_SECS * 1_000;

pub type QuotaFuture = Pin<Box<dyn Future<Output = Result<QuotaInfo, TestError>> + Send>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestError(pub String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TestError: {}", self.0)
    }
}

impl std::error::Error for TestError {}

/// Barrier whose wall clock is frozen at [`NOW_MS`] and which sleeps on tokio time.
pub fn frozen_barrier(name: &str) -> EndpointBarrier {
    EndpointBarrier::builder().with_clock(ManualClock::new(NOW_MS)).build(name)
}

/// Operation reporting `remaining` calls left and a reset `reset_in` seconds from [`NOW_SECS`].
pub fn reporting(remaining: u64, reset_in: i64) -> impl FnOnce() -> QuotaFuture {
    move || -> QuotaFuture {
        Box::pin(async move {
            Ok::<_, TestError>(QuotaInfo::new(10, remaining, NOW_SECS + reset_in))
        })
    }
}

/// Operation failing with `msg`.
pub fn failing(msg: &'static str) -> impl FnOnce() -> QuotaFuture {
    move || -> QuotaFuture {
        Box::pin(async move { Err::<QuotaInfo, _>(TestError(msg.to_string())) })
    }
}
