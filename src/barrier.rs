//! Per-endpoint admission barrier
//!
//! One [`EndpointBarrier`] guards one remote operation. Every call goes through a single-permit
//! slot, and the quota the call reports decides when that slot opens again.
//!
//! Semantics:
//! - At most one guarded operation per barrier is in flight or cooling down.
//! - A failed operation releases the slot immediately and its error is returned unchanged.
//! - A success with `remaining > 0` releases the slot immediately.
//! - A success with `remaining == 0` hands the slot to a detached task that sleeps until the
//!   reported reset and only then releases it. The caller gets its result right away; only later
//!   callers wait.
//! - Waiters are admitted in arrival order (tokio's semaphore is FIFO).
//!
//! Invariants:
//! - The slot is released on every path, including the caller dropping the call future.
//! - Barriers never block each other; clones of one barrier share its slot.
//!
//! Example
//! ```rust
//! use quotagate::{EndpointBarrier, QuotaInfo};
//!
//! #[derive(Debug)]
//! struct ApiErr;
//! impl std::fmt::Display for ApiErr { fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "api error") } }
//! impl std::error::Error for ApiErr {}
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let barrier = EndpointBarrier::new("QueryChannel");
//! let quota = barrier
//!     .guarded_call(|| async { Ok::<_, ApiErr>(QuotaInfo::new(60, 59, 1_700_000_000)) })
//!     .await
//!     .unwrap();
//! assert_eq!(quota.remaining, 59);
//! assert!(barrier.is_free());
//! # });
//! ```

use crate::clock::{SystemClock, WallClock};
use crate::error::BarrierError;
use crate::quota::{QuotaInfo, QuotaReport, ResetDelay};
use crate::sleeper::{Sleeper, TokioSleeper};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, trace};

/// Single-slot admission barrier for one remote operation.
#[derive(Clone)]
pub struct EndpointBarrier {
    name: Arc<str>,
    slot: Arc<Semaphore>,
    clock: Arc<dyn WallClock>,
    sleeper: Arc<dyn Sleeper>,
    reset_delay: ResetDelay,
}

impl std::fmt::Debug for EndpointBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointBarrier")
            .field("name", &self.name)
            .field("free", &self.is_free())
            .field("reset_delay", &self.reset_delay)
            .field("clock", &self.clock)
            .field("sleeper", &self.sleeper)
            .finish()
    }
}

impl EndpointBarrier {
    /// Barrier with the system clock, tokio sleeps and the default [`ResetDelay`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder().build(name)
    }

    /// Construct a new builder with defaults.
    pub fn builder() -> EndpointBarrierBuilder {
        EndpointBarrierBuilder::new()
    }

    /// Name of the guarded operation.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reset_delay(&self) -> ResetDelay {
        self.reset_delay
    }

    /// True when a call would be admitted right now.
    pub fn is_free(&self) -> bool {
        self.slot.available_permits() > 0
    }

    /// True if both handles guard the same slot.
    pub fn shares_slot_with(&self, other: &EndpointBarrier) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    /// Wait for the slot, run `operation`, and release according to the reported quota.
    ///
    /// Must be called from within a tokio runtime: an exhausted quota spawns the release task.
    pub async fn guarded_call<R, E, Fut, Op>(&self, operation: Op) -> Result<R, E>
    where
        R: QuotaReport,
        Fut: Future<Output = Result<R, E>>,
        Op: FnOnce() -> Fut,
    {
        let permit = self.admit().await;
        self.run_admitted(permit, operation).await
    }

    /// Like [`guarded_call`](Self::guarded_call), but fails with [`BarrierError::Busy`] instead
    /// of waiting when the slot is occupied.
    pub async fn try_guarded_call<R, E, Fut, Op>(
        &self,
        operation: Op,
    ) -> Result<R, BarrierError<E>>
    where
        R: QuotaReport,
        Fut: Future<Output = Result<R, E>>,
        Op: FnOnce() -> Fut,
    {
        let permit = self
            .slot
            .clone()
            .try_acquire_owned()
            .map_err(|_| BarrierError::Busy { endpoint: self.name.to_string() })?;
        self.run_admitted(permit, operation).await.map_err(BarrierError::Inner)
    }

    /// Like [`guarded_call`](Self::guarded_call), but gives up with
    /// [`BarrierError::AdmissionTimeout`] if the slot is not free within `wait`.
    ///
    /// Only admission is bounded; once admitted the operation runs to completion.
    pub async fn guarded_call_timeout<R, E, Fut, Op>(
        &self,
        wait: Duration,
        operation: Op,
    ) -> Result<R, BarrierError<E>>
    where
        R: QuotaReport,
        Fut: Future<Output = Result<R, E>>,
        Op: FnOnce() -> Fut,
    {
        let permit = tokio::time::timeout(wait, self.admit()).await.map_err(|_| {
            BarrierError::AdmissionTimeout { endpoint: self.name.to_string(), waited: wait }
        })?;
        self.run_admitted(permit, operation).await.map_err(BarrierError::Inner)
    }

    async fn admit(&self) -> OwnedSemaphorePermit {
        self.slot.clone().acquire_owned().await.expect("barrier slot is never closed")
    }

    async fn run_admitted<R, E, Fut, Op>(
        &self,
        permit: OwnedSemaphorePermit,
        operation: Op,
    ) -> Result<R, E>
    where
        R: QuotaReport,
        Fut: Future<Output = Result<R, E>>,
        Op: FnOnce() -> Fut,
    {
        // An error returns here and drops the permit with it.
        let response = operation().await?;
        self.settle(permit, response.quota());
        Ok(response)
    }

    fn settle(&self, permit: OwnedSemaphorePermit, quota: QuotaInfo) {
        trace!(
            target: "quotagate::barrier",
            endpoint = %self.name,
            remaining = quota.remaining,
            limit = quota.limit,
            "call completed"
        );
        if !quota.is_exhausted() {
            drop(permit);
            return;
        }

        let delay = self.reset_delay.delay(quota.reset_at, self.clock.now_unix_millis());
        debug!(
            target: "quotagate::barrier",
            endpoint = %self.name,
            reset_at = quota.reset_at,
            delay_ms = delay.as_millis() as u64,
            "quota exhausted; holding admissions until reset"
        );

        let name = Arc::clone(&self.name);
        let sleeper = Arc::clone(&self.sleeper);
        tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            sleeper.sleep(delay).await;
            drop(permit);
            trace!(
                target: "quotagate::barrier",
                endpoint = %name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "quota window reset; admissions resumed"
            );
        });
    }
}

/// Builder for [`EndpointBarrier`].
///
/// `build` borrows the builder so one configured builder can stamp out barriers for many
/// endpoints that share clock, sleeper and delay policy.
#[derive(Clone)]
pub struct EndpointBarrierBuilder {
    clock: Arc<dyn WallClock>,
    sleeper: Arc<dyn Sleeper>,
    reset_delay: ResetDelay,
}

impl std::fmt::Debug for EndpointBarrierBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointBarrierBuilder")
            .field("clock", &self.clock)
            .field("sleeper", &self.sleeper)
            .field("reset_delay", &self.reset_delay)
            .finish()
    }
}

impl EndpointBarrierBuilder {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            sleeper: Arc::new(TokioSleeper),
            reset_delay: ResetDelay::default(),
        }
    }

    /// Provide the wall clock used to compute cooldowns.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: WallClock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Provide a custom sleeper implementation.
    pub fn with_sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Set how a reset instant becomes a cooldown.
    pub fn reset_delay(mut self, reset_delay: ResetDelay) -> Self {
        self.reset_delay = reset_delay;
        self
    }

    /// Build a barrier for `name` with a fresh, free slot.
    pub fn build(&self, name: impl Into<String>) -> EndpointBarrier {
        EndpointBarrier {
            name: Arc::from(name.into()),
            slot: Arc::new(Semaphore::new(1)),
            clock: Arc::clone(&self.clock),
            sleeper: Arc::clone(&self.sleeper),
            reset_delay: self.reset_delay,
        }
    }
}

impl Default for EndpointBarrierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
