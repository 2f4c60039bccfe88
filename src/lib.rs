#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # quotagate
//!
//! Admission barriers for remote APIs that enforce fixed-window quotas and report the remaining
//! calls and the window reset with every response.
//!
//! ## Features
//!
//! - **One call in flight per endpoint**, callers queue in arrival order
//! - **Cooldown until the server-declared reset** once a window is exhausted, without blocking
//!   the caller that exhausted it
//! - **Errors bypass the cooldown** and pass through unchanged
//! - **Registry** of barriers by operation name, configurable from JSON
//! - **Tower middleware** for services whose responses carry quota
//!
//! ## Quick Start
//!
//! ```rust
//! use quotagate::{BarrierRegistry, InMemoryBarrierRegistry, QuotaInfo};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = InMemoryBarrierRegistry::new();
//!     let barrier = registry.get_or_create("QueryUsers");
//!
//!     let result = barrier.guarded_call(|| async {
//!         // Issue the remote call here and report its quota.
//!         Ok::<_, std::io::Error>(QuotaInfo::new(60, 59, 1_700_000_000))
//!     }).await;
//!     assert!(result.is_ok());
//! }
//! ```

pub mod barrier;
pub mod clock;
pub mod config;
pub mod error;
pub mod layer;
pub mod prelude;
pub mod quota;
pub mod registry;
pub mod sleeper;

// Re-exports
pub use barrier::{EndpointBarrier, EndpointBarrierBuilder};
pub use clock::{ManualClock, SystemClock, WallClock};
pub use config::{ConfigError, RegistryConfig};
pub use error::BarrierError;
pub use layer::{EndpointBarrierLayer, EndpointBarrierService};
pub use quota::{QuotaInfo, QuotaParseError, QuotaReport, ResetDelay};
pub use registry::{BarrierRegistry, InMemoryBarrierRegistry, RegistryError};
pub use sleeper::{Sleeper, TokioSleeper, TrackingSleeper};
