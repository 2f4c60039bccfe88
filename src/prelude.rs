//! Convenient re-exports for common quotagate types.
pub use crate::{
    barrier::{EndpointBarrier, EndpointBarrierBuilder},
    error::BarrierError,
    layer::EndpointBarrierLayer,
    quota::{QuotaInfo, QuotaReport, ResetDelay},
    registry::{BarrierRegistry, InMemoryBarrierRegistry},
};
