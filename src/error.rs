//! Error types for the admission boundary extensions
//!
//! [`EndpointBarrier::guarded_call`](crate::EndpointBarrier::guarded_call) never wraps the
//! operation's error. Only the opt-in variants that can give up on admission need their own
//! error type.
use std::fmt;
use std::time::Duration;
/// Error returned by `try_guarded_call` and `guarded_call_timeout`
#[derive(Debug, Clone)]
pub enum BarrierError<E> {
    /// The slot was occupied and the caller asked not to wait
    Busy { endpoint: String },
    /// The slot did not free up within the admission wait
    AdmissionTimeout { endpoint: String, waited: Duration },
    /// The guarded operation itself failed
    Inner(E),
}
impl<E: fmt::Display> fmt::Display for BarrierError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy { endpoint } => {
                write!(f, "barrier for '{}' is occupied", endpoint)
            }
            Self::AdmissionTimeout { endpoint, waited } => {
                write!(f, "barrier for '{}' not admitted within {:?}", endpoint, waited)
            }
            Self::Inner(e) => write!(f, "{}", e),
        }
    }
}
impl<E: std::error::Error + 'static> std::error::Error for BarrierError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
}
impl<E> BarrierError<E> {
    /// Check if admission was refused without waiting
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
    /// Check if admission timed out
    pub fn is_admission_timeout(&self) -> bool {
        matches!(self, Self::AdmissionTimeout { .. })
    }
    /// Check if this error wraps the operation's error.
    pub fn is_inner(&self) -> bool {
        matches!(self, Self::Inner(_))
    }
    /// Get the inner error if this is an Inner variant
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
    /// Borrow the inner error if present.
    pub fn as_inner(&self) -> Option<&E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
    /// Name of the endpoint that refused admission.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Busy { endpoint } | Self::AdmissionTimeout { endpoint, .. } => {
                Some(endpoint.as_str())
            }
            Self::Inner(_) => None,
        }
    }
}
