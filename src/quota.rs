//! Quota information reported by the remote API, and the cooldown derived from it.
//!
//! Fixed-window APIs report, with every response, how many calls remain in the current window
//! and the Unix timestamp at which the window resets. The barrier only reads that report; it is
//! produced by whoever issues the remote call, either directly or by parsing the conventional
//! `X-RateLimit-*` response headers with [`QuotaInfo::from_headers`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Remaining quota after a completed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaInfo {
    /// Maximum calls per window. Informational.
    pub limit: u64,
    /// Calls left in the current window.
    pub remaining: u64,
    /// Unix timestamp (seconds) at which the window resets.
    pub reset_at: i64,
}

/// Errors from reading quota headers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotaParseError {
    #[error("missing quota header '{0}'")]
    MissingHeader(&'static str),
    #[error("invalid value for quota header '{header}': {value:?}")]
    InvalidValue { header: &'static str, value: String },
}

impl QuotaInfo {
    pub fn new(limit: u64, remaining: u64, reset_at: i64) -> Self {
        Self { limit, remaining, reset_at }
    }

    /// True once the window has no calls left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Build quota info from `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
    /// `X-RateLimit-Reset` headers. Header names match case-insensitively; values may carry
    /// surrounding whitespace.
    ///
    /// ```rust
    /// use quotagate::QuotaInfo;
    ///
    /// let headers = [
    ///     ("X-RateLimit-Limit", "60"),
    ///     ("X-RateLimit-Remaining", "0"),
    ///     ("X-RateLimit-Reset", "1700000000"),
    /// ];
    /// let quota = QuotaInfo::from_headers(headers).unwrap();
    /// assert!(quota.is_exhausted());
    /// assert_eq!(quota.reset_at, 1_700_000_000);
    /// ```
    pub fn from_headers<I, K, V>(headers: I) -> Result<Self, QuotaParseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut limit: Option<u64> = None;
        let mut remaining: Option<u64> = None;
        let mut reset_at: Option<i64> = None;

        for (name, value) in headers {
            let name = name.as_ref();
            let value = value.as_ref();
            if name.eq_ignore_ascii_case(LIMIT_HEADER) {
                limit = Some(parse_header(LIMIT_HEADER, value)?);
            } else if name.eq_ignore_ascii_case(REMAINING_HEADER) {
                remaining = Some(parse_header(REMAINING_HEADER, value)?);
            } else if name.eq_ignore_ascii_case(RESET_HEADER) {
                reset_at = Some(parse_header(RESET_HEADER, value)?);
            }
        }

        Ok(Self {
            limit: limit.ok_or(QuotaParseError::MissingHeader(LIMIT_HEADER))?,
            remaining: remaining.ok_or(QuotaParseError::MissingHeader(REMAINING_HEADER))?,
            reset_at: reset_at.ok_or(QuotaParseError::MissingHeader(RESET_HEADER))?,
        })
    }
}

fn parse_header<T>(header: &'static str, value: &str) -> Result<T, QuotaParseError>
where
    T: std::str::FromStr,
{
    value
        .trim()
        .parse()
        .map_err(|_| QuotaParseError::InvalidValue { header, value: value.to_string() })
}

/// Anything a guarded operation can return: it must say how much quota is left.
pub trait QuotaReport {
    fn quota(&self) -> QuotaInfo;
}

impl QuotaReport for QuotaInfo {
    fn quota(&self) -> QuotaInfo {
        *self
    }
}

impl<T> QuotaReport for (T, QuotaInfo) {
    fn quota(&self) -> QuotaInfo {
        self.1
    }
}

/// How a reset instant turns into a cooldown.
///
/// A reset instant can already be in the past by the time the response is processed (clock
/// skew between client and server, slow processing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetDelay {
    /// Wait `|reset_at - now|`. A past reset yields a delay of the same magnitude, so a very
    /// stale `reset_at` produces a long spurious cooldown.
    #[default]
    Magnitude,
    /// Wait `max(reset_at - now, 0)`. A past reset reopens the barrier immediately.
    ClampToZero,
}

impl ResetDelay {
    /// Cooldown until `reset_at` (Unix seconds) as seen from `now_unix_millis`.
    pub fn delay(&self, reset_at: i64, now_unix_millis: i64) -> Duration {
        let diff = reset_at.saturating_mul(1_000).saturating_sub(now_unix_millis);
        match self {
            ResetDelay::Magnitude => Duration::from_millis(diff.unsigned_abs()),
            ResetDelay::ClampToZero => Duration::from_millis(u64::try_from(diff).unwrap_or(0)),
        }
    }
}
