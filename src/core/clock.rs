//! Time source and TTL policy.
//!
//! All instants are milliseconds since the Unix epoch. Expiry is computed once,
//! at enqueue time, and never recomputed.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::error::BrokerError;

/// TTL applied when a producer does not ask for one.
pub const DEFAULT_TTL_SECS: f64 = 60.0;

/// Source of "now" for the broker.
pub trait Clock: Send + Sync + Debug {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        current_timestamp()
    }
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A clock that only moves when told to. Used to drive TTL behaviour in tests
/// without sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Requested time-to-live, in (possibly fractional) seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ttl(f64);

impl Ttl {
    /// Accepts any finite, non-negative number of seconds.
    pub fn from_secs(secs: f64) -> Result<Self, BrokerError> {
        if secs.is_finite() && secs >= 0.0 {
            Ok(Self(secs))
        } else {
            Err(BrokerError::invalid(
                "ttl_seconds must be a non-negative number",
            ))
        }
    }

    pub fn secs(secs: u64) -> Self {
        Self(secs as f64)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// Millisecond resolution; float-to-int casts saturate for huge values.
    pub fn as_millis(self) -> u64 {
        (self.0 * 1000.0).round() as u64
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self(DEFAULT_TTL_SECS)
    }
}

/// Absolute expiry instant for a message created at `now_ms`.
#[inline]
pub fn expiry_for(now_ms: u64, ttl: Ttl) -> u64 {
    now_ms.saturating_add(ttl.as_millis())
}
