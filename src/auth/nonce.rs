//! Nonce generation for CEX.IO API authentication.
//!
//! Every signed request carries a nonce that must be greater than the one used
//! by the previous request; the exchange rejects replays.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for providing nonces for authenticated requests.
pub trait NonceProvider: Send + Sync {
    /// Generate the next nonce value.
    ///
    /// This value must be greater than any previously returned value.
    fn next_nonce(&self) -> u64;
}

/// A nonce provider based on wall-clock milliseconds.
///
/// Two requests in the same millisecond get `last + 1`, so the sequence stays
/// strictly increasing. A clock that jumps backwards is absorbed the same way.
pub struct MillisecondNonce {
    last_nonce: AtomicU64,
}

impl MillisecondNonce {
    /// Create a new millisecond nonce provider.
    pub fn new() -> Self {
        Self {
            last_nonce: AtomicU64::new(0),
        }
    }

    fn current_time_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    /// Issue a nonce for a clock reading of `now_millis`.
    fn issue_at(&self, now_millis: u64) -> u64 {
        loop {
            let last = self.last_nonce.load(Ordering::SeqCst);
            let next = now_millis.max(last + 1);

            if self
                .last_nonce
                .compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return next;
            }
        }
    }
}

impl Default for MillisecondNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceProvider for MillisecondNonce {
    fn next_nonce(&self) -> u64 {
        self.issue_at(Self::current_time_millis())
    }
}
