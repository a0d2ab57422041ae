//! Byte-progress bookkeeping for an in-flight upload.

use serde::{Deserialize, Serialize};

/// Monotonic `loaded`/`total` byte counters for one session.
///
/// Observations arrive from transport progress events, which may fire
/// many times per second and (on flaky transports) out of order.
/// `observe` clamps so that `0 <= loaded <= total` holds at every step
/// and `loaded` never decreases within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    loaded: u64,
    total: u64,
}

impl Progress {
    /// Record a transport progress observation.
    ///
    /// `total` only ever grows (a shrinking total is a transport
    /// artifact, not a real size change), and `loaded` is clamped into
    /// `[previous loaded, total]`.
    pub const fn observe(&mut self, loaded: u64, total: u64) {
        if total > self.total {
            self.total = total;
        }
        let capped = if loaded > self.total {
            self.total
        } else {
            loaded
        };
        if capped > self.loaded {
            self.loaded = capped;
        }
    }

    /// Bytes transmitted so far.
    #[must_use]
    pub const fn loaded(self) -> u64 {
        self.loaded
    }

    /// Total bytes to transmit, `0` while unknown.
    #[must_use]
    pub const fn total(self) -> u64 {
        self.total
    }

    /// Whole-number percentage for the progress bar, `0` while the
    /// total is unknown.
    #[must_use]
    pub const fn percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        // loaded <= total, so the quotient is at most 100.
        #[expect(clippy::cast_possible_truncation)]
        let percent = (self.loaded.saturating_mul(100) / self.total) as u8;
        percent
    }
}
