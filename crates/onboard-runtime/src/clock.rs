#![forbid(unsafe_code)]

//! Wall-clock [`TourClock`] for native and browser hosts.
//!
//! The tour reads time only through its host's clock; deterministic hosts
//! supply their own implementation.

use core::time::Duration;

pub use onboard_core::TourClock;

/// Clock backed by `web_time::Instant` (`performance.now()` on wasm).
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TourClock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}
