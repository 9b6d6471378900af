#![forbid(unsafe_code)]

//! `onboard-web` runs tours against an in-memory page.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedder reports clicks, scrolls and DOM
//!   mutations explicitly.
//! - **Deterministic time**: the host advances a monotonic clock; timers
//!   fire only inside [`PageRunner::advance`].
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. [`HeadlessPage`] implements
//! every host trait the tour needs and records what a real document would
//! show, which is what the scenario tests assert against.

pub mod page;
pub mod runner;

use core::time::Duration;

use onboard_core::PopupAction;
use onboard_runtime::TourClock;

pub use page::{HeadlessPage, InsertionMode, OverlayNode, PopupNode};
pub use runner::PageRunner;

/// Errors from simulated user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// No popup is currently in the document.
    NoVisiblePopup,
    /// The visible popup has no button for this action.
    ActionNotRendered(PopupAction),
    /// The page has no start control.
    NoStartControl,
}

impl core::fmt::Display for PageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoVisiblePopup => f.write_str("no popup in the document"),
            Self::ActionNotRendered(action) => {
                write!(f, "visible popup has no `{}` button", action.class_name())
            }
            Self::NoStartControl => f.write_str("page has no start control"),
        }
    }
}

impl std::error::Error for PageError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl TourClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}
