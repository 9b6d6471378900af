#![forbid(unsafe_code)]

//! Tracing helpers for deferred callbacks.
//!
//! Timer expiries, watch hits and popup clicks all re-enter the tour from the
//! host's event loop. [`trace_callback`] wraps each re-entry in a
//! `tour.callback` span so log lines emitted inside carry the callback kind.

use web_time::Instant;

use onboard_core::logging::TARGET_RUNTIME;

/// Kinds of host re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    /// The initial auto-start delay elapsed.
    AutoStart,
    /// The per-step popup delay elapsed.
    PopupTimer,
    /// The document changed while a watch was armed.
    Mutation,
    /// A popup button was clicked.
    Click,
    /// The external start control was clicked.
    StartControl,
}

impl CallbackKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoStart => "auto_start",
            Self::PopupTimer => "popup_timer",
            Self::Mutation => "mutation",
            Self::Click => "click",
            Self::StartControl => "start_control",
        }
    }
}

/// Run `f` inside a `tour.callback` span.
pub fn trace_callback<F, R>(kind: CallbackKind, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let _span = tracing::debug_span!(
        target: TARGET_RUNTIME,
        "tour.callback",
        kind = kind.as_str(),
        duration_us = tracing::field::Empty,
    )
    .entered();

    let result = f();

    let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
    tracing::Span::current().record("duration_us", duration_us);
    tracing::trace!(
        target: TARGET_RUNTIME,
        kind = kind.as_str(),
        duration_us,
        "callback completed"
    );
    result
}
