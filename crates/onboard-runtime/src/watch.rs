#![forbid(unsafe_code)]

//! One-shot "wait until a predicate holds, then continue" primitive.
//!
//! Models a mutation observer that disconnects itself after its first
//! match. The host reports that the document changed; the owner calls
//! [`OneShotWatch::poll`] with a predicate; the first time it returns `true`
//! the armed context is handed back and the watch disarms.
//!
//! # Invariants
//!
//! 1. A watch fires at most once per [`arm`](OneShotWatch::arm).
//! 2. Re-arming replaces (and drops) any previous context.
//! 3. A cancelled token disarms the watch on the next poll without firing.

use onboard_core::logging::TARGET_RUNTIME;

use crate::cancellation::CancellationToken;

/// Outcome of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchPoll<C> {
    /// Nothing armed.
    Idle,
    /// Armed, predicate still false.
    Pending,
    /// Predicate held; the watch is now disarmed.
    Fired(C),
    /// The token was cancelled; the watch is now disarmed.
    Cancelled,
}

#[derive(Debug)]
struct Armed<C> {
    context: C,
    token: CancellationToken,
}

/// A watch that fires at most once per arming.
#[derive(Debug)]
pub struct OneShotWatch<C> {
    armed: Option<Armed<C>>,
}

impl<C> Default for OneShotWatch<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> OneShotWatch<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self { armed: None }
    }

    /// Start watching on behalf of `context`.
    pub fn arm(&mut self, context: C, token: CancellationToken) {
        if self.armed.is_some() {
            tracing::debug!(target: TARGET_RUNTIME, "watch re-armed before firing");
        }
        self.armed = Some(Armed { context, token });
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Stop watching without firing. Returns the dropped context, if any.
    pub fn disarm(&mut self) -> Option<C> {
        self.armed.take().map(|armed| armed.context)
    }

    /// Evaluate `predicate` against the armed context.
    pub fn poll(&mut self, predicate: impl FnOnce(&C) -> bool) -> WatchPoll<C> {
        let Some(armed) = self.armed.as_ref() else {
            return WatchPoll::Idle;
        };
        if armed.token.is_cancelled() {
            self.armed = None;
            tracing::trace!(target: TARGET_RUNTIME, "watch cancelled");
            return WatchPoll::Cancelled;
        }
        if !predicate(&armed.context) {
            return WatchPoll::Pending;
        }
        match self.armed.take() {
            Some(armed) => {
                tracing::trace!(target: TARGET_RUNTIME, "watch fired");
                WatchPoll::Fired(armed.context)
            }
            None => WatchPoll::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::CancellationSource;

    #[test]
    fn idle_until_armed() {
        let mut watch: OneShotWatch<u32> = OneShotWatch::new();
        assert_eq!(watch.poll(|_| true), WatchPoll::Idle);
    }

    #[test]
    fn fires_once_then_idle() {
        let mut watch = OneShotWatch::new();
        watch.arm(7u32, CancellationSource::new().token());
        assert_eq!(watch.poll(|_| false), WatchPoll::Pending);
        assert_eq!(watch.poll(|c| *c == 7), WatchPoll::Fired(7));
        assert_eq!(watch.poll(|_| true), WatchPoll::Idle);
    }

    #[test]
    fn cancelled_token_disarms_without_firing() {
        let source = CancellationSource::new();
        let mut watch = OneShotWatch::new();
        watch.arm("popup", source.token());
        source.cancel();
        assert_eq!(watch.poll(|_| true), WatchPoll::Cancelled);
        assert!(!watch.is_armed());
    }

    #[test]
    fn rearm_replaces_context() {
        let mut watch = OneShotWatch::new();
        watch.arm(1u8, CancellationSource::new().token());
        watch.arm(2u8, CancellationSource::new().token());
        assert_eq!(watch.poll(|_| true), WatchPoll::Fired(2));
    }

    #[test]
    fn disarm_returns_context() {
        let mut watch = OneShotWatch::new();
        watch.arm("x", CancellationSource::new().token());
        assert_eq!(watch.disarm(), Some("x"));
        assert!(!watch.is_armed());
    }
}
