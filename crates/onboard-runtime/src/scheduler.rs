#![forbid(unsafe_code)]

//! Host-driven timer queue.
//!
//! Replaces `setTimeout` with an explicit queue the host advances. Nothing
//! fires on its own: [`Scheduler::advance_to`] moves the clock and
//! [`Scheduler::pop_due`] hands back expired payloads one at a time, so a
//! callback that schedules a zero-delay follow-up sees it fire within the
//! same tick.
//!
//! # Invariants
//!
//! 1. Time never moves backwards; an earlier `now` is ignored.
//! 2. Due timers pop in `(deadline, scheduling order)` order.
//! 3. A timer scheduled while handling one popped by
//!    [`Scheduler::pop_due_until`] is relative to that timer's deadline.

use core::time::Duration;
use std::collections::BTreeMap;

use onboard_core::logging::TARGET_RUNTIME;

/// A timer that has expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub deadline: Duration,
    pub payload: T,
}

/// Monotonic timer queue keyed by deadline.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Last time observed by [`advance_to`](Self::advance_to).
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Earliest deadline in the queue.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Schedule `payload` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, payload: T) {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = self.now.saturating_add(delay);
        self.queue.insert((deadline, id), payload);
        tracing::trace!(
            target: TARGET_RUNTIME,
            timer_id = id,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            "timer scheduled"
        );
    }

    /// Move the clock forward. Earlier values are ignored.
    pub fn advance_to(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Pop the earliest timer whose deadline has passed.
    pub fn pop_due(&mut self) -> Option<Fired<T>> {
        let (&(deadline, seq), _) = self.queue.iter().next()?;
        if deadline > self.now {
            return None;
        }
        let payload = self.queue.remove(&(deadline, seq))?;
        tracing::trace!(
            target: TARGET_RUNTIME,
            timer_id = seq,
            deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            "timer fired"
        );
        Some(Fired {
            deadline,
            payload,
        })
    }

    /// Pop the earliest timer due by `until`, first moving the clock to that
    /// timer's deadline, so anything scheduled while handling it is relative
    /// to when it fired. When nothing more is due the clock moves to `until`.
    pub fn pop_due_until(&mut self, until: Duration) -> Option<Fired<T>> {
        match self.next_deadline() {
            Some(deadline) if deadline <= until => {
                self.advance_to(deadline);
                self.pop_due()
            }
            _ => {
                self.advance_to(until);
                None
            }
        }
    }
}
