#![forbid(unsafe_code)]

//! Generation counter for guarding deferred callbacks.
//!
//! A callback captures the [`EpochToken`] current when it was scheduled.
//! Any later [`Epoch::advance`] makes that token stale, so the callback can
//! check [`Epoch::is_current`] and drop itself instead of acting on state
//! that has moved on.

/// Monotonic generation counter.
#[derive(Debug, Clone, Default)]
pub struct Epoch {
    generation: u64,
}

/// Snapshot of an [`Epoch`] at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpochToken(u64);

impl EpochToken {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

impl Epoch {
    #[must_use]
    pub const fn new() -> Self {
        Self { generation: 0 }
    }

    /// Token for the current generation.
    #[must_use]
    pub fn current(&self) -> EpochToken {
        EpochToken(self.generation)
    }

    /// Start a new generation, invalidating every outstanding token.
    pub fn advance(&mut self) -> EpochToken {
        self.generation = self.generation.wrapping_add(1);
        self.current()
    }

    #[must_use]
    pub fn is_current(&self, token: EpochToken) -> bool {
        token.0 == self.generation
    }
}
