#![forbid(unsafe_code)]

//! Tour phase, state and emitted events.

use onboard_core::{PopupId, TourError};

use crate::geometry::ResolvedCoordinates;
use crate::popup::{ActivePopup, PopupLifecycle};

/// Where the tour is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourPhase {
    /// Not started.
    #[default]
    Idle,
    /// Showing the step at this index.
    Active(usize),
    /// Completed through the last step.
    Finished,
    /// Closed early by the user.
    Dismissed,
}

impl TourPhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active(_) => "active",
            Self::Finished => "finished",
            Self::Dismissed => "dismissed",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourAdvanceReason {
    ManualNext,
    ManualPrev,
}

/// How a tour run began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartReason {
    /// Delayed auto-start (no start control on the page).
    Auto,
    /// The external start control was clicked.
    StartControl,
}

/// Notifications queued for the host, drained with `Tour::drain_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourEvent {
    Started {
        total_steps: usize,
        reason: StartReason,
    },
    /// A popup for `index` was created and shown.
    StepShown { index: usize, popup: PopupId },
    StepChanged {
        from: usize,
        to: usize,
        reason: TourAdvanceReason,
    },
    Finished { last_index: usize },
    Dismissed { index: usize },
}

/// Result of routing a popup button click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action ran; the tour is now in this phase.
    Applied(TourPhase),
    /// The action was dropped. Already logged.
    Ignored(TourError),
}

/// Everything one tour run mutates: phase, resolved coordinates and the
/// live popup. Owned by a single `Tour`; nothing here is shared.
#[derive(Debug, Default)]
pub struct TourState {
    pub(crate) phase: TourPhase,
    pub(crate) total_steps: usize,
    pub(crate) coordinates: ResolvedCoordinates,
    pub(crate) popups: PopupLifecycle,
}

impl TourState {
    #[must_use]
    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Navigation position: the active index, or `total_steps` once
    /// finished. Idle and dismissed read 0.
    #[must_use]
    pub fn current_index(&self) -> usize {
        match self.phase {
            TourPhase::Active(index) => index,
            TourPhase::Finished => self.total_steps,
            TourPhase::Idle | TourPhase::Dismissed => 0,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> &ResolvedCoordinates {
        &self.coordinates
    }

    #[must_use]
    pub fn active_popup(&self) -> Option<ActivePopup> {
        self.popups.active()
    }

    #[must_use]
    pub fn popups(&self) -> &PopupLifecycle {
        &self.popups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_labels() {
        assert_eq!(TourPhase::Idle.label(), "idle");
        assert_eq!(TourPhase::Active(3).label(), "active");
        assert!(TourPhase::Active(0).is_active());
        assert!(!TourPhase::Finished.is_active());
    }

    #[test]
    fn current_index_by_phase() {
        let mut state = TourState {
            total_steps: 4,
            ..TourState::default()
        };
        assert_eq!(state.current_index(), 0);
        state.phase = TourPhase::Active(2);
        assert_eq!(state.current_index(), 2);
        state.phase = TourPhase::Finished;
        assert_eq!(state.current_index(), 4);
    }
}
