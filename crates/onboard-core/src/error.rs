#![forbid(unsafe_code)]

//! Tour error taxonomy.
//!
//! None of these reach the end user. Callers log them as diagnostics and
//! carry on: a missing target skips one step, an out-of-range index is a
//! caller bug, a stale event is dropped.

use std::fmt;

use crate::popup::PopupAction;
use crate::step::ElementId;

/// Errors produced by the tour engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourError {
    /// A step names an element the document does not contain.
    TargetNotFound { step: usize, target: ElementId },
    /// A step index outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
    /// A navigation request arrived while the tour could not act on it.
    StaleEvent {
        action: PopupAction,
        phase: &'static str,
    },
}

impl fmt::Display for TourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound { step, target } => {
                write!(f, "target element `{target}` for step {step} not found")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "step index {index} out of range for {len} steps")
            }
            Self::StaleEvent { action, phase } => {
                write!(f, "ignored stale {} action while {phase}", action.as_str())
            }
        }
    }
}

impl std::error::Error for TourError {}

/// Result alias for tour operations.
pub type Result<T> = std::result::Result<T, TourError>;
