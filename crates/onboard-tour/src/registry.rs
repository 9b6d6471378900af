#![forbid(unsafe_code)]

//! Ordered step storage.

use onboard_core::logging::TARGET_TOUR;
use onboard_core::{Result, Step, StepDescriptor, TourError};

/// Steps in discovery order. Indices are dense and zero-based.
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    steps: Vec<Step>,
}

impl StepRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents with `descriptors`, indexed in order.
    pub fn load(&mut self, descriptors: impl IntoIterator<Item = StepDescriptor>) {
        self.steps = descriptors
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| Step::new(index, descriptor))
            .collect();
        tracing::debug!(target: TARGET_TOUR, count = self.steps.len(), "step registry loaded");
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    pub fn at(&self, index: usize) -> Result<&Step> {
        self.steps.get(index).ok_or(TourError::IndexOutOfRange {
            index,
            len: self.steps.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}
