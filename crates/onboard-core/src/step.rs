#![forbid(unsafe_code)]

//! Step model: what a tour highlights and what it says about it.

use std::fmt;

use crate::geometry::PageRect;

/// Opaque reference to a page element, as named by an explanation's
/// `data-target-element` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Raw input for one step, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    /// Element the explanation describes.
    pub target: ElementId,
    /// Explanation markup (the explanation element's inner HTML).
    pub content: String,
}

impl StepDescriptor {
    #[must_use]
    pub fn new(target: impl Into<ElementId>, content: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            content: content.into(),
        }
    }
}

/// A registered step. Immutable once the registry is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    index: usize,
    target: ElementId,
    content: String,
}

impl Step {
    #[must_use]
    pub fn new(index: usize, descriptor: StepDescriptor) -> Self {
        Self {
            index,
            target: descriptor.target,
            content: descriptor.content,
        }
    }

    /// Zero-based navigation position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn target(&self) -> &ElementId {
        &self.target
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Padded page rectangle computed for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Index of the step this was resolved for.
    pub step: usize,
    pub rect: PageRect,
}

impl Coordinate {
    #[must_use]
    pub const fn new(step: usize, rect: PageRect) -> Self {
        Self { step, rect }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.rect.top
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.rect.left
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.rect.height
    }
}
