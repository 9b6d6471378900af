#![forbid(unsafe_code)]

//! The single highlight overlay.
//!
//! [`OverlayPresenter`] keeps a mirror of what it last wrote to the host's
//! overlay element so callers can inspect the presented state without
//! querying the page.

use onboard_core::logging::TARGET_OVERLAY;
use onboard_core::{Coordinate, OverlaySurface, PageRect};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayPresenter {
    active: bool,
    rect: PageRect,
}

impl OverlayPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Position the overlay over `coord` and activate it.
    pub fn apply<S: OverlaySurface + ?Sized>(&mut self, surface: &mut S, coord: &Coordinate) {
        surface.set_geometry(coord.rect);
        surface.set_active(true);
        self.rect = coord.rect;
        self.active = true;
        tracing::debug!(
            target: TARGET_OVERLAY,
            step = coord.step,
            top = coord.rect.top,
            left = coord.rect.left,
            width = coord.rect.width,
            height = coord.rect.height,
            "overlay applied"
        );
    }

    /// Deactivate the overlay and collapse it to a zero rectangle.
    pub fn reset<S: OverlaySurface + ?Sized>(&mut self, surface: &mut S) {
        surface.set_active(false);
        surface.set_geometry(PageRect::ZERO);
        let was_active = self.active;
        self.rect = PageRect::ZERO;
        self.active = false;
        tracing::debug!(target: TARGET_OVERLAY, was_active, "overlay reset");
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rectangle last written to the surface.
    #[must_use]
    pub fn rect(&self) -> PageRect {
        self.rect
    }
}
