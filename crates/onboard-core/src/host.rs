#![forbid(unsafe_code)]

//! Host traits: the boundary between the tour engine and the page it runs in.
//!
//! The engine never touches a document directly. A host supplies layout
//! reads, the overlay element, the popup library, target discovery and the
//! clock; `onboard-web` ships a deterministic in-memory implementation.

use core::time::Duration;

use crate::geometry::{ClientRect, PageRect, ScrollOffset};
use crate::popup::{PopupConfig, PopupId};
use crate::step::{ElementId, StepDescriptor};

/// Layout queries against the live document.
///
/// Both reads happen at call time; implementations must not cache.
pub trait LayoutSource {
    /// Viewport-relative bounding box of `element`, or `None` if the document
    /// has no such element.
    fn bounding_box(&self, element: &ElementId) -> Option<ClientRect>;

    /// Current document scroll offsets.
    fn scroll_offset(&self) -> ScrollOffset;
}

/// Discovery of the tour's explanation elements from markup.
pub trait TargetDiscovery {
    /// Explanation elements in document order, each paired with the element
    /// it describes.
    fn explanation_targets(&self) -> Vec<StepDescriptor>;

    /// Whether an external start control is present. When it is, the host
    /// forwards its clicks to `Tour::begin` and auto-start is skipped.
    fn has_start_control(&self) -> bool;
}

/// The single highlight overlay element.
pub trait OverlaySurface {
    fn set_geometry(&mut self, rect: PageRect);

    /// Toggle the "active" presentation state.
    fn set_active(&mut self, active: bool);

    fn scroll_into_view(&mut self);
}

/// The popup/tooltip rendering library.
///
/// Popups are anchored to the overlay element. Insertion of the popup's root
/// node may happen after [`show`](Self::show) returns; the host reports
/// document mutations to the tour, which then polls
/// [`root_in_document`](Self::root_in_document).
pub trait PopupLibrary {
    fn create(&mut self, config: &PopupConfig, content: &str) -> PopupId;

    fn show(&mut self, popup: PopupId);

    /// Destroy the instance and remove its node. Disposing an unknown or
    /// already disposed handle is a no-op.
    fn dispose(&mut self, popup: PopupId);

    fn root_in_document(&self, popup: PopupId) -> bool;
}

/// Monotonic clock.
///
/// Native hosts use `onboard_runtime::SystemClock`; deterministic hosts
/// advance time by hand.
pub trait TourClock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Everything a tour needs from its page.
pub trait TourHost: LayoutSource + TargetDiscovery + OverlaySurface + PopupLibrary {
    /// Clock implementation.
    type Clock: TourClock;

    /// The page's monotonic clock. Delays are measured against it.
    fn clock(&self) -> &Self::Clock;

    /// Install the tour stylesheet. Called once on connect.
    fn install_styles(&mut self, _css: &str) {}
}
