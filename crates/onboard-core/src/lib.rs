#![forbid(unsafe_code)]

//! Core: page geometry, the step model, popup configuration and host traits.
//!
//! # Role in onboard
//! `onboard-core` is the vocabulary layer. It defines what a step is, how a
//! highlighted region is measured, and the narrow traits through which the
//! tour engine reaches the page (layout, overlay, popup library, discovery).
//!
//! # How it fits in the system
//! `onboard-tour` drives the state machine against a [`host::TourHost`];
//! `onboard-runtime` supplies timers and watches; `onboard-web` implements
//! the host traits deterministically for tests and embedding.

pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod popup;
pub mod step;
pub mod style;

pub use error::{Result, TourError};
pub use geometry::{ClientRect, PageRect, ScrollOffset, Sides};
pub use host::{
    LayoutSource, OverlaySurface, PopupLibrary, TargetDiscovery, TourClock, TourHost,
};
pub use popup::{
    AllowList, POPUP_CLASS, Placement, PopupAction, PopupConfig, PopupContainer, PopupId,
    PopupTrigger,
};
pub use step::{Coordinate, ElementId, Step, StepDescriptor};
