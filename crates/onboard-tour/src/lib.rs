#![forbid(unsafe_code)]

//! Guided-tour engine.
//!
//! # Role in onboard
//! `onboard-tour` sequences explanation steps over a page: it resolves each
//! step's highlight rectangle, moves the overlay, renders popup markup and
//! manages the one live popup. All page access goes through
//! [`onboard_core::TourHost`].
//!
//! # Key Components
//!
//! - [`Tour`] - the state machine (`Idle` → `Active(i)` → `Finished`/`Dismissed`)
//! - [`StepRegistry`] - ordered steps
//! - [`GeometryResolver`] - padded page rectangles per step
//! - [`OverlayPresenter`] - applies/resets the highlight overlay
//! - [`PopupLifecycle`] - create/dispose/bind for the single live popup
//! - [`template::render`] - popup markup
//! - [`TourConfig`] - timeouts and labels

pub mod config;
pub mod geometry;
pub mod overlay;
pub mod popup;
pub mod registry;
pub mod state;
pub mod template;
pub mod tour;

pub use config::{TourConfig, TourConfigError};
pub use geometry::{GeometryResolver, ResolvedCoordinates};
pub use overlay::OverlayPresenter;
pub use popup::{ActivePopup, PopupLifecycle};
pub use registry::StepRegistry;
pub use state::{
    ActionOutcome, StartReason, TourAdvanceReason, TourEvent, TourPhase, TourState,
};
pub use template::{TemplateLabels, render};
pub use tour::Tour;
