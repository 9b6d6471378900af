#![forbid(unsafe_code)]

//! onboard public facade crate.
//!
//! Re-exports the tour engine, its host traits and (with the default `web`
//! feature) the headless page, plus a prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use onboard_core::{
    AllowList, ClientRect, Coordinate, ElementId, LayoutSource, OverlaySurface, PageRect,
    Placement, PopupAction, PopupConfig, PopupContainer, PopupId, PopupLibrary, PopupTrigger,
    ScrollOffset, Sides, Step, StepDescriptor, TargetDiscovery, TourClock, TourError, TourHost,
};
pub use onboard_core::style::DEFAULT_STYLESHEET;
pub use onboard_runtime::SystemClock;

#[cfg(feature = "tracing-json")]
pub use onboard_core::logging::init_json_subscriber;

// --- Tour re-exports -------------------------------------------------------

pub use onboard_tour::{
    ActionOutcome, StartReason, TemplateLabels, Tour, TourAdvanceReason, TourConfig,
    TourConfigError, TourEvent, TourPhase, TourState, render,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use onboard_web::{DeterministicClock, HeadlessPage, InsertionMode, PageError, PageRunner};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for onboard embedders.
#[derive(Debug)]
pub enum Error {
    /// A tour operation was rejected.
    Tour(TourError),
    /// Configuration failed to load or validate.
    Config(TourConfigError),
    /// Simulated input could not be delivered.
    #[cfg(feature = "web")]
    Page(PageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tour(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Page(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tour(err) => Some(err),
            Self::Config(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Page(err) => Some(err),
        }
    }
}

impl From<TourError> for Error {
    fn from(err: TourError) -> Self {
        Self::Tour(err)
    }
}

impl From<TourConfigError> for Error {
    fn from(err: TourConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "web")]
impl From<PageError> for Error {
    fn from(err: PageError) -> Self {
        Self::Page(err)
    }
}

/// Standard result type for onboard APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load a [`TourConfig`] from a `.toml` or `.json` file, chosen by
/// extension. Anything else is read as TOML.
#[cfg(feature = "tour-config")]
pub fn load_config(path: impl AsRef<std::path::Path>) -> Result<TourConfig> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        TourConfig::from_json_file(path)?
    } else {
        TourConfig::from_toml_file(path)?
    };
    Ok(config)
}

pub mod prelude {
    pub use crate::{
        ActionOutcome, ClientRect, Error, PopupAction, Result, StepDescriptor, Tour, TourConfig,
        TourEvent, TourHost, TourPhase,
    };

    #[cfg(feature = "web")]
    pub use crate::{HeadlessPage, PageRunner};

    pub use crate::{core, runtime, tour};

    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use onboard_core as core;
pub use onboard_runtime as runtime;
pub use onboard_tour as tour;
#[cfg(feature = "web")]
pub use onboard_web as web;
