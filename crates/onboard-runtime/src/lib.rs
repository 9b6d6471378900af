#![forbid(unsafe_code)]

//! onboard runtime: the cooperative scheduling pieces behind a tour.
//!
//! # Key Components
//!
//! - [`Scheduler`] - host-advanced timer queue replacing `setTimeout`
//! - [`Epoch`] - generation counter guarding deferred callbacks
//! - [`CancellationSource`] - tour-lifetime teardown signal
//! - [`OneShotWatch`] - fire-once predicate watch modelling a mutation observer
//! - [`TourClock`] - monotonic time source
//!
//! Everything here is single-threaded and host-driven: nothing sleeps,
//! spawns or fires on its own.

pub mod cancellation;
pub mod clock;
pub mod effect;
pub mod epoch;
pub mod scheduler;
pub mod watch;

pub use cancellation::{CancellationSource, CancellationToken};
pub use clock::{SystemClock, TourClock};
pub use effect::{CallbackKind, trace_callback};
pub use epoch::{Epoch, EpochToken};
pub use scheduler::{Fired, Scheduler};
pub use watch::{OneShotWatch, WatchPoll};
