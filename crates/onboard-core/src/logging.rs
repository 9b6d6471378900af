#![forbid(unsafe_code)]

//! Logging targets and optional subscriber setup.
//!
//! The engine emits `tracing` events only; installing a subscriber is the
//! embedding application's call. With the `tracing-json` feature,
//! [`init_json_subscriber`] wires a JSON formatter filtered by `RUST_LOG`.

/// Tour transitions and stale-event drops.
pub const TARGET_TOUR: &str = "onboard.tour";
/// Popup creation, disposal and action binding.
pub const TARGET_POPUP: &str = "onboard.popup";
/// Overlay geometry changes.
pub const TARGET_OVERLAY: &str = "onboard.overlay";
/// Coordinate resolution.
pub const TARGET_GEOMETRY: &str = "onboard.geometry";
/// Timers and watches.
pub const TARGET_RUNTIME: &str = "onboard.runtime";

/// Install a global JSON subscriber honoring `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
