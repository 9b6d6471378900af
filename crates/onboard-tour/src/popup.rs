#![forbid(unsafe_code)]

//! Popup lifecycle.
//!
//! At most one popup is alive at a time. Creating a popup first disposes the
//! previous one; after showing, a one-shot watch waits for the popup's root
//! node to land in the document and only then are its buttons accepted.
//!
//! # Invariants
//!
//! 1. `create` is never called while a previous handle is still held.
//! 2. Actions are accepted only from the current, bound popup.
//! 3. Disposal is idempotent.

use onboard_core::logging::TARGET_POPUP;
use onboard_core::{PopupConfig, PopupId, PopupLibrary};
use onboard_runtime::{CancellationToken, OneShotWatch, WatchPoll};

/// The live popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePopup {
    pub id: PopupId,
    /// Step the popup was created for.
    pub step: usize,
    /// Whether its action buttons are wired.
    pub bound: bool,
}

/// Owns the single live popup handle.
#[derive(Debug)]
pub struct PopupLifecycle {
    config: PopupConfig,
    active: Option<ActivePopup>,
    watch: OneShotWatch<PopupId>,
    created_total: u64,
    disposed_total: u64,
}

impl Default for PopupLifecycle {
    fn default() -> Self {
        Self::new(PopupConfig::default())
    }
}

impl PopupLifecycle {
    #[must_use]
    pub fn new(config: PopupConfig) -> Self {
        Self {
            config,
            active: None,
            watch: OneShotWatch::new(),
            created_total: 0,
            disposed_total: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    #[must_use]
    pub fn active(&self) -> Option<ActivePopup> {
        self.active
    }

    #[must_use]
    pub fn created_total(&self) -> u64 {
        self.created_total
    }

    #[must_use]
    pub fn disposed_total(&self) -> u64 {
        self.disposed_total
    }

    /// Whether the binding watch is still waiting for the root node.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watch.is_armed()
    }

    /// Dispose the current popup, if any, and stop watching for it.
    pub fn dispose<P: PopupLibrary + ?Sized>(&mut self, library: &mut P) -> Option<PopupId> {
        self.watch.disarm();
        let popup = self.active.take()?;
        library.dispose(popup.id);
        self.disposed_total += 1;
        tracing::debug!(target: TARGET_POPUP, popup = popup.id.0, step = popup.step, "popup disposed");
        Some(popup.id)
    }

    /// Create and show a popup for `step`, then arm the binding watch.
    pub fn instantiate<P: PopupLibrary + ?Sized>(
        &mut self,
        library: &mut P,
        step: usize,
        content: &str,
        lifetime: CancellationToken,
    ) -> PopupId {
        self.dispose(library);
        let id = library.create(&self.config, content);
        library.show(id);
        self.created_total += 1;
        self.active = Some(ActivePopup {
            id,
            step,
            bound: false,
        });
        self.watch.arm(id, lifetime);
        tracing::debug!(target: TARGET_POPUP, popup = id.0, step, "popup shown");
        id
    }

    /// Check whether the watched popup's root is now in the document. Returns
    /// the popup that became bound on this call.
    pub fn poll_binding<P: PopupLibrary + ?Sized>(&mut self, library: &P) -> Option<PopupId> {
        match self.watch.poll(|id| library.root_in_document(*id)) {
            WatchPoll::Fired(id) => {
                let popup = self.active.as_mut().filter(|p| p.id == id)?;
                popup.bound = true;
                tracing::debug!(target: TARGET_POPUP, popup = id.0, step = popup.step, "popup actions bound");
                Some(id)
            }
            WatchPoll::Idle | WatchPoll::Pending | WatchPoll::Cancelled => None,
        }
    }

    /// Whether an action from `popup` should be acted on.
    #[must_use]
    pub fn accepts(&self, popup: PopupId) -> bool {
        self.active.is_some_and(|p| p.id == popup && p.bound)
    }
}
