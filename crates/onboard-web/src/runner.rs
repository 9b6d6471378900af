#![forbid(unsafe_code)]

//! Step-driven tour runner.
//!
//! [`PageRunner`] drives a [`Tour`] over a [`HeadlessPage`], advancing the
//! page's [`DeterministicClock`](crate::DeterministicClock). Each input (time
//! advance, click) is followed by a settle pass: due timers run, pending
//! popup roots are inserted, and the tour is told about the mutation.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use onboard_core::{ClientRect, PopupAction};
//! use onboard_tour::{TourConfig, TourPhase};
//! use onboard_web::{HeadlessPage, PageRunner};
//!
//! let page = HeadlessPage::new()
//!     .with_element("search", ClientRect::new(10.0, 10.0, 100.0, 20.0))
//!     .with_explanation("search", "Find things here.");
//! let mut runner = PageRunner::new(page, TourConfig::default());
//! runner.connect();
//! runner.advance(Duration::from_millis(1300));
//! assert!(runner.click(PopupAction::Done).is_ok());
//! assert_eq!(runner.tour().phase(), TourPhase::Finished);
//! ```

use core::time::Duration;

use onboard_core::{PopupAction, TourClock, TourHost};
use onboard_tour::{ActionOutcome, Tour, TourConfig, TourEvent};

use crate::PageError;
use crate::page::HeadlessPage;

/// Deterministic driver for a tour on a headless page.
#[derive(Debug)]
pub struct PageRunner {
    tour: Tour<HeadlessPage>,
}

impl PageRunner {
    #[must_use]
    pub fn new(page: HeadlessPage, config: TourConfig) -> Self {
        Self::from_tour(Tour::new(page, config))
    }

    #[must_use]
    pub fn from_tour(tour: Tour<HeadlessPage>) -> Self {
        Self { tour }
    }

    /// Connect the tour to the page.
    pub fn connect(&mut self) {
        self.tour.connect();
        self.settle();
    }

    /// Advance the clock by `dt` and settle.
    pub fn advance(&mut self, dt: Duration) {
        self.page_mut().clock_mut().advance(dt);
        self.settle();
    }

    /// Jump to each queued deadline in turn until no timers remain.
    pub fn run_timers(&mut self) {
        while let Some(deadline) = self.tour.next_deadline() {
            let now = deadline.max(self.now());
            self.page_mut().clock_mut().set(now);
            self.settle();
        }
    }

    /// Click `action` on the popup currently in the document.
    pub fn click(&mut self, action: PopupAction) -> Result<ActionOutcome, PageError> {
        let (popup, node) = self
            .tour
            .host()
            .visible_popup()
            .ok_or(PageError::NoVisiblePopup)?;
        if !node.has_action(action) {
            return Err(PageError::ActionNotRendered(action));
        }
        let outcome = self.tour.handle_action(popup, action);
        self.settle();
        Ok(outcome)
    }

    /// Click the page's start control.
    pub fn click_start_control(&mut self) -> Result<bool, PageError> {
        if !self.tour.host().has_start_control() {
            return Err(PageError::NoStartControl);
        }
        let started = self.tour.begin();
        self.settle();
        Ok(started)
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.page().clock().now_mono()
    }

    #[must_use]
    pub fn tour(&self) -> &Tour<HeadlessPage> {
        &self.tour
    }

    pub fn tour_mut(&mut self) -> &mut Tour<HeadlessPage> {
        &mut self.tour
    }

    #[must_use]
    pub fn page(&self) -> &HeadlessPage {
        self.tour.host()
    }

    pub fn page_mut(&mut self) -> &mut HeadlessPage {
        self.tour.host_mut()
    }

    pub fn drain_events(&mut self) -> Vec<TourEvent> {
        self.tour.drain_events()
    }

    /// Run due timers, then deliver any resulting document mutations.
    pub fn settle(&mut self) {
        self.tour.tick();
        if self.tour.host_mut().flush_mutations() > 0 {
            self.tour.notify_mutation();
        }
    }
}
