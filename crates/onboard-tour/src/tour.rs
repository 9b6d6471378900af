#![forbid(unsafe_code)]

//! The tour state machine.
//!
//! A [`Tour`] owns its host and everything one run mutates. It is driven
//! entirely from outside:
//!
//! - [`Tour::tick`] runs the timers that are due on the host's clock
//! - [`Tour::notify_mutation`] reports that the document changed
//! - [`Tour::handle_action`] routes a popup button click
//! - [`Tour::begin`] routes a click on the external start control
//!
//! Delays are measured on the host's [`TourClock`]: every input first brings
//! the timer queue up to the clock, so a delay always counts from the input
//! that caused it, however long the host went without ticking.
//!
//! Deferred work (the auto-start delay and the per-step popup delay) carries
//! an epoch token and the run's cancellation token. A timer whose token is
//! stale or cancelled when it fires does nothing, so leaving the run never
//! needs to hunt down queued timers.
//!
//! # Example
//!
//! ```ignore
//! let mut tour = Tour::new(page, TourConfig::default());
//! tour.connect();
//! // ... once the page's clock reads 1300ms:
//! tour.tick();
//! for event in tour.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

use std::time::Duration;

use onboard_core::logging::TARGET_TOUR;
use onboard_core::style::DEFAULT_STYLESHEET;
use onboard_core::{PopupAction, PopupConfig, PopupId, Result, TourClock, TourError, TourHost};
use onboard_runtime::{
    CallbackKind, CancellationSource, CancellationToken, Epoch, EpochToken, Scheduler,
    trace_callback,
};

use crate::config::TourConfig;
use crate::geometry::GeometryResolver;
use crate::overlay::OverlayPresenter;
use crate::popup::PopupLifecycle;
use crate::registry::StepRegistry;
use crate::state::{
    ActionOutcome, StartReason, TourAdvanceReason, TourEvent, TourPhase, TourState,
};
use crate::template::{self, TemplateLabels};

/// Deferred work queued on the tour's scheduler.
#[derive(Debug)]
enum TourTimer {
    AutoStart {
        epoch: EpochToken,
        lifetime: CancellationToken,
    },
    ShowPopup {
        step: usize,
        epoch: EpochToken,
        lifetime: CancellationToken,
        content: String,
    },
}

/// A guided tour bound to one host page.
#[derive(Debug)]
pub struct Tour<H: TourHost> {
    host: H,
    config: TourConfig,
    labels: TemplateLabels,
    registry: StepRegistry,
    resolver: GeometryResolver,
    state: TourState,
    overlay: OverlayPresenter,
    timers: Scheduler<TourTimer>,
    epoch: Epoch,
    lifetime: CancellationSource,
    connected: bool,
    start_control: bool,
    events: Vec<TourEvent>,
}

impl<H: TourHost> Tour<H> {
    /// Create an idle, unconnected tour.
    pub fn new(host: H, config: TourConfig) -> Self {
        for problem in config.validate() {
            tracing::warn!(target: TARGET_TOUR, problem = %problem, "questionable tour config");
        }
        Self {
            host,
            labels: config.labels(),
            resolver: GeometryResolver::new(config.target_padding),
            config,
            registry: StepRegistry::new(),
            state: TourState::default(),
            overlay: OverlayPresenter::new(),
            timers: Scheduler::new(),
            epoch: Epoch::new(),
            lifetime: CancellationSource::new(),
            connected: false,
            start_control: false,
            events: Vec::new(),
        }
    }

    /// Replace the popup library configuration.
    #[must_use]
    pub fn with_popup_config(mut self, config: PopupConfig) -> Self {
        self.state.popups = PopupLifecycle::new(config);
        self
    }

    /// Attach to the page: install styles, discover steps, then either wait
    /// for the start control or schedule the delayed auto-start.
    pub fn connect(&mut self) {
        if self.connected {
            tracing::debug!(target: TARGET_TOUR, "connect ignored: already connected");
            return;
        }
        self.connected = true;
        self.sync_clock();
        self.host.install_styles(DEFAULT_STYLESHEET);
        self.registry.load(self.host.explanation_targets());
        self.state.total_steps = self.registry.count();
        self.start_control = self.host.has_start_control();
        tracing::info!(
            target: TARGET_TOUR,
            steps = self.state.total_steps,
            start_control = self.start_control,
            "tour connected"
        );

        if self.registry.is_empty() {
            tracing::info!(target: TARGET_TOUR, "no explanation steps; tour stays idle");
            return;
        }
        if self.start_control {
            tracing::debug!(target: TARGET_TOUR, "waiting for start control");
            return;
        }
        self.start();
    }

    /// Enter `Active(0)` and show step 0 after the configured timeout.
    /// Coordinates are resolved when step 0 is first shown, once the page has
    /// settled.
    ///
    /// Returns `false` (and does nothing) unless the tour is idle with at
    /// least one step. Pages with a start control only start through
    /// [`begin`](Self::begin).
    pub fn start(&mut self) -> bool {
        if self.start_control {
            tracing::debug!(target: TARGET_TOUR, "start ignored: page has a start control");
            return false;
        }
        if self.state.phase != TourPhase::Idle || self.registry.is_empty() {
            tracing::debug!(
                target: TARGET_TOUR,
                phase = self.state.phase.label(),
                steps = self.registry.count(),
                "start ignored"
            );
            return false;
        }
        self.sync_clock();
        self.activate(StartReason::Auto);
        let delay = self.config.timeout_duration();
        self.timers.schedule(
            delay,
            TourTimer::AutoStart {
                epoch: self.epoch.current(),
                lifetime: self.lifetime.token(),
            },
        );
        tracing::debug!(
            target: TARGET_TOUR,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "auto-start scheduled"
        );
        true
    }

    /// Start-control entry point: (re)start at step 0 immediately.
    ///
    /// Accepted from any phase; an active run is abandoned first. Returns
    /// `false` when there are no steps.
    pub fn begin(&mut self) -> bool {
        trace_callback(CallbackKind::StartControl, || {
            if self.registry.is_empty() {
                tracing::debug!(target: TARGET_TOUR, "begin ignored: no steps");
                return false;
            }
            if let TourPhase::Active(index) = self.state.phase {
                tracing::debug!(target: TARGET_TOUR, from = index, "restarting active tour");
            }
            self.sync_clock();
            self.activate(StartReason::StartControl);
            self.show(0);
            true
        })
    }

    /// Advance one step, or finish from the last step.
    pub fn next(&mut self) -> Result<TourPhase> {
        let TourPhase::Active(index) = self.state.phase else {
            return Err(self.stale(PopupAction::Next));
        };
        self.sync_clock();
        if index + 1 >= self.state.total_steps {
            return self.finish();
        }
        self.move_to(index, index + 1, TourAdvanceReason::ManualNext);
        Ok(self.state.phase)
    }

    /// Go back one step. No-op at step 0.
    pub fn previous(&mut self) -> Result<TourPhase> {
        let TourPhase::Active(index) = self.state.phase else {
            return Err(self.stale(PopupAction::Prev));
        };
        if index == 0 {
            tracing::trace!(target: TARGET_TOUR, "previous at first step");
            return Ok(self.state.phase);
        }
        self.sync_clock();
        self.move_to(index, index - 1, TourAdvanceReason::ManualPrev);
        Ok(self.state.phase)
    }

    /// Complete the tour from any active step.
    pub fn finish(&mut self) -> Result<TourPhase> {
        let TourPhase::Active(index) = self.state.phase else {
            return Err(self.stale(PopupAction::Done));
        };
        self.teardown(TourPhase::Finished);
        self.events.push(TourEvent::Finished { last_index: index });
        tracing::info!(target: TARGET_TOUR, last_index = index, "tour finished");
        Ok(self.state.phase)
    }

    /// Close the tour early. A second call is a logged no-op.
    pub fn dismiss(&mut self) -> Result<TourPhase> {
        let TourPhase::Active(index) = self.state.phase else {
            return Err(self.stale(PopupAction::Close));
        };
        self.teardown(TourPhase::Dismissed);
        self.events.push(TourEvent::Dismissed { index });
        tracing::info!(target: TARGET_TOUR, index, "tour dismissed");
        Ok(self.state.phase)
    }

    /// Alias for [`dismiss`](Self::dismiss).
    pub fn close(&mut self) -> Result<TourPhase> {
        self.dismiss()
    }

    /// Route a popup button click. Never fails: dropped clicks are logged
    /// and reported as [`ActionOutcome::Ignored`].
    pub fn handle_action(&mut self, popup: PopupId, action: PopupAction) -> ActionOutcome {
        trace_callback(CallbackKind::Click, || {
            if !self.state.popups.accepts(popup) {
                let phase = if self.state.phase.is_active() {
                    "popup not bound"
                } else {
                    self.state.phase.label()
                };
                let err = TourError::StaleEvent { action, phase };
                tracing::debug!(target: TARGET_TOUR, popup = popup.0, error = %err, "click dropped");
                return ActionOutcome::Ignored(err);
            }
            let result = match action {
                PopupAction::Prev => self.previous(),
                PopupAction::Next => self.next(),
                PopupAction::Done => self.finish(),
                PopupAction::Close => self.dismiss(),
            };
            match result {
                Ok(phase) => ActionOutcome::Applied(phase),
                Err(err) => ActionOutcome::Ignored(err),
            }
        })
    }

    /// Report a document mutation. Binds the current popup's actions once
    /// its root node is present.
    pub fn notify_mutation(&mut self) {
        trace_callback(CallbackKind::Mutation, || self.poll_binding());
    }

    /// Run every timer due on the host's clock, including follow-up timers
    /// that come due before it.
    pub fn tick(&mut self) {
        let now = self.host.clock().now_mono();
        while let Some(fired) = self.timers.pop_due_until(now) {
            match fired.payload {
                TourTimer::AutoStart { epoch, lifetime } => {
                    trace_callback(CallbackKind::AutoStart, || {
                        self.on_auto_start(epoch, &lifetime);
                    });
                }
                TourTimer::ShowPopup {
                    step,
                    epoch,
                    lifetime,
                    content,
                } => {
                    trace_callback(CallbackKind::PopupTimer, || {
                        self.on_popup_timer(step, epoch, lifetime, &content);
                    });
                }
            }
        }
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<TourEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn phase(&self) -> TourPhase {
        self.state.phase
    }

    #[must_use]
    pub fn state(&self) -> &TourState {
        &self.state
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayPresenter {
        &self.overlay
    }

    #[must_use]
    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn has_start_control(&self) -> bool {
        self.start_control
    }

    /// Deadline of the earliest queued timer, on the host's clock.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    fn activate(&mut self, reason: StartReason) {
        self.lifetime.cancel();
        self.lifetime = CancellationSource::new();
        self.epoch.advance();
        self.state.popups.dispose(&mut self.host);
        self.state.coordinates.clear();
        self.state.phase = TourPhase::Active(0);
        self.events.push(TourEvent::Started {
            total_steps: self.state.total_steps,
            reason,
        });
        tracing::info!(
            target: TARGET_TOUR,
            steps = self.state.total_steps,
            reason = ?reason,
            "tour started"
        );
    }

    /// Measure every step's target against the current layout.
    fn resolve_coordinates(&mut self) {
        self.state.coordinates = self.resolver.resolve_all(&self.host, &self.registry);
        tracing::debug!(
            target: TARGET_TOUR,
            steps = self.state.total_steps,
            resolved = self.state.coordinates.resolved_count(),
            "coordinates resolved"
        );
    }

    /// Bring the timer queue up to the host's clock before scheduling.
    fn sync_clock(&mut self) {
        let now = self.host.clock().now_mono();
        self.timers.advance_to(now);
    }

    fn move_to(&mut self, from: usize, to: usize, reason: TourAdvanceReason) {
        self.state.phase = TourPhase::Active(to);
        self.events.push(TourEvent::StepChanged { from, to, reason });
        tracing::debug!(target: TARGET_TOUR, from, to, reason = ?reason, "step changed");
        self.show(to);
    }

    /// Dispose the popup, move the overlay and queue popup creation. The
    /// first display of a run measures every target.
    fn show(&mut self, index: usize) {
        let epoch = self.epoch.advance();
        self.state.popups.dispose(&mut self.host);
        if self.state.coordinates.is_empty() {
            self.resolve_coordinates();
        }

        let content = match self.registry.at(index) {
            Ok(step) => template::render(
                index + 1,
                self.state.total_steps,
                step.content(),
                &self.labels,
            ),
            Err(err) => {
                self.overlay.reset(&mut self.host);
                tracing::error!(target: TARGET_TOUR, error = %err, "display out of range; overlay hidden");
                return;
            }
        };
        let Some(coord) = self.state.coordinates.get(index).copied() else {
            self.overlay.reset(&mut self.host);
            tracing::warn!(target: TARGET_TOUR, step = index, "no coordinate for step; overlay hidden");
            return;
        };

        self.overlay.apply(&mut self.host, &coord);
        let delay = self.config.popup_delay_duration();
        self.timers.schedule(
            delay,
            TourTimer::ShowPopup {
                step: index,
                epoch,
                lifetime: self.lifetime.token(),
                content,
            },
        );
    }

    fn teardown(&mut self, phase: TourPhase) {
        self.lifetime.cancel();
        self.epoch.advance();
        self.state.popups.dispose(&mut self.host);
        self.overlay.reset(&mut self.host);
        self.state.coordinates.clear();
        self.state.phase = phase;
    }

    fn timer_is_live(&self, epoch: EpochToken, lifetime: &CancellationToken) -> bool {
        !lifetime.is_cancelled() && self.epoch.is_current(epoch)
    }

    fn on_auto_start(&mut self, epoch: EpochToken, lifetime: &CancellationToken) {
        if !self.timer_is_live(epoch, lifetime) || self.state.phase != TourPhase::Active(0) {
            tracing::debug!(
                target: TARGET_TOUR,
                phase = self.state.phase.label(),
                "stale auto-start ignored"
            );
            return;
        }
        self.show(0);
    }

    fn on_popup_timer(
        &mut self,
        step: usize,
        epoch: EpochToken,
        lifetime: CancellationToken,
        content: &str,
    ) {
        if !self.timer_is_live(epoch, &lifetime) || self.state.phase != TourPhase::Active(step) {
            tracing::debug!(
                target: TARGET_TOUR,
                step,
                phase = self.state.phase.label(),
                "stale popup timer ignored"
            );
            return;
        }
        let popup = self
            .state
            .popups
            .instantiate(&mut self.host, step, content, lifetime);
        self.host.scroll_into_view();
        self.events.push(TourEvent::StepShown { index: step, popup });
        // The library may have inserted the root synchronously.
        self.poll_binding();
    }

    fn poll_binding(&mut self) {
        self.state.popups.poll_binding(&self.host);
    }

    fn stale(&self, action: PopupAction) -> TourError {
        let err = TourError::StaleEvent {
            action,
            phase: self.state.phase.label(),
        };
        tracing::debug!(target: TARGET_TOUR, error = %err, "navigation ignored");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::{
        ClientRect, ElementId, LayoutSource, OverlaySurface, PageRect, PopupLibrary,
        ScrollOffset, StepDescriptor, TargetDiscovery, TourClock,
    };
    use pretty_assertions::assert_eq;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, Default)]
    struct TestClock {
        now: Duration,
    }

    impl TourClock for TestClock {
        fn now_mono(&self) -> Duration {
            self.now
        }
    }

    /// Minimal page: popups are inserted synchronously unless `defer_insert`.
    #[derive(Debug, Default)]
    struct FakeHost {
        clock: TestClock,
        boxes: HashMap<ElementId, ClientRect>,
        steps: Vec<StepDescriptor>,
        start_control: bool,
        overlay_rect: PageRect,
        overlay_active: bool,
        scrolls: usize,
        popups: BTreeMap<PopupId, (String, bool)>,
        next_popup: u64,
        defer_insert: bool,
        styles: Vec<String>,
    }

    impl FakeHost {
        fn with_steps(targets: &[&str]) -> Self {
            let mut host = Self::default();
            for (i, target) in targets.iter().enumerate() {
                host.boxes.insert(
                    ElementId::new(*target),
                    ClientRect::new(100.0 * i as f64, 10.0, 50.0, 20.0),
                );
                host.steps
                    .push(StepDescriptor::new(*target, format!("explain {target}")));
            }
            host
        }

        fn insert_all(&mut self) {
            for (_, inserted) in self.popups.values_mut() {
                *inserted = true;
            }
        }
    }

    impl LayoutSource for FakeHost {
        fn bounding_box(&self, element: &ElementId) -> Option<ClientRect> {
            self.boxes.get(element).copied()
        }
        fn scroll_offset(&self) -> ScrollOffset {
            ScrollOffset::default()
        }
    }

    impl TargetDiscovery for FakeHost {
        fn explanation_targets(&self) -> Vec<StepDescriptor> {
            self.steps.clone()
        }
        fn has_start_control(&self) -> bool {
            self.start_control
        }
    }

    impl OverlaySurface for FakeHost {
        fn set_geometry(&mut self, rect: PageRect) {
            self.overlay_rect = rect;
        }
        fn set_active(&mut self, active: bool) {
            self.overlay_active = active;
        }
        fn scroll_into_view(&mut self) {
            self.scrolls += 1;
        }
    }

    impl PopupLibrary for FakeHost {
        fn create(&mut self, _config: &PopupConfig, content: &str) -> PopupId {
            self.next_popup += 1;
            let id = PopupId(self.next_popup);
            self.popups.insert(id, (content.to_string(), false));
            id
        }
        fn show(&mut self, popup: PopupId) {
            if !self.defer_insert {
                if let Some((_, inserted)) = self.popups.get_mut(&popup) {
                    *inserted = true;
                }
            }
        }
        fn dispose(&mut self, popup: PopupId) {
            self.popups.remove(&popup);
        }
        fn root_in_document(&self, popup: PopupId) -> bool {
            self.popups.get(&popup).is_some_and(|(_, inserted)| *inserted)
        }
    }

    impl TourHost for FakeHost {
        type Clock = TestClock;

        fn clock(&self) -> &TestClock {
            &self.clock
        }

        fn install_styles(&mut self, css: &str) {
            self.styles.push(css.to_string());
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// Move the host clock to `now` and run due timers.
    fn tick_at(tour: &mut Tour<FakeHost>, now: Duration) {
        tour.host_mut().clock.now = now;
        tour.tick();
    }

    fn connected(targets: &[&str]) -> Tour<FakeHost> {
        let mut tour = Tour::new(FakeHost::with_steps(targets), TourConfig::default());
        tour.connect();
        tour
    }

    fn live_popup(tour: &Tour<FakeHost>) -> PopupId {
        tour.state().active_popup().expect("popup").id
    }

    #[test]
    fn connect_installs_styles_and_schedules_auto_start() {
        let tour = connected(&["a", "b"]);
        assert_eq!(tour.host().styles.len(), 1);
        assert_eq!(tour.phase(), TourPhase::Active(0));
        assert_eq!(tour.next_deadline(), Some(ms(1000)));
        assert!(!tour.host().overlay_active);
    }

    #[test]
    fn auto_start_then_popup_after_delay() {
        let mut tour = connected(&["a", "b"]);
        tick_at(&mut tour, ms(1000));
        assert!(tour.host().overlay_active);
        assert!(tour.host().popups.is_empty());
        tick_at(&mut tour, ms(1299));
        assert!(tour.host().popups.is_empty());
        tick_at(&mut tour, ms(1300));
        assert_eq!(tour.host().popups.len(), 1);
        assert_eq!(tour.host().scrolls, 1);
    }

    #[test]
    fn zero_steps_is_noop() {
        let mut tour = connected(&[]);
        assert_eq!(tour.phase(), TourPhase::Idle);
        assert!(!tour.start());
        tick_at(&mut tour, ms(10_000));
        assert!(!tour.host().overlay_active);
        assert_eq!(tour.pending_timers(), 0);
    }

    #[test]
    fn start_control_waits_for_begin() {
        let mut host = FakeHost::with_steps(&["a"]);
        host.start_control = true;
        let mut tour = Tour::new(host, TourConfig::default());
        tour.connect();
        assert_eq!(tour.phase(), TourPhase::Idle);
        assert_eq!(tour.pending_timers(), 0);

        assert!(tour.begin());
        assert!(tour.host().overlay_active);
        tick_at(&mut tour, ms(300));
        assert_eq!(tour.host().popups.len(), 1);
    }

    #[test]
    fn next_on_last_step_finishes() {
        let mut tour = connected(&["a", "b"]);
        tick_at(&mut tour, ms(1300));
        assert_eq!(tour.next(), Ok(TourPhase::Active(1)));
        assert_eq!(tour.next(), Ok(TourPhase::Finished));
        assert!(!tour.host().overlay_active);
        assert_eq!(tour.host().overlay_rect, PageRect::ZERO);
        assert!(tour.host().popups.is_empty());
        assert!(tour.state().coordinates().is_empty());
    }

    #[test]
    fn next_after_finish_is_stale() {
        let mut tour = connected(&["a"]);
        tick_at(&mut tour, ms(1300));
        tour.next().expect("finish");
        assert!(matches!(
            tour.next(),
            Err(TourError::StaleEvent { phase: "finished", .. })
        ));
        assert!(!tour.host().overlay_active);
    }

    #[test]
    fn previous_at_zero_is_noop() {
        let mut tour = connected(&["a", "b"]);
        tick_at(&mut tour, ms(1300));
        let popup = live_popup(&tour);
        assert_eq!(tour.previous(), Ok(TourPhase::Active(0)));
        assert_eq!(live_popup(&tour), popup);
        assert_eq!(tour.pending_timers(), 0);
    }

    #[test]
    fn clicks_wait_for_binding() {
        let mut host = FakeHost::with_steps(&["a", "b"]);
        host.defer_insert = true;
        let mut tour = Tour::new(host, TourConfig::default());
        tour.connect();
        tick_at(&mut tour, ms(1300));
        let popup = live_popup(&tour);

        let outcome = tour.handle_action(popup, PopupAction::Next);
        assert!(matches!(
            outcome,
            ActionOutcome::Ignored(TourError::StaleEvent { phase: "popup not bound", .. })
        ));

        tour.host_mut().insert_all();
        tour.notify_mutation();
        assert_eq!(
            tour.handle_action(popup, PopupAction::Next),
            ActionOutcome::Applied(TourPhase::Active(1))
        );
    }

    #[test]
    fn dismiss_twice_same_effect() {
        let mut tour = connected(&["a", "b"]);
        tick_at(&mut tour, ms(1300));
        assert_eq!(tour.dismiss(), Ok(TourPhase::Dismissed));
        assert!(tour.dismiss().is_err());
        assert_eq!(tour.phase(), TourPhase::Dismissed);
        assert!(!tour.host().overlay_active);
        assert!(tour.host().popups.is_empty());
    }

    #[test]
    fn dismiss_during_auto_start_delay_drops_timer() {
        let mut tour = connected(&["a"]);
        tour.dismiss().expect("dismiss");
        tick_at(&mut tour, ms(5000));
        assert!(!tour.host().overlay_active);
        assert!(tour.host().popups.is_empty());
    }

    #[test]
    fn rapid_next_creates_only_latest_popup() {
        let mut tour = connected(&["a", "b", "c"]);
        tick_at(&mut tour, ms(1300));
        tour.next().expect("next");
        tour.next().expect("next");
        tick_at(&mut tour, ms(2000));
        assert_eq!(tour.host().popups.len(), 1);
        assert_eq!(tour.state().active_popup().map(|p| p.step), Some(2));
    }

    #[test]
    fn missing_target_hides_overlay_for_that_step() {
        let mut host = FakeHost::with_steps(&["a", "b"]);
        host.boxes.remove(&ElementId::new("b"));
        let mut tour = Tour::new(host, TourConfig::default());
        tour.connect();
        tick_at(&mut tour, ms(1300));
        assert!(tour.host().overlay_active);
        assert_eq!(tour.state().coordinates().resolved_count(), 1);

        tour.next().expect("next");
        assert!(!tour.host().overlay_active);
        tick_at(&mut tour, ms(2000));
        assert!(tour.host().popups.is_empty());
    }

    #[test]
    fn popup_content_matches_template() {
        let mut tour = connected(&["a", "b"]);
        tick_at(&mut tour, ms(1300));
        let popup = live_popup(&tour);
        let expected = template::render(1, 2, "explain a", &TemplateLabels::default());
        assert_eq!(tour.host().popups.get(&popup).map(|(c, _)| c.as_str()), Some(expected.as_str()));
    }

    #[test]
    fn events_trace_the_run() {
        let mut tour = connected(&["a", "b"]);
        tick_at(&mut tour, ms(1300));
        let first = live_popup(&tour);
        tour.handle_action(first, PopupAction::Next);
        tick_at(&mut tour, ms(1600));
        let second = live_popup(&tour);
        tour.handle_action(second, PopupAction::Done);

        let events = tour.drain_events();
        assert_eq!(
            events,
            vec![
                TourEvent::Started { total_steps: 2, reason: StartReason::Auto },
                TourEvent::StepShown { index: 0, popup: first },
                TourEvent::StepChanged { from: 0, to: 1, reason: TourAdvanceReason::ManualNext },
                TourEvent::StepShown { index: 1, popup: second },
                TourEvent::Finished { last_index: 1 },
            ]
        );
        assert!(tour.drain_events().is_empty());
    }

    #[test]
    fn begin_restarts_after_finish() {
        let mut tour = connected(&["a"]);
        tick_at(&mut tour, ms(1300));
        tour.finish().expect("finish");
        assert!(tour.begin());
        assert_eq!(tour.phase(), TourPhase::Active(0));
        tick_at(&mut tour, ms(1600));
        assert_eq!(tour.host().popups.len(), 1);
    }

    #[test]
    fn connect_twice_is_ignored() {
        let mut tour = connected(&["a"]);
        tour.connect();
        assert_eq!(tour.host().styles.len(), 1);
        assert_eq!(tour.pending_timers(), 1);
    }

    #[test]
    fn begin_delay_counts_from_the_click() {
        let mut host = FakeHost::with_steps(&["a"]);
        host.start_control = true;
        let mut tour = Tour::new(host, TourConfig::default());
        tour.connect();

        // The host has not ticked since connect.
        tour.host_mut().clock.now = ms(5000);
        assert!(tour.begin());
        assert_eq!(tour.next_deadline(), Some(ms(5300)));
        tick_at(&mut tour, ms(5001));
        assert!(tour.host().popups.is_empty());
        tick_at(&mut tour, ms(5300));
        assert_eq!(tour.host().popups.len(), 1);
    }

    #[test]
    fn next_after_idle_pause_waits_full_delay() {
        let mut tour = connected(&["a", "b"]);
        tick_at(&mut tour, ms(1300));
        tour.host_mut().clock.now = ms(21_300);
        tour.next().expect("next");
        assert_eq!(tour.next_deadline(), Some(ms(21_600)));
        tick_at(&mut tour, ms(21_301));
        assert!(tour.host().popups.is_empty());
        tick_at(&mut tour, ms(21_600));
        assert_eq!(tour.state().active_popup().map(|p| p.step), Some(1));
    }

    #[test]
    fn coordinates_resolve_when_auto_start_fires() {
        let mut tour = connected(&["a", "b"]);
        assert!(tour.state().coordinates().is_empty());

        // Layout shifts during the auto-start delay.
        tour.host_mut()
            .boxes
            .insert(ElementId::new("a"), ClientRect::new(40.0, 60.0, 10.0, 10.0));
        tick_at(&mut tour, ms(1000));
        assert_eq!(tour.state().coordinates().resolved_count(), 2);
        assert_eq!(tour.host().overlay_rect, PageRect::new(35.0, 55.0, 20.0, 20.0));
    }

    #[test]
    fn start_refused_when_page_has_start_control() {
        let mut host = FakeHost::with_steps(&["a"]);
        host.start_control = true;
        let mut tour = Tour::new(host, TourConfig::default());
        tour.connect();
        assert!(!tour.start());
        assert_eq!(tour.phase(), TourPhase::Idle);
        assert_eq!(tour.pending_timers(), 0);
    }

    #[test]
    fn next_during_auto_start_delay_still_measures() {
        let mut tour = connected(&["a", "b"]);
        assert_eq!(tour.next(), Ok(TourPhase::Active(1)));
        assert_eq!(tour.state().coordinates().resolved_count(), 2);
        assert!(tour.host().overlay_active);
        tick_at(&mut tour, ms(300));
        assert_eq!(tour.state().active_popup().map(|p| p.step), Some(1));
        // The superseded auto-start finds a newer epoch and does nothing.
        tick_at(&mut tour, ms(1300));
        assert_eq!(tour.phase(), TourPhase::Active(1));
        assert_eq!(tour.host().popups.len(), 1);
    }
}
