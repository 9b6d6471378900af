#![forbid(unsafe_code)]

//! In-memory page implementing [`TourHost`].
//!
//! Elements are named rectangles in viewport space. The overlay and popups
//! are recorded nodes. Popup roots enter the document either inside
//! [`PopupLibrary::show`] or later, when the host calls
//! [`HeadlessPage::flush_mutations`], depending on [`InsertionMode`].

use std::collections::{BTreeMap, VecDeque};

use onboard_core::logging::TARGET_POPUP;
use onboard_core::style::{ACTIVE_CLASS, OVERLAY_CLASS};
use onboard_core::{
    ClientRect, ElementId, LayoutSource, OverlaySurface, PageRect, PopupAction, PopupConfig,
    PopupId, PopupLibrary, ScrollOffset, StepDescriptor, TargetDiscovery, TourHost,
};

use crate::DeterministicClock;

/// When a shown popup's root node lands in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertionMode {
    /// Inside `show`.
    Synchronous,
    /// On the next [`HeadlessPage::flush_mutations`].
    #[default]
    Deferred,
}

/// The highlight overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayNode {
    pub rect: PageRect,
    pub active: bool,
    /// Times the overlay was scrolled into view.
    pub scrolled_into_view: usize,
}

impl OverlayNode {
    /// Class attribute as a document would render it.
    #[must_use]
    pub fn class_list(&self) -> String {
        if self.active {
            format!("{OVERLAY_CLASS} {ACTIVE_CLASS}")
        } else {
            OVERLAY_CLASS.to_string()
        }
    }
}

/// A popup instance created through the page's popup library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupNode {
    pub content: String,
    pub custom_class: String,
    pub shown: bool,
    /// Root node present in the document.
    pub inserted: bool,
}

impl PopupNode {
    /// Actions bound to the rendered markup, in document order: every
    /// `class` attribute that resolves through
    /// [`PopupAction::from_class_list`].
    #[must_use]
    pub fn actions(&self) -> Vec<PopupAction> {
        const ATTR: &str = "class=\"";
        let mut found = Vec::new();
        let mut rest = self.content.as_str();
        while let Some(start) = rest.find(ATTR) {
            rest = &rest[start + ATTR.len()..];
            let Some(end) = rest.find('"') else { break };
            if let Some(action) = PopupAction::from_class_list(&rest[..end]) {
                found.push(action);
            }
            rest = &rest[end + 1..];
        }
        found
    }

    /// Whether the rendered markup carries the button for `action`.
    #[must_use]
    pub fn has_action(&self, action: PopupAction) -> bool {
        self.actions().contains(&action)
    }

    /// Text of the popup's `<h1>` line.
    #[must_use]
    pub fn heading(&self) -> Option<&str> {
        let start = self.content.find("<h1>")? + "<h1>".len();
        let len = self.content[start..].find("</h1>")?;
        Some(&self.content[start..start + len])
    }
}

/// Deterministic page for driving tours without a browser.
#[derive(Debug, Default)]
pub struct HeadlessPage {
    elements: BTreeMap<ElementId, ClientRect>,
    explanations: Vec<StepDescriptor>,
    start_control: bool,
    scroll: ScrollOffset,
    overlay: OverlayNode,
    popups: BTreeMap<PopupId, PopupNode>,
    pending_insertions: VecDeque<PopupId>,
    insertion: InsertionMode,
    next_popup: u64,
    max_live_popups: usize,
    created_total: u64,
    disposed_total: u64,
    stylesheets: Vec<String>,
    clock: DeterministicClock,
}

impl HeadlessPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layout element.
    #[must_use]
    pub fn with_element(mut self, id: impl Into<ElementId>, rect: ClientRect) -> Self {
        self.elements.insert(id.into(), rect);
        self
    }

    /// Add an explanation describing `target`. Order of calls is step order.
    #[must_use]
    pub fn with_explanation(
        mut self,
        target: impl Into<ElementId>,
        content: impl Into<String>,
    ) -> Self {
        self.explanations.push(StepDescriptor::new(target, content));
        self
    }

    #[must_use]
    pub fn with_start_control(mut self) -> Self {
        self.start_control = true;
        self
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll: ScrollOffset) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn with_insertion(mut self, mode: InsertionMode) -> Self {
        self.insertion = mode;
        self
    }

    /// Mutably access the clock.
    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    pub fn set_scroll(&mut self, scroll: ScrollOffset) {
        self.scroll = scroll;
    }

    pub fn set_element_rect(&mut self, id: impl Into<ElementId>, rect: ClientRect) {
        self.elements.insert(id.into(), rect);
    }

    pub fn remove_element(&mut self, id: &ElementId) -> Option<ClientRect> {
        self.elements.remove(id)
    }

    /// Insert every popup root still waiting. Returns how many were
    /// inserted; a non-zero result is a document mutation.
    pub fn flush_mutations(&mut self) -> usize {
        let mut inserted = 0;
        while let Some(id) = self.pending_insertions.pop_front() {
            if let Some(node) = self.popups.get_mut(&id) {
                node.inserted = true;
                inserted += 1;
            }
        }
        inserted
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayNode {
        &self.overlay
    }

    #[must_use]
    pub fn has_start_control(&self) -> bool {
        self.start_control
    }

    /// Popup instances not yet disposed.
    #[must_use]
    pub fn live_popups(&self) -> usize {
        self.popups.len()
    }

    /// Highest number of simultaneously live popups ever observed.
    #[must_use]
    pub fn max_live_popups(&self) -> usize {
        self.max_live_popups
    }

    #[must_use]
    pub fn created_total(&self) -> u64 {
        self.created_total
    }

    #[must_use]
    pub fn disposed_total(&self) -> u64 {
        self.disposed_total
    }

    /// The popup whose root is in the document, if any.
    #[must_use]
    pub fn visible_popup(&self) -> Option<(PopupId, &PopupNode)> {
        self.popups
            .iter()
            .find(|(_, node)| node.inserted)
            .map(|(id, node)| (*id, node))
    }

    #[must_use]
    pub fn popup(&self, id: PopupId) -> Option<&PopupNode> {
        self.popups.get(&id)
    }

    #[must_use]
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }
}

impl LayoutSource for HeadlessPage {
    fn bounding_box(&self, element: &ElementId) -> Option<ClientRect> {
        self.elements.get(element).copied()
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }
}

impl TargetDiscovery for HeadlessPage {
    fn explanation_targets(&self) -> Vec<StepDescriptor> {
        self.explanations.clone()
    }

    fn has_start_control(&self) -> bool {
        self.start_control
    }
}

impl OverlaySurface for HeadlessPage {
    fn set_geometry(&mut self, rect: PageRect) {
        self.overlay.rect = rect;
    }

    fn set_active(&mut self, active: bool) {
        self.overlay.active = active;
    }

    fn scroll_into_view(&mut self) {
        self.overlay.scrolled_into_view += 1;
    }
}

impl PopupLibrary for HeadlessPage {
    fn create(&mut self, config: &PopupConfig, content: &str) -> PopupId {
        self.next_popup += 1;
        let id = PopupId(self.next_popup);
        self.popups.insert(
            id,
            PopupNode {
                content: content.to_string(),
                custom_class: config.custom_class.clone(),
                shown: false,
                inserted: false,
            },
        );
        self.created_total += 1;
        self.max_live_popups = self.max_live_popups.max(self.popups.len());
        tracing::trace!(target: TARGET_POPUP, popup = id.0, live = self.popups.len(), "page popup created");
        id
    }

    fn show(&mut self, popup: PopupId) {
        let Some(node) = self.popups.get_mut(&popup) else {
            return;
        };
        node.shown = true;
        match self.insertion {
            InsertionMode::Synchronous => node.inserted = true,
            InsertionMode::Deferred => self.pending_insertions.push_back(popup),
        }
    }

    fn dispose(&mut self, popup: PopupId) {
        if self.popups.remove(&popup).is_some() {
            self.disposed_total += 1;
        }
        self.pending_insertions.retain(|id| *id != popup);
    }

    fn root_in_document(&self, popup: PopupId) -> bool {
        self.popups.get(&popup).is_some_and(|node| node.inserted)
    }
}

impl TourHost for HeadlessPage {
    type Clock = DeterministicClock;

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn install_styles(&mut self, css: &str) {
        self.stylesheets.push(css.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::TourClock;

    #[test]
    fn deferred_insertion_waits_for_flush() {
        let mut page = HeadlessPage::new();
        let id = page.create(&PopupConfig::default(), "<h1>Step 1 of 1</h1>");
        page.show(id);
        assert!(!page.root_in_document(id));
        assert_eq!(page.flush_mutations(), 1);
        assert!(page.root_in_document(id));
        assert_eq!(page.flush_mutations(), 0);
    }

    #[test]
    fn synchronous_insertion_in_show() {
        let mut page = HeadlessPage::new().with_insertion(InsertionMode::Synchronous);
        let id = page.create(&PopupConfig::default(), "");
        page.show(id);
        assert!(page.root_in_document(id));
    }

    #[test]
    fn dispose_cancels_pending_insertion() {
        let mut page = HeadlessPage::new();
        let id = page.create(&PopupConfig::default(), "");
        page.show(id);
        page.dispose(id);
        assert_eq!(page.flush_mutations(), 0);
        assert_eq!(page.live_popups(), 0);
        page.dispose(id);
        assert_eq!(page.disposed_total(), 1);
    }

    #[test]
    fn popup_carries_custom_class() {
        let mut page = HeadlessPage::new();
        let id = page.create(&PopupConfig::default(), "");
        assert_eq!(page.popup(id).map(|n| n.custom_class.as_str()), Some("onboard-popover"));
    }

    #[test]
    fn overlay_class_list_tracks_active() {
        let mut page = HeadlessPage::new();
        assert_eq!(page.overlay().class_list(), "onboardOverlay");
        page.set_active(true);
        assert_eq!(page.overlay().class_list(), "onboardOverlay active");
    }

    #[test]
    fn heading_extracts_h1() {
        let node = PopupNode {
            content: "<div><h1>Step 2 of 3</h1></div>".into(),
            custom_class: String::new(),
            shown: true,
            inserted: true,
        };
        assert_eq!(node.heading(), Some("Step 2 of 3"));
    }

    #[test]
    fn actions_follow_button_classes() {
        let node = PopupNode {
            content: concat!(
                r#"<button class="btn-close onboard-close"></button>"#,
                r#"<p class="lead">onboard-next is mentioned in prose</p>"#,
                r#"<button class="btn btn-secondary onboard-prev">Prev</button>"#,
                r#"<button class="btn btn-primary onboard-finish">Done!</button>"#,
            )
            .into(),
            custom_class: String::new(),
            shown: true,
            inserted: true,
        };
        assert_eq!(
            node.actions(),
            vec![PopupAction::Close, PopupAction::Prev, PopupAction::Done]
        );
        assert!(!node.has_action(PopupAction::Next));
    }

    #[test]
    fn clock_is_host_owned() {
        let mut page = HeadlessPage::new();
        page.clock_mut().advance(core::time::Duration::from_millis(40));
        assert_eq!(page.clock().now_mono(), core::time::Duration::from_millis(40));
    }
}
