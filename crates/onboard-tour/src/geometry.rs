#![forbid(unsafe_code)]

//! Step coordinate resolution.
//!
//! A step's coordinate is its target's bounding box translated into page
//! space (adding the current scroll offsets) and expanded outward by a fixed
//! padding on every side. Layout is read at call time, never cached.

use onboard_core::logging::TARGET_GEOMETRY;
use onboard_core::{Coordinate, LayoutSource, Result, Sides, Step, TourError};

use crate::registry::StepRegistry;

/// Computes padded page rectangles for steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryResolver {
    padding: Sides,
}

impl Default for GeometryResolver {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TARGET_PADDING)
    }
}

impl GeometryResolver {
    /// Resolver with `padding` pixels on every side.
    #[must_use]
    pub fn new(padding: f64) -> Self {
        Self {
            padding: Sides::all(padding),
        }
    }

    #[must_use]
    pub fn padding(&self) -> Sides {
        self.padding
    }

    /// Resolve one step against the live layout.
    pub fn resolve<L: LayoutSource + ?Sized>(&self, layout: &L, step: &Step) -> Result<Coordinate> {
        let client = layout
            .bounding_box(step.target())
            .ok_or_else(|| TourError::TargetNotFound {
                step: step.index(),
                target: step.target().clone(),
            })?;
        let rect = client.to_page(layout.scroll_offset()).outset(self.padding);
        tracing::trace!(
            target: TARGET_GEOMETRY,
            step = step.index(),
            top = rect.top,
            left = rect.left,
            width = rect.width,
            height = rect.height,
            "coordinate resolved"
        );
        Ok(Coordinate::new(step.index(), rect))
    }

    /// Resolve every step. A step whose target is missing gets no
    /// coordinate; the failure is logged and the rest are still resolved.
    pub fn resolve_all<L: LayoutSource + ?Sized>(
        &self,
        layout: &L,
        registry: &StepRegistry,
    ) -> ResolvedCoordinates {
        let slots = registry
            .iter()
            .map(|step| match self.resolve(layout, step) {
                Ok(coord) => Some(coord),
                Err(err) => {
                    tracing::warn!(target: TARGET_GEOMETRY, error = %err, "step skipped");
                    None
                }
            })
            .collect();
        ResolvedCoordinates { slots }
    }
}

/// Per-step coordinates, indexed by step. Unresolved steps hold `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedCoordinates {
    slots: Vec<Option<Coordinate>>,
}

impl ResolvedCoordinates {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Coordinate> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of slots (equals the registry's step count at resolution).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::{ClientRect, ElementId, PageRect, ScrollOffset, StepDescriptor};
    use std::collections::HashMap;

    struct FixedLayout {
        boxes: HashMap<ElementId, ClientRect>,
        scroll: ScrollOffset,
    }

    impl LayoutSource for FixedLayout {
        fn bounding_box(&self, element: &ElementId) -> Option<ClientRect> {
            self.boxes.get(element).copied()
        }

        fn scroll_offset(&self) -> ScrollOffset {
            self.scroll
        }
    }

    fn layout(scroll: ScrollOffset) -> FixedLayout {
        let mut boxes = HashMap::new();
        boxes.insert(ElementId::new("A"), ClientRect::new(100.0, 50.0, 200.0, 40.0));
        boxes.insert(ElementId::new("B"), ClientRect::new(300.0, 50.0, 100.0, 20.0));
        FixedLayout { boxes, scroll }
    }

    #[test]
    fn pads_five_pixels_at_zero_scroll() {
        let step = Step::new(0, StepDescriptor::new("A", ""));
        let coord = GeometryResolver::default()
            .resolve(&layout(ScrollOffset::default()), &step)
            .expect("resolves");
        assert_eq!(coord.rect, PageRect::new(95.0, 45.0, 210.0, 50.0));
    }

    #[test]
    fn adds_scroll_offsets() {
        let step = Step::new(1, StepDescriptor::new("B", ""));
        let coord = GeometryResolver::default()
            .resolve(&layout(ScrollOffset::new(0.0, 1000.0)), &step)
            .expect("resolves");
        assert_eq!(coord.rect, PageRect::new(1295.0, 45.0, 110.0, 30.0));
        assert_eq!(coord.step, 1);
    }

    #[test]
    fn missing_target_is_target_not_found() {
        let step = Step::new(2, StepDescriptor::new("gone", ""));
        let err = GeometryResolver::default()
            .resolve(&layout(ScrollOffset::default()), &step)
            .expect_err("missing");
        assert_eq!(
            err,
            TourError::TargetNotFound {
                step: 2,
                target: ElementId::new("gone")
            }
        );
    }

    #[test]
    fn resolve_all_skips_missing() {
        let mut registry = StepRegistry::new();
        registry.load([
            StepDescriptor::new("A", ""),
            StepDescriptor::new("gone", ""),
            StepDescriptor::new("B", ""),
        ]);
        let coords =
            GeometryResolver::default().resolve_all(&layout(ScrollOffset::default()), &registry);
        assert_eq!(coords.len(), 3);
        assert_eq!(coords.resolved_count(), 2);
        assert!(coords.get(1).is_none());
        assert_eq!(coords.get(2).map(|c| c.step), Some(2));
    }

    #[test]
    fn custom_padding() {
        let step = Step::new(0, StepDescriptor::new("A", ""));
        let coord = GeometryResolver::new(0.0)
            .resolve(&layout(ScrollOffset::default()), &step)
            .expect("resolves");
        assert_eq!(coord.rect, PageRect::new(100.0, 50.0, 200.0, 40.0));
    }
}
