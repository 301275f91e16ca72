#![forbid(unsafe_code)]

//! Vertical stacking of sections.
//!
//! Sections are placed top to bottom in document order. A pinned section
//! holds its place on screen for the length of its range, so the document
//! grows by that length (the pin spacing) below it. The total scrollable
//! extent is the document height minus one viewport height, floored at 0.

use crate::registry::PinnedRange;
use crate::trigger::{ElementGeometry, TriggerSpec};
use crate::value::{Value, Viewport};

/// Where one section ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub geometry: ElementGeometry,
    pub range: PinnedRange,
    pub pin_spacing: f64,
}

/// Result of stacking a page's sections for one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct StackLayout {
    viewport: Viewport,
    placements: Vec<Placement>,
    document_height: f64,
}

impl StackLayout {
    /// Stack sections given as `(height, trigger)` in document order.
    /// Heights resolve against the viewport; negative or non-finite
    /// heights count as 0.
    #[must_use]
    pub fn compute<'a, I>(viewport: Viewport, sections: I) -> Self
    where
        I: IntoIterator<Item = (Value, &'a TriggerSpec)>,
    {
        let mut top = 0.0;
        let placements = sections
            .into_iter()
            .map(|(height, trigger)| {
                let height = height.to_px(viewport);
                let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
                let geometry = ElementGeometry::new(top, height);
                let pin_spacing = trigger.pin_spacing(geometry, viewport);
                top += height + pin_spacing;
                Placement {
                    geometry,
                    range: trigger.resolve(geometry, viewport),
                    pin_spacing,
                }
            })
            .collect();

        Self {
            viewport,
            placements,
            document_height: top,
        }
    }

    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    #[must_use]
    pub fn total_scrollable_extent(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }
}
