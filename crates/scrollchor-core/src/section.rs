#![forbid(unsafe_code)]

//! A choreographed page section: trigger geometry plus its phase timeline.
//!
//! A section is laid out once per viewport (see [`Section::layout`]), which
//! fixes its scroll range. While scrolling, [`Section::update`] converts the
//! global scroll offset into local progress and evaluates the timeline.
//! Frames are emitted only when progress changes, so a section far above or
//! below the viewport produces one boundary frame (progress 0 or 1) and then
//! stays quiet.

use tracing::warn;

use crate::phase::Phase;
use crate::registry::{PinnedRange, TriggerId};
use crate::timeline::{Frame, PhaseTimeline};
use crate::trigger::{ElementGeometry, TriggerSpec};
use crate::value::Viewport;

/// Output of one section for one scroll position.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFrame {
    pub section: TriggerId,
    pub progress: f64,
    pub phase: Phase,
    pub frame: Frame,
}

#[derive(Debug, Clone)]
pub struct Section {
    id: TriggerId,
    trigger: TriggerSpec,
    timeline: PhaseTimeline,
    range: Option<PinnedRange>,
    last_progress: Option<f64>,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<TriggerId>, trigger: TriggerSpec, timeline: PhaseTimeline) -> Self {
        Self {
            id: id.into(),
            trigger,
            timeline,
            range: None,
            last_progress: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &TriggerId {
        &self.id
    }

    #[must_use]
    pub fn trigger(&self) -> &TriggerSpec {
        &self.trigger
    }

    #[must_use]
    pub fn timeline(&self) -> &PhaseTimeline {
        &self.timeline
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.trigger.pin
    }

    /// Scroll range from the last layout, if any.
    #[must_use]
    pub fn range(&self) -> Option<PinnedRange> {
        self.range
    }

    /// Resolve the trigger against measured geometry. Forgets the last
    /// emitted progress so the next update always produces a frame.
    pub fn layout(&mut self, geometry: ElementGeometry, viewport: Viewport) -> PinnedRange {
        let range = self.trigger.resolve(geometry, viewport);
        self.range = Some(range);
        self.last_progress = None;
        range
    }

    /// Local progress at a global scroll offset; `None` before layout.
    #[must_use]
    pub fn progress(&self, scroll_px: f64) -> Option<f64> {
        self.range.map(|range| range.progress(scroll_px))
    }

    /// Evaluate at a global scroll offset, if progress moved since the last
    /// emitted frame.
    pub fn update(&mut self, scroll_px: f64) -> Option<SectionFrame> {
        if !scroll_px.is_finite() {
            warn!(section = %self.id, scroll_px, "ignoring non-finite scroll offset");
            return None;
        }
        let progress = self.progress(scroll_px)?;
        if self.last_progress == Some(progress) {
            return None;
        }
        self.last_progress = Some(progress);
        Some(self.frame_at(progress))
    }

    /// Evaluate at an explicit local progress without touching update state.
    #[must_use]
    pub fn frame_at(&self, progress: f64) -> SectionFrame {
        SectionFrame {
            section: self.id.clone(),
            progress,
            phase: Phase::at(progress),
            frame: self.timeline.evaluate(progress),
        }
    }

    /// Values the section shows before it is scrolled into (leave-back).
    #[must_use]
    pub fn rest_frame(&self) -> Frame {
        self.timeline.rest_frame()
    }
}
