#![forbid(unsafe_code)]

//! Declarative page definitions.
//!
//! A [`PageDefinition`] is plain data (JSON through serde) describing the
//! sections of a page, their triggers and their tweens. [`PageDefinition::build`]
//! validates it and produces a [`Page`] of ready-to-mount [`Section`]s.
//!
//! ```json
//! {
//!   "sections": [
//!     {
//!       "id": "about",
//!       "trigger": { "start": "top top", "end": "+=130%", "pin": true },
//!       "tweens": [
//!         { "targets": ["portrait"], "at": 0.0,
//!           "from": { "x": "-60vw", "opacity": 0 }, "to": { "x": 0, "opacity": 1 } },
//!         { "targets": ["portrait"], "at": 0.7, "ease": "power2.in",
//!           "from": { "x": 0, "opacity": 1 }, "to": { "x": "-35vw", "opacity": 0 } }
//!       ]
//!     }
//!   ],
//!   "snap": { "margin": 0.02, "duration": [0.15, 0.35], "ease": "power2.out" }
//! }
//! ```
//!
//! # Failure Modes
//!
//! Validation is all-or-nothing: the first problem found is returned as a
//! [`DefinitionError`] and no partial page is produced.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::time::Duration;

use crate::choreographer::Choreographer;
use crate::driver::ScrollDriver;
use crate::easing::Ease;
use crate::layout::StackLayout;
use crate::readiness::ReadinessBarrier;
use crate::section::Section;
use crate::snap::{DurationRange, SnapPolicy};
use crate::timeline::{PhaseSpec, PhaseTimeline, Property};
use crate::trigger::{
    Anchor, FLOWING_SCRUB_LAG, PINNED_SCRUB_LAG, ParseTriggerError, TriggerEnd, TriggerSpec,
};
use crate::value::{Value, Viewport};

/// Whole-page definition.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(deny_unknown_fields)
)]
pub struct PageDefinition {
    pub sections: Vec<SectionDefinition>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub snap: Option<SnapDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(deny_unknown_fields)
)]
pub struct SectionDefinition {
    pub id: String,
    /// Section height before pin spacing. Defaults to one viewport.
    #[cfg_attr(feature = "serde", serde(default = "default_height"))]
    pub height: Value,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: TriggerDefinition,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tweens: Vec<TweenDefinition>,
}

fn default_height() -> Value {
    Value::vh(100.0)
}

impl SectionDefinition {
    #[must_use]
    pub fn new(id: impl Into<String>, trigger: TriggerDefinition) -> Self {
        Self {
            id: id.into(),
            height: default_height(),
            trigger,
            tweens: Vec::new(),
        }
    }

    #[must_use]
    pub fn height(mut self, height: Value) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn tween(mut self, tween: TweenDefinition) -> Self {
        self.tweens.push(tween);
        self
    }

    #[must_use]
    pub fn tweens(mut self, tweens: impl IntoIterator<Item = TweenDefinition>) -> Self {
        self.tweens.extend(tweens);
        self
    }
}

/// Trigger as written in a definition; anchors are parsed on build.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct TriggerDefinition {
    pub start: String,
    pub end: String,
    pub pin: bool,
    /// Scrub lag in seconds. Defaults by pin mode.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub scrub: Option<f64>,
}

impl Default for TriggerDefinition {
    fn default() -> Self {
        Self::pinned("+=100%")
    }
}

impl TriggerDefinition {
    /// Pinned at the viewport top until `end`.
    #[must_use]
    pub fn pinned(end: impl Into<String>) -> Self {
        Self {
            start: "top top".to_string(),
            end: end.into(),
            pin: true,
            scrub: None,
        }
    }

    /// Scrubbed between two anchors without pinning.
    #[must_use]
    pub fn flowing(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            pin: false,
            scrub: None,
        }
    }

    pub fn to_spec(&self) -> Result<TriggerSpec, ParseTriggerError> {
        let start: Anchor = self.start.parse()?;
        let end: TriggerEnd = self.end.parse()?;
        let default_lag = if self.pin {
            PINNED_SCRUB_LAG
        } else {
            FLOWING_SCRUB_LAG
        };
        Ok(TriggerSpec {
            start,
            end,
            pin: self.pin,
            scrub: Some(self.scrub.filter(|s| s.is_finite()).unwrap_or(default_lag)),
        })
    }
}

/// One from→to tween applied to one or more targets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(deny_unknown_fields)
)]
pub struct TweenDefinition {
    pub targets: Vec<String>,
    /// Local progress offset of the first target.
    pub at: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub from: BTreeMap<Property, Value>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub to: BTreeMap<Property, Value>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ease: Ease,
    /// Offset added per target.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub stagger: Option<f64>,
    /// Explicit interval end; otherwise the phase band end.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub end: Option<f64>,
}

impl TweenDefinition {
    #[must_use]
    pub fn new<I, S>(targets: I, at: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            at,
            from: BTreeMap::new(),
            to: BTreeMap::new(),
            ease: Ease::Linear,
            stagger: None,
            end: None,
        }
    }

    /// Animate `property` from `from` to `to`.
    #[must_use]
    pub fn animate(mut self, property: Property, from: Value, to: Value) -> Self {
        self.from.insert(property, from);
        self.to.insert(property, to);
        self
    }

    #[must_use]
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    #[must_use]
    pub fn stagger(mut self, stagger: f64) -> Self {
        self.stagger = Some(stagger);
        self
    }

    #[must_use]
    pub fn ending_at(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    /// Every property named on either side; a missing side reads as the
    /// property's rest value.
    #[must_use]
    pub fn properties(&self) -> Vec<(Property, Value, Value)> {
        let mut keys: Vec<Property> = self.from.keys().chain(self.to.keys()).copied().collect();
        keys.sort();
        keys.dedup();
        keys.into_iter()
            .map(|p| {
                let from = self.from.get(&p).copied().unwrap_or(p.rest_value());
                let to = self.to.get(&p).copied().unwrap_or(p.rest_value());
                (p, from, to)
            })
            .collect()
    }

    /// Add this tween to a timeline.
    #[must_use]
    pub fn apply(&self, mut timeline: PhaseTimeline) -> PhaseTimeline {
        let stagger = self.stagger.unwrap_or(0.0);
        let properties = self.properties();
        for (i, target) in self.targets.iter().enumerate() {
            let offset = self.at + stagger * i as f64;
            for &(property, from, to) in &properties {
                let mut spec = PhaseSpec::new(offset, property, from, to).ease(self.ease);
                spec.end = self.end;
                timeline.push(target.as_str(), spec);
            }
        }
        timeline
    }
}

/// Snap policy overrides. Durations and delay are in seconds.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct SnapDefinition {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub margin: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub duration: Option<(f64, f64)>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub delay: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub ease: Option<Ease>,
}

impl SnapDefinition {
    pub fn to_policy(&self) -> Result<SnapPolicy, DefinitionError> {
        let mut policy = SnapPolicy::default();
        if let Some(margin) = self.margin {
            if !(margin.is_finite() && margin >= 0.0) {
                return Err(DefinitionError::InvalidSnap {
                    field: "margin",
                    value: margin,
                });
            }
            policy.margin = margin;
        }
        if let Some((min, max)) = self.duration {
            policy.duration = DurationRange::new(seconds("duration", min)?, seconds("duration", max)?);
        }
        if let Some(delay) = self.delay {
            policy.delay = seconds("delay", delay)?;
        }
        if let Some(ease) = self.ease {
            policy.ease = ease;
        }
        Ok(policy)
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, DefinitionError> {
    Duration::try_from_secs_f64(value).map_err(|_| DefinitionError::InvalidSnap { field, value })
}

/// Reasons a definition cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionError {
    EmptySectionId { index: usize },
    DuplicateSection(String),
    InvalidTrigger {
        section: String,
        source: ParseTriggerError,
    },
    NoTargets { section: String, tween: usize },
    InvalidOffset {
        section: String,
        tween: usize,
        value: f64,
    },
    InvalidSnap { field: &'static str, value: f64 },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySectionId { index } => write!(f, "section #{index} has an empty id"),
            Self::DuplicateSection(id) => write!(f, "duplicate section id {id:?}"),
            Self::InvalidTrigger { section, source } => {
                write!(f, "section {section:?}: {source}")
            }
            Self::NoTargets { section, tween } => {
                write!(f, "section {section:?}: tween #{tween} has no targets")
            }
            Self::InvalidOffset {
                section,
                tween,
                value,
            } => write!(
                f,
                "section {section:?}: tween #{tween} offset {value} is outside [0, 1]"
            ),
            Self::InvalidSnap { field, value } => write!(f, "snap {field}: invalid value {value}"),
        }
    }
}

impl std::error::Error for DefinitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidTrigger { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl PageDefinition {
    /// Validate and build every section.
    pub fn build(&self) -> Result<Page, DefinitionError> {
        let policy = match &self.snap {
            Some(snap) => snap.to_policy()?,
            None => SnapPolicy::default(),
        };

        let mut seen = HashSet::new();
        let mut sections = Vec::with_capacity(self.sections.len());
        for (index, def) in self.sections.iter().enumerate() {
            if def.id.trim().is_empty() {
                return Err(DefinitionError::EmptySectionId { index });
            }
            if !seen.insert(def.id.as_str()) {
                return Err(DefinitionError::DuplicateSection(def.id.clone()));
            }
            sections.push(PageSection {
                height: def.height,
                section: def.build()?,
            });
        }
        Ok(Page { sections, policy })
    }
}

impl SectionDefinition {
    fn build(&self) -> Result<Section, DefinitionError> {
        let trigger = self
            .trigger
            .to_spec()
            .map_err(|source| DefinitionError::InvalidTrigger {
                section: self.id.clone(),
                source,
            })?;

        let mut timeline = PhaseTimeline::new();
        for (tween, def) in self.tweens.iter().enumerate() {
            if def.targets.is_empty() {
                return Err(DefinitionError::NoTargets {
                    section: self.id.clone(),
                    tween,
                });
            }
            for value in [Some(def.at), def.end].into_iter().flatten() {
                if !(0.0..=1.0).contains(&value) {
                    return Err(DefinitionError::InvalidOffset {
                        section: self.id.clone(),
                        tween,
                        value,
                    });
                }
            }
            timeline = def.apply(timeline);
        }
        Ok(Section::new(self.id.as_str(), trigger, timeline))
    }
}

/// One built section with its layout height.
#[derive(Debug, Clone)]
pub struct PageSection {
    pub height: Value,
    pub section: Section,
}

/// A validated page, ready to lay out and mount.
#[derive(Debug, Clone)]
pub struct Page {
    pub sections: Vec<PageSection>,
    pub policy: SnapPolicy,
}

impl Page {
    /// Number of sections that pin, which is what the readiness barrier
    /// waits for.
    #[must_use]
    pub fn expected_pinned(&self) -> usize {
        self.sections.iter().filter(|s| s.section.is_pinned()).count()
    }

    #[must_use]
    pub fn layout(&self, viewport: Viewport) -> StackLayout {
        StackLayout::compute(
            viewport,
            self.sections.iter().map(|s| (s.height, s.section.trigger())),
        )
    }

    /// Stack every section for the driver's viewport and mount it.
    ///
    /// The driver is expected to report the extent of this layout already.
    pub fn mount<D: ScrollDriver>(self, driver: D) -> Choreographer<D> {
        let layout = self.layout(driver.viewport());
        let barrier = ReadinessBarrier::expecting(self.expected_pinned());
        let mut page = Choreographer::new(driver, self.policy, barrier);
        for (entry, placement) in self.sections.into_iter().zip(layout.placements()) {
            page.mount(entry.section, placement.geometry);
        }
        page.finalize();
        page
    }
}
