#![forbid(unsafe_code)]

//! Phase timeline: scroll progress to interpolated property values.
//!
//! A [`PhaseTimeline`] holds, for every tracked element, an ordered list of
//! [`PhaseSpec`] tweens per animated [`Property`]. Each `(element, property)`
//! pair is a *channel*. Evaluating the timeline at a local progress `t`
//! produces a [`Frame`] with one value per channel.
//!
//! # Usage
//!
//! ```
//! use scrollchor_core::{Ease, PhaseTimeline, Property, Value};
//!
//! let timeline = PhaseTimeline::new()
//!     .from_to("card", 0.0, &[(Property::Opacity, Value::number(0.0), Value::number(1.0))], Ease::Linear)
//!     .from_to("card", 0.7, &[(Property::Opacity, Value::number(1.0), Value::number(0.0))], Ease::POWER2_IN);
//!
//! assert_eq!(timeline.evaluate(0.5).get("card", Property::Opacity), Some(Value::number(1.0)));
//! ```
//!
//! # Invariants
//!
//! 1. Tweens within a channel are kept sorted by offset (stable: equal
//!    offsets keep insertion order).
//! 2. A tween covers `[offset, end)` where `end` is its explicit end, or the
//!    end of the phase band containing `offset`, truncated to the next keyed
//!    offset of the same channel.
//! 3. Before a channel's first offset the value is that tween's `from`;
//!    after an interval ends (and before the next starts) the value holds at
//!    that interval's `to`.
//! 4. Progress is clamped to `[0, 1]` (NaN reads as 0) before lookup.
//!
//! # Failure Modes
//!
//! - Offsets outside `[0, 1]` or NaN: clamped on insertion.
//! - Explicit end at or before the offset: the tween becomes a step to `to`.
//! - Channels with no tweens never exist; an empty timeline yields an empty
//!   frame.

use std::fmt;

use crate::easing::Ease;
use crate::phase::{clamp_unit, natural_end};
use crate::value::Value;

/// Identifier of an animated element inside a section.
pub type ElementId = String;

/// Animatable visual property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Property {
    Opacity,
    X,
    Y,
    Scale,
}

impl Property {
    /// Value an element shows when nothing animates it.
    #[must_use]
    pub const fn rest_value(self) -> Value {
        match self {
            Self::Opacity | Self::Scale => Value::number(1.0),
            Self::X | Self::Y => Value::number(0.0),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One tween of one property, keyed at a local progress offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpec {
    pub offset: f64,
    pub property: Property,
    pub from: Value,
    pub to: Value,
    pub ease: Ease,
    /// Explicit interval end. `None` uses the phase band end.
    pub end: Option<f64>,
}

impl PhaseSpec {
    #[must_use]
    pub fn new(offset: f64, property: Property, from: Value, to: Value) -> Self {
        Self {
            offset,
            property,
            from,
            to,
            ease: Ease::Linear,
            end: None,
        }
    }

    #[must_use]
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    #[must_use]
    pub fn ending_at(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }
}

#[derive(Debug, Clone)]
struct Channel {
    element: ElementId,
    property: Property,
    specs: Vec<PhaseSpec>,
}

impl Channel {
    fn insert(&mut self, spec: PhaseSpec) {
        let pos = self.specs.partition_point(|s| s.offset <= spec.offset);
        self.specs.insert(pos, spec);
    }

    fn interval_end(&self, index: usize) -> f64 {
        let spec = &self.specs[index];
        let end = spec.end.unwrap_or_else(|| natural_end(spec.offset));
        match self.specs.get(index + 1) {
            Some(next) if next.offset > spec.offset => end.min(next.offset),
            _ => end,
        }
    }

    fn value_at(&self, t: f64) -> Value {
        let Some(first) = self.specs.first() else {
            return self.property.rest_value();
        };
        if t < first.offset {
            return first.from;
        }
        let Some(index) = self.specs.partition_point(|s| s.offset <= t).checked_sub(1) else {
            return first.from;
        };

        let spec = &self.specs[index];
        let end = self.interval_end(index);
        if t >= end {
            return spec.to;
        }
        let local = (t - spec.offset) / (end - spec.offset);
        spec.from.lerp(spec.to, spec.ease.apply(local))
    }
}

/// Interpolated values for every channel at one progress value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    values: Vec<(ElementId, Property, Value)>,
}

impl Frame {
    /// Value of `property` on `element`, if the timeline animates it.
    #[must_use]
    pub fn get(&self, element: &str, property: Property) -> Option<Value> {
        self.values
            .iter()
            .find(|(e, p, _)| e == element && *p == property)
            .map(|(_, _, v)| *v)
    }

    /// All `(property, value)` pairs of one element.
    pub fn element<'a>(&'a self, element: &'a str) -> impl Iterator<Item = (Property, Value)> + 'a {
        self.values
            .iter()
            .filter(move |(e, _, _)| e == element)
            .map(|(_, p, v)| (*p, *v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Property, Value)> {
        self.values.iter().map(|(e, p, v)| (e.as_str(), *p, *v))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-section timeline of phase tweens.
#[derive(Debug, Clone, Default)]
pub struct PhaseTimeline {
    /// Channels in order of first appearance.
    channels: Vec<Channel>,
}

impl PhaseTimeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a from→to tween for several properties of one element (builder pattern).
    #[must_use]
    pub fn from_to(
        mut self,
        element: impl Into<ElementId>,
        offset: f64,
        properties: &[(Property, Value, Value)],
        ease: Ease,
    ) -> Self {
        let element = element.into();
        for &(property, from, to) in properties {
            self.push(element.clone(), PhaseSpec::new(offset, property, from, to).ease(ease));
        }
        self
    }

    /// Like [`from_to`](Self::from_to) applied to each element in turn, with
    /// element `i` keyed at `offset + i * stagger`.
    #[must_use]
    pub fn from_to_staggered<I, E>(
        mut self,
        elements: I,
        offset: f64,
        stagger: f64,
        properties: &[(Property, Value, Value)],
        ease: Ease,
    ) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ElementId>,
    {
        for (i, element) in elements.into_iter().enumerate() {
            let keyed_at = offset + stagger * i as f64;
            self = self.from_to(element, keyed_at, properties, ease);
        }
        self
    }

    /// Add a single tween (builder pattern).
    #[must_use]
    pub fn tween(mut self, element: impl Into<ElementId>, spec: PhaseSpec) -> Self {
        self.push(element, spec);
        self
    }

    /// Insert a tween into its channel, keeping the channel sorted by offset.
    pub fn push(&mut self, element: impl Into<ElementId>, mut spec: PhaseSpec) {
        spec.offset = clamp_unit(spec.offset);
        spec.end = spec.end.map(clamp_unit);

        let element = element.into();
        match self
            .channels
            .iter_mut()
            .find(|c| c.element == element && c.property == spec.property)
        {
            Some(channel) => channel.insert(spec),
            None => self.channels.push(Channel {
                element,
                property: spec.property,
                specs: vec![spec],
            }),
        }
    }

    /// Values of every channel at local progress `progress`.
    #[must_use]
    pub fn evaluate(&self, progress: f64) -> Frame {
        let t = clamp_unit(progress);
        Frame {
            values: self
                .channels
                .iter()
                .map(|c| (c.element.clone(), c.property, c.value_at(t)))
                .collect(),
        }
    }

    /// Values before any scrolling into the section (progress 0).
    #[must_use]
    pub fn rest_frame(&self) -> Frame {
        self.evaluate(0.0)
    }

    /// Distinct element ids, in order of first appearance.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        let mut seen: Vec<&str> = Vec::new();
        self.channels.iter().filter_map(move |c| {
            if seen.contains(&c.element.as_str()) {
                None
            } else {
                seen.push(c.element.as_str());
                Some(c.element.as_str())
            }
        })
    }

    #[inline]
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn spec_count(&self) -> usize {
        self.channels.iter().map(|c| c.specs.len()).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
