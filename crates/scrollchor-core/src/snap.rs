#![forbid(unsafe_code)]

//! Snap rule: redirect resting scroll positions to pinned section centers.
//!
//! A [`SnapRule`] is an immutable snapshot of every pinned range, normalized
//! to fractions of the total scrollable extent, plus the [`SnapPolicy`] that
//! governs redirection. Given a candidate scroll fraction it answers with a
//! [`SnapDecision`]: either leave the position alone, or animate to the
//! center of the nearest containing range.
//!
//! # Algorithm
//!
//! 1. `v` is *inside* a range `r` iff `r.start - margin <= v <= r.end + margin`.
//! 2. Inside no range: free scroll, `v` is returned unchanged.
//! 3. Otherwise pick, among the containing ranges, the one whose center is
//!    closest to `v`. Ranges are visited in start order and a later range
//!    only wins if it is closer by more than [`TIE_EPSILON`], so the earliest
//!    of equidistant ranges wins.
//!
//! # Invariants
//!
//! - `snap(center) == center` for every range center: a center lies inside
//!   its own range, and no other candidate can be closer than zero.
//! - The rule never animates; it only names a target and a duration chosen
//!   inside the policy's [`DurationRange`].

use std::time::Duration;

use crate::easing::Ease;
use crate::phase::clamp_unit;
use crate::registry::{RegisteredRange, TriggerId};

/// Tolerance band around each range edge, in scroll fractions.
pub const DEFAULT_SNAP_MARGIN: f64 = 0.02;

/// Distances closer than this are ties.
pub const TIE_EPSILON: f64 = 1e-9;

/// Inclusive bounds for a snap animation's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRange {
    min: Duration,
    max: Duration,
}

impl DurationRange {
    /// Bounds given in either order.
    #[must_use]
    pub fn new(a: Duration, b: Duration) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Duration at `fraction` of the way from `min` to `max` (clamped).
    #[must_use]
    pub fn at(&self, fraction: f64) -> Duration {
        self.min + (self.max - self.min).mul_f64(clamp_unit(fraction))
    }
}

impl Default for DurationRange {
    fn default() -> Self {
        Self::new(Duration::from_millis(150), Duration::from_millis(350))
    }
}

/// Process-wide snapping parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPolicy {
    /// Tolerance band around range edges, in scroll fractions.
    pub margin: f64,
    /// Bounds for the host's smoothing animation.
    pub duration: DurationRange,
    /// Delay the host waits after settling before animating.
    pub delay: Duration,
    /// Curve the host animates with.
    pub ease: Ease,
}

impl Default for SnapPolicy {
    fn default() -> Self {
        Self {
            margin: DEFAULT_SNAP_MARGIN,
            duration: DurationRange::default(),
            delay: Duration::ZERO,
            ease: Ease::POWER2_OUT,
        }
    }
}

/// A pinned range expressed in fractions of the scrollable extent.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRange {
    pub id: TriggerId,
    pub start: f64,
    pub end: f64,
    pub center: f64,
}

impl NormalizedRange {
    fn from_pixels(registered: &RegisteredRange, extent: f64) -> Self {
        let range = registered.range;
        Self {
            id: registered.id.clone(),
            start: range.start() / extent,
            end: range.end() / extent,
            center: range.center() / extent,
        }
    }

    /// Whether `v` lies within the range widened by `margin` on both sides.
    #[must_use]
    pub fn contains(&self, v: f64, margin: f64) -> bool {
        self.start - margin <= v && v <= self.end + margin
    }
}

/// Outcome of a snap query.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapDecision {
    /// Leave the scroll position where it is.
    Free { position: f64 },
    /// The scrollable extent is unknown, so the offset has no fraction.
    /// Nothing moves.
    Unmeasured { offset_px: f64 },
    /// Animate from `from` to `target`.
    Snap {
        from: f64,
        target: f64,
        range: TriggerId,
        duration: Duration,
        ease: Ease,
    },
}

impl SnapDecision {
    /// Scroll fraction the page should end up at, if it can be expressed
    /// as one.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        match self {
            Self::Free { position } => Some(*position),
            Self::Snap { target, .. } => Some(*target),
            Self::Unmeasured { .. } => None,
        }
    }

    #[must_use]
    pub fn is_snap(&self) -> bool {
        matches!(self, Self::Snap { .. })
    }
}

/// Immutable snap rule built from one registry snapshot.
#[derive(Debug, Clone)]
pub struct SnapRule {
    ranges: Vec<NormalizedRange>,
    policy: SnapPolicy,
}

impl SnapRule {
    /// Build from a start-sorted snapshot and the total scrollable extent.
    ///
    /// Returns `None` (inert: no snapping at all) when the snapshot is empty
    /// or the extent is unknown, zero, negative, or non-finite.
    #[must_use]
    pub fn build(
        snapshot: &[RegisteredRange],
        extent: Option<f64>,
        policy: SnapPolicy,
    ) -> Option<Self> {
        let extent = extent.filter(|e| e.is_finite() && *e > 0.0)?;
        if snapshot.is_empty() {
            return None;
        }
        Some(Self {
            ranges: snapshot
                .iter()
                .map(|r| NormalizedRange::from_pixels(r, extent))
                .collect(),
            policy,
        })
    }

    /// Target fraction for candidate `v`; `v` itself when no range claims it.
    #[must_use]
    pub fn snap(&self, v: f64) -> f64 {
        match self.decide(v) {
            SnapDecision::Snap { target, .. } => target,
            _ => v,
        }
    }

    /// Full decision for candidate `v`, including animation timing.
    #[must_use]
    pub fn decide(&self, v: f64) -> SnapDecision {
        let margin = self.policy.margin;
        let mut best: Option<(&NormalizedRange, f64)> = None;
        for range in self.ranges.iter().filter(|r| r.contains(v, margin)) {
            let distance = (range.center - v).abs();
            match best {
                Some((_, closest)) if distance >= closest - TIE_EPSILON => {}
                _ => best = Some((range, distance)),
            }
        }

        match best {
            None => SnapDecision::Free { position: v },
            Some((range, distance)) => SnapDecision::Snap {
                from: v,
                target: range.center,
                range: range.id.clone(),
                duration: self.duration_for(range, distance),
                ease: self.policy.ease,
            },
        }
    }

    /// Longer moves get longer animations: the distance is measured against
    /// the farthest point that can still snap to this range.
    fn duration_for(&self, range: &NormalizedRange, distance: f64) -> Duration {
        let reach = (range.end - range.start) / 2.0 + self.policy.margin;
        let fraction = if reach > 0.0 { distance / reach } else { 0.0 };
        self.policy.duration.at(fraction)
    }

    #[must_use]
    pub fn ranges(&self) -> &[NormalizedRange] {
        &self.ranges
    }

    #[must_use]
    pub fn policy(&self) -> &SnapPolicy {
        &self.policy
    }
}
