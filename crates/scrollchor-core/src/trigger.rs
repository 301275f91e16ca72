#![forbid(unsafe_code)]

//! Scroll trigger geometry.
//!
//! A trigger describes *when* a section's timeline runs in terms of page
//! geometry: "start when the section's top reaches the viewport's top, end
//! 130% of a viewport height later". [`TriggerSpec::resolve`] turns that
//! description plus measured geometry into a [`PinnedRange`] in scroll
//! pixels. The engine never measures anything itself; the host supplies
//! [`ElementGeometry`] and [`Viewport`].
//!
//! # Anchor syntax
//!
//! | Text | Meaning |
//! |------|---------|
//! | `"top top"` | element top meets viewport top |
//! | `"top 80%"` | element top meets 80% down the viewport |
//! | `"bottom top"` | element bottom meets viewport top |
//! | `"+=130%"` | (end only) start plus 1.3 viewport heights |
//! | `"+=400px"` | (end only) start plus 400 pixels |

use std::fmt;
use std::str::FromStr;

use crate::registry::PinnedRange;
use crate::value::Viewport;

/// Scrub lag used by pinned sections, in seconds.
pub const PINNED_SCRUB_LAG: f64 = 0.6;

/// Scrub lag used by free-flowing (non-pinned) sections, in seconds.
pub const FLOWING_SCRUB_LAG: f64 = 0.4;

/// Measured position of a section in document pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    pub top: f64,
    pub height: f64,
}

impl ElementGeometry {
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// A point on the element (fraction of its height) matched to a point on the
/// viewport (fraction of the viewport height).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub element: f64,
    pub viewport: f64,
}

impl Anchor {
    pub const TOP_TOP: Anchor = Anchor::new(0.0, 0.0);

    #[must_use]
    pub const fn new(element: f64, viewport: f64) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which the two anchor points coincide.
    #[must_use]
    pub fn scroll_position(&self, geometry: ElementGeometry, viewport: Viewport) -> f64 {
        geometry.top + self.element * geometry.height - self.viewport * viewport.height
    }
}

/// Where a trigger ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEnd {
    /// Absolute anchor, like the start.
    Anchor(Anchor),
    /// Start plus this many viewport heights.
    Viewports(f64),
    /// Start plus this many pixels.
    Pixels(f64),
}

/// Complete trigger description of one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSpec {
    pub start: Anchor,
    pub end: TriggerEnd,
    /// Whether the section is held on screen for the duration of the range.
    pub pin: bool,
    /// Smoothing lag (seconds) the host applies when scrubbing; `None`
    /// scrubs without lag.
    pub scrub: Option<f64>,
}

impl TriggerSpec {
    /// A section pinned at the viewport top for `viewports` viewport heights.
    #[must_use]
    pub const fn pinned(viewports: f64) -> Self {
        Self {
            start: Anchor::TOP_TOP,
            end: TriggerEnd::Viewports(viewports),
            pin: true,
            scrub: Some(PINNED_SCRUB_LAG),
        }
    }

    /// A non-pinned section scrubbed between two anchors.
    #[must_use]
    pub const fn flowing(start: Anchor, end: Anchor) -> Self {
        Self {
            start,
            end: TriggerEnd::Anchor(end),
            pin: false,
            scrub: Some(FLOWING_SCRUB_LAG),
        }
    }

    /// Resolve to a scroll-pixel range. Ends before the start collapse to a
    /// zero-width range at the start.
    #[must_use]
    pub fn resolve(&self, geometry: ElementGeometry, viewport: Viewport) -> PinnedRange {
        let start = self.start.scroll_position(geometry, viewport);
        let end = match self.end {
            TriggerEnd::Anchor(anchor) => anchor.scroll_position(geometry, viewport),
            TriggerEnd::Viewports(n) => start + n * viewport.height,
            TriggerEnd::Pixels(px) => start + px,
        };
        PinnedRange::new(start, end)
    }

    /// Extra document height a pinned section adds below itself.
    #[must_use]
    pub fn pin_spacing(&self, geometry: ElementGeometry, viewport: Viewport) -> f64 {
        if self.pin {
            self.resolve(geometry, viewport).len()
        } else {
            0.0
        }
    }
}

impl Default for TriggerSpec {
    fn default() -> Self {
        Self::pinned(1.0)
    }
}

/// Error returned for malformed anchor or end strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTriggerError {
    input: String,
}

impl ParseTriggerError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

impl fmt::Display for ParseTriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid trigger position: {:?}", self.input)
    }
}

impl std::error::Error for ParseTriggerError {}

fn parse_edge(token: &str) -> Option<f64> {
    match token {
        "top" => Some(0.0),
        "center" => Some(0.5),
        "bottom" => Some(1.0),
        _ => parse_finite(token.strip_suffix('%')?).map(|pct| pct / 100.0),
    }
}

impl FromStr for Anchor {
    type Err = ParseTriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let (Some(element), Some(viewport), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ParseTriggerError::new(s));
        };
        match (parse_edge(element), parse_edge(viewport)) {
            (Some(element), Some(viewport)) => Ok(Anchor::new(element, viewport)),
            _ => Err(ParseTriggerError::new(s)),
        }
    }
}

impl FromStr for TriggerEnd {
    type Err = ParseTriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some(relative) = trimmed.strip_prefix("+=") else {
            return trimmed.parse().map(TriggerEnd::Anchor);
        };

        let end = if let Some(pct) = relative.strip_suffix('%') {
            parse_finite(pct).map(|n| TriggerEnd::Viewports(n / 100.0))
        } else {
            parse_finite(relative.strip_suffix("px").unwrap_or(relative)).map(TriggerEnd::Pixels)
        };
        end.ok_or_else(|| ParseTriggerError::new(s))
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(1280.0, 800.0);

    #[test]
    fn parses_anchors() {
        assert_eq!("top top".parse::<Anchor>().unwrap(), Anchor::TOP_TOP);
        assert_eq!("top 80%".parse::<Anchor>().unwrap(), Anchor::new(0.0, 0.8));
        assert_eq!("bottom top".parse::<Anchor>().unwrap(), Anchor::new(1.0, 0.0));
        assert_eq!(
            "center  bottom".parse::<Anchor>().unwrap(),
            Anchor::new(0.5, 1.0)
        );
        assert!("top".parse::<Anchor>().is_err());
        assert!("top top top".parse::<Anchor>().is_err());
        assert!("left top".parse::<Anchor>().is_err());
    }

    #[test]
    fn parses_ends() {
        assert_eq!("+=130%".parse::<TriggerEnd>().unwrap(), TriggerEnd::Viewports(1.3));
        assert_eq!("+=400px".parse::<TriggerEnd>().unwrap(), TriggerEnd::Pixels(400.0));
        assert_eq!("+=250".parse::<TriggerEnd>().unwrap(), TriggerEnd::Pixels(250.0));
        assert_eq!(
            "top 50%".parse::<TriggerEnd>().unwrap(),
            TriggerEnd::Anchor(Anchor::new(0.0, 0.5))
        );
        assert!("+=lots".parse::<TriggerEnd>().is_err());
    }

    #[test]
    fn pinned_range_extends_from_section_top() {
        let geometry = ElementGeometry::new(2000.0, 800.0);
        let range = TriggerSpec::pinned(1.3).resolve(geometry, VIEWPORT);
        assert_eq!(range.start(), 2000.0);
        assert!((range.end() - 3040.0).abs() < 1e-9);
        assert!((TriggerSpec::pinned(1.3).pin_spacing(geometry, VIEWPORT) - 1040.0).abs() < 1e-9);
    }

    #[test]
    fn flowing_range_uses_viewport_anchors() {
        let trigger = TriggerSpec::flowing(Anchor::new(0.0, 0.8), Anchor::new(0.0, 0.5));
        let range = trigger.resolve(ElementGeometry::new(3000.0, 1200.0), VIEWPORT);
        assert_eq!(range.start(), 3000.0 - 640.0);
        assert_eq!(range.end(), 3000.0 - 400.0);
        assert_eq!(trigger.pin_spacing(ElementGeometry::new(3000.0, 1200.0), VIEWPORT), 0.0);
    }

    #[test]
    fn inverted_anchors_collapse() {
        // Ends before it starts: "top 20%" is reached before "top 80%".
        let trigger = TriggerSpec::flowing(Anchor::new(0.0, 0.2), Anchor::new(0.0, 0.8));
        let range = trigger.resolve(ElementGeometry::new(1000.0, 800.0), VIEWPORT);
        assert_eq!(range.start(), range.end());
        assert_eq!(range.len(), 0.0);
    }
}
