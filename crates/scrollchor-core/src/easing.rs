#![forbid(unsafe_code)]

//! Easing curves for scrubbed tweens and snap animations.
//!
//! Curves are named the way page authors already write them (`"none"`,
//! `"power2.in"`, `"power3.inOut"`). Only the power family is provided; the
//! engine needs nothing more, and hosts that animate snaps themselves are
//! free to map [`Ease`] onto their own curve library.
//!
//! # Contract
//!
//! For every curve: `apply(0) == 0`, `apply(1) == 1`, and the input is
//! clamped to `[0, 1]` (NaN is treated as `0`). Curves are monotonic
//! non-decreasing.
//!
//! `powerN` maps to exponent `N + 1` (`power1` = quadratic, `power2` =
//! cubic, ...). A bare `powerN` without direction means `.out`.

use std::fmt;
use std::str::FromStr;

use crate::phase::clamp_unit;

/// Direction of a power curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    InOut,
}

/// A named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ease {
    /// Identity (`"none"` / `"linear"`).
    #[default]
    Linear,
    /// `powerN.<direction>` with `N` in `1..=4`.
    Power(u8, Direction),
}

impl Ease {
    pub const POWER2_IN: Ease = Ease::Power(2, Direction::In);
    pub const POWER2_OUT: Ease = Ease::Power(2, Direction::Out);

    /// Map linear progress to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = clamp_unit(t);
        match self {
            Self::Linear => t,
            Self::Power(power, direction) => {
                let exponent = i32::from(power.clamp(1, 4)) + 1;
                match direction {
                    Direction::In => t.powi(exponent),
                    Direction::Out => 1.0 - (1.0 - t).powi(exponent),
                    Direction::InOut => {
                        if t < 0.5 {
                            (2.0 * t).powi(exponent) / 2.0
                        } else {
                            1.0 - (2.0 - 2.0 * t).powi(exponent) / 2.0
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("none"),
            Self::Power(power, direction) => {
                let suffix = match direction {
                    Direction::In => "in",
                    Direction::Out => "out",
                    Direction::InOut => "inOut",
                };
                write!(f, "power{power}.{suffix}")
            }
        }
    }
}

/// Error returned for unknown easing names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEaseError {
    name: String,
}

impl fmt::Display for ParseEaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing: {:?}", self.name)
    }
}

impl std::error::Error for ParseEaseError {}

impl FromStr for Ease {
    type Err = ParseEaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseEaseError {
            name: s.to_string(),
        };
        let name = s.trim();
        if name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("linear") {
            return Ok(Self::Linear);
        }

        let rest = name.strip_prefix("power").ok_or_else(err)?;
        let (power, direction) = match rest.split_once('.') {
            Some((power, direction)) => (power, direction),
            None => (rest, "out"),
        };
        let power: u8 = power.parse().map_err(|_| err())?;
        if !(1..=4).contains(&power) {
            return Err(err());
        }
        let direction = match direction {
            "in" => Direction::In,
            "out" => Direction::Out,
            "inOut" => Direction::InOut,
            _ => return Err(err()),
        };
        Ok(Self::Power(power, direction))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Ease {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Ease {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
