#![forbid(unsafe_code)]

//! Animated property values with CSS-like units.
//!
//! Section choreography is authored in viewport-relative units (`"-55vw"`,
//! `"10vh"`) as well as plain numbers (opacity, scale) and pixels. A
//! [`Value`] keeps the unit symbolic so the same timeline works for any
//! viewport; the host resolves it with [`Value::to_px`] when rendering.
//!
//! # Interpolation
//!
//! Tweens frequently pair a unitless zero with a unit-bearing endpoint
//! (`x: "-60vw" → 0`). [`Value::lerp`] adopts the unit of the non-zero
//! endpoint so the zero behaves as "zero of the same unit". Two non-zero
//! endpoints with different units are a caller error; interpolation still
//! succeeds and reports the destination unit.

use std::fmt;
use std::str::FromStr;

/// Unit attached to a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    /// Unitless scalar (opacity, scale).
    #[default]
    Number,
    /// CSS pixels.
    Px,
    /// Percent of viewport width.
    Vw,
    /// Percent of viewport height.
    Vh,
}

impl Unit {
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Number => "",
            Self::Px => "px",
            Self::Vw => "vw",
            Self::Vh => "vh",
        }
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A property value: an amount and its unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Value {
    pub amount: f64,
    pub unit: Unit,
}

impl Value {
    #[must_use]
    pub const fn new(amount: f64, unit: Unit) -> Self {
        Self { amount, unit }
    }

    #[must_use]
    pub const fn number(amount: f64) -> Self {
        Self::new(amount, Unit::Number)
    }

    #[must_use]
    pub const fn px(amount: f64) -> Self {
        Self::new(amount, Unit::Px)
    }

    #[must_use]
    pub const fn vw(amount: f64) -> Self {
        Self::new(amount, Unit::Vw)
    }

    #[must_use]
    pub const fn vh(amount: f64) -> Self {
        Self::new(amount, Unit::Vh)
    }

    /// Linear interpolation from `self` to `to` by `t`.
    ///
    /// `t` is not clamped; easing curves stay inside `[0, 1]` so callers get
    /// in-range results without paying for a second clamp.
    #[must_use]
    pub fn lerp(self, to: Value, t: f64) -> Value {
        let unit = if self.unit == to.unit || to.amount != 0.0 {
            to.unit
        } else {
            self.unit
        };
        Value {
            amount: self.amount + (to.amount - self.amount) * t,
            unit,
        }
    }

    /// Resolve to CSS pixels (or the raw scalar for [`Unit::Number`]).
    #[must_use]
    pub fn to_px(self, viewport: Viewport) -> f64 {
        match self.unit {
            Unit::Number | Unit::Px => self.amount,
            Unit::Vw => self.amount * viewport.width / 100.0,
            Unit::Vh => self.amount * viewport.height / 100.0,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

/// Error returned when a value string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    input: String,
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid property value: {:?}", self.input)
    }
}

impl std::error::Error for ParseValueError {}

impl FromStr for Value {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, unit) = [Unit::Px, Unit::Vw, Unit::Vh]
            .into_iter()
            .find_map(|unit| {
                trimmed
                    .strip_suffix(unit.suffix())
                    .map(|rest| (rest.trim_end(), unit))
            })
            .unwrap_or((trimmed, Unit::Number));

        match number.parse::<f64>() {
            Ok(amount) if amount.is_finite() => Ok(Value::new(amount, unit)),
            _ => Err(ParseValueError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.unit == Unit::Number {
            serializer.serialize_f64(self.amount)
        } else {
            serializer.collect_str(self)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(amount) => Ok(Value::number(amount)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(1000.0, 800.0);

    #[test]
    fn parses_units() {
        assert_eq!("-55vw".parse::<Value>().unwrap(), Value::vw(-55.0));
        assert_eq!("10vh".parse::<Value>().unwrap(), Value::vh(10.0));
        assert_eq!("24px".parse::<Value>().unwrap(), Value::px(24.0));
        assert_eq!(" 1.06 ".parse::<Value>().unwrap(), Value::number(1.06));
        assert_eq!("0".parse::<Value>().unwrap(), Value::number(0.0));
    }

    #[test]
    fn rejects_garbage() {
        assert!("vw".parse::<Value>().is_err());
        assert!("12em".parse::<Value>().is_err());
        assert!("".parse::<Value>().is_err());
        assert!("NaN".parse::<Value>().is_err());
        assert!("inf".parse::<Value>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for value in [Value::vw(-55.0), Value::vh(10.0), Value::px(-24.5), Value::number(0.7)] {
            assert_eq!(value.to_string().parse::<Value>().unwrap(), value);
        }
    }

    #[test]
    fn lerp_adopts_unit_of_nonzero_endpoint() {
        let entering = Value::vw(-60.0).lerp(Value::number(0.0), 0.5);
        assert_eq!(entering, Value::vw(-30.0));

        let leaving = Value::number(0.0).lerp(Value::vw(-55.0), 0.5);
        assert_eq!(leaving, Value::vw(-27.5));
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let from = Value::number(1.0);
        let to = Value::number(0.0);
        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
    }

    #[test]
    fn mismatched_units_fall_back_to_destination() {
        let value = Value::vh(10.0).lerp(Value::px(20.0), 1.0);
        assert_eq!(value, Value::px(20.0));
    }

    #[test]
    fn resolves_to_pixels() {
        assert_eq!(Value::vw(-55.0).to_px(VIEWPORT), -550.0);
        assert_eq!(Value::vh(10.0).to_px(VIEWPORT), 80.0);
        assert_eq!(Value::px(24.0).to_px(VIEWPORT), 24.0);
        assert_eq!(Value::number(0.5).to_px(VIEWPORT), 0.5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_accepts_numbers_and_strings() {
        let values: Vec<Value> = serde_json::from_str(r#"[0, 1.06, "-55vw", "18px"]"#).unwrap();
        assert_eq!(
            values,
            vec![Value::number(0.0), Value::number(1.06), Value::vw(-55.0), Value::px(18.0)]
        );
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[0.0,1.06,"-55vw","18px"]"#);
    }
}
