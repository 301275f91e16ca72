#![forbid(unsafe_code)]

//! Entrance / settle / exit phases of a pinned section.
//!
//! Every pinned section divides its local progress into three bands:
//!
//! ```text
//! 0.0        0.3                    0.7        1.0
//! |-entrance-|--------settle--------|---exit---|
//! ```
//!
//! Content animates in during the entrance band, holds still while settled,
//! and animates out during the exit band. The boundaries also define where a
//! tween without an explicit end stops (see [`natural_end`]).

/// Local progress at which the entrance band ends.
pub const ENTRANCE_END: f64 = 0.3;

/// Local progress at which the exit band starts.
pub const EXIT_START: f64 = 0.7;

/// Named sub-range of a section's local progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Phase {
    Entrance,
    Settle,
    Exit,
}

impl Phase {
    /// Classify a local progress value. Out-of-range input is clamped first.
    #[must_use]
    pub fn at(progress: f64) -> Self {
        let t = clamp_unit(progress);
        if t < ENTRANCE_END {
            Self::Entrance
        } else if t < EXIT_START {
            Self::Settle
        } else {
            Self::Exit
        }
    }

    /// Progress band `[start, end)` covered by this phase (`Exit` includes 1.0).
    #[must_use]
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Entrance => (0.0, ENTRANCE_END),
            Self::Settle => (ENTRANCE_END, EXIT_START),
            Self::Exit => (EXIT_START, 1.0),
        }
    }
}

/// Where a tween keyed at `offset` stops when no explicit end is given:
/// the end of the phase band the offset falls in.
#[must_use]
pub fn natural_end(offset: f64) -> f64 {
    Phase::at(offset).bounds().1
}

/// Clamp to `[0, 1]`, mapping NaN to `0`.
#[inline]
#[must_use]
pub fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_bands() {
        assert_eq!(Phase::at(0.0), Phase::Entrance);
        assert_eq!(Phase::at(0.29), Phase::Entrance);
        assert_eq!(Phase::at(0.3), Phase::Settle);
        assert_eq!(Phase::at(0.69), Phase::Settle);
        assert_eq!(Phase::at(0.7), Phase::Exit);
        assert_eq!(Phase::at(1.0), Phase::Exit);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(Phase::at(-4.0), Phase::Entrance);
        assert_eq!(Phase::at(7.0), Phase::Exit);
        assert_eq!(Phase::at(f64::NAN), Phase::Entrance);
    }

    #[test]
    fn natural_end_follows_band() {
        assert_eq!(natural_end(0.0), ENTRANCE_END);
        assert_eq!(natural_end(0.15), ENTRANCE_END);
        assert_eq!(natural_end(0.4), EXIT_START);
        assert_eq!(natural_end(0.7), 1.0);
    }

    #[test]
    fn clamp_unit_handles_specials() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(f64::INFINITY), 1.0);
        assert_eq!(clamp_unit(f64::NEG_INFINITY), 0.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }
}
