//! Five-point ordinal scale used for both cleanliness and medical severity.
//!
//! Shifting a level is saturating: the result is always clamped to
//! `[Level::MIN, Level::MAX]`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value on the closed five-point scale
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Level {
    /// All levels in ascending rank order
    pub const ALL: [Level; 5] = [
        Level::VeryLow,
        Level::Low,
        Level::Moderate,
        Level::High,
        Level::VeryHigh,
    ];

    pub const MIN: Level = Level::VeryLow;
    pub const MAX: Level = Level::VeryHigh;

    /// Numeric rank in `1..=5`
    pub fn rank(&self) -> u8 {
        match self {
            Self::VeryLow => 1,
            Self::Low => 2,
            Self::Moderate => 3,
            Self::High => 4,
            Self::VeryHigh => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// First level defined with the given rank
    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.rank() == rank)
    }

    /// Parse a label ("Very High"), a snake_case name ("very_high") or a rank ("5")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(rank) = s.parse::<u8>() {
            return Self::from_rank(rank);
        }
        let normalized = s.to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|l| l.label().to_lowercase() == normalized)
    }

    /// Move `delta` ranks up (positive) or down (negative), clamped to the scale
    pub fn shift(self, delta: i64) -> Level {
        let min = i64::from(Self::MIN.rank());
        let max = i64::from(Self::MAX.rank());
        let target = (i64::from(self.rank()).saturating_add(delta)).clamp(min, max);
        // target is within [1, 5] so the lookup always succeeds
        Self::from_rank(target as u8).unwrap_or(self)
    }

    /// Shift by an amount that may have come from untyped input
    ///
    /// Fails with `InvalidTransitionInput` if the amount is not numeric.
    pub fn shift_by(self, amount: &ShiftAmount) -> Result<Level> {
        Ok(self.shift(amount.levels()?))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of levels to move, either already typed or as raw user input
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ShiftAmount {
    Levels(i64),
    Raw(String),
}

impl ShiftAmount {
    /// Interpret the amount as a whole number of levels
    ///
    /// Fractional input is truncated toward zero.
    pub fn levels(&self) -> Result<i64> {
        match self {
            ShiftAmount::Levels(n) => Ok(*n),
            ShiftAmount::Raw(raw) => {
                let trimmed = raw.trim();
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Ok(n);
                }
                match trimmed.parse::<f64>() {
                    Ok(f) if f.is_finite() => Ok(f.trunc() as i64),
                    _ => Err(Error::InvalidTransitionInput(format!(
                        "'{}' is not a number of levels",
                        raw
                    ))),
                }
            }
        }
    }
}

impl Default for ShiftAmount {
    fn default() -> Self {
        ShiftAmount::Levels(1)
    }
}

impl From<i64> for ShiftAmount {
    fn from(n: i64) -> Self {
        ShiftAmount::Levels(n)
    }
}

impl From<i32> for ShiftAmount {
    fn from(n: i32) -> Self {
        ShiftAmount::Levels(i64::from(n))
    }
}

impl From<&str> for ShiftAmount {
    fn from(s: &str) -> Self {
        ShiftAmount::Raw(s.to_string())
    }
}

impl From<String> for ShiftAmount {
    fn from(s: String) -> Self {
        ShiftAmount::Raw(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_contiguous() {
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.rank() as usize, i + 1);
            assert_eq!(Level::from_rank(level.rank()), Some(*level));
        }
        assert_eq!(Level::from_rank(0), None);
        assert_eq!(Level::from_rank(6), None);
    }

    #[test]
    fn test_shift_clamps_to_scale() {
        for level in Level::ALL {
            for delta in -10..=10 {
                let shifted = level.shift(delta);
                assert!((1..=5).contains(&shifted.rank()));
            }
        }
        assert_eq!(Level::VeryHigh.shift(3), Level::VeryHigh);
        assert_eq!(Level::Low.shift(-4), Level::VeryLow);
        assert_eq!(Level::Moderate.shift(i64::MIN), Level::VeryLow);
        assert_eq!(Level::Moderate.shift(i64::MAX), Level::VeryHigh);
    }

    #[test]
    fn test_shift_roundtrip_away_from_bounds() {
        for level in Level::ALL {
            for delta in -4i64..=4 {
                let target = i64::from(level.rank()) + delta;
                if (1..=5).contains(&target) {
                    assert_eq!(level.shift(delta).shift(-delta), level);
                }
            }
        }
    }

    #[test]
    fn test_shift_by_raw_input() {
        assert_eq!(
            Level::Moderate.shift_by(&ShiftAmount::from("2")).unwrap(),
            Level::VeryHigh
        );
        assert_eq!(
            Level::Moderate.shift_by(&ShiftAmount::from("-1.9")).unwrap(),
            Level::Low
        );
        let err = Level::Moderate
            .shift_by(&ShiftAmount::from("five"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransitionInput(_)));
    }

    #[test]
    fn test_parse_accepts_labels_names_and_ranks() {
        assert_eq!(Level::parse("Very High"), Some(Level::VeryHigh));
        assert_eq!(Level::parse("very_low"), Some(Level::VeryLow));
        assert_eq!(Level::parse("3"), Some(Level::Moderate));
        assert_eq!(Level::parse("extreme"), None);
    }

    #[test]
    fn test_shift_amount_deserializes_numbers_and_strings() {
        let n: ShiftAmount = serde_json::from_str("3").unwrap();
        assert_eq!(n, ShiftAmount::Levels(3));
        let s: ShiftAmount = serde_json::from_str("\"five\"").unwrap();
        assert_eq!(s, ShiftAmount::Raw("five".into()));
    }
}
