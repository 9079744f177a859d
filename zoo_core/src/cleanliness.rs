//! Cleanliness capability for animals and enclosures.
//!
//! Cleanliness starts at `Level::VeryHigh` and only changes through
//! [`Cleanliness::soil`] and [`Cleanliness::clean`]. Both saturate at the
//! ends of the scale and always log a row to the owner's activity log, even
//! when the level does not move.
//!
//! Bad shift amounts are recovered rather than rejected:
//! - non-numeric input becomes 1
//! - negative input becomes its absolute value
//! - zero becomes 1
//!
//! Each substitution is reported as a [`ShiftWarning`] and logged with `warn!`.

use crate::activity::{ActivityLog, ActivityRow};
use crate::{Action, Identity, Level, RefNumber, Result, ShiftAmount};
use chrono::NaiveDateTime;
use std::fmt;

/// Which way a cleanliness transition moves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Decrease,
    Increase,
}

impl Direction {
    fn verb(&self) -> &'static str {
        match self {
            Self::Decrease => "decrease",
            Self::Increase => "increase",
        }
    }
}

/// A shift amount that was replaced before the transition ran
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShiftWarning {
    NonNumeric { direction: Direction },
    Negative { direction: Direction, substituted: i64 },
    Zero { direction: Direction },
}

impl fmt::Display for ShiftWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonNumeric { direction } => write!(
                f,
                "Provided number of levels to {} cleanliness is non-numeric. Default value of 1 has been assumed.",
                direction.verb()
            ),
            Self::Negative {
                direction,
                substituted,
            } => write!(
                f,
                "Cleanliness can only {} by a positive number of levels. Absolute value ({} levels) has been assumed.",
                direction.verb(),
                substituted
            ),
            Self::Zero { direction } => write!(
                f,
                "Cleanliness can only {} by a non-zero number of levels. Default value of 1 has been assumed.",
                direction.verb()
            ),
        }
    }
}

/// Outcome of a cleanliness transition
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub level: Level,
    pub reference: RefNumber,
    pub warning: Option<ShiftWarning>,
}

/// Cleanliness state attached to one entity
#[derive(Clone, Debug)]
pub struct Cleanliness {
    owner: Identity,
    level: Level,
}

impl Cleanliness {
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            level: Level::MAX,
        }
    }

    pub fn current(&self) -> Level {
        self.level
    }

    /// Lower cleanliness by `levels` (saturating at `Level::MIN`)
    pub fn soil(
        &mut self,
        log: &mut ActivityLog,
        levels: impl Into<ShiftAmount>,
        at: NaiveDateTime,
    ) -> Result<Transition> {
        let (levels, warning) = normalize(&levels.into(), Direction::Decrease);
        let next = self.level.shift(-levels);
        let row = ActivityRow::by_self(at, &self.owner, Action::BecomeDirtier, describe(next));
        self.commit(log, row, next, warning)
    }

    /// Raise cleanliness by `levels` (saturating at `Level::MAX`), crediting `cleaner`
    pub fn clean(
        &mut self,
        log: &mut ActivityLog,
        cleaner: &Identity,
        levels: impl Into<ShiftAmount>,
        at: NaiveDateTime,
    ) -> Result<Transition> {
        let (levels, warning) = normalize(&levels.into(), Direction::Increase);
        let next = self.level.shift(levels);
        let row = ActivityRow::new(at, &self.owner, cleaner, Action::ReceiveCleaning, describe(next));
        self.commit(log, row, next, warning)
    }

    fn commit(
        &mut self,
        log: &mut ActivityLog,
        row: ActivityRow,
        next: Level,
        warning: Option<ShiftWarning>,
    ) -> Result<Transition> {
        // log first so a rejected row leaves the level untouched
        let reference = log.append(row)?;
        self.level = next;
        tracing::debug!("{} cleanliness is now {}", self.owner, next);
        Ok(Transition {
            level: next,
            reference,
            warning,
        })
    }
}

fn describe(level: Level) -> String {
    format!("cleanliness is now '{}'", level.label())
}

/// Turn any requested amount into a positive number of levels
fn normalize(amount: &ShiftAmount, direction: Direction) -> (i64, Option<ShiftWarning>) {
    let (levels, warning) = match amount.levels() {
        Err(_) => (1, Some(ShiftWarning::NonNumeric { direction })),
        Ok(0) => (1, Some(ShiftWarning::Zero { direction })),
        Ok(n) if n < 0 => {
            let substituted = n.saturating_abs();
            (
                substituted,
                Some(ShiftWarning::Negative {
                    direction,
                    substituted,
                }),
            )
        }
        Ok(n) => (n, None),
    };

    if let Some(ref w) = warning {
        tracing::warn!("{}", w);
    }
    (levels, warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RefCounter;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2004, 11, 12)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn setup() -> (Cleanliness, ActivityLog) {
        crate::logging::init_test();
        let pinky = Identity::new("A1", "Pinky");
        (
            Cleanliness::new(pinky),
            ActivityLog::new("Pinky_A1 General Activity", &RefCounter::new()),
        )
    }

    fn chloe() -> Identity {
        Identity::new("S2", "Chloe")
    }

    #[test]
    fn test_starts_at_maximum() {
        let (c, _) = setup();
        assert_eq!(c.current(), Level::VeryHigh);
    }

    #[test]
    fn test_soil_saturates_and_always_logs() {
        let (mut c, mut log) = setup();
        for expected in [Level::High, Level::Moderate, Level::Low, Level::VeryLow] {
            let t = c.soil(&mut log, 1, at(9)).unwrap();
            assert_eq!(t.level, expected);
            assert!(t.warning.is_none());
        }
        assert_eq!(log.len(), 4);

        c.soil(&mut log, 1, at(10)).unwrap();
        c.soil(&mut log, 3, at(11)).unwrap();
        assert_eq!(c.current(), Level::VeryLow);
        assert_eq!(log.len(), 6);
    }

    #[test]
    fn test_soil_recovers_invalid_amounts() {
        let (mut c, mut log) = setup();

        let t = c.soil(&mut log, "five", at(9)).unwrap();
        assert_eq!(t.level, Level::High);
        assert_eq!(
            t.warning,
            Some(ShiftWarning::NonNumeric {
                direction: Direction::Decrease
            })
        );
        let row = &log.entries()[0].row;
        assert_eq!(row.action, Action::BecomeDirtier);
        assert_eq!(row.details, "cleanliness is now 'High'");
        assert_eq!(row.subject, row.object);

        let t = c.soil(&mut log, -2, at(10)).unwrap();
        assert_eq!(t.level, Level::Low);
        assert_eq!(
            t.warning.unwrap().to_string(),
            "Cleanliness can only decrease by a positive number of levels. Absolute value (2 levels) has been assumed."
        );

        let t = c.soil(&mut log, 0, at(11)).unwrap();
        assert_eq!(t.level, Level::VeryLow);
        assert!(matches!(t.warning, Some(ShiftWarning::Zero { .. })));

        let t = c.soil(&mut log, 3, at(12)).unwrap();
        assert_eq!(t.level, Level::VeryLow);
        assert!(t.warning.is_none());
    }

    #[test]
    fn test_clean_credits_cleaner_and_saturates() {
        let (mut c, mut log) = setup();
        c.soil(&mut log, 5, at(8)).unwrap();
        assert_eq!(c.current(), Level::VeryLow);

        let t = c.clean(&mut log, &chloe(), "five", at(9)).unwrap();
        assert_eq!(t.level, Level::Low);
        let row = &log.entries()[1].row;
        assert_eq!(row.action, Action::ReceiveCleaning);
        assert_eq!(row.object, chloe());
        assert_eq!(row.details, "cleanliness is now 'Low'");

        assert_eq!(c.clean(&mut log, &chloe(), -2, at(10)).unwrap().level, Level::High);
        assert_eq!(c.clean(&mut log, &chloe(), 0, at(11)).unwrap().level, Level::VeryHigh);
        assert_eq!(c.clean(&mut log, &chloe(), 3, at(12)).unwrap().level, Level::VeryHigh);
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn test_rejected_row_keeps_level() {
        let (mut c, mut log) = setup();
        let nobody = Identity::new("", "");
        assert!(c.clean(&mut log, &nobody, 1, at(9)).is_err());
        assert!(c.soil(&mut log, 1, at(9)).is_ok());
        let before = c.current();
        assert!(c.clean(&mut log, &nobody, 1, at(10)).is_err());
        assert_eq!(c.current(), before);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_rendered_log_lines() {
        let (mut c, mut log) = setup();
        c.soil(&mut log, 3, at(0)).unwrap();
        c.clean(&mut log, &Identity::new("S1", "Daniel"), 1, at(7)).unwrap();
        let rendered = log.render();
        assert!(rendered.contains(
            "[2004-11-12 00:00:00] Pinky_A1 becomes dirtier (cleanliness is now 'Low')."
        ));
        assert!(rendered.contains(
            "[2004-11-12 07:00:00] Pinky_A1 is cleaned by Daniel_S1 (cleanliness is now 'Moderate')."
        ));
    }
}
