//! Daily schedules: dateless, time-of-day keyed plans.
//!
//! Rendering groups rows by each distinct time of day, orders the groups
//! ascending and numbers them `EVENT 1`, `EVENT 2`, ... Rows inside a group
//! keep their insertion order.

use crate::activity::{object_clause, parse_action, parse_identity, validate_parties, ObjectPosition};
use crate::ledger::{field, Entry, Ledger, Record};
use crate::{Action, Error, Identity, Result};
use chrono::NaiveTime;
use std::collections::BTreeMap;

/// Display format of times of day
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Ledger of recurring daily plan entries
pub type DailySchedule = Ledger<ScheduleRow>;

/// One planned action at a time of day
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleRow {
    pub time: NaiveTime,
    pub subject: Identity,
    pub object: Identity,
    pub action: Action,
    pub details: String,
}

impl ScheduleRow {
    pub fn new(
        time: NaiveTime,
        subject: &Identity,
        object: &Identity,
        action: Action,
        details: impl Into<String>,
    ) -> Self {
        Self {
            time,
            subject: subject.clone(),
            object: object.clone(),
            action,
            details: details.into(),
        }
    }

    pub fn by_self(time: NaiveTime, who: &Identity, action: Action, details: impl Into<String>) -> Self {
        Self::new(time, who, who, action, details)
    }
}

impl Record for ScheduleRow {
    const FIELDS: &'static [&'static str] = &[
        "Time",
        "SubjectID",
        "SubjectName",
        "ObjectID",
        "ObjectName",
        "Action",
        "Details",
    ];
    const HEADING: &'static str = "SCHEDULE";
    const EMPTY_MESSAGE: &'static str = "No events scheduled.";

    fn validate(&self) -> Result<()> {
        validate_parties(&self.subject, &self.object)
    }

    fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self> {
        Ok(Self {
            time: parse_time_of_day(field(fields, "Time")?)?,
            subject: parse_identity(fields, "Subject")?,
            object: parse_identity(fields, "Object")?,
            action: parse_action(field(fields, "Action")?)?,
            details: field(fields, "Details")?.to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.time.format(TIME_FORMAT).to_string(),
            self.subject.id.clone(),
            self.subject.name.clone(),
            self.object.id.clone(),
            self.object.name.clone(),
            self.action.as_str().to_string(),
            self.details.clone(),
        ]
    }

    fn render_body(entries: &[Entry<Self>]) -> String {
        let mut output = String::new();
        for (number, (time, rows)) in group_by_time(entries).into_iter().enumerate() {
            output.push_str(&format!("\n\nEVENT {} @ {}", number + 1, time.format(TIME_FORMAT)));
            for entry in rows {
                let row = &entry.row;
                output.push_str(&format!(
                    "\n - {} to {} {}({})",
                    row.subject,
                    row.action.imperative(),
                    object_clause(&row.subject, &row.object, ObjectPosition::After),
                    row.details
                ));
            }
        }
        output
    }
}

impl Ledger<ScheduleRow> {
    /// Remove every row strictly between `after` and `before`
    ///
    /// A missing bound is open, so `remove(None, None)` clears the whole
    /// schedule. Returns the number of rows removed; removing from an empty
    /// schedule is a no-op.
    pub fn remove(&mut self, after: Option<NaiveTime>, before: Option<NaiveTime>) -> usize {
        let removed = self.retain(|e| {
            let t = e.row.time;
            let past_start = after.map_or(true, |a| t > a);
            let before_end = before.map_or(true, |b| t < b);
            !(past_start && before_end)
        });

        if removed == 0 {
            tracing::debug!("Nothing to remove from '{}'", self.name());
        } else {
            tracing::debug!("Removed {} rows from '{}'", removed, self.name());
        }
        removed
    }

    /// Remove every row
    pub fn clear(&mut self) -> usize {
        self.remove(None, None)
    }

    /// Distinct times of day in ascending order with their rows
    pub fn slots(&self) -> Vec<(NaiveTime, Vec<&Entry<ScheduleRow>>)> {
        group_by_time(self.entries())
    }
}

fn group_by_time(entries: &[Entry<ScheduleRow>]) -> Vec<(NaiveTime, Vec<&Entry<ScheduleRow>>)> {
    let mut groups: BTreeMap<NaiveTime, Vec<&Entry<ScheduleRow>>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.row.time).or_default().push(entry);
    }
    groups.into_iter().collect()
}

/// Parse a time of day written as `HH:MM:SS` or `HH:MM`
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| Error::invalid_field("Time", format!("'{}' is not a time of day", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RULE;
    use crate::RefCounter;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn jane() -> Identity {
        Identity::new("1", "Jane")
    }

    fn john() -> Identity {
        Identity::new("34", "John")
    }

    fn mary() -> Identity {
        Identity::new("5", "Mary")
    }

    fn keepers_schedule() -> DailySchedule {
        let mut schedule = DailySchedule::new("Zookeepers' Daily", &RefCounter::new());
        let lagoon = Identity::new("3", "Blue Lagoon Enclosure");
        schedule
            .append(ScheduleRow::new(t(9, 30), &john(), &jane(), Action::Feed, "1x apple"))
            .unwrap();
        schedule
            .append(ScheduleRow::new(t(14, 0), &mary(), &jane(), Action::Feed, "3 cups milk"))
            .unwrap();
        schedule
            .append(ScheduleRow::new(t(14, 30), &mary(), &lagoon, Action::Clean, "sweep only"))
            .unwrap();
        schedule
            .append(ScheduleRow::new(t(9, 30), &john(), &jane(), Action::Treat, "apply ointment"))
            .unwrap();
        schedule
    }

    #[test]
    fn test_self_directed_rows() {
        let mut schedule = DailySchedule::new("Jane's Dietary", &RefCounter::new());
        schedule
            .append(ScheduleRow::by_self(t(9, 30), &jane(), Action::Eat, "1x apple"))
            .unwrap();
        schedule
            .append(ScheduleRow::by_self(t(9, 30), &jane(), Action::Drink, "3 cups milk"))
            .unwrap();

        assert_eq!(
            schedule.render(),
            format!(
                "{RULE}\nJANE'S DIETARY SCHEDULE:\n\nEVENT 1 @ 09:30:00\n - Jane_1 to eat (1x apple)\n - Jane_1 to drink (3 cups milk)\n{RULE}\n"
            )
        );
    }

    #[test]
    fn test_groups_sorted_by_time_regardless_of_insertion() {
        let mut schedule = DailySchedule::new("s", &RefCounter::new());
        for (h, m) in [(14, 30), (9, 30), (14, 0)] {
            schedule
                .append(ScheduleRow::by_self(t(h, m), &jane(), Action::Sleep, "nap"))
                .unwrap();
        }
        let times: Vec<_> = schedule.slots().into_iter().map(|(time, _)| time).collect();
        assert_eq!(times, vec![t(9, 30), t(14, 0), t(14, 30)]);

        let rendered = schedule.render();
        assert!(rendered.contains("EVENT 1 @ 09:30:00"));
        assert!(rendered.contains("EVENT 2 @ 14:00:00"));
        assert!(rendered.contains("EVENT 3 @ 14:30:00"));
    }

    #[test]
    fn test_event_grouping_keeps_insertion_order_within_slot() {
        let expected = format!(
            "{RULE}\nZOOKEEPERS' DAILY SCHEDULE:\
             \n\nEVENT 1 @ 09:30:00\
             \n - John_34 to feed Jane_1 (1x apple)\
             \n - John_34 to treat Jane_1 (apply ointment)\
             \n\nEVENT 2 @ 14:00:00\
             \n - Mary_5 to feed Jane_1 (3 cups milk)\
             \n\nEVENT 3 @ 14:30:00\
             \n - Mary_5 to clean Blue Lagoon Enclosure_3 (sweep only)\
             \n{RULE}\n"
        );
        assert_eq!(keepers_schedule().render(), expected);
    }

    #[test]
    fn test_remove_uses_exclusive_bounds() {
        let mut schedule = keepers_schedule();
        let removed = schedule.remove(Some(t(14, 0)), Some(t(14, 30)));
        assert_eq!(removed, 0);

        let removed = schedule.remove(Some(t(13, 59)), Some(t(14, 15)));
        assert_eq!(removed, 1);
        assert_eq!(schedule.len(), 3);
        assert!(!schedule.render().contains("14:00:00"));
    }

    #[test]
    fn test_remove_defaults_clear_everything_and_repeat_is_noop() {
        let mut schedule = keepers_schedule();
        schedule
            .append(ScheduleRow::by_self(t(0, 0), &jane(), Action::Sleep, "midnight"))
            .unwrap();

        assert_eq!(schedule.remove(None, None), 5);
        assert!(schedule.is_empty());
        assert!(schedule.render().contains("\nNo events scheduled.\n"));

        assert_eq!(schedule.clear(), 0);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("09:00:00").unwrap(), t(9, 0));
        assert_eq!(parse_time_of_day("18:30").unwrap(), t(18, 30));
        assert!(matches!(
            parse_time_of_day("25:00"),
            Err(Error::InvalidField { .. })
        ));
        assert!(parse_time_of_day("").is_err());
    }

    #[test]
    fn test_append_fields_rejects_malformed_time() {
        let mut schedule = DailySchedule::new("s", &RefCounter::new());
        let mut fields: BTreeMap<String, String> = ScheduleRow::FIELDS
            .iter()
            .map(|f| (f.to_string(), "x".to_string()))
            .collect();
        fields.insert("Action".into(), "feed".into());
        fields.insert("Time".into(), "noon".into());
        assert!(schedule.append_fields(&fields).is_err());

        fields.insert("Time".into(), "12:00".into());
        schedule.append_fields(&fields).unwrap();
        assert_eq!(schedule.len(), 1);
    }
}
