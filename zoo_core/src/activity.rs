//! Timestamped ledgers: activity logs and medical logs.
//!
//! Both render chronologically (ties broken by reference number). A row whose
//! object is the subject itself omits the object from its rendered line.

use crate::ledger::{field, require_non_empty, Entry, Ledger, Record};
use crate::{Action, Error, Identity, Level, Result};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Display format of timestamps in rendered logs and CSV exports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED_TIMESTAMP_FORMATS: [&str; 3] =
    [TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Ledger of historical actions performed by or on an entity
pub type ActivityLog = Ledger<ActivityRow>;

/// Ledger of health events, each with a severity and prescribed treatment
pub type MedicalLog = Ledger<MedicalRow>;

/// One historical action. Subject is the actor, object the recipient.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRow {
    pub timestamp: NaiveDateTime,
    pub subject: Identity,
    pub object: Identity,
    pub action: Action,
    pub details: String,
}

impl ActivityRow {
    pub fn new(
        timestamp: NaiveDateTime,
        subject: &Identity,
        object: &Identity,
        action: Action,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            subject: subject.clone(),
            object: object.clone(),
            action,
            details: details.into(),
        }
    }

    /// A self-directed action (subject and object are the same entity)
    pub fn by_self(
        timestamp: NaiveDateTime,
        who: &Identity,
        action: Action,
        details: impl Into<String>,
    ) -> Self {
        Self::new(timestamp, who, who, action, details)
    }

    fn headline(&self) -> String {
        format!(
            "[{}] {} {}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.subject,
            self.action.present_tense(),
            object_clause(&self.subject, &self.object, ObjectPosition::Before)
        )
    }
}

impl Record for ActivityRow {
    const FIELDS: &'static [&'static str] = &[
        "Timestamp",
        "SubjectID",
        "SubjectName",
        "ObjectID",
        "ObjectName",
        "Action",
        "Details",
    ];
    const HEADING: &'static str = "LOG";
    const EMPTY_MESSAGE: &'static str = "No data recorded.";

    fn validate(&self) -> Result<()> {
        validate_parties(&self.subject, &self.object)
    }

    fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self> {
        Ok(Self {
            timestamp: parse_timestamp(field(fields, "Timestamp")?)?,
            subject: parse_identity(fields, "Subject")?,
            object: parse_identity(fields, "Object")?,
            action: parse_action(field(fields, "Action")?)?,
            details: field(fields, "Details")?.to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.subject.id.clone(),
            self.subject.name.clone(),
            self.object.id.clone(),
            self.object.name.clone(),
            self.action.as_str().to_string(),
            self.details.clone(),
        ]
    }

    fn render_body(entries: &[Entry<Self>]) -> String {
        let mut output = String::from("\n");
        for entry in chronological(entries, |row| row.timestamp) {
            output.push_str(&format!("\n{} ({}).", entry.row.headline(), entry.row.details));
        }
        output
    }
}

/// One health event on the subject's medical history
#[derive(Clone, Debug, PartialEq)]
pub struct MedicalRow {
    pub event: ActivityRow,
    pub severity: Level,
    /// Prescribed treatment; rendered as "NA" when absent
    pub treatment: Option<String>,
}

impl MedicalRow {
    pub fn new(event: ActivityRow, severity: Level, treatment: Option<String>) -> Self {
        Self {
            event,
            severity,
            treatment,
        }
    }

    pub fn treatment_label(&self) -> &str {
        self.treatment.as_deref().unwrap_or("NA")
    }
}

/// Widening an activity row gives it the lowest severity and no treatment
impl From<ActivityRow> for MedicalRow {
    fn from(event: ActivityRow) -> Self {
        Self::new(event, Level::MIN, None)
    }
}

impl Record for MedicalRow {
    const FIELDS: &'static [&'static str] = &[
        "Timestamp",
        "SubjectID",
        "SubjectName",
        "ObjectID",
        "ObjectName",
        "Action",
        "Details",
        "Severity",
        "Treatment",
    ];
    const HEADING: &'static str = "LOG";
    const EMPTY_MESSAGE: &'static str = "No medical history recorded.";

    fn validate(&self) -> Result<()> {
        self.event.validate()
    }

    fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self> {
        let event = ActivityRow::from_fields(fields)?;
        let raw_severity = field(fields, "Severity")?;
        let severity = Level::parse(raw_severity).ok_or_else(|| {
            Error::invalid_field("Severity", format!("'{}' is not a severity level", raw_severity))
        })?;
        let treatment = match field(fields, "Treatment")?.trim() {
            "" | "NA" => None,
            other => Some(other.to_string()),
        };
        Ok(Self::new(event, severity, treatment))
    }

    fn to_fields(&self) -> Vec<String> {
        let mut values = self.event.to_fields();
        values.push(self.severity.label().to_string());
        values.push(self.treatment_label().to_string());
        values
    }

    fn render_body(entries: &[Entry<Self>]) -> String {
        let mut output = String::new();
        for entry in chronological(entries, |row| row.event.timestamp) {
            let row = &entry.row;
            output.push_str(&format!(
                "\n\n{};\n > Description: {}\n > Severity: {}\n > Treatment: {}\nlog ref number: {}",
                row.event.headline(),
                row.event.details,
                row.severity.label(),
                row.treatment_label(),
                entry.reference
            ));
        }
        output
    }
}

/// Entries sorted by their timestamp, ties kept in reference order
fn chronological<R>(
    entries: &[Entry<R>],
    key: impl Fn(&R) -> NaiveDateTime,
) -> Vec<&Entry<R>> {
    let mut ordered: Vec<&Entry<R>> = entries.iter().collect();
    ordered.sort_by_key(|e| (key(&e.row), e.reference));
    ordered
}

#[derive(Clone, Copy)]
pub(crate) enum ObjectPosition {
    /// " Obj_ID", placed after a verb
    Before,
    /// "Obj_ID ", placed before a parenthesised detail
    After,
}

/// The rendered object, or nothing for self-directed actions
pub(crate) fn object_clause(
    subject: &Identity,
    object: &Identity,
    position: ObjectPosition,
) -> String {
    if subject == object {
        return String::new();
    }
    match position {
        ObjectPosition::Before => format!(" {}", object),
        ObjectPosition::After => format!("{} ", object),
    }
}

pub(crate) fn validate_parties(subject: &Identity, object: &Identity) -> Result<()> {
    require_non_empty("SubjectID", &subject.id)?;
    require_non_empty("SubjectName", &subject.name)?;
    require_non_empty("ObjectID", &object.id)?;
    require_non_empty("ObjectName", &object.name)
}

pub(crate) fn parse_identity(fields: &BTreeMap<String, String>, role: &str) -> Result<Identity> {
    Ok(Identity::new(
        field(fields, &format!("{}ID", role))?,
        field(fields, &format!("{}Name", role))?,
    ))
}

pub(crate) fn parse_action(raw: &str) -> Result<Action> {
    Action::from_str(raw).ok_or_else(|| {
        Error::invalid_field("Action", format!("'{}' is not in the Action vocabulary", raw))
    })
}

/// Parse a timestamp in any of the accepted formats
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    ACCEPTED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| Error::invalid_field("Timestamp", format!("'{}' is not a valid instant", raw)))
}
