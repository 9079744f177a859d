//! Health capability: medical history plus pending treatment plan.
//!
//! Two states only, tracked by `under_treatment`:
//!
//! ```text
//! Healthy --diagnose--> UnderTreatment --recover--> Healthy
//! ```
//!
//! Health checks and treatments are valid in either state and never change
//! it. Re-diagnosis while already under treatment adds more scheduled
//! treatments. Every operation returns the medical log reference number so a
//! staff member can cite it from their own activity log.

use crate::activity::{ActivityRow, MedicalLog, MedicalRow};
use crate::ledger::Record;
use crate::schedule::{DailySchedule, ScheduleRow};
use crate::{Action, Identity, Level, RefCounter, RefNumber, Result};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One prescribed treatment at a time of day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedTreatment {
    pub at: NaiveTime,
    pub description: String,
}

impl PlannedTreatment {
    pub fn new(at: NaiveTime, description: impl Into<String>) -> Self {
        Self {
            at,
            description: description.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    owner: Identity,
    under_treatment: bool,
    medical_log: MedicalLog,
    treatments: DailySchedule,
}

impl HealthStatus {
    pub fn new(owner: Identity, counter: &RefCounter) -> Self {
        Self {
            medical_log: MedicalLog::new(format!("{} Medical", owner), counter),
            treatments: DailySchedule::new(format!("{} Treatment", owner), counter),
            under_treatment: false,
            owner,
        }
    }

    pub fn under_treatment(&self) -> bool {
        self.under_treatment
    }

    pub fn medical_log(&self) -> &MedicalLog {
        &self.medical_log
    }

    /// Daily plan of prescribed treatments
    pub fn treatments(&self) -> &DailySchedule {
        &self.treatments
    }

    pub fn receive_health_check(
        &mut self,
        examiner: &Identity,
        details: &str,
        severity: Level,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        self.record(examiner, Action::ReceiveHealthCheck, details, severity, None, at)
    }

    /// Record a diagnosis, schedule its treatments and mark the owner under treatment
    ///
    /// All rows are checked before anything is stored, so a rejected
    /// diagnosis leaves the schedule, the flag and the medical log untouched.
    pub fn diagnose(
        &mut self,
        examiner: &Identity,
        details: &str,
        severity: Level,
        treatment: &str,
        plan: &[PlannedTreatment],
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        let scheduled: Vec<ScheduleRow> = plan
            .iter()
            .map(|p| {
                ScheduleRow::by_self(p.at, &self.owner, Action::ReceiveTreatment, p.description.as_str())
            })
            .collect();
        let diagnosis = self.medical_row(
            examiner,
            Action::ReceiveDiagnosis,
            details,
            severity,
            Some(treatment.to_string()),
            at,
        );

        for row in &scheduled {
            row.validate()?;
        }
        diagnosis.validate()?;

        for row in scheduled {
            self.treatments.append(row)?;
        }
        self.under_treatment = true;
        let reference = self.medical_log.append(diagnosis)?;

        tracing::info!(
            "{} diagnosed by {} with {} treatments scheduled",
            self.owner,
            examiner,
            plan.len()
        );
        Ok(reference)
    }

    pub fn receive_treatment(
        &mut self,
        treater: &Identity,
        details: &str,
        severity: Level,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        self.record(treater, Action::ReceiveTreatment, details, severity, None, at)
    }

    /// Declare the owner recovered and drop every scheduled treatment
    ///
    /// Recovery is always logged at the lowest severity. Declaring an already
    /// healthy owner recovered still logs the row.
    pub fn recover(
        &mut self,
        examiner: &Identity,
        details: &str,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        let row = self.medical_row(examiner, Action::Recover, details, Level::MIN, None, at);
        row.validate()?;

        if !self.under_treatment {
            tracing::debug!("{} was not under treatment", self.owner);
        }
        self.under_treatment = false;
        self.treatments.clear();
        self.medical_log.append(row)
    }

    fn record(
        &mut self,
        other: &Identity,
        action: Action,
        details: &str,
        severity: Level,
        treatment: Option<String>,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        let row = self.medical_row(other, action, details, severity, treatment, at);
        self.medical_log.append(row)
    }

    fn medical_row(
        &self,
        other: &Identity,
        action: Action,
        details: &str,
        severity: Level,
        treatment: Option<String>,
        at: NaiveDateTime,
    ) -> MedicalRow {
        MedicalRow::new(
            ActivityRow::new(at, &self.owner, other, action, details),
            severity,
            treatment,
        )
    }
}
