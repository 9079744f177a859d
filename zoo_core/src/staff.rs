//! Staff members: role, enclosure assignments, special tasks and activity log.

use crate::activity::{ActivityLog, ActivityRow};
use crate::aggregate::PlanRules;
use crate::config::ScheduleConfig;
use crate::schedule::{DailySchedule, ScheduleRow};
use crate::{Action, Error, Identity, RefCounter, RefNumber, Result};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Zookeeper,
    Veterinarian,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Zookeeper => "ZOOKEEPER",
            Role::Veterinarian => "VETERINARIAN",
        }
    }

    /// Routine rows this role contributes to a daily plan
    pub fn plan_rules(&self, config: &ScheduleConfig) -> PlanRules {
        match self {
            Role::Zookeeper => PlanRules::zookeeper(config),
            Role::Veterinarian => PlanRules::veterinarian(config),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug)]
pub struct Staff {
    identity: Identity,
    role: Role,
    assignments: Vec<Identity>,
    special_tasks: DailySchedule,
    log: ActivityLog,
}

impl Staff {
    pub fn new(identity: Identity, role: Role, counter: &RefCounter) -> Self {
        Self {
            special_tasks: DailySchedule::new(format!("{} Special Task", identity), counter),
            log: ActivityLog::new(format!("{} General Activity", identity), counter),
            assignments: Vec::new(),
            identity,
            role,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Enclosures this staff member is responsible for, in assignment order
    pub fn assignments(&self) -> &[Identity] {
        &self.assignments
    }

    pub fn is_assigned(&self, enclosure_id: &str) -> bool {
        self.assignments.iter().any(|a| a.id == enclosure_id)
    }

    pub fn special_tasks(&self) -> &DailySchedule {
        &self.special_tasks
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Take responsibility for an enclosure. Returns false for a duplicate.
    pub fn assign(&mut self, enclosure: &Identity, at: NaiveDateTime) -> Result<bool> {
        if self.is_assigned(&enclosure.id) {
            tracing::debug!("{} is already assigned to {}", self.identity, enclosure);
            return Ok(false);
        }
        self.record(enclosure, Action::Assign, "Enclosure", at)?;
        self.assignments.push(enclosure.clone());
        Ok(true)
    }

    /// Drop responsibility for an enclosure. Returns false if it was not assigned.
    pub fn unassign(&mut self, enclosure: &Identity, at: NaiveDateTime) -> Result<bool> {
        if !self.is_assigned(&enclosure.id) {
            tracing::debug!("{} is not assigned to {}", self.identity, enclosure);
            return Ok(false);
        }
        self.record(enclosure, Action::Unassign, "Enclosure", at)?;
        self.assignments.retain(|a| a.id != enclosure.id);
        Ok(true)
    }

    /// Add a non-routine task to this staff member's plan
    pub fn add_special_task(
        &mut self,
        at: NaiveTime,
        object: &Identity,
        action: Action,
        details: &str,
    ) -> Result<RefNumber> {
        self.special_tasks
            .append(ScheduleRow::new(at, &self.identity, object, action, details))
    }

    pub fn special_tasks_mut(&mut self) -> &mut DailySchedule {
        &mut self.special_tasks
    }

    /// Log an action this staff member performed on `object`
    pub fn record(
        &mut self,
        object: &Identity,
        action: Action,
        details: &str,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        self.log
            .append(ActivityRow::new(at, &self.identity, object, action, details))
    }

    /// Fail unless this staff member has `role`
    pub fn require_role(&self, role: Role, task: &str) -> Result<()> {
        if self.role != role {
            return Err(Error::NotPermitted(format!(
                "{} is a {} and cannot {}.",
                self.identity,
                self.role.label().to_lowercase(),
                task
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Staff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "<{}> ID: {} | NAME: {}",
            self.role, self.identity.id, self.identity.name
        )?;
        writeln!(f, " > Assigned Enclosures: {}", self.assignments.len())?;
        for enclosure in &self.assignments {
            writeln!(f, "   > {}", enclosure)?;
        }
        Ok(())
    }
}
