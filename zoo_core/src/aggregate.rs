//! Daily plan building and combined reports.
//!
//! A staff member's daily plan is never stored. It is rebuilt from scratch on
//! every request by merging their special tasks with routine rows for each
//! assigned site and rows derived live from each inhabitant's own schedules.

use crate::config::ScheduleConfig;
use crate::ledger::{Ledger, Record};
use crate::schedule::{DailySchedule, ScheduleRow};
use crate::{Action, Identity, RefCounter, Result};
use chrono::NaiveTime;

/// A fixed-time row emitted once per site or once per inhabitant
#[derive(Clone, Debug, PartialEq)]
pub struct RoutineTask {
    pub at: NaiveTime,
    pub action: Action,
    pub details: String,
}

/// Which of an inhabitant's own schedules a plan reads from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleSource {
    Diet,
    Treatments,
}

/// Copy every row of an inhabitant's schedule into the plan as `action`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivedTask {
    pub source: ScheduleSource,
    pub action: Action,
}

/// What a role contributes to its daily plan
#[derive(Clone, Debug, Default)]
pub struct PlanRules {
    pub site_task: Option<RoutineTask>,
    pub inhabitant_task: Option<RoutineTask>,
    pub derived: Option<DerivedTask>,
}

impl PlanRules {
    /// Clean every assigned enclosure, feed every inhabitant per its diet
    pub fn zookeeper(config: &ScheduleConfig) -> Self {
        Self {
            site_task: Some(RoutineTask {
                at: config.keeper_clean_time,
                action: Action::Clean,
                details: config.routine_details.clone(),
            }),
            inhabitant_task: None,
            derived: Some(DerivedTask {
                source: ScheduleSource::Diet,
                action: Action::Feed,
            }),
        }
    }

    /// Check every inhabitant, administer every prescribed treatment
    pub fn veterinarian(config: &ScheduleConfig) -> Self {
        Self {
            site_task: None,
            inhabitant_task: Some(RoutineTask {
                at: config.vet_check_time,
                action: Action::CheckHealth,
                details: config.routine_details.clone(),
            }),
            derived: Some(DerivedTask {
                source: ScheduleSource::Treatments,
                action: Action::Treat,
            }),
        }
    }
}

/// Anything living on an assigned site whose schedules feed a daily plan
pub trait Inhabitant {
    fn identity(&self) -> &Identity;

    fn schedule(&self, source: ScheduleSource) -> &DailySchedule;
}

/// One assigned site and the inhabitants currently living there
pub struct Assignment<'a> {
    pub site: &'a Identity,
    pub inhabitants: Vec<&'a dyn Inhabitant>,
}

/// Build `owner`'s full daily plan
///
/// Rows are emitted in this order: every special task, then for each site its
/// site task followed by, per inhabitant, the inhabitant task and the derived
/// rows. Rendering regroups them by time of day. Special tasks keep their
/// reference numbers; every generated row is issued a new one.
pub fn build_daily_plan(
    owner: &Identity,
    special_tasks: &DailySchedule,
    assignments: &[Assignment<'_>],
    rules: &PlanRules,
) -> Result<DailySchedule> {
    let mut plan = DailySchedule::new(format!("{} Daily Task", owner), special_tasks.counter());
    plan.extend_from(special_tasks);

    for assignment in assignments {
        if let Some(task) = &rules.site_task {
            plan.append(routine_row(owner, assignment.site, task))?;
        }

        for inhabitant in &assignment.inhabitants {
            let who = inhabitant.identity();
            if let Some(task) = &rules.inhabitant_task {
                plan.append(routine_row(owner, who, task))?;
            }
            if let Some(derived) = &rules.derived {
                for row in inhabitant.schedule(derived.source).rows() {
                    plan.append(ScheduleRow::new(
                        row.time,
                        owner,
                        who,
                        derived.action,
                        row.details.as_str(),
                    ))?;
                }
            }
        }
    }

    tracing::info!(
        "Built daily plan for {} ({} rows over {} sites)",
        owner,
        plan.len(),
        assignments.len()
    );
    Ok(plan)
}

fn routine_row(owner: &Identity, object: &Identity, task: &RoutineTask) -> ScheduleRow {
    ScheduleRow::new(task.at, owner, object, task.action, task.details.as_str())
}

/// Merge many ledgers of one schema into a fresh, request-scoped ledger
///
/// Rows keep the reference numbers they were issued at their origin. Empty
/// sources are skipped, and no input rows at all yields an empty ledger.
pub fn combine<'a, R, I>(name: impl Into<String>, counter: &RefCounter, ledgers: I) -> Ledger<R>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a Ledger<R>>,
{
    let mut combined = Ledger::new(name, counter);
    let mut sources = 0;
    for ledger in ledgers.into_iter().filter(|l| !l.is_empty()) {
        combined.extend_from(ledger);
        sources += 1;
    }
    tracing::debug!(
        "Combined {} rows from {} ledgers into '{}'",
        combined.len(),
        sources,
        combined.name()
    );
    combined
}
