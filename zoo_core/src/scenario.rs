//! Scenario files: a JSON description of a zoo and a day of events.
//!
//! Entities are named by scenario keys ("dune", "daniel") and are mapped to the
//! ids the registry allocates as they are added. Replaying a scenario builds
//! the zoo, places animals, assigns staff and then applies every event in file
//! order. An event the zoo rejects (a housing rule, a role check) is logged
//! and skipped; a key that names nothing is a structural error.

use crate::activity::parse_timestamp;
use crate::animal::AnimalProfile;
use crate::config::ScheduleConfig;
use crate::health::PlannedTreatment;
use crate::staff::Role;
use crate::zoo::Zoo;
use crate::{Action, Error, Habitat, Level, Result, ShiftAmount};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;

/// A timestamp accepted in any of the log formats ("2004-11-12 07:00:00")
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestamp(pub NaiveDateTime);

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .map(Timestamp)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub enclosures: Vec<EnclosureSpec>,
    #[serde(default)]
    pub animals: Vec<AnimalSpec>,
    #[serde(default)]
    pub staff: Vec<StaffSpec>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
pub struct EnclosureSpec {
    pub key: String,
    pub name: String,
    pub habitat: Habitat,
    pub size: u32,
}

#[derive(Debug, Deserialize)]
pub struct AnimalSpec {
    pub key: String,
    /// Key of the enclosure the animal starts in
    #[serde(default)]
    pub enclosure: Option<String>,
    #[serde(default)]
    pub diet: Vec<DietEntry>,
    #[serde(flatten)]
    pub profile: AnimalProfile,
}

#[derive(Debug, Deserialize)]
pub struct DietEntry {
    pub time: NaiveTime,
    pub food: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct StaffSpec {
    pub key: String,
    pub name: String,
    pub role: Role,
    /// Enclosure keys
    #[serde(default)]
    pub assignments: Vec<String>,
    #[serde(default)]
    pub assigned_at: Option<Timestamp>,
    #[serde(default)]
    pub special_tasks: Vec<SpecialTaskSpec>,
}

#[derive(Debug, Deserialize)]
pub struct SpecialTaskSpec {
    pub time: NaiveTime,
    /// Key of any animal, enclosure or staff member
    pub target: String,
    pub action: Action,
    pub details: String,
}

fn one_level() -> ShiftAmount {
    ShiftAmount::Levels(1)
}

/// One timestamped interaction, applied through the registry
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Feed {
        at: Timestamp,
        staff: String,
        animal: String,
        food: String,
        amount: String,
    },
    CleanEnclosure {
        at: Timestamp,
        staff: String,
        enclosure: String,
    },
    CleanAnimal {
        at: Timestamp,
        staff: String,
        animal: String,
    },
    SoilEnclosure {
        at: Timestamp,
        enclosure: String,
        #[serde(default = "one_level")]
        levels: ShiftAmount,
    },
    SoilAnimal {
        at: Timestamp,
        animal: String,
        #[serde(default = "one_level")]
        levels: ShiftAmount,
    },
    CheckHealth {
        at: Timestamp,
        staff: String,
        animal: String,
        details: String,
        severity: Level,
    },
    Diagnose {
        at: Timestamp,
        staff: String,
        animal: String,
        details: String,
        severity: Level,
        treatment: String,
        #[serde(default)]
        plan: Vec<PlannedTreatment>,
    },
    Treat {
        at: Timestamp,
        staff: String,
        animal: String,
        details: String,
        severity: Level,
    },
    DeclareRecovery {
        at: Timestamp,
        staff: String,
        animal: String,
        details: String,
    },
    Drink {
        at: Timestamp,
        animal: String,
        liquid: String,
        amount: String,
    },
    Sleep {
        at: Timestamp,
        animal: String,
    },
    MakeSound {
        at: Timestamp,
        animal: String,
    },
    SignatureActivity {
        at: Timestamp,
        animal: String,
    },
    Age {
        at: Timestamp,
        animal: String,
        years: u32,
    },
}

impl Event {
    pub fn at(&self) -> NaiveDateTime {
        match self {
            Event::Feed { at, .. }
            | Event::CleanEnclosure { at, .. }
            | Event::CleanAnimal { at, .. }
            | Event::SoilEnclosure { at, .. }
            | Event::SoilAnimal { at, .. }
            | Event::CheckHealth { at, .. }
            | Event::Diagnose { at, .. }
            | Event::Treat { at, .. }
            | Event::DeclareRecovery { at, .. }
            | Event::Drink { at, .. }
            | Event::Sleep { at, .. }
            | Event::MakeSound { at, .. }
            | Event::SignatureActivity { at, .. }
            | Event::Age { at, .. } => at.0,
        }
    }
}

/// A replayed zoo together with the key-to-id mapping used to build it
pub struct Replay {
    pub zoo: Zoo,
    ids: BTreeMap<String, String>,
    /// Events the zoo rejected
    pub skipped: usize,
}

impl Replay {
    /// Registry id allocated for a scenario key
    pub fn id_of(&self, key: &str) -> Result<&str> {
        self.ids
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::Scenario(format!("unknown key '{}'", key)))
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let scenario = Self::from_json(&contents)?;
        tracing::info!("Loaded scenario '{}' from {:?}", scenario.name, path);
        Ok(scenario)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Build the zoo and apply every event in order
    pub fn replay(&self, schedule: ScheduleConfig) -> Result<Replay> {
        let mut zoo = Zoo::new(self.name.clone(), schedule);
        let mut ids = BTreeMap::new();

        for spec in &self.enclosures {
            let id = zoo.add_enclosure(&spec.name, spec.habitat, spec.size)?;
            register(&mut ids, &spec.key, id)?;
        }

        for spec in &self.animals {
            let id = zoo.add_animal(spec.profile.clone())?;
            register(&mut ids, &spec.key, id.clone())?;

            let animal = zoo.animal_mut(&id)?;
            for entry in &spec.diet {
                animal.add_to_diet(&entry.food, &entry.amount, entry.time)?;
            }
            if let Some(key) = &spec.enclosure {
                let enclosure = lookup(&ids, key)?;
                zoo.house_animal(&id, enclosure)?;
            }
        }

        for spec in &self.staff {
            let id = zoo.add_staff(&spec.name, spec.role)?;
            register(&mut ids, &spec.key, id.clone())?;

            if !spec.assignments.is_empty() {
                let at = spec.assigned_at.ok_or_else(|| {
                    Error::Scenario(format!("staff '{}' has assignments but no assigned_at", spec.key))
                })?;
                for key in &spec.assignments {
                    zoo.assign_staff(&id, lookup(&ids, key)?, at.0)?;
                }
            }
        }

        // Special tasks may target staff declared later in the file
        for spec in &self.staff {
            let id = lookup(&ids, &spec.key)?;
            for task in &spec.special_tasks {
                let target = lookup(&ids, &task.target)?;
                zoo.add_special_task(id, task.time, target, task.action, &task.details)?;
            }
        }

        let mut skipped = 0;
        for (index, event) in self.events.iter().enumerate() {
            if let Err(e) = apply(&mut zoo, &ids, event) {
                if matches!(e, Error::Scenario(_)) {
                    return Err(e);
                }
                tracing::warn!("Skipping event {} at {}: {}", index + 1, event.at(), e);
                skipped += 1;
            }
        }

        tracing::info!(
            "Replayed scenario '{}': {} events applied, {} skipped",
            self.name,
            self.events.len() - skipped,
            skipped
        );
        Ok(Replay { zoo, ids, skipped })
    }
}

fn register(ids: &mut BTreeMap<String, String>, key: &str, id: String) -> Result<()> {
    if ids.insert(key.to_string(), id).is_some() {
        return Err(Error::Scenario(format!("duplicate key '{}'", key)));
    }
    Ok(())
}

fn lookup<'a>(ids: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str> {
    ids.get(key)
        .map(String::as_str)
        .ok_or_else(|| Error::Scenario(format!("unknown key '{}'", key)))
}

fn apply(zoo: &mut Zoo, ids: &BTreeMap<String, String>, event: &Event) -> Result<()> {
    let at = event.at();
    match event {
        Event::Feed {
            staff,
            animal,
            food,
            amount,
            ..
        } => {
            zoo.feed(lookup(ids, staff)?, lookup(ids, animal)?, food, amount, at)?;
        }
        Event::CleanEnclosure {
            staff, enclosure, ..
        } => {
            zoo.clean_enclosure(lookup(ids, staff)?, lookup(ids, enclosure)?, at)?;
        }
        Event::CleanAnimal { staff, animal, .. } => {
            zoo.clean_animal(lookup(ids, staff)?, lookup(ids, animal)?, at)?;
        }
        Event::SoilEnclosure {
            enclosure, levels, ..
        } => {
            zoo.soil_enclosure(lookup(ids, enclosure)?, levels.clone(), at)?;
        }
        Event::SoilAnimal { animal, levels, .. } => {
            zoo.soil_animal(lookup(ids, animal)?, levels.clone(), at)?;
        }
        Event::CheckHealth {
            staff,
            animal,
            details,
            severity,
            ..
        } => {
            zoo.check_health(lookup(ids, staff)?, lookup(ids, animal)?, details, *severity, at)?;
        }
        Event::Diagnose {
            staff,
            animal,
            details,
            severity,
            treatment,
            plan,
            ..
        } => {
            zoo.diagnose(
                lookup(ids, staff)?,
                lookup(ids, animal)?,
                details,
                *severity,
                treatment,
                plan,
                at,
            )?;
        }
        Event::Treat {
            staff,
            animal,
            details,
            severity,
            ..
        } => {
            zoo.treat(lookup(ids, staff)?, lookup(ids, animal)?, details, *severity, at)?;
        }
        Event::DeclareRecovery {
            staff,
            animal,
            details,
            ..
        } => {
            zoo.declare_recovery(lookup(ids, staff)?, lookup(ids, animal)?, details, at)?;
        }
        Event::Drink {
            animal,
            liquid,
            amount,
            ..
        } => {
            zoo.animal_mut(lookup(ids, animal)?)?.drink(liquid, amount, at)?;
        }
        Event::Sleep { animal, .. } => {
            zoo.animal_mut(lookup(ids, animal)?)?.sleep(at)?;
        }
        Event::MakeSound { animal, .. } => {
            zoo.animal_mut(lookup(ids, animal)?)?.make_sound(at)?;
        }
        Event::SignatureActivity { animal, .. } => {
            zoo.animal_mut(lookup(ids, animal)?)?.signature_activity(at)?;
        }
        Event::Age { animal, years, .. } => {
            zoo.animal_mut(lookup(ids, animal)?)?.become_older(*years, at)?;
        }
    }
    Ok(())
}
