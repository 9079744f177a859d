//! Animals: identity, activity log, diet plan and both capabilities.

use crate::activity::{ActivityLog, ActivityRow};
use crate::aggregate::{Inhabitant, ScheduleSource};
use crate::cleanliness::{Cleanliness, Transition};
use crate::health::HealthStatus;
use crate::ledger::require_non_empty;
use crate::schedule::{DailySchedule, ScheduleRow};
use crate::{Action, Error, Habitat, Identity, RefCounter, RefNumber, Result, ShiftAmount};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Profiles
// ============================================================================

/// Class-specific traits of an animal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum AnimalKind {
    Mammal {
        fur_colour: String,
        #[serde(default)]
        nocturnal: bool,
    },
    Bird {
        wingspan_cm: f64,
        #[serde(default = "default_can_fly")]
        can_fly: bool,
    },
    Reptile {
        scale_type: String,
        #[serde(default)]
        venomous: bool,
    },
}

fn default_can_fly() -> bool {
    true
}

impl AnimalKind {
    fn default_sound(&self) -> Option<&'static str> {
        match self {
            AnimalKind::Bird { .. } => Some("Squawk"),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            AnimalKind::Mammal { fur_colour, .. } => require_non_empty("fur_colour", fur_colour),
            AnimalKind::Bird { wingspan_cm, .. } => {
                if wingspan_cm.is_finite() && *wingspan_cm > 0.0 {
                    Ok(())
                } else {
                    Err(Error::invalid_field(
                        "wingspan_cm",
                        "bird wingspan must be greater than zero",
                    ))
                }
            }
            AnimalKind::Reptile { scale_type, .. } => require_non_empty("scale_type", scale_type),
        }
    }
}

/// Everything needed to register a new animal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimalProfile {
    pub name: String,
    pub species: String,
    pub habitat: Habitat,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(flatten)]
    pub kind: AnimalKind,
}

impl AnimalProfile {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("species", &self.species)?;
        self.kind.validate()
    }
}

// ============================================================================
// Animal
// ============================================================================

#[derive(Clone, Debug)]
pub struct Animal {
    identity: Identity,
    species: String,
    habitat: Habitat,
    age: u32,
    sound: Option<String>,
    kind: AnimalKind,
    log: ActivityLog,
    diet: DailySchedule,
    cleanliness: Cleanliness,
    health: HealthStatus,
}

impl Animal {
    /// Build an animal with id `id` from a validated profile
    pub fn new(id: impl Into<String>, profile: AnimalProfile, counter: &RefCounter) -> Result<Self> {
        profile.validate()?;
        let identity = Identity::new(id, profile.name);
        let sound = profile
            .sound
            .or_else(|| profile.kind.default_sound().map(str::to_string));

        Ok(Self {
            log: ActivityLog::new(format!("{} General Activity", identity), counter),
            diet: DailySchedule::new(format!("{} Dietary", identity), counter),
            cleanliness: Cleanliness::new(identity.clone()),
            health: HealthStatus::new(identity.clone(), counter),
            species: profile.species,
            habitat: profile.habitat,
            age: profile.age,
            kind: profile.kind,
            sound,
            identity,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn habitat(&self) -> Habitat {
        self.habitat
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn kind(&self) -> &AnimalKind {
        &self.kind
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn diet(&self) -> &DailySchedule {
        &self.diet
    }

    pub fn cleanliness(&self) -> &Cleanliness {
        &self.cleanliness
    }

    pub fn health(&self) -> &HealthStatus {
        &self.health
    }

    pub fn under_treatment(&self) -> bool {
        self.health.under_treatment()
    }

    /// Add a daily feeding, e.g. `add_to_diet("fish", "3x whole", 09:00)`
    pub fn add_to_diet(&mut self, food: &str, amount: &str, at: NaiveTime) -> Result<RefNumber> {
        let row = ScheduleRow::by_self(at, &self.identity, Action::Eat, portion(food, amount));
        self.diet.append(row)
    }

    pub fn eat(&mut self, food: &str, amount: &str, at: NaiveDateTime) -> Result<RefNumber> {
        self.log_self(Action::Eat, portion(food, amount), at)
    }

    pub fn drink(&mut self, liquid: &str, amount: &str, at: NaiveDateTime) -> Result<RefNumber> {
        self.log_self(Action::Drink, portion(liquid, amount), at)
    }

    pub fn sleep(&mut self, at: NaiveDateTime) -> Result<RefNumber> {
        self.log_self(Action::Sleep, "Zzz...", at)
    }

    /// Log the animal's sound; silent animals log nothing
    pub fn make_sound(&mut self, at: NaiveDateTime) -> Result<Option<RefNumber>> {
        match self.sound.clone() {
            Some(sound) => self.log_self(Action::Speak, format!("'{}'", sound), at).map(Some),
            None => {
                tracing::debug!("{} makes no sound", self.identity);
                Ok(None)
            }
        }
    }

    pub fn become_older(&mut self, years: u32, at: NaiveDateTime) -> Result<RefNumber> {
        let age = self.age.saturating_add(years);
        let details = format!("by {} year(s) to become {} year(s) old", years, age);
        let reference = self.log_self(Action::Age, details, at)?;
        self.age = age;
        Ok(reference)
    }

    /// The behaviour particular to the animal's class
    ///
    /// Birds try to fly, mammals groom and reptiles bask.
    pub fn signature_activity(&mut self, at: NaiveDateTime) -> Result<RefNumber> {
        let (action, details) = match &self.kind {
            AnimalKind::Bird { can_fly, .. } => {
                let outcome = if *can_fly { "succeeds" } else { "fails" };
                (Action::Fly, outcome.to_string())
            }
            AnimalKind::Mammal { fur_colour, .. } => (
                Action::Groom,
                format!("picks at its {} fur", fur_colour.to_lowercase()),
            ),
            AnimalKind::Reptile { .. } => (Action::Bask, "to regulate body temperature".to_string()),
        };
        self.log_self(action, details, at)
    }

    pub fn become_dirtier(
        &mut self,
        levels: impl Into<ShiftAmount>,
        at: NaiveDateTime,
    ) -> Result<Transition> {
        self.cleanliness.soil(&mut self.log, levels, at)
    }

    pub fn receive_cleaning(
        &mut self,
        cleaner: &Identity,
        levels: impl Into<ShiftAmount>,
        at: NaiveDateTime,
    ) -> Result<Transition> {
        self.cleanliness.clean(&mut self.log, cleaner, levels, at)
    }

    pub fn health_mut(&mut self) -> &mut HealthStatus {
        &mut self.health
    }

    fn log_self(&mut self, action: Action, details: impl Into<String>, at: NaiveDateTime) -> Result<RefNumber> {
        self.log
            .append(ActivityRow::by_self(at, &self.identity, action, details))
    }
}

impl Inhabitant for Animal {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn schedule(&self, source: ScheduleSource) -> &DailySchedule {
        match source {
            ScheduleSource::Diet => &self.diet,
            ScheduleSource::Treatments => self.health.treatments(),
        }
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.under_treatment() {
            "[UNDER TREATMENT]"
        } else {
            "[HEALTHY]"
        };
        writeln!(
            f,
            "ID: {} | NAME: {} | SPECIES: {}",
            self.identity.id, self.identity.name, self.species
        )?;
        writeln!(f, " > Age: {} year(s) old.", self.age)?;
        writeln!(f, " > Health Status: {}", status)?;
        writeln!(f, " > Cleanliness: {}", self.cleanliness.current())?;
        match &self.kind {
            AnimalKind::Mammal {
                fur_colour,
                nocturnal,
            } => {
                writeln!(f, " > Fur colour: {}", fur_colour)?;
                writeln!(f, " > Nocturnal: {}", yes_no(*nocturnal))
            }
            AnimalKind::Bird {
                wingspan_cm,
                can_fly,
            } => {
                writeln!(f, " > Wingspan: {}cm", wingspan_cm)?;
                writeln!(f, " > Can fly: {}", yes_no(*can_fly))
            }
            AnimalKind::Reptile {
                scale_type,
                venomous,
            } => {
                writeln!(f, " > Scale type: {}", scale_type)?;
                writeln!(f, " > Venomous: {}", yes_no(*venomous))
            }
        }
    }
}

fn portion(item: &str, amount: &str) -> String {
    format!("{} {}", amount, item)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
