//! Enclosures and their housing rules.
//!
//! An enclosure houses animals of a single species whose habitat matches its
//! own. Animals under treatment cannot be moved in or out.

use crate::activity::ActivityLog;
use crate::animal::Animal;
use crate::cleanliness::{Cleanliness, Transition};
use crate::{Error, Habitat, Identity, RefCounter, Result, ShiftAmount};
use chrono::NaiveDateTime;
use std::fmt;

#[derive(Clone, Debug)]
pub struct Enclosure {
    identity: Identity,
    habitat: Habitat,
    /// Area in square meters
    size: u32,
    species: Option<String>,
    inhabitants: Vec<Identity>,
    log: ActivityLog,
    cleanliness: Cleanliness,
}

impl Enclosure {
    pub fn new(identity: Identity, habitat: Habitat, size: u32, counter: &RefCounter) -> Self {
        Self {
            log: ActivityLog::new(format!("{} Maintenance", identity), counter),
            cleanliness: Cleanliness::new(identity.clone()),
            species: None,
            inhabitants: Vec::new(),
            identity,
            habitat,
            size,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn habitat(&self) -> Habitat {
        self.habitat
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Species currently housed, `None` while empty
    pub fn species(&self) -> Option<&str> {
        self.species.as_deref()
    }

    pub fn inhabitants(&self) -> &[Identity] {
        &self.inhabitants
    }

    pub fn is_empty(&self) -> bool {
        self.inhabitants.is_empty()
    }

    pub fn houses(&self, animal_id: &str) -> bool {
        self.inhabitants.iter().any(|i| i.id == animal_id)
    }

    /// Maintenance log
    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn cleanliness(&self) -> &Cleanliness {
        &self.cleanliness
    }

    /// Check every housing rule without changing anything
    pub fn check_admission(&self, animal: &Animal) -> Result<()> {
        ensure_movable(animal)?;
        if animal.habitat() != self.habitat {
            return Err(Error::Placement(format!(
                "{} requires a(n) {} habitat and cannot live in a(n) {} enclosure.",
                animal.identity(),
                animal.habitat().label().to_uppercase(),
                self.habitat.label().to_uppercase()
            )));
        }
        match self.species.as_deref() {
            Some(species) if species != animal.species() => Err(Error::Placement(format!(
                "{} cannot live in {} as animals of a different species already live there ({}).",
                animal.identity(),
                self.identity,
                species
            ))),
            _ => Ok(()),
        }
    }

    /// House `animal`. Housing an animal that already lives here is a no-op.
    pub fn house(&mut self, animal: &Animal) -> Result<()> {
        self.check_admission(animal)?;
        if self.houses(animal.id()) {
            tracing::debug!("{} already lives in {}", animal.identity(), self.identity);
            return Ok(());
        }
        self.inhabitants.push(animal.identity().clone());
        self.species = Some(animal.species().to_string());
        tracing::info!("{} now lives in {}", animal.identity(), self.identity);
        Ok(())
    }

    /// Remove `animal`, returning whether it lived here
    pub fn release(&mut self, animal: &Animal) -> Result<bool> {
        ensure_movable(animal)?;
        let before = self.inhabitants.len();
        self.inhabitants.retain(|i| i.id != animal.id());
        if self.inhabitants.len() == before {
            return Ok(false);
        }
        if self.inhabitants.is_empty() {
            self.species = None;
        }
        tracing::info!("{} left {}", animal.identity(), self.identity);
        Ok(true)
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
}

fn ensure_movable(animal: &Animal) -> Result<()> {
    if animal.under_treatment() {
        return Err(Error::Placement(format!(
            "{} is under treatment so they cannot be relocated at this time.",
            animal.identity()
        )));
    }
    Ok(())
}

impl fmt::Display for Enclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ID: {} | NAME: {} | ENVIRONMENTAL TYPE: {}",
            self.identity.id, self.identity.name, self.habitat
        )?;
        writeln!(f, " > Species: {}", self.species().unwrap_or("None"))?;
        writeln!(f, " > Size: {} squared meters", self.size)?;
        writeln!(f, " > Cleanliness: {}", self.cleanliness.current())?;
        writeln!(f, " > Inhabitants: {}", self.inhabitants.len())?;
        for inhabitant in &self.inhabitants {
            writeln!(f, "   > {}", inhabitant)?;
        }
        Ok(())
    }
}
