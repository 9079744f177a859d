//! Zoo registry: owns every entity and the shared reference counter.
//!
//! All cross-entity interactions go through here so that both sides of an
//! interaction are logged. A staff member acting on an animal writes the
//! animal-side row first and then cites its reference number from their own
//! activity log.

use crate::activity::{ActivityLog, MedicalLog};
use crate::aggregate::{self, Assignment, Inhabitant};
use crate::animal::{Animal, AnimalProfile};
use crate::cleanliness::Transition;
use crate::config::ScheduleConfig;
use crate::enclosure::Enclosure;
use crate::health::PlannedTreatment;
use crate::ledger::RULE;
use crate::schedule::DailySchedule;
use crate::sequence::IdAllocator;
use crate::staff::{Role, Staff};
use crate::{Action, Error, Habitat, Identity, Level, RefCounter, RefNumber, Result, ShiftAmount};
use chrono::{NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;
use std::fmt;

const SECTION_RULE: &str = "-----------------------------------------";

pub struct Zoo {
    name: String,
    counter: RefCounter,
    schedule: ScheduleConfig,
    animal_ids: IdAllocator,
    enclosure_ids: IdAllocator,
    staff_ids: IdAllocator,
    animals: Vec<Animal>,
    enclosures: Vec<Enclosure>,
    staff: Vec<Staff>,
}

impl Zoo {
    pub fn new(name: impl Into<String>, schedule: ScheduleConfig) -> Self {
        Self {
            name: name.into(),
            counter: RefCounter::new(),
            schedule,
            animal_ids: IdAllocator::new("A"),
            enclosure_ids: IdAllocator::new("E"),
            staff_ids: IdAllocator::new("S"),
            animals: Vec::new(),
            enclosures: Vec::new(),
            staff: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn counter(&self) -> &RefCounter {
        &self.counter
    }

    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    pub fn enclosures(&self) -> &[Enclosure] {
        &self.enclosures
    }

    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn animal(&self, id: &str) -> Result<&Animal> {
        self.animals
            .iter()
            .find(|a| a.id() == id)
            .ok_or_else(|| unknown("animal", id))
    }

    pub fn animal_mut(&mut self, id: &str) -> Result<&mut Animal> {
        self.animals
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or_else(|| unknown("animal", id))
    }

    pub fn enclosure(&self, id: &str) -> Result<&Enclosure> {
        self.enclosures
            .iter()
            .find(|e| e.id() == id)
            .ok_or_else(|| unknown("enclosure", id))
    }

    pub fn staff_member(&self, id: &str) -> Result<&Staff> {
        self.staff
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| unknown("staff member", id))
    }

    /// Identity of any registered entity
    pub fn identity(&self, id: &str) -> Result<Identity> {
        self.animals
            .iter()
            .map(Animal::identity)
            .chain(self.enclosures.iter().map(Enclosure::identity))
            .chain(self.staff.iter().map(Staff::identity))
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| unknown("entity", id))
    }

    fn animal_index(&self, id: &str) -> Result<usize> {
        self.animals
            .iter()
            .position(|a| a.id() == id)
            .ok_or_else(|| unknown("animal", id))
    }

    fn enclosure_index(&self, id: &str) -> Result<usize> {
        self.enclosures
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| unknown("enclosure", id))
    }

    fn staff_index(&self, id: &str) -> Result<usize> {
        self.staff
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| unknown("staff member", id))
    }

    /// The enclosure an animal currently lives in, if any
    pub fn home_of(&self, animal_id: &str) -> Option<&Enclosure> {
        self.enclosures.iter().find(|e| e.houses(animal_id))
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a new animal, returning its allocated id
    pub fn add_animal(&mut self, profile: AnimalProfile) -> Result<String> {
        profile.validate()?;
        let id = self.animal_ids.next_id();
        let animal = Animal::new(id.clone(), profile, &self.counter)?;
        tracing::info!("Added animal {}", animal.identity());
        self.animals.push(animal);
        Ok(id)
    }

    /// Remove an animal, first releasing it from its enclosure
    pub fn remove_animal(&mut self, id: &str) -> Result<()> {
        let index = self.animal_index(id)?;
        let animal = &self.animals[index];
        if let Some(home) = self.enclosures.iter_mut().find(|e| e.houses(id)) {
            home.release(animal)?;
        }
        let removed = self.animals.remove(index);
        tracing::info!("Removed animal {}", removed.identity());
        Ok(())
    }

    pub fn add_enclosure(&mut self, name: &str, habitat: Habitat, size: u32) -> Result<String> {
        crate::ledger::require_non_empty("name", name)?;
        let id = self.enclosure_ids.next_id();
        let enclosure = Enclosure::new(Identity::new(id.clone(), name), habitat, size, &self.counter);
        tracing::info!("Added enclosure {}", enclosure.identity());
        self.enclosures.push(enclosure);
        Ok(id)
    }

    /// Remove an empty enclosure, unassigning every staff member from it
    pub fn remove_enclosure(&mut self, id: &str, at: NaiveDateTime) -> Result<()> {
        let index = self.enclosure_index(id)?;
        let enclosure = &self.enclosures[index];
        if !enclosure.is_empty() {
            return Err(Error::Placement(format!(
                "{} cannot be removed as it is not empty.",
                enclosure.identity()
            )));
        }
        let identity = enclosure.identity().clone();
        for member in &mut self.staff {
            member.unassign(&identity, at)?;
        }
        self.enclosures.remove(index);
        tracing::info!("Removed enclosure {}", identity);
        Ok(())
    }

    pub fn add_staff(&mut self, name: &str, role: Role) -> Result<String> {
        crate::ledger::require_non_empty("name", name)?;
        let id = self.staff_ids.next_id();
        let member = Staff::new(Identity::new(id.clone(), name), role, &self.counter);
        tracing::info!("Added {} {}", role.label().to_lowercase(), member.identity());
        self.staff.push(member);
        Ok(id)
    }

    pub fn remove_staff(&mut self, id: &str) -> Result<()> {
        let index = self.staff_index(id)?;
        let removed = self.staff.remove(index);
        tracing::info!("Removed staff member {}", removed.identity());
        Ok(())
    }

    // ========================================================================
    // Placement and assignment
    // ========================================================================

    /// House an animal that does not yet live in any enclosure
    pub fn house_animal(&mut self, animal_id: &str, enclosure_id: &str) -> Result<()> {
        let animal = &self.animals[self.animal_index(animal_id)?];
        let target = self.enclosure_index(enclosure_id)?;
        if let Some(home) = self.home_of(animal_id) {
            if home.id() != enclosure_id {
                return Err(Error::Placement(format!(
                    "{} already lives in {}; move it instead.",
                    animal.identity(),
                    home.identity()
                )));
            }
        }
        self.enclosures[target].house(animal)
    }

    /// Move an animal between enclosures, checking the destination first
    pub fn move_animal(&mut self, animal_id: &str, from_id: &str, to_id: &str) -> Result<()> {
        let animal = &self.animals[self.animal_index(animal_id)?];
        let from = self.enclosure_index(from_id)?;
        let to = self.enclosure_index(to_id)?;

        if !self.enclosures[from].houses(animal_id) {
            return Err(Error::Placement(format!(
                "{} does not live in {}.",
                animal.identity(),
                self.enclosures[from].identity()
            )));
        }
        if from == to {
            return Ok(());
        }
        self.enclosures[to].check_admission(animal)?;
        self.enclosures[from].release(animal)?;
        self.enclosures[to].house(animal)
    }

    pub fn assign_staff(&mut self, staff_id: &str, enclosure_id: &str, at: NaiveDateTime) -> Result<bool> {
        let enclosure = self.enclosure(enclosure_id)?.identity().clone();
        let index = self.staff_index(staff_id)?;
        self.staff[index].assign(&enclosure, at)
    }

    pub fn unassign_staff(&mut self, staff_id: &str, enclosure_id: &str, at: NaiveDateTime) -> Result<bool> {
        let enclosure = self.identity(enclosure_id)?;
        let index = self.staff_index(staff_id)?;
        self.staff[index].unassign(&enclosure, at)
    }

    pub fn add_special_task(
        &mut self,
        staff_id: &str,
        at: NaiveTime,
        object_id: &str,
        action: Action,
        details: &str,
    ) -> Result<RefNumber> {
        let object = self.identity(object_id)?;
        let index = self.staff_index(staff_id)?;
        self.staff[index].add_special_task(at, &object, action, details)
    }

    /// Remove special tasks strictly between `after` and `before`
    pub fn remove_special_tasks(
        &mut self,
        staff_id: &str,
        after: Option<NaiveTime>,
        before: Option<NaiveTime>,
    ) -> Result<usize> {
        let index = self.staff_index(staff_id)?;
        Ok(self.staff[index].special_tasks_mut().remove(after, before))
    }

    // ========================================================================
    // Zookeeper duties
    // ========================================================================

    /// Feed an animal: it eats, and the keeper logs the feeding
    pub fn feed(
        &mut self,
        keeper_id: &str,
        animal_id: &str,
        food: &str,
        amount: &str,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        let (keeper, animal) = self.pair(keeper_id, animal_id)?;
        self.staff[keeper].require_role(Role::Zookeeper, "feed animals")?;

        self.animals[animal].eat(food, amount, at)?;
        let object = self.animals[animal].identity().clone();
        self.staff[keeper].record(&object, Action::Feed, &format!("{} {}", amount, food), at)
    }

    /// A zookeeper cleans an enclosure by one level
    pub fn clean_enclosure(&mut self, keeper_id: &str, enclosure_id: &str, at: NaiveDateTime) -> Result<Transition> {
        let keeper = self.staff_index(keeper_id)?;
        let enclosure = self.enclosure_index(enclosure_id)?;
        self.staff[keeper].require_role(Role::Zookeeper, "clean enclosures")?;

        let cleaner = self.staff[keeper].identity().clone();
        let transition = self.enclosures[enclosure].receive_cleaning(&cleaner, 1, at)?;
        let object = self.enclosures[enclosure].identity().clone();
        self.staff[keeper].record(&object, Action::Clean, &self.schedule.routine_details, at)?;
        Ok(transition)
    }

    /// A zookeeper cleans an animal by one level
    pub fn clean_animal(&mut self, keeper_id: &str, animal_id: &str, at: NaiveDateTime) -> Result<Transition> {
        let (keeper, animal) = self.pair(keeper_id, animal_id)?;
        self.staff[keeper].require_role(Role::Zookeeper, "clean animals")?;

        let cleaner = self.staff[keeper].identity().clone();
        let transition = self.animals[animal].receive_cleaning(&cleaner, 1, at)?;
        let object = self.animals[animal].identity().clone();
        self.staff[keeper].record(&object, Action::Clean, &self.schedule.routine_details, at)?;
        Ok(transition)
    }

    pub fn soil_enclosure(
        &mut self,
        enclosure_id: &str,
        levels: impl Into<ShiftAmount>,
        at: NaiveDateTime,
    ) -> Result<Transition> {
        let index = self.enclosure_index(enclosure_id)?;
        self.enclosures[index].become_dirtier(levels, at)
    }

    pub fn soil_animal(
        &mut self,
        animal_id: &str,
        levels: impl Into<ShiftAmount>,
        at: NaiveDateTime,
    ) -> Result<Transition> {
        let index = self.animal_index(animal_id)?;
        self.animals[index].become_dirtier(levels, at)
    }

    // ========================================================================
    // Veterinarian duties
    // ========================================================================

    pub fn check_health(
        &mut self,
        vet_id: &str,
        animal_id: &str,
        details: &str,
        severity: Level,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        self.medical_action(vet_id, animal_id, (Action::CheckHealth, "perform health checks"), at, |health, vet| {
            health.receive_health_check(vet, details, severity, at)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn diagnose(
        &mut self,
        vet_id: &str,
        animal_id: &str,
        details: &str,
        severity: Level,
        treatment: &str,
        plan: &[PlannedTreatment],
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        self.medical_action(vet_id, animal_id, (Action::Diagnose, "diagnose animals"), at, |health, vet| {
            health.diagnose(vet, details, severity, treatment, plan, at)
        })
    }

    pub fn treat(
        &mut self,
        vet_id: &str,
        animal_id: &str,
        details: &str,
        severity: Level,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        self.medical_action(vet_id, animal_id, (Action::Treat, "treat animals"), at, |health, vet| {
            health.receive_treatment(vet, details, severity, at)
        })
    }

    pub fn declare_recovery(
        &mut self,
        vet_id: &str,
        animal_id: &str,
        details: &str,
        at: NaiveDateTime,
    ) -> Result<RefNumber> {
        self.medical_action(vet_id, animal_id, (Action::DeclareRecovery, "declare recovery"), at, |health, vet| {
            health.recover(vet, details, at)
        })
    }

    /// Run a medical operation on the animal, then log it on the vet's side
    ///
    /// Returns the animal's medical log reference.
    fn medical_action<F>(
        &mut self,
        vet_id: &str,
        animal_id: &str,
        (action, task): (Action, &str),
        at: NaiveDateTime,
        operation: F,
    ) -> Result<RefNumber>
    where
        F: FnOnce(&mut crate::health::HealthStatus, &Identity) -> Result<RefNumber>,
    {
        let (vet, animal) = self.pair(vet_id, animal_id)?;
        self.staff[vet].require_role(Role::Veterinarian, task)?;

        let examiner = self.staff[vet].identity().clone();
        let reference = operation(self.animals[animal].health_mut(), &examiner)?;
        let object = self.animals[animal].identity().clone();
        self.staff[vet].record(&object, action, &format!("log ref: {}", reference), at)?;
        Ok(reference)
    }

    fn pair(&self, staff_id: &str, animal_id: &str) -> Result<(usize, usize)> {
        Ok((self.staff_index(staff_id)?, self.animal_index(animal_id)?))
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// A staff member's full daily plan, rebuilt from current assignments
    pub fn daily_plan(&self, staff_id: &str) -> Result<DailySchedule> {
        let member = self.staff_member(staff_id)?;
        let mut assignments = Vec::with_capacity(member.assignments().len());
        for site in member.assignments() {
            let mut inhabitants: Vec<&dyn Inhabitant> = Vec::new();
            for resident in self.enclosure(&site.id)?.inhabitants() {
                inhabitants.push(self.animal(&resident.id)?);
            }
            assignments.push(Assignment { site, inhabitants });
        }

        aggregate::build_daily_plan(
            member.identity(),
            member.special_tasks(),
            &assignments,
            &member.role().plan_rules(&self.schedule),
        )
    }

    /// Every staff member's daily plan in one schedule
    pub fn staff_schedules(&self) -> Result<DailySchedule> {
        let plans = self
            .staff
            .iter()
            .map(|s| self.daily_plan(s.id()))
            .collect::<Result<Vec<_>>>()?;
        Ok(aggregate::combine("Combined Staff Daily", &self.counter, &plans))
    }

    pub fn animal_medical_history(&self, animal_id: &str) -> Result<&MedicalLog> {
        Ok(self.animal(animal_id)?.health().medical_log())
    }

    pub fn medical_history(&self) -> MedicalLog {
        aggregate::combine(
            "Combined Animal Medical",
            &self.counter,
            self.animals.iter().map(|a| a.health().medical_log()),
        )
    }

    pub fn staff_activity(&self) -> ActivityLog {
        aggregate::combine(
            "Combined Staff General Activity",
            &self.counter,
            self.staff.iter().map(Staff::log),
        )
    }

    pub fn enclosure_maintenance(&self) -> ActivityLog {
        aggregate::combine(
            "Combined Enclosure Maintenance",
            &self.counter,
            self.enclosures.iter().map(Enclosure::log),
        )
    }

    /// Animals grouped by species, species in alphabetical order
    pub fn species_report(&self) -> String {
        let mut by_species: BTreeMap<&str, Vec<&Animal>> = BTreeMap::new();
        for animal in &self.animals {
            by_species.entry(animal.species()).or_default().push(animal);
        }

        let mut output = format!("{}\nANIMALS BY SPECIES ({} total):\n", RULE, self.animals.len());
        for (species, animals) in by_species {
            output.push_str(&format!("\n{} ({}):", species, animals.len()));
            for animal in animals {
                output.push_str(&format!("\n - {}", animal.identity()));
            }
            output.push('\n');
        }
        output.push('\n');
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Animals not under treatment
    pub fn display_report(&self) -> String {
        let on_display: Vec<&Animal> = self.animals.iter().filter(|a| !a.under_treatment()).collect();
        let mut output = format!("{}\nANIMALS CURRENTLY ON DISPLAY ({}): \n", RULE, on_display.len());
        for animal in on_display {
            output.push_str(&format!("\n - {} ({})", animal.identity(), animal.species()));
        }
        output.push('\n');
        output.push_str(RULE);
        output.push('\n');
        output
    }

    pub fn enclosure_status_report(&self) -> String {
        let mut output = format!("{}\nENCLOSURE STATUS REPORT:\n", RULE);
        for enclosure in &self.enclosures {
            output.push('\n');
            output.push_str(&enclosure.to_string());
        }
        output.push('\n');
        output.push_str(RULE);
        output.push('\n');
        output
    }
}

fn unknown(kind: &str, id: &str) -> Error {
    Error::UnknownEntity(format!("no {} with id '{}'", kind, id))
}

impl fmt::Display for Zoo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        write!(f, "~~~~~ {} ~~~~~ ", self.name.to_uppercase())?;

        write!(f, "\n\nANIMALS ({}) {}\n", self.animals.len(), SECTION_RULE)?;
        for animal in &self.animals {
            write!(f, "\n{}", animal)?;
        }
        write!(f, "\n\nENCLOSURES ({}) {}\n", self.enclosures.len(), SECTION_RULE)?;
        for enclosure in &self.enclosures {
            write!(f, "\n{}", enclosure)?;
        }
        write!(f, "\n\nSTAFF ({}) {}\n", self.staff.len(), SECTION_RULE)?;
        for member in &self.staff {
            write!(f, "\n{}", member)?;
        }
        writeln!(f, "\n{}", RULE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::AnimalKind;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2004, 11, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn snake(name: &str, species: &str) -> AnimalProfile {
        AnimalProfile {
            name: name.into(),
            species: species.into(),
            habitat: Habitat::Desert,
            age: 4,
            sound: Some("Hiss".into()),
            kind: AnimalKind::Reptile {
                scale_type: "Smooth".into(),
                venomous: true,
            },
        }
    }

    fn mouse() -> AnimalProfile {
        AnimalProfile {
            name: "Muad'Dib".into(),
            species: "Brown Desert Mouse".into(),
            habitat: Habitat::Desert,
            age: 0,
            sound: Some("Squeak".into()),
            kind: AnimalKind::Mammal {
                fur_colour: "Brown".into(),
                nocturnal: true,
            },
        }
    }

    struct Fixture {
        zoo: Zoo,
        keeper: String,
        vet: String,
        dune: String,
        hideout: String,
        cobra: String,
        mouse: String,
    }

    fn fixture() -> Fixture {
        crate::logging::init_test();
        let mut zoo = Zoo::new("The Royal Zoo", ScheduleConfig::default());
        let dune = zoo.add_enclosure("Dune", Habitat::Desert, 10).unwrap();
        let hideout = zoo.add_enclosure("DesertHideout", Habitat::Desert, 10).unwrap();
        let cobra = zoo.add_animal(snake("Shai-Hulud", "King Cobra")).unwrap();
        let mouse = zoo.add_animal(mouse()).unwrap();
        zoo.house_animal(&cobra, &dune).unwrap();
        zoo.house_animal(&mouse, &hideout).unwrap();

        let keeper = zoo.add_staff("Daniel", Role::Zookeeper).unwrap();
        let vet = zoo.add_staff("Ethan", Role::Veterinarian).unwrap();
        for site in [&dune, &hideout] {
            zoo.assign_staff(&keeper, site, at(10, 0, 0)).unwrap();
            zoo.assign_staff(&vet, site, at(10, 0, 0)).unwrap();
        }

        Fixture {
            zoo,
            keeper,
            vet,
            dune,
            hideout,
            cobra,
            mouse,
        }
    }

    #[test]
    fn test_ids_are_prefixed_sequences() {
        let f = fixture();
        assert_eq!((f.dune.as_str(), f.hideout.as_str()), ("E1", "E2"));
        assert_eq!((f.cobra.as_str(), f.mouse.as_str()), ("A1", "A2"));
        assert_eq!((f.keeper.as_str(), f.vet.as_str()), ("S1", "S2"));
    }

    #[test]
    fn test_feed_and_clean_log_both_sides() {
        let mut f = fixture();
        let zoo = &mut f.zoo;
        zoo.soil_enclosure(&f.dune, 3, at(12, 0, 0)).unwrap();
        let t1 = zoo.clean_enclosure(&f.keeper, &f.dune, at(12, 7, 0)).unwrap();
        assert_eq!(t1.level, Level::Moderate);
        zoo.feed(&f.keeper, &f.cobra, "Raw Chicken", "200g", at(12, 10, 0)).unwrap();

        let cobra_log = zoo.animal(&f.cobra).unwrap().log().render();
        assert!(cobra_log.contains("[2004-11-12 10:00:00] Shai-Hulud_A1 eats (200g Raw Chicken)."));

        let keeper_log = zoo.staff_member(&f.keeper).unwrap().log().render();
        assert!(keeper_log.contains("[2004-11-12 07:00:00] Daniel_S1 cleans Dune_E1 (standard)."));
        assert!(keeper_log.contains("[2004-11-12 10:00:00] Daniel_S1 feeds Shai-Hulud_A1 (200g Raw Chicken)."));

        let maintenance = zoo.enclosure_maintenance().render();
        assert!(maintenance.contains("Dune_E1 is cleaned by Daniel_S1 (cleanliness is now 'Moderate')."));
    }

    #[test]
    fn test_roles_are_enforced() {
        let mut f = fixture();
        let err = f
            .zoo
            .feed(&f.vet, &f.cobra, "Mouse", "1x", at(12, 9, 0))
            .unwrap_err();
        assert!(matches!(err, Error::NotPermitted(_)));
        assert!(f.zoo.animal(&f.cobra).unwrap().log().is_empty());

        let err = f
            .zoo
            .check_health(&f.keeper, &f.cobra, "x", Level::Low, at(12, 9, 0))
            .unwrap_err();
        assert!(matches!(err, Error::NotPermitted(_)));
    }

    #[test]
    fn test_medical_flow_cites_references() {
        let mut f = fixture();
        let zoo = &mut f.zoo;
        let plan = [
            PlannedTreatment::new(t(11, 0), "5 min cuddles"),
            PlannedTreatment::new(t(19, 0), "5 min cuddles"),
        ];
        zoo.check_health(&f.vet, &f.mouse, "Behavioral assessment", Level::Low, at(12, 10, 20))
            .unwrap();
        let diagnosis = zoo
            .diagnose(
                &f.vet,
                &f.mouse,
                "Psychological illness - anxiety",
                Level::Low,
                "Get 5 min of cuddles 2x per day.",
                &plan,
                at(12, 10, 30),
            )
            .unwrap();

        let err = zoo.move_animal(&f.mouse, &f.hideout, &f.dune).unwrap_err();
        assert!(err.to_string().contains("is under treatment"));
        assert!(!zoo.display_report().contains("Muad'Dib_A2"));

        zoo.treat(&f.vet, &f.mouse, "5 min cuddles", Level::Low, at(12, 11, 0)).unwrap();
        zoo.treat(&f.vet, &f.mouse, "5 min cuddles", Level::Low, at(12, 19, 0)).unwrap();
        zoo.declare_recovery(&f.vet, &f.mouse, "Anxiety cured.", at(13, 22, 35)).unwrap();

        let vet_log = zoo.staff_member(&f.vet).unwrap().log().render();
        assert!(vet_log.contains(&format!(
            "[2004-11-12 10:30:00] Ethan_S2 diagnoses Muad'Dib_A2 (log ref: {}).",
            diagnosis
        )));
        assert_eq!(vet_log.matches("log ref:").count(), 5);
        assert!(vet_log.contains("Ethan_S2 declares recovery of Muad'Dib_A2"));

        let history = zoo.animal_medical_history(&f.mouse).unwrap();
        assert_eq!(history.len(), 5);
        assert!(!zoo.animal(&f.mouse).unwrap().under_treatment());
        assert!(zoo.display_report().contains(" - Muad'Dib_A2 (Brown Desert Mouse)"));
    }

    #[test]
    fn test_daily_plans() {
        let mut f = fixture();
        let zoo = &mut f.zoo;
        zoo.animal_mut(&f.cobra)
            .unwrap()
            .add_to_diet("Raw Chicken", "200g", t(10, 0))
            .unwrap();
        zoo.animal_mut(&f.mouse)
            .unwrap()
            .add_to_diet("Seeds", "5g", t(6, 0))
            .unwrap();

        let plan = zoo.daily_plan(&f.keeper).unwrap().render();
        assert!(plan.starts_with(&format!("{RULE}\nDANIEL_S1 DAILY TASK SCHEDULE:\n\nEVENT 1 @ 06:00:00\n")));
        assert!(plan.contains(
            "EVENT 2 @ 07:00:00\n - Daniel_S1 to clean Dune_E1 (standard)\n - Daniel_S1 to clean DesertHideout_E2 (standard)"
        ));

        zoo.add_special_task(&f.vet, t(22, 20), &f.mouse, Action::CheckHealth, "Behavioural Review")
            .unwrap();
        let vet_plan = zoo.daily_plan(&f.vet).unwrap();
        assert_eq!(vet_plan.slots().len(), 2);

        let combined = zoo.staff_schedules().unwrap();
        assert_eq!(combined.len(), zoo.daily_plan(&f.keeper).unwrap().len() + vet_plan.len());
        assert!(combined.render().starts_with(&format!("{RULE}\nCOMBINED STAFF DAILY SCHEDULE:")));

        assert_eq!(zoo.remove_special_tasks(&f.vet, None, None).unwrap(), 1);
        assert_eq!(zoo.daily_plan(&f.vet).unwrap().slots().len(), 1);
    }

    #[test]
    fn test_removal_rules() {
        let mut f = fixture();
        let zoo = &mut f.zoo;
        let err = zoo.remove_enclosure(&f.hideout, at(14, 0, 0)).unwrap_err();
        assert!(err.to_string().contains("DesertHideout_E2 cannot be removed as it is not empty."));

        zoo.remove_animal(&f.mouse).unwrap();
        assert!(zoo.enclosure(&f.hideout).unwrap().is_empty());
        zoo.remove_enclosure(&f.hideout, at(14, 0, 0)).unwrap();
        assert!(matches!(zoo.enclosure(&f.hideout), Err(Error::UnknownEntity(_))));
        assert!(!zoo.staff_member(&f.keeper).unwrap().is_assigned(&f.hideout));
        assert!(zoo
            .staff_member(&f.keeper)
            .unwrap()
            .log()
            .render()
            .contains("Daniel_S1 is unassigned from DesertHideout_E2 (Enclosure)."));

        zoo.remove_staff(&f.vet).unwrap();
        assert_eq!(zoo.staff().len(), 1);
        assert!(zoo.remove_staff(&f.vet).is_err());
    }

    #[test]
    fn test_housing_through_registry() {
        let mut f = fixture();
        let zoo = &mut f.zoo;
        let rattler = zoo.add_animal(snake("Sally", "Horned Rattlesnake")).unwrap();
        assert!(matches!(zoo.house_animal(&rattler, &f.dune), Err(Error::Placement(_))));

        let err = zoo.house_animal(&f.cobra, &f.hideout).unwrap_err();
        assert!(err.to_string().contains("already lives in Dune_E1"));

        let retreat = zoo.add_enclosure("MouseRetreat", Habitat::Desert, 8).unwrap();
        zoo.move_animal(&f.mouse, &f.hideout, &retreat).unwrap();
        assert_eq!(zoo.home_of(&f.mouse).unwrap().id(), retreat);

        let err = zoo.move_animal(&f.mouse, &f.hideout, &f.dune).unwrap_err();
        assert!(err.to_string().contains("does not live in DesertHideout_E2"));
    }

    #[test]
    fn test_text_reports() {
        let mut f = fixture();
        f.zoo.add_animal(snake("LittleMaker", "King Cobra")).unwrap();

        let species = f.zoo.species_report();
        assert!(species.contains("ANIMALS BY SPECIES (3 total):\n"));
        assert!(species.contains("\nKing Cobra (2):\n - Shai-Hulud_A1\n - LittleMaker_A3\n"));
        assert!(species.find("Brown Desert Mouse").unwrap() < species.find("King Cobra").unwrap());

        let status = f.zoo.enclosure_status_report();
        assert!(status.contains("ENCLOSURE STATUS REPORT:\n\nID: E1 | NAME: Dune"));

        let overview = f.zoo.to_string();
        assert!(overview.contains("~~~~~ THE ROYAL ZOO ~~~~~"));
        assert!(overview.contains("STAFF (2)"));
        assert!(overview.contains("<VETERINARIAN> ID: S2 | NAME: Ethan"));
    }

    #[test]
    fn test_combined_medical_history_is_empty_without_events() {
        let f = fixture();
        assert!(f
            .zoo
            .medical_history()
            .render()
            .contains("COMBINED ANIMAL MEDICAL LOG:\nNo medical history recorded.\n"));
    }

    #[test]
    fn test_unknown_ids() {
        let mut f = fixture();
        assert!(matches!(f.zoo.animal("A99"), Err(Error::UnknownEntity(_))));
        assert!(f.zoo.daily_plan("S99").is_err());
        assert!(f.zoo.soil_animal("A99", 1, at(12, 0, 0)).is_err());
    }
}
