#![forbid(unsafe_code)]

//! Record ledgers and daily scheduling for a zoo.
//!
//! This crate provides:
//! - Schema-validated, append-only ledgers (activity, medical, daily schedule)
//! - Bounded level state machines (cleanliness, health)
//! - Daily plan aggregation and combined reports
//! - Animals, enclosures, staff and the zoo registry
//! - CSV interchange, scenario replay and configuration

pub mod types;
pub mod error;
pub mod level;
pub mod sequence;
pub mod ledger;
pub mod activity;
pub mod schedule;
pub mod cleanliness;
pub mod health;
pub mod aggregate;
pub mod csv_io;
pub mod config;
pub mod logging;
pub mod animal;
pub mod enclosure;
pub mod staff;
pub mod zoo;
pub mod scenario;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use level::{Level, ShiftAmount};
pub use sequence::{IdAllocator, RefCounter};
pub use ledger::{Entry, Ledger, Record};
pub use activity::{ActivityLog, ActivityRow, MedicalLog, MedicalRow};
pub use schedule::{DailySchedule, ScheduleRow};
pub use config::Config;
pub use animal::{Animal, AnimalKind, AnimalProfile};
pub use enclosure::Enclosure;
pub use staff::{Role, Staff};
pub use zoo::Zoo;
pub use scenario::Scenario;
