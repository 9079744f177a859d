//! Core vocabulary types shared by every ledger.
//!
//! This module defines:
//! - The closed `Action` vocabulary with its rendered phrases
//! - Entity identities (id + display name)
//! - Habitats used for enclosure placement rules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process-wide reference number assigned to every appended row
pub type RefNumber = u64;

// ============================================================================
// Actions
// ============================================================================

/// Every action that can be logged or scheduled
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Eat,
    Feed,
    Drink,
    GiveWater,
    Sleep,
    Age,
    Speak,

    Fly,
    Groom,
    Bask,

    Clean,
    ReceiveCleaning,
    BecomeDirtier,

    Treat,
    ReceiveTreatment,
    CheckHealth,
    ReceiveHealthCheck,
    Diagnose,
    ReceiveDiagnosis,
    Recover,
    DeclareRecovery,

    Assign,
    Unassign,
}

impl Action {
    pub const ALL: [Action; 23] = [
        Action::Eat,
        Action::Feed,
        Action::Drink,
        Action::GiveWater,
        Action::Sleep,
        Action::Age,
        Action::Speak,
        Action::Fly,
        Action::Groom,
        Action::Bask,
        Action::Clean,
        Action::ReceiveCleaning,
        Action::BecomeDirtier,
        Action::Treat,
        Action::ReceiveTreatment,
        Action::CheckHealth,
        Action::ReceiveHealthCheck,
        Action::Diagnose,
        Action::ReceiveDiagnosis,
        Action::Recover,
        Action::DeclareRecovery,
        Action::Assign,
        Action::Unassign,
    ];

    /// Phrase used when the action is planned, e.g. "[feed] Pinky_A1 at 9am"
    pub fn imperative(&self) -> &'static str {
        match self {
            Self::Eat => "eat",
            Self::Feed => "feed",
            Self::Drink => "drink",
            Self::GiveWater => "give water to",
            Self::Sleep => "sleep",
            Self::Age => "age",
            Self::Speak => "speak",
            Self::Fly => "attempt to fly",
            Self::Groom => "groom self",
            Self::Bask => "bask in sun",
            Self::Clean => "clean",
            Self::ReceiveCleaning => "receive cleaning",
            Self::BecomeDirtier => "become dirtier",
            Self::Treat => "treat",
            Self::ReceiveTreatment => "receive treatment",
            Self::CheckHealth => "perform health checkup on",
            Self::ReceiveHealthCheck => "receive health check",
            Self::Diagnose => "diagnose",
            Self::ReceiveDiagnosis => "receive diagnosis",
            Self::Recover => "recover",
            Self::DeclareRecovery => "declare recovery of",
            Self::Assign => "be assigned to",
            Self::Unassign => "be unassigned from",
        }
    }

    /// Phrase used when the action has happened, e.g. "Bill [feeds] Pinky_A1"
    pub fn present_tense(&self) -> &'static str {
        match self {
            Self::Eat => "eats",
            Self::Feed => "feeds",
            Self::Drink => "drinks",
            Self::GiveWater => "gives water to",
            Self::Sleep => "sleeps",
            Self::Age => "ages",
            Self::Speak => "says",
            Self::Fly => "attempts to fly",
            Self::Groom => "grooms self",
            Self::Bask => "basks in sun",
            Self::Clean => "cleans",
            Self::ReceiveCleaning => "is cleaned by",
            Self::BecomeDirtier => "becomes dirtier",
            Self::Treat => "treats",
            Self::ReceiveTreatment => "receives treatment from",
            Self::CheckHealth => "checks health of",
            Self::ReceiveHealthCheck => "receives health check from",
            Self::Diagnose => "diagnoses",
            Self::ReceiveDiagnosis => "is diagnosed by",
            Self::Recover => "is declared recovered by",
            Self::DeclareRecovery => "declares recovery of",
            Self::Assign => "is assigned to",
            Self::Unassign => "is unassigned from",
        }
    }

    /// Stable machine name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eat => "eat",
            Self::Feed => "feed",
            Self::Drink => "drink",
            Self::GiveWater => "give_water",
            Self::Sleep => "sleep",
            Self::Age => "age",
            Self::Speak => "speak",
            Self::Fly => "fly",
            Self::Groom => "groom",
            Self::Bask => "bask",
            Self::Clean => "clean",
            Self::ReceiveCleaning => "receive_cleaning",
            Self::BecomeDirtier => "become_dirtier",
            Self::Treat => "treat",
            Self::ReceiveTreatment => "receive_treatment",
            Self::CheckHealth => "check_health",
            Self::ReceiveHealthCheck => "receive_health_check",
            Self::Diagnose => "diagnose",
            Self::ReceiveDiagnosis => "receive_diagnosis",
            Self::Recover => "recover",
            Self::DeclareRecovery => "declare_recovery",
            Self::Assign => "assign",
            Self::Unassign => "unassign",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|a| a.as_str() == wanted)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Identity
// ============================================================================

/// The identity fields every record-emitting entity exposes
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Renders as `Name_ID`, the form used in every ledger line
impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.id)
    }
}

// ============================================================================
// Habitat
// ============================================================================

/// Environmental type of an enclosure and the habitat an animal requires
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Habitat {
    Aquatic,
    Rainforest,
    Savannah,
    Desert,
}

impl Habitat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Aquatic => "Aquatic",
            Self::Rainforest => "Rainforest",
            Self::Savannah => "Savannah",
            Self::Desert => "Desert",
        }
    }
}

impl fmt::Display for Habitat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::from_str(action.as_str()), Some(action));
        }
        assert_eq!(Action::from_str(" GIVE_WATER "), Some(Action::GiveWater));
        assert_eq!(Action::from_str("juggle"), None);
    }

    #[test]
    fn test_action_serde_matches_as_str() {
        let json = serde_json::to_string(&Action::ReceiveHealthCheck).unwrap();
        assert_eq!(json, "\"receive_health_check\"");
    }

    #[test]
    fn test_action_phrases() {
        assert_eq!(Action::GiveWater.imperative(), "give water to");
        assert_eq!(Action::ReceiveCleaning.present_tense(), "is cleaned by");
        assert_eq!(Action::CheckHealth.imperative(), "perform health checkup on");
    }

    #[test]
    fn test_identity_display() {
        let pinky = Identity::new("A1", "Pinky");
        assert_eq!(pinky.to_string(), "Pinky_A1");
    }
}
