//! Error types for the zoo_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zoo_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A row's field set does not match the ledger schema.
    /// The ledger is left unchanged.
    #[error("Schema mismatch in {ledger}: expected fields {expected:?}, found {found:?}")]
    SchemaMismatch {
        ledger: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A field value violates its declared type or vocabulary
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// A level-shift amount could not be interpreted as a number
    #[error("Invalid transition input: {0}")]
    InvalidTransitionInput(String),

    /// Enclosure housing rules were violated
    #[error("Placement error: {0}")]
    Placement(String),

    /// Lookup of an animal, enclosure or staff member failed
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// A staff member attempted an action outside their role
    #[error("Not permitted: {0}")]
    NotPermitted(String),

    /// Scenario file is structurally invalid
    #[error("Scenario error: {0}")]
    Scenario(String),
}

impl Error {
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
