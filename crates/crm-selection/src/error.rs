//! Error types for crm-selection

use thiserror::Error;

/// Result type alias for selection operations
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Main error type for selection and bulk request building.
///
/// Every variant except `StaleMutation` and `Config` describes a caller
/// contract violation. None of them are worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// A null, empty, or non-scalar row identifier was passed in
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Both the explicit and the exclusion set are populated
    #[error("Inconsistent selection state: {selected} selected and {excluded} excluded ids")]
    InconsistentSelectionState { selected: usize, excluded: usize },

    /// A payload would carry both an explicit id list and `select_all`
    #[error("Mixed payload shape: {0}")]
    MixedPayloadShape(String),

    /// A mutation result arrived after the selection was reset
    #[error("Stale mutation: ticket generation {ticket}, current generation {current}")]
    StaleMutation { ticket: u64, current: u64 },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value outside its allowed range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Malformed config document
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for SelectionError {
    fn from(err: serde_json::Error) -> Self {
        SelectionError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
