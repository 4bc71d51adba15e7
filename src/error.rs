//! Error types for NeuroMatch.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Record store errors.
///
/// A record that was never written is not an error: the typed record
/// layer substitutes a default value instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Questionnaire flow errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Option {index} is out of range (question has {option_count} options)")]
    InvalidSelection { index: usize, option_count: usize },

    #[error("Flow is already complete")]
    AlreadyComplete,

    #[error("Questionnaire has no questions")]
    EmptyQuestionnaire,
}

/// Match lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("Unknown match identifier: {0}")]
    UnknownMatchIdentifier(String),
}

/// Signup / profile editing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Pseudonym must not be empty")]
    EmptyPseudonym,

    #[error("Unknown avatar: {0}")]
    UnknownAvatar(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
