//! Core error types for arquetipo-core.
//!
//! This module defines the error hierarchy using thiserror. Each
//! subsystem (wizard, ledger, scoring, session, storage, config) has
//! its own enum, all unified under [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for arquetipo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Step-sequencer errors
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Answer-submission errors
    #[error("Answer error: {0}")]
    Answer(#[from] AnswerError),

    /// Scoring errors
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Session orchestration errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Step-sequencer errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Jump target outside the valid step range
    #[error("Step {step} is out of range (valid: 1..={total_steps})")]
    OutOfRange { step: u32, total_steps: u32 },
}

/// Answer-submission errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    /// Block id not present in the question catalog
    #[error("Unknown block id: {0}")]
    UnknownBlock(u32),

    /// Option id not present in the referenced block
    #[error("Unknown option '{option_id}' for block {block_id}")]
    UnknownOption { block_id: u32, option_id: String },

    /// Forced-rank answer naming the same option in both roles
    #[error("Most and least option must differ for block {block_id} (both were '{option_id}')")]
    MostEqualsLeast { block_id: u32, option_id: String },

    /// Answer shape does not match the configured answer mode
    #[error("Block {block_id} expects a {expected} answer")]
    WrongShape {
        block_id: u32,
        expected: &'static str,
    },
}

/// Scoring errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// Scoring invoked with zero answers
    #[error("Cannot compute results from an empty answer ledger")]
    EmptyLedger,
}

/// Session orchestration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Respondent data missing or invalid on leaving the personal-data step
    #[error("Respondent data is missing or invalid: {0}")]
    RespondentInvalid(String),

    /// Question block not answered on leaving its step
    #[error("Block {0} has no complete answer")]
    BlockIncomplete(u32),

    /// Review step left with unanswered blocks
    #[error("Ledger incomplete: {completed} of {total} blocks answered")]
    LedgerIncomplete { completed: u32, total: u32 },

    /// A submit-then-advance sequence is already in flight. The
    /// single-writer core never re-enters itself, so this only fires
    /// for re-entrant callers (e.g. an async UI double-submitting).
    #[error("Session is busy applying a previous submission")]
    Busy,

    /// Review step left without the final consent check
    #[error("Final consent is required before computing results")]
    FinalConsentMissing,
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Persisted record could not be decoded
    #[error("Corrupt persisted record '{key}': {message}")]
    CorruptRecord { key: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
