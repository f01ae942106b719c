//! Core error types for pomotrack-core.
//!
//! Interval lifecycle conditions live directly on [`CoreError`]; storage and
//! configuration failures are grouped in their own enums and converted with
//! `#[from]` so `?` works across layers.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No interval has ever been recorded.
    ///
    /// Category selection treats this as "first interval ever" rather than
    /// a fault.
    #[error("No intervals")]
    NoIntervals,

    /// Pause was requested on an interval that is not running.
    #[error("Interval not running")]
    IntervalNotRunning,

    /// Start was requested on an interval that is already done or cancelled.
    #[error("Interval {id} is completed or cancelled")]
    IntervalCompleted { id: i64 },

    /// Stored data does not describe a valid interval.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// No interval with this id exists.
    #[error("Invalid ID: {0}")]
    InvalidId(i64),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored row could not be decoded into an interval
    #[error("Corrupt row {id}: {message}")]
    Corrupt { id: i64, message: String },
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
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_errors_become_query_failures() {
        let err: CoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::QueryFailed(_))
        ));
    }

    #[test]
    fn display_messages() {
        assert_eq!(CoreError::NoIntervals.to_string(), "No intervals");
        assert_eq!(CoreError::InvalidId(7).to_string(), "Invalid ID: 7");
        assert_eq!(
            CoreError::IntervalCompleted { id: 3 }.to_string(),
            "Interval 3 is completed or cancelled"
        );
    }
}
