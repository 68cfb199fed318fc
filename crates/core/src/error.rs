//! Error types for The Move core

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A form that cannot be posted as-is. The message is shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Add a title, description, location, start time, end time, and activity type to post a move.")]
    MissingFields,

    #[error("End time must be after the start time.")]
    EndNotAfterStart,

    #[error("Max participants must be at least 1.")]
    InvalidMaxParticipants,

    #[error("Max participants cannot be lower than the {0} people already going.")]
    MaxBelowAttendees(usize),

    #[error("This move asks for a response before you join.")]
    MissingSignupResponse,
}
