//! Error types for the bookline scheduling engine.

use thiserror::Error;

use crate::model::{AppointmentStatus, ScheduledItem};

/// Main error type for scheduling operations.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Scheduling conflict with {} existing item(s)", conflicts.len())]
    Conflict { conflicts: Vec<ScheduledItem> },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStateTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation not allowed: {0}")]
    Guarded(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Path expansion failed: {0}")]
    PathExpansion(String),
}

/// Errors from the authoritative scheduling backend.
///
/// The client-side conflict pass is advisory only; a `Conflict` surfaced
/// here as an `Api` message is still authoritative and must reach the
/// caller even after a clean local check.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for scheduling operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
