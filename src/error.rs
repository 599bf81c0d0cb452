//! Error types for the deduplication engine and its vault client.

use thiserror::Error;

/// Errors that can occur while listing, inspecting or removing vault items.
///
/// Only [`DedupeError::Mutation`] is fatal for a run. Retrieval failures are
/// absorbed by the engine and reported as missing values.
#[derive(Error, Debug, Clone)]
pub enum DedupeError {
    /// Error serializing/deserializing JSON
    #[error("JSON error: {0}")]
    JsonError(String),

    /// The vault CLI could not be started at all
    #[error("Failed to run `{command}`: {message}")]
    CommandSpawn { command: String, message: String },

    /// The vault CLI ran but exited unsuccessfully
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A password or one-time password could not be fetched for an item
    #[error("Could not retrieve {field} for item {item_id}: {message}")]
    Retrieval {
        field: &'static str,
        item_id: String,
        message: String,
    },

    /// Deleting or archiving an item failed
    #[error("Failed to {action} item {title} ({item_id}): {message}")]
    Mutation {
        action: &'static str,
        item_id: String,
        title: String,
        message: String,
    },

    /// Reading the confirmation answer or writing the report failed
    #[error("I/O error: {0}")]
    Io(String),

    /// General error
    #[error("Error: {0}")]
    General(String),
}

impl From<serde_json::Error> for DedupeError {
    fn from(err: serde_json::Error) -> Self {
        DedupeError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for DedupeError {
    fn from(err: std::io::Error) -> Self {
        DedupeError::Io(err.to_string())
    }
}

/// Result type alias for deduplication operations.
pub type DedupeResult<T> = Result<T, DedupeError>;
