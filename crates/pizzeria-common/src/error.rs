//! Error types for pizzeria

use thiserror::Error;

/// Result type alias for pizzeria operations
pub type Result<T> = std::result::Result<T, PizzeriaError>;

/// Unified error type for all pizzeria operations
#[derive(Error, Debug, Clone)]
pub enum PizzeriaError {
    #[error("MongoDB error: {0}")]
    MongoDB(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl PizzeriaError {
    /// Returns true if the error comes from talking to the server
    /// rather than from local input or output.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            PizzeriaError::MongoDB(_) | PizzeriaError::Connection(_) | PizzeriaError::Query(_)
        )
    }
}

impl From<serde_json::Error> for PizzeriaError {
    fn from(err: serde_json::Error) -> Self {
        PizzeriaError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for PizzeriaError {
    fn from(err: std::io::Error) -> Self {
        PizzeriaError::Io(err.to_string())
    }
}

// MongoDB-specific error conversions (when mongodb-errors feature is enabled)
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for PizzeriaError {
    fn from(err: mongodb::error::Error) -> Self {
        PizzeriaError::MongoDB(err.to_string())
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::ser::Error> for PizzeriaError {
    fn from(err: bson::ser::Error) -> Self {
        PizzeriaError::Serialization(format!("BSON serialization error: {}", err))
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::de::Error> for PizzeriaError {
    fn from(err: bson::de::Error) -> Self {
        PizzeriaError::Deserialization(format!("BSON deserialization error: {}", err))
    }
}
