//! Error types for question loading and JSON persistence

use thiserror::Error;

/// Failure while persisting or restoring a JSON document
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistError {
    /// True when the file simply does not exist yet
    pub fn is_missing(&self) -> bool {
        matches!(self, PersistError::Io(err) if err.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Unrecognised game or player mode name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} {value:?}")]
pub struct ParseModeError {
    pub kind: &'static str,
    pub value: String,
}

/// Failure while loading question sources
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read question source {path}: {source}")]
    Source {
        path: String,
        #[source]
        source: PersistError,
    },

    #[error("Invalid question {id}: {reason}")]
    InvalidQuestion { id: String, reason: String },
}

impl LoadError {
    pub(crate) fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadError::InvalidQuestion {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
