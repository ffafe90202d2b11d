//! Shared error types for the application

use std::fmt;
use thiserror::Error;

/// Kind of entity referenced by a [`Error::NotFound`] rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Survey,
    Department,
    Dimension,
    Role,
    Generation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Survey => "survey",
            EntityKind::Department => "department",
            EntityKind::Dimension => "dimension",
            EntityKind::Role => "role",
            EntityKind::Generation => "generation",
        };
        f.write_str(name)
    }
}

/// Main error type for surveymap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request parameters (bad category code, bad range boundaries)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A referenced entity does not exist
    #[error("No {kind} found with ID = {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Failures reported by the data store collaborator
    #[error("Data store error: {0}")]
    Store(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid-input rejection
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a not-found rejection for the given entity
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create a data store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Rejections the caller can fix by changing the request.
    ///
    /// These are surfaced directly and never retried.
    pub fn is_user_fixable(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
