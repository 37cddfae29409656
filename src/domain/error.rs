use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("User {username} is already registered.")]
    DuplicateUsername { username: String },

    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Message shown to the user when a flow recovers from this error.
    ///
    /// Returns `None` for errors that must reach the request boundary.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Validation { message } | Self::Credential { message } => Some(message.clone()),
            Self::DuplicateUsername { .. } => Some(self.to_string()),
            _ => None,
        }
    }
}
