//! Registration form validation

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur while validating submitted credentials
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username is required.")]
    UsernameRequired,

    #[error("Password is required.")]
    PasswordRequired,
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate a registration attempt.
///
/// Only emptiness is checked, username first. Uniqueness is left to storage.
pub fn validate_registration(username: &str, password: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::UsernameRequired);
    }

    if password.is_empty() {
        return Err(UserValidationError::PasswordRequired);
    }

    Ok(())
}
