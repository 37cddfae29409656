//! Register and login flows

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{validate_registration, User, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

const INCORRECT_USERNAME: &str = "Incorrect username.";
const INCORRECT_PASSWORD: &str = "Incorrect password.";

/// Credentials submitted through the register or login form
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Orchestrates registration and credential checks.
///
/// The repository is passed per call because it borrows the request's connection.
#[derive(Debug, Clone)]
pub struct AuthService {
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { hasher }
    }

    /// Register a new user.
    ///
    /// Empty fields fail validation before storage is touched. A taken username
    /// fails with `DomainError::DuplicateUsername`.
    pub async fn register<R>(
        &self,
        repository: &mut R,
        credentials: &Credentials,
    ) -> Result<User, DomainError>
    where
        R: UserRepository + ?Sized,
    {
        validate_registration(&credentials.username, &credentials.password)?;

        let password_hash = self.hasher.hash(&credentials.password)?;
        let user = repository
            .create(&credentials.username, &password_hash)
            .await
            .inspect_err(|e| debug!(username = %credentials.username, error = %e, "Registration rejected"))?;

        info!(user_id = %user.id(), username = %user.username(), "User registered");
        Ok(user)
    }

    /// Check a username and password.
    ///
    /// Unknown usernames and wrong passwords fail with distinct credential errors.
    pub async fn authenticate<R>(
        &self,
        repository: &mut R,
        credentials: &Credentials,
    ) -> Result<User, DomainError>
    where
        R: UserRepository + ?Sized,
    {
        let Some(user) = repository.find_by_username(&credentials.username).await? else {
            debug!(username = %credentials.username, "Login rejected: unknown username");
            return Err(DomainError::credential(INCORRECT_USERNAME));
        };

        if !self.hasher.verify(user.password_hash(), &credentials.password) {
            debug!(user_id = %user.id(), "Login rejected: wrong password");
            return Err(DomainError::credential(INCORRECT_PASSWORD));
        }

        Ok(user)
    }
}
