//! User repository trait

use async_trait::async_trait;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage.
///
/// Implementations borrow a request-scoped connection, hence `&mut self`.
#[async_trait]
pub trait UserRepository: Send {
    /// Insert a new user and commit.
    ///
    /// Fails with `DomainError::DuplicateUsername` when the username is taken.
    async fn create(&mut self, username: &str, password_hash: &str) -> Result<User, DomainError>;

    /// Get a user by their username (for login)
    async fn find_by_username(&mut self, username: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by their ID
    async fn find_by_id(&mut self, id: UserId) -> Result<Option<User>, DomainError>;
}
