//! User entity and related types

use serde::{Deserialize, Serialize};

/// User identifier assigned by storage on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    /// PHC-format password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}
