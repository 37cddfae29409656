//! User domain
//!
//! This module provides domain types and traits for user authentication,
//! including the user entity, registration validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{validate_registration, UserValidationError};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
