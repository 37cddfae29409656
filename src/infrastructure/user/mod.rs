//! User infrastructure module
//!
//! This module provides password hashing with Argon2, the SQLite-backed user
//! repository, and the register/login flows built on them.

mod password;
mod service;
mod sqlite_repository;

pub use password::{Argon2Hasher, PasswordHasher};
pub use service::{AuthService, Credentials};
pub use sqlite_repository::SqliteUserRepository;
