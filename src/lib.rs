//! PMP CMS core
//!
//! User registration, login and logout over HTML forms, with:
//! - Argon2 password hashing
//! - One lazily opened SQLite connection per request
//! - Session-bound identity resolved before every handler
//! - A login gate for protected views

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use api::views::HtmlRenderer;
use infrastructure::user::{Argon2Hasher, AuthService};

/// Create the application state with the default hasher and renderer
pub fn create_app_state(config: AppConfig) -> AppState {
    let auth_service = AuthService::new(Arc::new(Argon2Hasher::new()));
    AppState::new(config, auth_service, Arc::new(HtmlRenderer::new()))
}
