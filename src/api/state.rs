//! Application state for shared services

use std::sync::Arc;

use crate::api::views::PageRenderer;
use crate::config::AppConfig;
use crate::infrastructure::storage::SqliteConfig;
use crate::infrastructure::user::AuthService;

/// Application state shared by every request.
///
/// Holds no connections: each request opens its own through `storage`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: SqliteConfig,
    pub auth_service: AuthService,
    pub renderer: Arc<dyn PageRenderer>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        auth_service: AuthService,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        let storage = SqliteConfig::from(&config.database);
        Self {
            config: Arc::new(config),
            storage,
            auth_service,
            renderer,
        }
    }
}
