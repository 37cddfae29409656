//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig, SessionConfig,
    MAX_IDLE_TIMEOUT_SECS,
};
