use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// SQLite database location
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

/// Session cookie settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    #[serde(default)]
    pub secure: bool,
    /// Expire after this many idle seconds; unset keeps the cookie for the browser session
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,
    /// How often expired session records are purged
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Longest idle timeout honoured, the cookie lifetime browsers accept (400 days)
pub const MAX_IDLE_TIMEOUT_SECS: u64 = 400 * 24 * 60 * 60;

impl SessionConfig {
    /// Idle timeout capped at [`MAX_IDLE_TIMEOUT_SECS`]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs
            .map(|secs| Duration::from_secs(secs.min(MAX_IDLE_TIMEOUT_SECS)))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("instance/cms.sqlite"),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            secure: false,
            idle_timeout_secs: None,
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration with the database at the given path, everything else default
    pub fn with_database_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseConfig {
                path: path.into(),
                ..DatabaseConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.path, PathBuf::from("instance/cms.sqlite"));
        assert_eq!(config.database.busy_timeout_secs, 5);
        assert_eq!(config.session.cookie_name, "session");
        assert!(config.session.idle_timeout_secs.is_none());
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [database]
                path = "/tmp/test.sqlite"

                [logging]
                level = "debug"
                format = "json"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/tmp/test.sqlite"));
        assert_eq!(config.database.busy_timeout_secs, 5);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_idle_timeout_is_capped() {
        let mut session = SessionConfig::default();
        assert_eq!(session.idle_timeout(), None);

        session.idle_timeout_secs = Some(1800);
        assert_eq!(session.idle_timeout(), Some(Duration::from_secs(1800)));

        session.idle_timeout_secs = Some(u64::MAX);
        assert_eq!(
            session.idle_timeout(),
            Some(Duration::from_secs(MAX_IDLE_TIMEOUT_SECS))
        );
    }

    #[test]
    fn test_cleanup_interval_default() {
        let session = SessionConfig::default();
        assert_eq!(session.cleanup_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_with_database_path() {
        let config = AppConfig::with_database_path("/var/lib/cms/db.sqlite");
        assert_eq!(config.database.path, PathBuf::from("/var/lib/cms/db.sqlite"));
        assert_eq!(config.session.cookie_name, "session");
    }
}
