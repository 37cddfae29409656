//! SQLite connection handling scoped to a single request

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// SQLite storage configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file location
    pub path: PathBuf,
    /// How long a statement waits on a locked database
    pub busy_timeout_secs: u64,
    /// Create the database file when it does not exist
    pub create_if_missing: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("instance/cms.sqlite"),
            busy_timeout_secs: 5,
            create_if_missing: false,
        }
    }
}

impl SqliteConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_busy_timeout(mut self, secs: u64) -> Self {
        self.busy_timeout_secs = secs;
        self
    }

    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory holding the database file, if any
    pub async fn ensure_parent_dir(&self) -> Result<(), DomainError> {
        let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })
    }

    /// Options for a single connection against the configured file
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(self.create_if_missing)
            .busy_timeout(Duration::from_secs(self.busy_timeout_secs))
    }
}

impl From<&DatabaseConfig> for SqliteConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self::new(&config.path).with_busy_timeout(config.busy_timeout_secs)
    }
}

/// Holds at most one connection for the lifetime of a request.
///
/// The connection is opened on first use and reused afterwards. `release`
/// closes it; dropping the scope without releasing still closes the handle.
#[derive(Debug)]
pub struct ConnectionScope {
    config: SqliteConfig,
    connection: Option<SqliteConnection>,
}

impl ConnectionScope {
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    /// Whether a connection is currently held
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Return the scope's connection, opening it if needed
    pub async fn connection(&mut self) -> Result<&mut SqliteConnection, DomainError> {
        let connection = match self.connection.take() {
            Some(connection) => connection,
            None => {
                debug!(path = %self.config.path.display(), "Opening database connection");

                SqliteConnection::connect_with(&self.config.connect_options())
                    .await
                    .map_err(|e| {
                        DomainError::storage(format!(
                            "Failed to open database '{}': {}",
                            self.config.path.display(),
                            e
                        ))
                    })?
            }
        };

        Ok(self.connection.insert(connection))
    }

    /// Close the held connection, if any. Safe to call when nothing is open.
    pub async fn release(&mut self) -> Result<(), DomainError> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };

        debug!(path = %self.config.path.display(), "Closing database connection");

        connection.close().await.map_err(|e| {
            warn!(error = %e, "Failed to close database connection cleanly");
            DomainError::storage(format!("Failed to close database connection: {}", e))
        })
    }
}
