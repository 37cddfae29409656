//! Server-side session records kept in the application database

use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use tokio::task::JoinHandle;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions_sqlx_store::SqliteStore;
use tracing::{info, warn};

use super::sqlite::SqliteConfig;
use crate::domain::DomainError;

const SESSION_POOL_SIZE: u32 = 4;

/// Open the session store next to the user table and create its table.
///
/// Unlike request connections, the store creates the database file so the
/// server can start before `init-db` has run.
pub async fn open_session_store(config: &SqliteConfig) -> Result<SqliteStore, DomainError> {
    config.ensure_parent_dir().await?;

    let pool = SqlitePoolOptions::new()
        .max_connections(SESSION_POOL_SIZE)
        .connect_with(config.connect_options().create_if_missing(true))
        .await
        .map_err(|e| {
            DomainError::storage(format!(
                "Failed to open session store '{}': {}",
                config.path().display(),
                e
            ))
        })?;

    let store = SqliteStore::new(pool);
    store
        .migrate()
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create session table: {}", e)))?;

    info!(path = %config.path().display(), "Session store ready");
    Ok(store)
}

/// Periodically drop expired session records until the handle is aborted
pub fn spawn_expired_session_cleanup(store: SqliteStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store.continuously_delete_expired(period).await {
            warn!(error = %e, "Expired session cleanup stopped");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::ConnectionScope;
    use tempfile::TempDir;
    use time::OffsetDateTime;
    use tower_sessions::session::{Id, Record};
    use tower_sessions::session_store::SessionStore;

    fn record(expiry_date: OffsetDateTime) -> Record {
        Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date,
        }
    }

    async fn session_rows(config: &SqliteConfig) -> i64 {
        let mut scope = ConnectionScope::new(config.clone());
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM tower_sessions")
            .fetch_one(scope.connection().await.unwrap())
            .await
            .unwrap();
        scope.release().await.unwrap();
        count
    }

    #[tokio::test]
    async fn test_open_creates_database_and_parent_directory() {
        let dir = TempDir::new().unwrap();
        let config = SqliteConfig::new(dir.path().join("instance").join("cms.sqlite"));

        open_session_store(&config).await.unwrap();

        assert!(config.path().exists());
        assert_eq!(session_rows(&config).await, 0);
    }

    #[tokio::test]
    async fn test_records_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let config = SqliteConfig::new(dir.path().join("cms.sqlite"));

        let live = record(OffsetDateTime::now_utc() + time::Duration::hours(1));
        open_session_store(&config).await.unwrap().save(&live).await.unwrap();

        let reopened = open_session_store(&config).await.unwrap();
        assert!(reopened.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_records_are_deleted() {
        let dir = TempDir::new().unwrap();
        let config = SqliteConfig::new(dir.path().join("cms.sqlite"));
        let store = open_session_store(&config).await.unwrap();

        let expired = record(OffsetDateTime::now_utc() - time::Duration::minutes(5));
        let live = record(OffsetDateTime::now_utc() + time::Duration::hours(1));
        store.save(&expired).await.unwrap();
        store.save(&live).await.unwrap();
        assert_eq!(session_rows(&config).await, 2);

        store.delete_expired().await.unwrap();

        assert_eq!(session_rows(&config).await, 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }
}
