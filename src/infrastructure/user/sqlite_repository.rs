//! SQLite user repository implementation

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Connection, Row};

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// SQLite implementation of UserRepository over a borrowed connection
#[derive(Debug)]
pub struct SqliteUserRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteUserRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c> UserRepository for SqliteUserRepository<'c> {
    async fn create(&mut self, username: &str, password_hash: &str) -> Result<User, DomainError> {
        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let result = sqlx::query("INSERT INTO user (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DomainError::duplicate_username(username)
                }
                e => DomainError::storage(format!("Failed to create user: {}", e)),
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit user: {}", e)))?;

        Ok(User::new(
            UserId::new(result.last_insert_rowid()),
            username,
            password_hash,
        ))
    }

    async fn find_by_username(&mut self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, username, password FROM user WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_id(&mut self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, username, password FROM user WHERE id = ?")
            .bind(id.value())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read id: {}", e)))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| DomainError::storage(format!("Failed to read username: {}", e)))?;
    let password_hash: String = row
        .try_get("password")
        .map_err(|e| DomainError::storage(format!("Failed to read password: {}", e)))?;

    Ok(User::new(UserId::new(id), username, password_hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{initialize_schema, ConnectionScope, SqliteConfig};
    use tempfile::TempDir;

    async fn open_scope(dir: &TempDir) -> ConnectionScope {
        let config = SqliteConfig::new(dir.path().join("cms.sqlite"));
        initialize_schema(&config).await.unwrap();
        ConnectionScope::new(config)
    }

    async fn count_users(conn: &mut SqliteConnection) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM user")
            .fetch_one(conn)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let dir = TempDir::new().unwrap();
        let mut scope = open_scope(&dir).await;
        let mut repo = SqliteUserRepository::new(scope.connection().await.unwrap());

        let alice = repo.create("alice", "hash-a").await.unwrap();
        let bob = repo.create("bob", "hash-b").await.unwrap();

        assert_eq!(alice.username(), "alice");
        assert_eq!(alice.password_hash(), "hash-a");
        assert!(bob.id() > alice.id());
    }

    #[tokio::test]
    async fn test_find_by_username_and_id() {
        let dir = TempDir::new().unwrap();
        let mut scope = open_scope(&dir).await;
        let mut repo = SqliteUserRepository::new(scope.connection().await.unwrap());

        let created = repo.create("alice", "hash-a").await.unwrap();

        let by_name = repo.find_by_username("alice").await.unwrap();
        assert_eq!(by_name.as_ref(), Some(&created));

        let by_id = repo.find_by_id(created.id()).await.unwrap();
        assert_eq!(by_id, Some(created));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        let mut scope = open_scope(&dir).await;
        let mut repo = SqliteUserRepository::new(scope.connection().await.unwrap());

        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
        assert!(repo.find_by_id(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_leaves_existing_row() {
        let dir = TempDir::new().unwrap();
        let mut scope = open_scope(&dir).await;
        let conn = scope.connection().await.unwrap();

        let mut repo = SqliteUserRepository::new(conn);
        let original = repo.create("alice", "hash-1").await.unwrap();
        let err = repo.create("alice", "hash-2").await.unwrap_err();

        assert!(matches!(err, DomainError::DuplicateUsername { ref username } if username == "alice"));

        let stored = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored, original);

        drop(repo);
        assert_eq!(count_users(scope.connection().await.unwrap()).await, 1);
    }

    #[tokio::test]
    async fn test_create_is_committed() {
        let dir = TempDir::new().unwrap();
        let mut scope = open_scope(&dir).await;

        SqliteUserRepository::new(scope.connection().await.unwrap())
            .create("alice", "hash-a")
            .await
            .unwrap();
        scope.release().await.unwrap();

        let mut repo = SqliteUserRepository::new(scope.connection().await.unwrap());
        assert!(repo.find_by_username("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_schema_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let config = SqliteConfig::new(dir.path().join("empty.sqlite")).with_create_if_missing(true);
        let mut scope = ConnectionScope::new(config);
        let mut repo = SqliteUserRepository::new(scope.connection().await.unwrap());

        let err = repo.find_by_id(UserId::new(1)).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(err.notice().is_none());
    }
}
