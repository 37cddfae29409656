//! Schema bootstrap

use tracing::info;

use super::sqlite::{ConnectionScope, SqliteConfig};
use crate::domain::DomainError;

/// Full schema definition. Drops and recreates every table.
pub const SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/schema.sql"));

/// Run the schema script against a fresh connection.
///
/// Creates the database file and its parent directory when missing. Existing
/// data is discarded.
pub async fn initialize_schema(config: &SqliteConfig) -> Result<(), DomainError> {
    config.ensure_parent_dir().await?;

    let mut scope = ConnectionScope::new(config.clone().with_create_if_missing(true));
    let result = execute_schema(&mut scope).await;
    scope.release().await?;
    result?;

    info!(path = %config.path().display(), "Database schema initialized");
    Ok(())
}

async fn execute_schema(scope: &mut ConnectionScope) -> Result<(), DomainError> {
    let conn = scope.connection().await?;

    sqlx::raw_sql(SCHEMA)
        .execute(conn)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to execute schema: {}", e)))?;

    Ok(())
}
