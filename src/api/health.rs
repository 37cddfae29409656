//! Health check endpoints

use std::time::Instant;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use super::middleware::RequestContext;

/// Health response with optional component status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health check
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check: the database must open and answer a query.
///
/// Runs on the request's own connection, which the request context releases.
pub async fn ready_check(context: RequestContext) -> impl IntoResponse {
    let start = Instant::now();
    let database = check_database(&context).await;

    let status = database.status;
    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![database]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

async fn check_database(context: &RequestContext) -> HealthCheck {
    let start = Instant::now();

    let result = {
        let mut scope = context.db().await;
        match scope.connection().await {
            Ok(conn) => sqlx::query("SELECT 1")
                .execute(conn)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        }
    };

    let latency_ms = Some(start.elapsed().as_millis() as u64);
    match result {
        Ok(()) => HealthCheck {
            name: "database".to_string(),
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(message) => {
            warn!(error = %message, "Database readiness check failed");
            HealthCheck {
                name: "database".to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(message),
                latency_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{initialize_schema, SqliteConfig};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_check_uses_request_connection() {
        let dir = TempDir::new().unwrap();
        let config = SqliteConfig::new(dir.path().join("cms.sqlite"));
        initialize_schema(&config).await.unwrap();
        let context = RequestContext::new(config);

        let opened: *const _ = context.db().await.connection().await.unwrap();

        let check = check_database(&context).await;
        assert_eq!(check.status, HealthStatus::Healthy);

        let mut scope = context.db().await;
        assert!(scope.is_open());
        let reused: *const _ = scope.connection().await.unwrap();
        assert_eq!(opened, reused);
    }

    #[tokio::test]
    async fn test_missing_database_is_unhealthy() {
        let dir = TempDir::new().unwrap();
        let context = RequestContext::new(SqliteConfig::new(dir.path().join("absent.sqlite")));

        let check = check_database(&context).await;

        assert_eq!(check.status, HealthStatus::Unhealthy);
        assert!(check.message.is_some());
        assert!(!context.db().await.is_open());
    }
}
