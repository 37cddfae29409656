//! Request-scoped context holding the request's database connection

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::DomainError;
use crate::infrastructure::storage::{ConnectionScope, SqliteConfig};

/// Per-request state shared by the middleware stack and the handler.
///
/// Cloning shares the same connection scope.
#[derive(Debug, Clone)]
pub struct RequestContext {
    scope: Arc<Mutex<ConnectionScope>>,
}

impl RequestContext {
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            scope: Arc::new(Mutex::new(ConnectionScope::new(config))),
        }
    }

    /// Exclusive access to the request's connection scope
    pub async fn db(&self) -> MutexGuard<'_, ConnectionScope> {
        self.scope.lock().await
    }

    /// Close the request's connection if one was opened
    pub async fn release(&self) -> Result<(), DomainError> {
        self.scope.lock().await.release().await
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| ApiError::internal("Request context is not installed"))
    }
}

/// Create the request context, run the rest of the stack, then release the
/// connection. The response is returned whatever the handler produced.
pub async fn request_context_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let context = RequestContext::new(state.storage.clone());
    request.extensions_mut().insert(context.clone());

    let response = next.run(request).await;

    if let Err(e) = context.release().await {
        warn!(error = %e, "Failed to release request connection");
    }

    response
}
