//! Per-request identity resolved from the session

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;
use tracing::debug;

use super::request_context::RequestContext;
use crate::api::session::session_user_id;
use crate::api::types::ApiError;
use crate::domain::user::{User, UserRepository};
use crate::infrastructure::user::SqliteUserRepository;

/// The user making the current request, or anonymous.
///
/// Installed as a request extension by [`load_current_user`] before any
/// handler runs.
#[derive(Debug, Clone, Default)]
pub struct CurrentIdentity(pub Option<User>);

impl CurrentIdentity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    pub fn into_user(self) -> Option<User> {
        self.0
    }
}

impl From<User> for CurrentIdentity {
    fn from(user: User) -> Self {
        Self(Some(user))
    }
}

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentIdentity>()
            .cloned()
            .ok_or_else(|| ApiError::internal("Identity was not resolved for this request"))
    }
}

/// Resolve the session's user and attach it to the request.
///
/// No storage access happens for sessions without a `user_id`. An id whose
/// row no longer exists resolves to anonymous.
pub async fn load_current_user(
    session: Session,
    context: RequestContext,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = resolve_identity(&session, &context).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn resolve_identity(
    session: &Session,
    context: &RequestContext,
) -> Result<CurrentIdentity, ApiError> {
    let Some(user_id) = session_user_id(session).await? else {
        return Ok(CurrentIdentity::anonymous());
    };

    let mut scope = context.db().await;
    let user = SqliteUserRepository::new(scope.connection().await?)
        .find_by_id(user_id)
        .await?;

    if user.is_none() {
        debug!(user_id = %user_id, "Session refers to a missing user");
    }

    Ok(CurrentIdentity(user))
}
