//! Access gate for views that need a logged-in user

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::identity::CurrentIdentity;
use crate::api::auth::LOGIN_PATH;
use crate::domain::user::User;

/// Route layer: redirect anonymous requests to the login page, otherwise run
/// the wrapped handler unchanged.
pub async fn login_required(
    identity: CurrentIdentity,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !identity.is_authenticated() {
        debug!(path = %request.uri().path(), "Anonymous request to protected view");
        return Redirect::to(LOGIN_PATH).into_response();
    }

    next.run(request).await
}

/// Extractor form of the gate, yielding the logged-in user.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = CurrentIdentity::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        identity
            .into_user()
            .map(RequireUser)
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())
    }
}
