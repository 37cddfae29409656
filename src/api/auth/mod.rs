//! Authentication endpoints
//!
//! Register, log in and log out through HTML forms. Successful submissions
//! redirect; recoverable failures are flashed and the form is shown again.

use axum::{
    extract::State,
    middleware::from_fn,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, info};

use crate::api::middleware::{login_required, CurrentIdentity, RequestContext, RequireUser};
use crate::api::session::{bind_user, flash, unbind};
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::api::views::{render_page, Page};
use crate::domain::user::{validate_registration, User};
use crate::domain::DomainError;
use crate::infrastructure::user::{Credentials, SqliteUserRepository};

/// Where anonymous users are sent
pub const LOGIN_PATH: &str = "/auth/login";

/// Landing page after login and logout
pub const INDEX_PATH: &str = "/";

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(current_user))
        .route_layer(from_fn(login_required))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

/// Register and login form fields. Missing fields are treated as empty.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<CredentialsForm> for Credentials {
    fn from(form: CredentialsForm) -> Self {
        Credentials::new(form.username, form.password)
    }
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().value(),
            username: user.username().to_string(),
        }
    }
}

/// GET /auth/register
pub async fn register_form(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
) -> Result<Response, ApiError> {
    Ok(render_page(&state, &session, identity.user(), Page::Register)
        .await?
        .into_response())
}

/// POST /auth/register
///
/// Redirects to the login page once the user row is committed.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
    context: RequestContext,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let credentials = Credentials::from(form);

    // Empty fields are reported without opening the database
    if let Err(err) = validate_registration(&credentials.username, &credentials.password) {
        return redisplay(&state, &session, &identity, Page::Register, err.into()).await;
    }

    let outcome = {
        let mut scope = context.db().await;
        let mut users = SqliteUserRepository::new(scope.connection().await?);
        state.auth_service.register(&mut users, &credentials).await
    };

    match outcome {
        Ok(_) => Ok(Redirect::to(LOGIN_PATH).into_response()),
        Err(err) => redisplay(&state, &session, &identity, Page::Register, err).await,
    }
}

/// GET /auth/login
pub async fn login_form(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
) -> Result<Response, ApiError> {
    Ok(render_page(&state, &session, identity.user(), Page::Login)
        .await?
        .into_response())
}

/// POST /auth/login
///
/// Binds the user to a fresh session and redirects to the index.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
    context: RequestContext,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let credentials = Credentials::from(form);

    let outcome = {
        let mut scope = context.db().await;
        let mut users = SqliteUserRepository::new(scope.connection().await?);
        state.auth_service.authenticate(&mut users, &credentials).await
    };

    match outcome {
        Ok(user) => {
            bind_user(&session, &user).await?;
            info!(user_id = %user.id(), username = %user.username(), "User logged in");
            Ok(Redirect::to(INDEX_PATH).into_response())
        }
        Err(err) => redisplay(&state, &session, &identity, Page::Login, err).await,
    }
}

/// GET /auth/logout
pub async fn logout(session: Session, identity: CurrentIdentity) -> Result<Redirect, ApiError> {
    unbind(&session).await?;

    if let Some(user) = identity.user() {
        info!(user_id = %user.id(), "User logged out");
    }

    Ok(Redirect::to(INDEX_PATH))
}

/// GET /auth/me
pub async fn current_user(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from_user(&user))
}

/// Flash the error's notice and show `page` again. Errors without a notice
/// leave the request as failures.
async fn redisplay(
    state: &AppState,
    session: &Session,
    identity: &CurrentIdentity,
    page: Page,
    err: DomainError,
) -> Result<Response, ApiError> {
    let Some(notice) = err.notice() else {
        return Err(err.into());
    };

    debug!(page = ?page, notice = %notice, "Redisplaying form");
    flash(session, notice).await?;

    Ok(render_page(state, session, identity.user(), page)
        .await?
        .into_response())
}
