//! Application index

use axum::{extract::State, response::Html};
use tower_sessions::Session;

use super::middleware::CurrentIdentity;
use super::state::AppState;
use super::types::ApiError;
use super::views::{render_page, Page};

/// GET /
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
) -> Result<Html<String>, ApiError> {
    render_page(&state, &session, identity.user(), Page::Index).await
}
