use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, session_store::SessionStore, Expiry, SessionManagerLayer};

use super::auth;
use super::health;
use super::index;
use super::middleware::{
    load_current_user, logging_middleware, request_context_middleware,
    security_headers_middleware,
};
use super::state::AppState;
use crate::config::SessionConfig;

/// Create the full router with application state, keeping sessions in `store`
///
/// Layers run outermost first: tracing, request logging, security headers,
/// request context, session, identity resolution.
pub fn create_router_with_state<Store>(state: AppState, store: Store) -> Router
where
    Store: SessionStore + Clone,
{
    let sessions = session_layer(store, &state.config.session);

    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .nest("/auth", auth::create_auth_router())
        .layer(from_fn(load_current_user))
        .layer(sessions)
        .layer(from_fn_with_state(state.clone(), request_context_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn session_layer<Store>(store: Store, config: &SessionConfig) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(session_expiry(config))
}

/// Browser-session cookies unless an idle timeout is configured
fn session_expiry(config: &SessionConfig) -> Expiry {
    match config.idle_timeout() {
        Some(timeout) => Expiry::OnInactivity(time::Duration::seconds(timeout.as_secs() as i64)),
        None => Expiry::OnSessionEnd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_IDLE_TIMEOUT_SECS;

    #[test]
    fn test_no_idle_timeout_is_browser_session() {
        let config = SessionConfig::default();
        assert!(matches!(session_expiry(&config), Expiry::OnSessionEnd));
    }

    #[test]
    fn test_oversized_idle_timeout_is_capped() {
        let config = SessionConfig {
            idle_timeout_secs: Some(u64::MAX),
            ..SessionConfig::default()
        };

        match session_expiry(&config) {
            Expiry::OnInactivity(duration) => {
                assert_eq!(duration.whole_seconds(), MAX_IDLE_TIMEOUT_SECS as i64);
                // Saving a session adds this to the current time
                assert!(time::OffsetDateTime::now_utc().checked_add(duration).is_some());
            }
            other => panic!("expected inactivity expiry, got {:?}", other),
        }
    }
}
