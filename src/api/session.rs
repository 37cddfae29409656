//! Session keys managed by this application
//!
//! The session itself belongs to the `tower-sessions` layer. This module only
//! reads and writes the `user_id` binding and the one-shot flash notices.

use tower_sessions::Session;

use crate::api::types::ApiError;
use crate::domain::user::{User, UserId};

/// Session key holding the logged-in user's id
pub const USER_ID_KEY: &str = "user_id";

const FLASH_KEY: &str = "_flashes";

/// The user id bound to this session, if any
pub async fn session_user_id(session: &Session) -> Result<Option<UserId>, ApiError> {
    Ok(session.get::<UserId>(USER_ID_KEY).await?)
}

/// Start an authenticated session for `user`.
///
/// Previous session data is discarded and the session id is rotated before
/// the new binding is written.
pub async fn bind_user(session: &Session, user: &User) -> Result<(), ApiError> {
    session.clear().await;
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id()).await?;
    Ok(())
}

/// Drop all session data and remove the session from the store
pub async fn unbind(session: &Session) -> Result<(), ApiError> {
    session.flush().await?;
    Ok(())
}

/// Queue a notice for the next rendered page
pub async fn flash(session: &Session, message: impl Into<String>) -> Result<(), ApiError> {
    let mut flashes: Vec<String> = session.get(FLASH_KEY).await?.unwrap_or_default();
    flashes.push(message.into());
    session.insert(FLASH_KEY, flashes).await?;
    Ok(())
}

/// Remove and return all queued notices
pub async fn take_flashes(session: &Session) -> Result<Vec<String>, ApiError> {
    Ok(session
        .remove::<Vec<String>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_anonymous_session_has_no_user() {
        let session = new_session();
        assert_eq!(session_user_id(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bind_clears_previous_data() {
        let session = new_session();
        session.insert("theme", "dark").await.unwrap();
        flash(&session, "stale notice").await.unwrap();

        let user = User::new(UserId::new(3), "alice", "hash");
        bind_user(&session, &user).await.unwrap();

        assert_eq!(session_user_id(&session).await.unwrap(), Some(UserId::new(3)));
        assert_eq!(session.get::<String>("theme").await.unwrap(), None);
        assert!(take_flashes(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unbind_removes_user() {
        let session = new_session();
        let user = User::new(UserId::new(3), "alice", "hash");
        bind_user(&session, &user).await.unwrap();

        unbind(&session).await.unwrap();

        assert_eq!(session_user_id(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flashes_are_one_shot_and_ordered() {
        let session = new_session();

        flash(&session, "first").await.unwrap();
        flash(&session, "second").await.unwrap();

        assert_eq!(take_flashes(&session).await.unwrap(), vec!["first", "second"]);
        assert!(take_flashes(&session).await.unwrap().is_empty());
    }
}
