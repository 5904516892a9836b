use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::user::models::User;

/// Persistence operations for sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Persist a new session.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_session(&self, session: &Session) -> Result<(), SessionError>;

    /// Retrieve a session joined with its owning user.
    ///
    /// # Returns
    /// Session and user, or None when no session has this identifier.
    /// Expired rows are returned as-is; expiry is the caller's decision.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_session_with_user(
        &self,
        id: &SessionId,
    ) -> Result<Option<(Session, User)>, SessionError>;

    /// Overwrite the expiry of an existing session.
    ///
    /// Missing sessions are ignored.
    async fn update_session_expiry(
        &self,
        id: &SessionId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionError>;

    /// Remove a session. Idempotent.
    async fn delete_session(&self, id: &SessionId) -> Result<(), SessionError>;

    /// Remove every session whose expiry is at or before `now`.
    ///
    /// # Returns
    /// Number of deleted sessions
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, SessionError>;
}
