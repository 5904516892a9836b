use chrono::Duration;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::models::SessionToken;
use crate::domain::session::models::ValidatedSession;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::UserId;

/// Session lifecycle: issue, validate with sliding renewal, invalidate, purge.
///
/// Holds only policy; every operation receives the database handle of the
/// current request.
#[derive(Debug, Clone)]
pub struct SessionManager {
    ttl: Duration,
}

impl SessionManager {
    pub const DEFAULT_TTL_DAYS: i64 = 30;

    /// Create a session manager.
    ///
    /// # Arguments
    /// * `ttl` - Lifetime of a session from issue or last renewal
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a new client token.
    pub fn generate_token(&self) -> SessionToken {
        SessionToken::generate()
    }

    /// Build the session record for `token` without persisting it.
    pub fn new_session(&self, token: &SessionToken, user_id: &UserId) -> Session {
        Session {
            id: SessionId::from_token(token),
            user_id: user_id.clone(),
            expires_at: Utc::now() + self.ttl,
        }
    }

    /// Persist a new session for `user_id` keyed by the hash of `token`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    pub async fn create_session<R>(
        &self,
        db: &R,
        token: &SessionToken,
        user_id: &UserId,
    ) -> Result<Session, SessionError>
    where
        R: SessionRepository + ?Sized,
    {
        let session = self.new_session(token, user_id);
        db.create_session(&session).await?;
        Ok(session)
    }

    /// Resolve a client token to its session and user.
    ///
    /// Expired sessions are deleted and reported as absent. Sessions with less
    /// than half their lifetime left get a full new lifetime.
    ///
    /// # Returns
    /// The (possibly renewed) session with its user, or None
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    pub async fn validate_session_token<R>(
        &self,
        db: &R,
        token: &SessionToken,
    ) -> Result<Option<ValidatedSession>, SessionError>
    where
        R: SessionRepository + ?Sized,
    {
        let session_id = SessionId::from_token(token);
        let Some((mut session, user)) = db.find_session_with_user(&session_id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if session.is_expired_at(now) {
            db.delete_session(&session.id).await?;
            tracing::debug!(user_id = %session.user_id, "Expired session removed");
            return Ok(None);
        }

        if session.expires_at - now < self.ttl / 2 {
            session.expires_at = now + self.ttl;
            db.update_session_expiry(&session.id, session.expires_at)
                .await?;
            tracing::debug!(
                user_id = %session.user_id,
                expires_at = %session.expires_at,
                "Session renewed"
            );
        }

        Ok(Some(ValidatedSession { session, user }))
    }

    /// Delete a session. Idempotent.
    pub async fn invalidate_session<R>(&self, db: &R, id: &SessionId) -> Result<(), SessionError>
    where
        R: SessionRepository + ?Sized,
    {
        db.delete_session(id).await
    }

    /// Delete all sessions that are past their expiry.
    ///
    /// # Returns
    /// Number of deleted sessions
    pub async fn purge_expired_sessions<R>(&self, db: &R) -> Result<u64, SessionError>
    where
        R: SessionRepository + ?Sized,
    {
        db.delete_expired_sessions(Utc::now()).await
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Duration::days(Self::DEFAULT_TTL_DAYS))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::User;
    use crate::domain::user::models::Username;

    mock! {
        pub TestSessionRepository {}

        #[async_trait]
        impl SessionRepository for TestSessionRepository {
            async fn create_session(&self, session: &Session) -> Result<(), SessionError>;
            async fn find_session_with_user(&self, id: &SessionId) -> Result<Option<(Session, User)>, SessionError>;
            async fn update_session_expiry(&self, id: &SessionId, expires_at: DateTime<Utc>) -> Result<(), SessionError>;
            async fn delete_session(&self, id: &SessionId) -> Result<(), SessionError>;
            async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, SessionError>;
        }
    }

    fn test_user() -> User {
        User {
            id: UserId::from_string("0123456789abcdef0123456789abcd"),
            username: Username::new("testuser".to_string()).unwrap(),
            password_hash: "salt:key".to_string(),
        }
    }

    fn stored_session(token: &SessionToken, expires_at: DateTime<Utc>) -> (Session, User) {
        let user = test_user();
        let session = Session {
            id: SessionId::from_token(token),
            user_id: user.id.clone(),
            expires_at,
        };
        (session, user)
    }

    #[tokio::test]
    async fn test_create_session_stores_token_hash() {
        let mut repository = MockTestSessionRepository::new();
        let manager = SessionManager::default();
        let token = manager.generate_token();
        let expected_id = SessionId::from_token(&token);

        repository
            .expect_create_session()
            .withf(move |session| session.id == expected_id)
            .times(1)
            .returning(|_| Ok(()));

        let before = Utc::now();
        let session = manager
            .create_session(&repository, &token, &test_user().id)
            .await
            .expect("session created");

        assert_ne!(session.id.as_str(), token.as_str());
        assert!(session.expires_at >= before + Duration::days(30));
        assert!(session.expires_at <= Utc::now() + Duration::days(30));
    }

    #[tokio::test]
    async fn test_validate_unknown_token() {
        let mut repository = MockTestSessionRepository::new();
        repository
            .expect_find_session_with_user()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_delete_session().times(0);
        repository.expect_update_session_expiry().times(0);

        let result = SessionManager::default()
            .validate_session_token(&repository, &SessionToken::new("unknown"))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_validate_expired_session_deletes_it() {
        let mut repository = MockTestSessionRepository::new();
        let token = SessionToken::generate();
        let stored = stored_session(&token, Utc::now() - Duration::seconds(1));
        let expected_id = stored.0.id.clone();

        repository
            .expect_find_session_with_user()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        repository
            .expect_delete_session()
            .withf(move |id| *id == expected_id)
            .times(1)
            .returning(|_| Ok(()));
        repository.expect_update_session_expiry().times(0);

        let result = SessionManager::default()
            .validate_session_token(&repository, &token)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_validate_fresh_session_is_not_renewed() {
        let mut repository = MockTestSessionRepository::new();
        let token = SessionToken::generate();
        let expires_at = Utc::now() + Duration::days(29);
        let stored = stored_session(&token, expires_at);

        repository
            .expect_find_session_with_user()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        repository.expect_update_session_expiry().times(0);
        repository.expect_delete_session().times(0);

        let validated = SessionManager::default()
            .validate_session_token(&repository, &token)
            .await
            .unwrap()
            .expect("session is valid");

        assert_eq!(validated.session.expires_at, expires_at);
        assert_eq!(validated.user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_validate_session_in_renewal_window_extends_expiry() {
        let mut repository = MockTestSessionRepository::new();
        let token = SessionToken::generate();
        let old_expiry = Utc::now() + Duration::days(10);
        let stored = stored_session(&token, old_expiry);

        repository
            .expect_find_session_with_user()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        repository
            .expect_update_session_expiry()
            .withf(move |_, expires_at| *expires_at > old_expiry)
            .times(1)
            .returning(|_, _| Ok(()));

        let validated = SessionManager::default()
            .validate_session_token(&repository, &token)
            .await
            .unwrap()
            .expect("session is valid");

        assert!(validated.session.expires_at > old_expiry);
        assert!(validated.session.expires_at > Utc::now() + Duration::days(29));
    }

    #[tokio::test]
    async fn test_validate_propagates_database_errors() {
        let mut repository = MockTestSessionRepository::new();
        repository
            .expect_find_session_with_user()
            .times(1)
            .returning(|_| Err(SessionError::DatabaseError("connection reset".to_string())));

        let result = SessionManager::default()
            .validate_session_token(&repository, &SessionToken::generate())
            .await;

        assert!(matches!(result, Err(SessionError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_invalidate_session_deletes_record() {
        let mut repository = MockTestSessionRepository::new();
        let id = SessionId::from_string("abc");
        let expected_id = id.clone();

        repository
            .expect_delete_session()
            .withf(move |id| *id == expected_id)
            .times(2)
            .returning(|_| Ok(()));

        let manager = SessionManager::default();
        manager.invalidate_session(&repository, &id).await.unwrap();
        manager.invalidate_session(&repository, &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_purge_expired_sessions_reports_count() {
        let mut repository = MockTestSessionRepository::new();
        repository
            .expect_delete_expired_sessions()
            .withf(|now| *now <= Utc::now())
            .times(1)
            .returning(|_| Ok(3));

        let purged = SessionManager::default()
            .purge_expired_sessions(&repository)
            .await
            .unwrap();

        assert_eq!(purged, 3);
    }
}
