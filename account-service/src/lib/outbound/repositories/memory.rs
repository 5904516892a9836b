use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::account::ports::Database;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct Tables {
    users: HashMap<Username, User>,
    sessions: HashMap<SessionId, Session>,
}

/// Process-local store with the same semantics as the PostgreSQL adapter.
///
/// Used for local development (`database.url = "memory://"`) and tests.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryDatabase {
    async fn find_user_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self.tables.read().await.users.get(username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        Ok(users)
    }
}

#[async_trait]
impl SessionRepository for InMemoryDatabase {
    async fn create_session(&self, session: &Session) -> Result<(), SessionError> {
        let mut tables = self.tables.write().await;

        if !tables.users.values().any(|user| user.id == session.user_id) {
            return Err(SessionError::DatabaseError(format!(
                "unknown user {}",
                session.user_id
            )));
        }

        tables.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn find_session_with_user(
        &self,
        id: &SessionId,
    ) -> Result<Option<(Session, User)>, SessionError> {
        let tables = self.tables.read().await;

        let found = tables.sessions.get(id).and_then(|session| {
            tables
                .users
                .values()
                .find(|user| user.id == session.user_id)
                .map(|user| (session.clone(), user.clone()))
        });

        Ok(found)
    }

    async fn update_session_expiry(
        &self,
        id: &SessionId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if let Some(session) = self.tables.write().await.sessions.get_mut(id) {
            session.expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        self.tables.write().await.sessions.remove(id);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, SessionError> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, session| !session.is_expired_at(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    async fn create_user_with_session(
        &self,
        user: &User,
        session: &Session,
    ) -> Result<(), UserError> {
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(&user.username) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }

        tables.users.insert(user.username.clone(), user.clone());
        tables.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }
}
