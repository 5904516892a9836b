use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::account::ports::Database;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;
use crate::user::errors::UsernameError;

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

/// PostgreSQL-backed store. Clones share the connection pool.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = UsernameError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_string(row.id),
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
        })
    }
}

#[derive(FromRow)]
struct SessionWithUserRow {
    session_id: String,
    user_id: String,
    expires_at: DateTime<Utc>,
    username: String,
    password_hash: String,
}

fn user_insert_error(e: sqlx::Error, username: &Username) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_UNIQUE_CONSTRAINT)
        {
            return UserError::UsernameAlreadyExists(username.to_string());
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresDatabase {
    async fn find_user_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(User::try_from(r)?)),
            None => Ok(None),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|r| User::try_from(r).map_err(UserError::from))
            .collect()
    }
}

#[async_trait]
impl SessionRepository for PostgresDatabase {
    async fn create_session(&self, session: &Session) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session.id.as_str())
        .bind(session.user_id.as_str())
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_session_with_user(
        &self,
        id: &SessionId,
    ) -> Result<Option<(Session, User)>, SessionError> {
        let row = sqlx::query_as::<_, SessionWithUserRow>(
            r#"
            SELECT s.id AS session_id, s.user_id, s.expires_at, u.username, u.password_hash
            FROM sessions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        match row {
            Some(r) => {
                let user = User {
                    id: UserId::from_string(r.user_id),
                    username: Username::new(r.username)?,
                    password_hash: r.password_hash,
                };
                let session = Session {
                    id: SessionId::from_string(r.session_id),
                    user_id: user.id.clone(),
                    expires_at: r.expires_at,
                };
                Ok(Some((session, user)))
            }
            None => Ok(None),
        }
    }

    async fn update_session_expiry(
        &self,
        id: &SessionId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            UPDATE sessions
            SET expires_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, SessionError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn create_user_with_session(
        &self,
        user: &User,
        session: &Session,
    ) -> Result<(), UserError> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id.as_str())
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .execute(&mut *transaction)
        .await
        .map_err(|e| user_insert_error(e, &user.username))?;

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session.id.as_str())
        .bind(session.user_id.as_str())
        .bind(session.expires_at)
        .execute(&mut *transaction)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        transaction
            .commit()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
