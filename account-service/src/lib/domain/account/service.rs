use std::sync::Arc;

use auth::Authenticator;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::ports::Database;
use crate::domain::session::models::IssuedSession;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionToken;
use crate::domain::session::service::SessionManager;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Domain service behind the login, register, logout and users endpoints.
///
/// Stateless over storage: each call works on the database handle of the
/// current request.
pub struct AccountService {
    authenticator: Authenticator,
    session_manager: Arc<SessionManager>,
}

impl AccountService {
    /// Create a new account service.
    ///
    /// # Arguments
    /// * `authenticator` - Password verification and token minting
    /// * `session_manager` - Session lifecycle policy
    pub fn new(authenticator: Authenticator, session_manager: Arc<SessionManager>) -> Self {
        Self {
            authenticator,
            session_manager,
        }
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    /// Verify credentials and issue a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `User` / `Session` - Storage failed
    pub async fn login<D: Database>(
        &self,
        db: &D,
        command: &LoginCommand,
    ) -> Result<IssuedSession, AccountError> {
        let Some(user) = db.find_user_by_username(&command.username).await? else {
            self.authenticator
                .reject_unknown_account(command.password.expose());
            tracing::warn!(username = %command.username, "Login rejected");
            return Err(AccountError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(command.password.expose(), &user.password_hash)
            .map_err(|_| {
                tracing::warn!(username = %command.username, "Login rejected");
                AccountError::InvalidCredentials
            })?;

        let token = SessionToken::new(result.session_token);
        let session = self
            .session_manager
            .create_session(db, &token, &user.id)
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(IssuedSession { token, session })
    }

    /// Create an account and its first session.
    ///
    /// The user row and the session row are written in one transaction.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is taken; nothing was written
    /// * `Hashing` - Password hashing failed
    /// * `User` - Storage failed
    pub async fn register<D: Database>(
        &self,
        db: &D,
        command: RegisterCommand,
    ) -> Result<IssuedSession, AccountError> {
        if db.find_user_by_username(&command.username).await?.is_some() {
            return Err(AccountError::UsernameAlreadyExists);
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            password_hash,
        };

        let token = SessionToken::new(self.authenticator.generate_token());
        let session = self.session_manager.new_session(&token, &user.id);

        db.create_user_with_session(&user, &session)
            .await
            .map_err(|e| match e {
                UserError::UsernameAlreadyExists(_) => AccountError::UsernameAlreadyExists,
                other => AccountError::User(other),
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(IssuedSession { token, session })
    }

    /// Invalidate the current session.
    ///
    /// # Errors
    /// * `Unauthenticated` - No session is active
    /// * `Session` - Storage failed
    pub async fn logout<D: Database>(
        &self,
        db: &D,
        session: Option<&Session>,
    ) -> Result<(), AccountError> {
        let session = session.ok_or(AccountError::Unauthenticated)?;

        self.session_manager
            .invalidate_session(db, &session.id)
            .await?;

        tracing::info!(user_id = %session.user_id, "User logged out");

        Ok(())
    }

    /// List every registered user.
    pub async fn list_users<D: Database>(&self, db: &D) -> Result<Vec<User>, AccountError> {
        Ok(db.list_users().await?)
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;

    use super::*;
    use crate::domain::account::models::DEFAULT_LOGIN_REDIRECT;
    use crate::domain::session::models::SessionId;
    use crate::domain::session::ports::SessionRepository;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::Username;
    use crate::outbound::repositories::memory::InMemoryDatabase;

    fn service() -> AccountService {
        let hasher = PasswordHasher::with_params(256, 1, 1).unwrap();
        AccountService::new(
            Authenticator::with_hasher(hasher),
            Arc::new(SessionManager::default()),
        )
    }

    fn register_command(username: &str, password: &str) -> RegisterCommand {
        RegisterCommand {
            username: Username::new(username.to_string()).unwrap(),
            password: Password::new(password.to_string()).unwrap(),
        }
    }

    fn login_command(username: &str, password: &str) -> LoginCommand {
        LoginCommand {
            username: Username::new(username.to_string()).unwrap(),
            password: Password::new(password.to_string()).unwrap(),
            redirect_to: DEFAULT_LOGIN_REDIRECT.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service();
        let db = InMemoryDatabase::new();

        let registered = service
            .register(&db, register_command("alice", "password123"))
            .await
            .expect("registration succeeds");

        let logged_in = service
            .login(&db, &login_command("alice", "password123"))
            .await
            .expect("login succeeds");

        assert_ne!(registered.token, logged_in.token);
        assert_eq!(registered.session.user_id, logged_in.session.user_id);

        let validated = service
            .session_manager()
            .validate_session_token(&db, &logged_in.token)
            .await
            .unwrap()
            .expect("session is active");
        assert_eq!(validated.user.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let service = service();
        let db = InMemoryDatabase::new();

        service
            .register(&db, register_command("alice", "password123"))
            .await
            .unwrap();

        let users = db.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(!users[0].password_hash.contains("password123"));
        assert!(users[0].password_hash.contains(':'));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        let db = InMemoryDatabase::new();
        service
            .register(&db, register_command("alice", "password123"))
            .await
            .unwrap();

        let wrong_password = service
            .login(&db, &login_command("alice", "wrong-password"))
            .await
            .unwrap_err();
        let unknown_user = service
            .login(&db, &login_command("mallory", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_user, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(db.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = service();
        let db = InMemoryDatabase::new();
        service
            .register(&db, register_command("alice", "password123"))
            .await
            .unwrap();

        let result = service
            .register(&db, register_command("alice", "another-password"))
            .await;

        assert!(matches!(result, Err(AccountError::UsernameAlreadyExists)));
        assert_eq!(db.list_users().await.unwrap().len(), 1);
        assert_eq!(db.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let service = service();
        let db = InMemoryDatabase::new();

        let result = service.logout(&db, None).await;

        assert!(matches!(result, Err(AccountError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_logout_removes_session() {
        let service = service();
        let db = InMemoryDatabase::new();
        let issued = service
            .register(&db, register_command("alice", "password123"))
            .await
            .unwrap();

        service
            .logout(&db, Some(&issued.session))
            .await
            .expect("logout succeeds");

        let lookup = db
            .find_session_with_user(&SessionId::from_token(&issued.token))
            .await
            .unwrap();
        assert!(lookup.is_none());

        let validated = service
            .session_manager()
            .validate_session_token(&db, &issued.token)
            .await
            .unwrap();
        assert!(validated.is_none());
    }

    #[tokio::test]
    async fn test_list_users() {
        let service = service();
        let db = InMemoryDatabase::new();
        for username in ["carol", "alice", "bob"] {
            service
                .register(&db, register_command(username, "password123"))
                .await
                .unwrap();
        }

        let usernames: Vec<String> = service
            .list_users(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|user| user.username.to_string())
            .collect();

        assert_eq!(usernames, vec!["alice", "bob", "carol"]);
    }
}
