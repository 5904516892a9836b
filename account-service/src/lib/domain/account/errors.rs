use thiserror::Error;

use crate::domain::session::errors::SessionError;
use crate::user::errors::UserError;

/// Error for account operations exposed by the auth endpoints
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    /// Same message for unknown usernames and wrong passwords.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] auth::PasswordError),

    #[error("User storage failed: {0}")]
    User(#[from] UserError),

    #[error("Session storage failed: {0}")]
    Session(#[from] SessionError),
}
