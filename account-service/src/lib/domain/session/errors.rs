use thiserror::Error;

use crate::user::errors::UsernameError;

/// Error for session persistence and validation
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Stored session owner is invalid: {0}")]
    InvalidOwner(#[from] UsernameError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
