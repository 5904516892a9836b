use async_trait::async_trait;

use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Database handle carried by each request.
///
/// Cheap to clone; clones share the underlying store.
#[async_trait]
pub trait Database: UserRepository + SessionRepository + Clone {
    /// Insert a user and its first session atomically.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken; nothing was written
    /// * `DatabaseError` - Database operation failed; nothing was written
    async fn create_user_with_session(&self, user: &User, session: &Session)
        -> Result<(), UserError>;
}
