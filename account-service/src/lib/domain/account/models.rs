use crate::domain::user::models::Password;
use crate::domain::user::models::Username;

/// Where a successful login lands when no target is given.
pub const DEFAULT_LOGIN_REDIRECT: &str = "/";

/// Where a successful registration lands.
pub const REGISTER_REDIRECT: &str = "/profile";

/// Command to log in with validated credentials
#[derive(Debug)]
pub struct LoginCommand {
    pub username: Username,
    pub password: Password,
    pub redirect_to: String,
}

/// Command to register a new account with validated credentials
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub password: Password,
}
