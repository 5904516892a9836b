use std::hint::black_box;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token;

/// Authentication coordinator combining password verification and session token minting.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and session token generation.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    /// Hash of a random secret, verified against when the account is unknown.
    decoy_hash: Option<String>,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Raw session token to hand to the client
    pub session_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl Authenticator {
    /// Create a new authenticator with default hashing parameters.
    pub fn new() -> Self {
        Self::with_hasher(PasswordHasher::new())
    }

    /// Create an authenticator around a configured password hasher.
    pub fn with_hasher(password_hasher: PasswordHasher) -> Self {
        let decoy_hash = password_hasher
            .hash(&token::generate_identifier(16))
            .ok();

        Self {
            password_hasher,
            decoy_hash,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and mint a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    ///
    /// # Returns
    /// AuthenticationResult with a fresh session token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or the stored hash is unusable
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(stored_hash, password) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(AuthenticationResult {
            session_token: self.generate_token(),
        })
    }

    /// Reject an attempt for an account that does not exist.
    ///
    /// Runs one key derivation against a decoy hash so a miss costs the same
    /// as a wrong password.
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        if let Some(decoy) = &self.decoy_hash {
            black_box(self.password_hasher.verify(decoy, black_box(password)));
        }

        AuthenticationError::InvalidCredentials
    }

    /// Generate a session token without password verification.
    ///
    /// Used right after registration, when the password was just set.
    pub fn generate_token(&self) -> String {
        token::generate_session_token()
    }
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new()
    }
}
