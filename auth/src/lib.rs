//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for session-based services:
//! - Password hashing (Argon2id, `salt:derivedKey` hex format)
//! - Session token generation and hashing
//! - Authentication coordination
//!
//! Services define their own persistence and adapt these primitives.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(256, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password"));
//! assert!(!hasher.verify(&hash, "other_password"));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::token;
//!
//! let session_token = token::generate_session_token();
//! let session_id = token::hash_session_token(&session_token);
//! assert_ne!(session_token, session_id);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordHasher};
//!
//! let auth = Authenticator::with_hasher(PasswordHasher::with_params(256, 1, 1).unwrap());
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and mint a session token
//! let result = auth.authenticate("password123", &hash).unwrap();
//! assert!(!result.session_token.is_empty());
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
