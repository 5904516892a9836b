pub mod argon2;
pub mod errors;

pub use argon2::PasswordHasher;
pub use argon2::KEY_BYTES;
pub use argon2::SALT_BYTES;
pub use errors::PasswordError;
