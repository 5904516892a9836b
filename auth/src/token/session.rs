use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

/// Random bytes in a session token before hex encoding (160 bits).
pub const SESSION_TOKEN_BYTES: usize = 20;

/// Generate a random session token.
///
/// The token is what the client holds; only its hash is ever stored.
///
/// # Returns
/// Lowercase hex string, safe to use as a cookie value
pub fn generate_session_token() -> String {
    generate_identifier(SESSION_TOKEN_BYTES)
}

/// Hash a session token into its storage identifier.
///
/// Single pass SHA-256: tokens are already high-entropy, so no stretching.
///
/// # Arguments
/// * `token` - Raw session token
///
/// # Returns
/// Lowercase hex SHA-256 digest
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a random opaque identifier from `bytes` bytes of OS entropy.
///
/// # Returns
/// Lowercase hex string of `2 * bytes` characters
pub fn generate_identifier(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    hex::encode(buffer)
}
