use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::PasswordError;

/// Salt length in bytes before hex encoding.
pub const SALT_BYTES: usize = 16;

/// Derived key length in bytes before hex encoding.
pub const KEY_BYTES: usize = 64;

const DELIMITER: char = ':';

/// Password hashing implementation.
///
/// Derives keys with Argon2id (memory-hard) and stores them as
/// `saltHex:derivedKeyHex`. The hex-encoded salt string is the salt fed to the KDF.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Default memory cost in KiB (19 MiB).
    pub const DEFAULT_MEMORY_KIB: u32 = 19_456;
    /// Default number of passes over memory.
    pub const DEFAULT_ITERATIONS: u32 = 2;
    /// Default degree of parallelism.
    pub const DEFAULT_PARALLELISM: u32 = 1;

    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        let params = Params::new(
            Self::DEFAULT_MEMORY_KIB,
            Self::DEFAULT_ITERATIONS,
            Self::DEFAULT_PARALLELISM,
            Some(KEY_BYTES),
        )
        .unwrap_or_default();

        Self::from_params(params)
    }

    /// Create a password hasher with explicit cost parameters.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Degree of parallelism
    ///
    /// # Errors
    /// * `InvalidParameters` - Parameters rejected by Argon2
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, Some(KEY_BYTES))
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self::from_params(params))
    }

    fn from_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// `salt:derivedKey`, both lowercase hex
    ///
    /// # Errors
    /// * `HashingFailed` - Key derivation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt);
        let salt = hex::encode(salt);

        let derived_key = self
            .derive_key(password, &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(format!("{}{}{}", salt, DELIMITER, hex::encode(derived_key)))
    }

    /// Verify a password against a stored hash.
    ///
    /// Fails closed: a malformed stored hash yields `false`.
    ///
    /// # Arguments
    /// * `stored_hash` - Stored `salt:derivedKey` value
    /// * `password` - Plaintext password to verify
    pub fn verify(&self, stored_hash: &str, password: &str) -> bool {
        self.try_verify(stored_hash, password).unwrap_or(false)
    }

    /// Verify a password against a stored hash, reporting malformed hashes.
    ///
    /// # Errors
    /// * `MalformedHash` - Stored value cannot be parsed or used as a salt
    pub fn try_verify(&self, stored_hash: &str, password: &str) -> Result<bool, PasswordError> {
        let (salt, expected_hex) = stored_hash
            .split_once(DELIMITER)
            .ok_or_else(|| PasswordError::MalformedHash("missing delimiter".to_string()))?;

        if salt.is_empty() || expected_hex.is_empty() {
            return Err(PasswordError::MalformedHash("empty component".to_string()));
        }

        let expected = hex::decode(expected_hex)
            .map_err(|e| PasswordError::MalformedHash(format!("derived key: {}", e)))?;

        let derived_key = self
            .derive_key(password, salt)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        Ok(constant_time_eq(&derived_key, &expected))
    }

    fn derive_key(&self, password: &str, salt: &str) -> Result<[u8; KEY_BYTES], argon2::Error> {
        let mut output = [0u8; KEY_BYTES];
        self.argon2
            .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut output)?;
        Ok(output)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
