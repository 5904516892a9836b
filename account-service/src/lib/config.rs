use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// `database.url` prefix selecting the in-memory store.
pub const MEMORY_DATABASE_PREFIX: &str = "memory:";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with(MEMORY_DATABASE_PREFIX)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
    /// Set the `Secure` attribute on the session cookie. Disable only for
    /// local development over plain HTTP.
    #[serde(default = "default_secure_cookie")]
    pub secure_cookie: bool,
    /// Seconds between expired-session purges; 0 disables the purge task.
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

impl SessionConfig {
    /// Longest accepted session lifetime.
    pub const MAX_TTL_DAYS: i64 = 3650;

    /// Session lifetime, or None when `ttl_days` is outside `1..=MAX_TTL_DAYS`.
    pub fn ttl(&self) -> Option<chrono::Duration> {
        if (1..=Self::MAX_TTL_DAYS).contains(&self.ttl_days) {
            Some(chrono::Duration::days(self.ttl_days))
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: auth::PasswordHasher::DEFAULT_MEMORY_KIB,
            iterations: auth::PasswordHasher::DEFAULT_ITERATIONS,
            parallelism: auth::PasswordHasher::DEFAULT_PARALLELISM,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_ttl_days() -> i64 {
    30
}

fn default_secure_cookie() -> bool {
    true
}

fn default_purge_interval_secs() -> u64 {
    3600
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SESSION__SECURE_COOKIE, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=memory:// overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
