//! Layered server configuration.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`VETCLINIC_*`, `__` separates sections)
//! 2. `vetclinic.toml` in the working directory, or the file named by
//!    `VETCLINIC_CONFIG`
//! 3. Built-in defaults
//!
//! `VETCLINIC_AUTH__SECRET` maps to `auth.secret`,
//! `VETCLINIC_DATABASE__PATH` to `database.path`, and so on.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;
use vetclinic_core::auth::DEFAULT_TOKEN_TTL_SECS;

/// Secret used when none is configured. Fine for local runs only.
pub const DEV_SECRET: &str = "vetclinic-dev-secret-change-me";

const CONFIG_FILE: &str = "vetclinic.toml";
const CONFIG_PATH_VAR: &str = "VETCLINIC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file, or `:memory:`
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "vetclinic.db".into(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HMAC key for session tokens
    pub secret: String,
    pub token_ttl_secs: i64,
    /// Add `Secure` to the session cookie
    pub secure_cookie: bool,
    /// Path prefixes that require a valid session
    pub protected_prefixes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            secure_cookie: false,
            protected_prefixes: vec!["/dashboard".into()],
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("secure_cookie", &self.secure_cookie)
            .field("protected_prefixes", &self.protected_prefixes)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeedConfig {
    /// Specialties inserted at startup if missing
    pub specialties: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            specialties: [
                "Medicina general",
                "Cirugía",
                "Dermatología",
                "Cardiología",
                "Odontología",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ClinicConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl ClinicConfig {
    /// Load configuration from the TOML file and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` first, then [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("VETCLINIC_").split("__"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.secret".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.auth.token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "auth.token_ttl_secs".into(),
                reason: "must be positive".into(),
            });
        }
        if self.auth.secret == DEV_SECRET {
            warn!("Using the built-in development secret; set VETCLINIC_AUTH__SECRET");
        }
        Ok(())
    }
}
