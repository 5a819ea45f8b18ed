//! Environment-based configuration for the Tollgate server.

use std::env;

use thiserror::Error;
use tollgate_auth::AuthConfig;
use tollgate_db::DbConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {0}")]
    Invalid(&'static str),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables. Key material is
    /// required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let db = DbConfig {
            url: env_or("TOLLGATE_DB_URL", "127.0.0.1:8000"),
            namespace: env_or("TOLLGATE_DB_NAMESPACE", "tollgate"),
            database: env_or("TOLLGATE_DB_DATABASE", "main"),
            username: env_or("TOLLGATE_DB_USERNAME", "root"),
            password: env_or("TOLLGATE_DB_PASSWORD", "root"),
        };

        let jwt_private_key_pem = env::var("TOLLGATE_JWT_PRIVATE_KEY_PEM")
            .map_err(|_| ConfigError::Missing("TOLLGATE_JWT_PRIVATE_KEY_PEM"))?;
        let jwt_public_key_pem = env::var("TOLLGATE_JWT_PUBLIC_KEY_PEM")
            .map_err(|_| ConfigError::Missing("TOLLGATE_JWT_PUBLIC_KEY_PEM"))?;

        let auth = AuthConfig {
            jwt_private_key_pem,
            jwt_public_key_pem,
            jwt_issuer: env_or("TOLLGATE_JWT_ISSUER", "tollgate"),
            access_token_lifetime_secs: parse_or("TOLLGATE_ACCESS_TOKEN_LIFETIME_SECS", 900)?,
            refresh_token_retention_days: parse_or("TOLLGATE_REFRESH_TOKEN_RETENTION_DAYS", 14)?,
            pepper: env::var("TOLLGATE_PASSWORD_PEPPER").ok(),
            ..AuthConfig::default()
        };

        Ok(Self { db, auth })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}
