//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod sharing;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;
pub use self::sharing::SharingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Bearer token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Share link settings.
    #[serde(default)]
    pub sharing: SharingConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `FOLIO__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.sharing.token_bytes < sharing::MIN_TOKEN_BYTES {
            return Err(AppError::configuration(format!(
                "sharing.token_bytes must be at least {}",
                sharing::MIN_TOKEN_BYTES
            )));
        }
        if self.sharing.token_bytes > sharing::MAX_TOKEN_BYTES {
            return Err(AppError::configuration(format!(
                "sharing.token_bytes must be at most {}",
                sharing::MAX_TOKEN_BYTES
            )));
        }
        if self.sharing.max_token_attempts == 0 {
            return Err(AppError::configuration(
                "sharing.max_token_attempts must be at least 1",
            ));
        }
        if self.database.provider == DatabaseProvider::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres provider",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_use_memory_store() {
        let config = AppConfig::default();
        assert_eq!(config.database.provider, DatabaseProvider::Memory);
        assert_eq!(config.sharing.token_bytes, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_short_tokens() {
        let mut config = AppConfig::default();
        config.sharing.token_bytes = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_tokens() {
        let mut config = AppConfig::default();
        config.sharing.token_bytes = sharing::MAX_TOKEN_BYTES;
        assert!(config.validate().is_ok());
        config.sharing.token_bytes = 200;
        let err = config.validate().unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = AppConfig::default();
        config.database.provider = DatabaseProvider::Postgres;
        assert!(config.validate().is_err());
        config.database.url = "postgres://localhost/folio".to_string();
        assert!(config.validate().is_ok());
    }
}
