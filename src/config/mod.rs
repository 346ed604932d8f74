use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Name of the primary asset store, reported in health output.
    pub provider: String,
    /// Local root directory for funeral program PDFs.
    pub asset_root: String,
    /// Provider named in degraded mode when the primary fails to come up.
    pub fallback_provider: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Service credential required on /admin routes via the x-admin-key
    /// header.
    pub service_key: String,
}

const PLACEHOLDER_KEYS: &[&str] = &["", "change-me", "change-me-in-production"];

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://memoriam.db")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.provider", "local-disk")?
            .set_default("storage.asset_root", "assets/programs")?
            .set_default("storage.fallback_provider", "cloudinary")?
            .set_default("admin.service_key", "")?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with MEMORIAM__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("MEMORIAM").separator("__"))

            .build()?;

        config.try_deserialize()
    }

    /// Deployment sanity check, run once at startup. An absent or
    /// placeholder admin credential is a configuration fault an operator
    /// has to fix, so it is surfaced as its own error rather than letting
    /// every /admin call fail with a generic 401.
    pub fn validate(&self) -> Result<(), AppError> {
        let key = self.admin.service_key.trim();
        if PLACEHOLDER_KEYS.contains(&key) {
            return Err(AppError::Configuration(
                "admin.service_key is not set; configure MEMORIAM__ADMIN__SERVICE_KEY".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: "local-disk".to_string(),
            asset_root: "assets/programs".to_string(),
            fallback_provider: "cloudinary".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key(key: &str) -> Settings {
        Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                base_url: "http://localhost".to_string(),
            },
            database: DatabaseConfig {
                url: ":memory:".to_string(),
                max_connections: 1,
            },
            storage: StorageConfig::default(),
            admin: AdminConfig {
                service_key: key.to_string(),
            },
        }
    }

    #[test]
    fn placeholder_admin_keys_are_a_configuration_error() {
        for key in ["", "  ", "change-me", "change-me-in-production"] {
            let err = settings_with_key(key).validate().unwrap_err();
            assert!(matches!(err, AppError::Configuration(_)));
        }
    }

    #[test]
    fn a_real_admin_key_passes_validation() {
        assert!(settings_with_key("s3cret-deploy-key").validate().is_ok());
    }
}
