//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT, password policy, lockout and token lifetimes
//! - `database` - MySQL connection pool configuration
//! - `email` - SMTP delivery of transactional e-mail
//! - `environment` - Environment detection
//! - `server` - HTTP server and CORS configuration
//! - `services` - Outbound service endpoints and retry policy
//! - `storage` - Photo document store (GridFS)

pub mod auth;
pub mod database;
pub mod email;
pub mod environment;
pub mod server;
pub mod services;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, JwtConfig, LockoutConfig, PasswordPolicyConfig};
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use environment::Environment;
pub use server::{CorsConfig, ServerConfig};
pub use services::{RetryConfig, ServiceEndpoints};
pub use storage::PhotoStorageConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// SMTP configuration
    pub email: EmailConfig,

    /// Photo storage configuration
    pub storage: PhotoStorageConfig,

    /// Outbound services
    pub services: ServiceEndpoints,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            email: EmailConfig::default(),
            storage: PhotoStorageConfig::default(),
            services: ServiceEndpoints::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    /// `default_port` is used when `SERVER_PORT` is not set, so the two
    /// services can run side by side with no extra configuration.
    pub fn from_env(default_port: u16) -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let cors = if environment.is_production() {
            CorsConfig::from_env()
        } else {
            CorsConfig::development()
        };

        Self {
            environment,
            server: ServerConfig::from_env(default_port),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            email: EmailConfig::from_env(),
            storage: PhotoStorageConfig::from_env(),
            services: ServiceEndpoints::from_env(),
            cors,
        }
    }

    /// Problems worth refusing to start on in production
    pub fn production_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.auth.jwt.is_using_default_secret() {
            warnings.push("JWT_SECRET is not set; the development secret is in use".to_string());
        }
        if self.email.host.is_none() {
            warnings.push("SMTP_HOST is not set; e-mails are only logged".to_string());
        }
        warnings
    }
}

/// Read an environment variable and parse it, falling back to `default`
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_missing_and_invalid() {
        assert_eq!(env_or("EH_TEST_SURELY_UNSET_VARIABLE", 42u32), 42);

        std::env::set_var("EH_TEST_INVALID_NUMBER", "not-a-number");
        assert_eq!(env_or("EH_TEST_INVALID_NUMBER", 7u64), 7);
        std::env::remove_var("EH_TEST_INVALID_NUMBER");
    }

    #[test]
    fn test_default_config_flags_default_secret() {
        let config = AppConfig::default();
        let warnings = config.production_warnings();
        assert!(warnings.iter().any(|w| w.contains("JWT_SECRET")));
    }
}
