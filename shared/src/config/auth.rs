//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token (session) expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("estatehub-auth"),
            audience: String::from("estatehub"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
        }
    }
}

/// Password rules applied on registration, reset and change.
///
/// Defaults mirror the usual identity-provider policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordPolicyConfig {
    pub required_length: usize,
    pub required_unique_chars: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            required_length: 6,
            required_unique_chars: 1,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

impl PasswordPolicyConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            required_length: env_or("PASSWORD_REQUIRED_LENGTH", defaults.required_length),
            required_unique_chars: env_or(
                "PASSWORD_REQUIRED_UNIQUE_CHARS",
                defaults.required_unique_chars,
            ),
            require_digit: env_or("PASSWORD_REQUIRE_DIGIT", defaults.require_digit),
            require_lowercase: env_or("PASSWORD_REQUIRE_LOWERCASE", defaults.require_lowercase),
            require_uppercase: env_or("PASSWORD_REQUIRE_UPPERCASE", defaults.require_uppercase),
            require_non_alphanumeric: env_or(
                "PASSWORD_REQUIRE_NON_ALPHANUMERIC",
                defaults.require_non_alphanumeric,
            ),
        }
    }
}

/// Account lockout after repeated failed logins
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LockoutConfig {
    /// Whether lockout is applied at all
    pub enabled: bool,

    /// Failed attempts before the account is locked
    pub max_failed_access_attempts: u32,

    /// Lockout duration in minutes
    pub lockout_minutes: i64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_failed_access_attempts: 5,
            lockout_minutes: 5,
        }
    }
}

impl LockoutConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("LOCKOUT_ENABLED", defaults.enabled),
            max_failed_access_attempts: env_or(
                "LOCKOUT_MAX_FAILED_ATTEMPTS",
                defaults.max_failed_access_attempts,
            ),
            lockout_minutes: env_or("LOCKOUT_MINUTES", defaults.lockout_minutes),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Password policy
    #[serde(default)]
    pub password: PasswordPolicyConfig,

    /// Lockout policy
    #[serde(default)]
    pub lockout: LockoutConfig,

    /// Refuse logins until the e-mail address is confirmed
    #[serde(default)]
    pub require_confirmed_email: bool,

    /// Lifetime of e-mail confirmation tokens in hours
    pub email_confirmation_expiry_hours: i64,

    /// Lifetime of password reset tokens in minutes
    pub password_reset_expiry_minutes: i64,

    /// Base URL of the frontend, used to build links in e-mails
    pub frontend_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            password: PasswordPolicyConfig::default(),
            lockout: LockoutConfig::default(),
            require_confirmed_email: false,
            email_confirmation_expiry_hours: 24,
            password_reset_expiry_minutes: 60,
            frontend_base_url: String::from("http://localhost:5173"),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            jwt: JwtConfig::from_env(),
            password: PasswordPolicyConfig::from_env(),
            lockout: LockoutConfig::from_env(),
            require_confirmed_email: env_or(
                "REQUIRE_CONFIRMED_EMAIL",
                defaults.require_confirmed_email,
            ),
            email_confirmation_expiry_hours: env_or(
                "EMAIL_CONFIRMATION_EXPIRY_HOURS",
                defaults.email_confirmation_expiry_hours,
            ),
            password_reset_expiry_minutes: env_or(
                "PASSWORD_RESET_EXPIRY_MINUTES",
                defaults.password_reset_expiry_minutes,
            ),
            frontend_base_url: std::env::var("FRONTEND_BASE_URL")
                .unwrap_or(defaults.frontend_base_url),
        }
    }
}
