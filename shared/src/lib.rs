//! Shared kernel for the EstateHub services
//!
//! This crate provides functionality used by both the authorization and the
//! listing service:
//! - Configuration types loaded from the environment
//! - The cross-service `Error` value type and its RFC 7807 rendering
//! - Pagination and response wrappers
//! - Role and permission helpers over token claims

pub mod config;
pub mod errors;
pub mod security;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, EmailConfig, Environment, JwtConfig,
    LockoutConfig, PasswordPolicyConfig, PhotoStorageConfig, RetryConfig, ServerConfig,
    ServiceEndpoints,
};
pub use errors::{error_codes, Error, ErrorStatus, ProblemDetails, PROBLEM_JSON};
pub use security::{ClaimsPrincipal, Role};
pub use types::{
    paginate_vec, HealthResponse, HealthStatus, MessageResponse, PaginatedResponse, Pagination,
};
