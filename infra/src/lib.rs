//! # Infrastructure Layer
//!
//! Concrete implementations of the repository and gateway traits declared in
//! `eh_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL repositories using SQLx, plus embedded migrations
//! - **Storage**: listing photo bytes in a MongoDB GridFS bucket
//! - **Email**: SMTP delivery through lettre, or a sender that only logs
//! - **Clients**: HTTP clients for the authorization service and the content
//!   moderator, with retry and backoff

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Photo storage backed by GridFS
pub mod storage;

/// Outgoing e-mail
pub mod email;

/// HTTP clients for other services
pub mod clients;

use eh_core::DomainError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Document store error
    #[error("Document store error: {0}")]
    DocumentStore(#[from] mongodb::error::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// SMTP delivery error
    #[error("Email error: {0}")]
    Email(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        tracing::error!(error = %err, "Infrastructure failure");
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
