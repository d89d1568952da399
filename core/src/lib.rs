//! # EstateHub Core
//!
//! Core business logic and domain layer for the EstateHub backend.
//! This crate contains domain entities, business services, repository interfaces,
//! and error types shared by the authorization and the listing service.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use errors::{
    AuthError, DomainError, DomainResult, ListingError, ReportError, TokenError, ValidationError,
};

#[cfg(test)]
pub(crate) mod test_support;
