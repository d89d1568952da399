//! Authentication service module
//!
//! Registration, login with lockout, refresh rotation, session management,
//! e-mail confirmation, password reset and role administration.

mod cleanup;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::CleanupResult;
pub use service::{AuthService, LoginInput};
