//! Token handling for the authorization service
//!
//! - JWT access token issuing and verification (HS256)
//! - Opaque refresh tokens stored as SHA-256 hashes on a `Session`
//! - Rotation with reuse detection across a token family

mod service;
mod validator;


pub use service::TokenService;
pub use validator::AccessTokenValidator;

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of opaque refresh, confirmation and reset tokens
pub const OPAQUE_TOKEN_LENGTH: usize = 64;

/// Hex encoded SHA-256 of a token, the only form that is persisted
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Random URL-safe token for refresh sessions and e-mailed links
pub fn generate_opaque_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(OPAQUE_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
