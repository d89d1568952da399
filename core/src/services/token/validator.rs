//! Stateless access token verification, shared by both services

use eh_shared::config::JwtConfig;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::domain::entities::Claims;
use crate::errors::{DomainError, TokenError};

/// Verifies signature, issuer, audience and time claims of access tokens.
///
/// The listing service only needs this half of `TokenService`, it never
/// sees sessions.
#[derive(Clone)]
pub struct AccessTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessTokenValidator {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError)` - Token is invalid, expired, or malformed
    pub fn validate(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                ErrorKind::ImmatureSignature => DomainError::Token(TokenError::TokenNotYetValid),
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })
    }
}
