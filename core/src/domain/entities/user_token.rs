//! Single-use tokens for e-mail confirmation and password reset.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenPurpose {
    EmailConfirmation,
    PasswordReset,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::EmailConfirmation => "EmailConfirmation",
            TokenPurpose::PasswordReset => "PasswordReset",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EmailConfirmation" => Ok(TokenPurpose::EmailConfirmation),
            "PasswordReset" => Ok(TokenPurpose::PasswordReset),
            other => Err(format!("Unknown token purpose: {}", other)),
        }
    }
}

/// Stored form of a token mailed to the user; only the hash is kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub purpose: TokenPurpose,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

impl UserToken {
    pub fn new(user_id: Uuid, purpose: TokenPurpose, token_hash: String, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            purpose,
            token_hash,
            created_at: now,
            expires_at: now + lifetime,
            consumed_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Not consumed and not expired
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.consumed_at.is_none() && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_until_consumed_or_expired() {
        let mut token = UserToken::new(
            Uuid::new_v4(),
            TokenPurpose::PasswordReset,
            "hash".to_string(),
            Duration::minutes(60),
        );
        let now = Utc::now();
        assert!(token.is_usable(now));
        assert!(!token.is_usable(now + Duration::minutes(61)));

        token.consumed_at = Some(now);
        assert!(!token.is_usable(now));
    }

    #[test]
    fn test_purpose_round_trip() {
        for purpose in [TokenPurpose::EmailConfirmation, TokenPurpose::PasswordReset] {
            assert_eq!(purpose.as_str().parse::<TokenPurpose>().unwrap(), purpose);
        }
        assert!("Invite".parse::<TokenPurpose>().is_err());
    }
}
