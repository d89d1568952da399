//! Password policy checks and bcrypt hashing

use eh_shared::config::PasswordPolicyConfig;
use std::collections::HashSet;

use crate::errors::{DomainError, DomainResult, ValidationError};

/// Validates new passwords against the configured rules
#[derive(Debug, Clone, Default)]
pub struct PasswordPolicy {
    config: PasswordPolicyConfig,
}

impl PasswordPolicy {
    pub fn new(config: PasswordPolicyConfig) -> Self {
        Self { config }
    }

    /// Check every rule and report all violations at once
    pub fn validate(&self, password: &str) -> Result<(), ValidationError> {
        let rules = &self.config;
        let mut violations = Vec::new();

        if password.chars().count() < rules.required_length {
            violations.push(format!(
                "Passwords must be at least {} characters.",
                rules.required_length
            ));
        }
        if rules.require_non_alphanumeric && password.chars().all(char::is_alphanumeric) {
            violations.push("Passwords must have at least one non alphanumeric character.".to_string());
        }
        if rules.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push("Passwords must have at least one digit ('0'-'9').".to_string());
        }
        if rules.require_lowercase && !password.chars().any(char::is_lowercase) {
            violations.push("Passwords must have at least one lowercase ('a'-'z').".to_string());
        }
        if rules.require_uppercase && !password.chars().any(char::is_uppercase) {
            violations.push("Passwords must have at least one uppercase ('A'-'Z').".to_string());
        }
        let unique = password.chars().collect::<HashSet<_>>().len();
        if unique < rules.required_unique_chars {
            violations.push(format!(
                "Passwords must use at least {} different characters.",
                rules.required_unique_chars
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::PasswordPolicy { violations })
        }
    }
}

/// bcrypt wrapper; the cost is configurable so tests stay fast
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| DomainError::internal(format!("Password hashing failed: {}", e)))
    }

    /// A malformed stored hash counts as a mismatch
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}
