//! User entity representing a registered EstateHub account.

use chrono::{DateTime, Duration, Utc};
use eh_shared::config::LockoutConfig;
use eh_shared::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// E-mail address as entered
    pub email: String,

    /// Upper-cased e-mail used for unique lookups
    pub normalized_email: String,

    /// Unique user name
    pub user_name: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,

    /// Assigned roles, always contains `Role::User`
    pub roles: Vec<Role>,

    /// Whether the e-mail address has been confirmed
    pub email_confirmed: bool,

    /// Consecutive failed logins since the last success or lockout
    pub access_failed_count: u32,

    /// Logins are refused until this moment
    pub lockout_end: Option<DateTime<Utc>>,

    /// Soft-delete flag
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new User instance with the `User` role
    pub fn new(
        email: String,
        user_name: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            normalized_email: normalize_email(&email),
            email,
            user_name,
            password_hash,
            first_name,
            last_name,
            roles: vec![Role::User],
            email_confirmed: false,
            access_failed_count: 0,
            lockout_end: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lockout_end, Some(end) if end > now)
    }

    /// Count a failed password check.
    ///
    /// Returns `true` when this failure locked the account. Reaching the
    /// limit resets the counter so the next lockout needs a full new run.
    pub fn record_failed_access(&mut self, lockout: &LockoutConfig, now: DateTime<Utc>) -> bool {
        self.updated_at = now;
        if !lockout.enabled {
            return false;
        }

        self.access_failed_count += 1;
        if self.access_failed_count >= lockout.max_failed_access_attempts {
            self.access_failed_count = 0;
            self.lockout_end = Some(now + Duration::minutes(lockout.lockout_minutes));
            return true;
        }
        false
    }

    /// Clear the failure counter after a successful login
    pub fn record_successful_login(&mut self, now: DateTime<Utc>) {
        self.access_failed_count = 0;
        self.lockout_end = None;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn confirm_email(&mut self) {
        self.email_confirmed = true;
        self.updated_at = Utc::now();
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.access_failed_count = 0;
        self.lockout_end = None;
        self.updated_at = Utc::now();
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `false` when the role was already assigned
    pub fn add_role(&mut self, role: Role) -> bool {
        if self.has_role(role) {
            return false;
        }
        self.roles.push(role);
        self.roles.sort();
        self.updated_at = Utc::now();
        true
    }

    /// Returns `false` when the role was not assigned.
    /// The base `User` role cannot be removed.
    pub fn remove_role(&mut self, role: Role) -> bool {
        if role == Role::User || !self.has_role(role) {
            return false;
        }
        self.roles.retain(|r| *r != role);
        self.updated_at = Utc::now();
        true
    }
}

/// Canonical form used for case-insensitive e-mail lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_uppercase()
}
