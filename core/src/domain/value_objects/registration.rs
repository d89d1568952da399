//! Input of a new account registration.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "Invalid e-mail address"), length(max = 256))]
    pub email: String,

    #[validate(
        length(min = 3, max = 50, message = "User name must be 3 to 50 characters"),
        custom(function = "validate_user_name")
    )]
    pub user_name: String,

    /// Checked against the password policy, not here
    pub password: String,

    #[validate(length(max = 100))]
    pub first_name: String,

    #[validate(length(max = 100))]
    pub last_name: String,
}

impl RegisterInput {
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.user_name = self.user_name.trim().to_string();
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self
    }
}

/// Letters, digits and `.`, `_`, `-`, `@`, `+`
fn validate_user_name(user_name: &str) -> Result<(), validator::ValidationError> {
    if user_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@' | '+'))
    {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("user_name");
        error.message = Some("User name may only contain letters, digits and . _ - @ +".into());
        Err(error)
    }
}
