//! Bodies of the account e-mails

use crate::domain::entities::User;

use super::EmailMessage;

fn greeting(user: &User) -> String {
    if user.first_name.is_empty() {
        format!("Hello {},", user.user_name)
    } else {
        format!("Hello {},", user.first_name)
    }
}

pub fn confirmation_email(user: &User, link: &str, valid_hours: i64) -> EmailMessage {
    EmailMessage {
        to: user.email.clone(),
        subject: "Confirm your EstateHub account".to_string(),
        text_body: format!(
            "{}\n\nPlease confirm your e-mail address by opening the link below:\n\n{}\n\nThe link is valid for {} hours.",
            greeting(user),
            link,
            valid_hours
        ),
        html_body: Some(format!(
            "<p>{}</p><p>Please confirm your e-mail address by clicking <a href=\"{}\">this link</a>.</p><p>The link is valid for {} hours.</p>",
            greeting(user),
            link,
            valid_hours
        )),
    }
}

pub fn password_reset_email(user: &User, link: &str, valid_minutes: i64) -> EmailMessage {
    EmailMessage {
        to: user.email.clone(),
        subject: "Reset your EstateHub password".to_string(),
        text_body: format!(
            "{}\n\nSomeone asked to reset the password of your account. If it was you, open the link below:\n\n{}\n\nThe link is valid for {} minutes. If you did not ask for this, ignore this e-mail.",
            greeting(user),
            link,
            valid_minutes
        ),
        html_body: Some(format!(
            "<p>{}</p><p>Someone asked to reset the password of your account. If it was you, <a href=\"{}\">choose a new password</a>.</p><p>The link is valid for {} minutes. If you did not ask for this, ignore this e-mail.</p>",
            greeting(user),
            link,
            valid_minutes
        )),
    }
}

pub fn password_changed_email(user: &User) -> EmailMessage {
    EmailMessage {
        to: user.email.clone(),
        subject: "Your EstateHub password was changed".to_string(),
        text_body: format!(
            "{}\n\nThe password of your account was just changed and every session was signed out.",
            greeting(user)
        ),
        html_body: None,
    }
}
