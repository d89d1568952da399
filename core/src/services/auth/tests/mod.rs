//! Tests for the authentication service

mod service_tests;

use std::sync::Arc;

use eh_shared::config::{AuthConfig, JwtConfig};

use crate::domain::entities::User;
use crate::domain::value_objects::{AuthResponse, RegisterInput};
use crate::repositories::{
    InMemorySessionRepository, InMemoryUserRepository, InMemoryUserTokenRepository,
};
use crate::services::email::InMemoryEmailSender;
use crate::services::password::PasswordHasher;

use super::{AuthService, LoginInput};

pub(super) const PASSWORD: &str = "Secret1!";

pub(super) struct Harness {
    pub service: AuthService,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub outbox: Arc<InMemoryEmailSender>,
}

pub(super) fn harness_with(config: AuthConfig) -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let outbox = Arc::new(InMemoryEmailSender::new());
    let service = AuthService::new(
        users.clone(),
        sessions.clone(),
        Arc::new(InMemoryUserTokenRepository::new()),
        outbox.clone(),
        config,
    )
    .with_password_hasher(PasswordHasher::new(4));

    Harness {
        service,
        users,
        sessions,
        outbox,
    }
}

pub(super) fn harness() -> Harness {
    harness_with(AuthConfig {
        jwt: JwtConfig::new("test-secret"),
        ..Default::default()
    })
}

pub(super) fn register_input(email: &str, user_name: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_string(),
        user_name: user_name.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Ana".to_string(),
        last_name: "Silva".to_string(),
    }
}

pub(super) fn login_input(login: &str, password: &str) -> LoginInput {
    LoginInput {
        login: login.to_string(),
        password: password.to_string(),
        user_agent: Some("tests".to_string()),
        ip_address: Some("127.0.0.1".to_string()),
    }
}

impl Harness {
    pub async fn register(&self, email: &str, user_name: &str) -> User {
        self.service
            .register(register_input(email, user_name))
            .await
            .unwrap()
    }

    pub async fn login(&self, login: &str) -> AuthResponse {
        self.service
            .login(login_input(login, PASSWORD))
            .await
            .unwrap()
    }
}
