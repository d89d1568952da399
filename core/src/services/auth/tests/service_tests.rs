//! Registration, login, confirmation, password and role tests

use chrono::Utc;
use eh_shared::config::{AuthConfig, JwtConfig, LockoutConfig};
use eh_shared::Role;
use uuid::Uuid;

use super::*;
use crate::domain::value_objects::Actor;
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::repositories::{SessionRepository, UserRepository};

#[tokio::test]
async fn test_register_sends_confirmation() {
    let h = harness();
    let user = h.register("ana@example.com", "ana").await;

    assert!(!user.email_confirmed);
    assert_eq!(user.roles, vec![Role::User]);
    assert_ne!(user.password_hash, PASSWORD);

    let mail = h.outbox.last_to("ana@example.com").await.unwrap();
    assert!(mail.subject.contains("Confirm"));
    assert!(mail.text_body.contains(&user.id.to_string()));
}

#[tokio::test]
async fn test_register_rejects_duplicates_case_insensitively() {
    let h = harness();
    h.register("ana@example.com", "ana").await;

    let err = h
        .service
        .register(register_input("ANA@example.com", "other"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::EmailTaken));

    let err = h
        .service
        .register(register_input("bob@example.com", "ANA"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::UserNameTaken));
}

#[tokio::test]
async fn test_register_enforces_password_policy() {
    let h = harness();
    let mut input = register_input("ana@example.com", "ana");
    input.password = "weak".to_string();

    match h.service.register(input).await.unwrap_err() {
        DomainError::Validation(ValidationError::PasswordPolicy { violations }) => {
            assert!(violations.len() >= 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(h.users.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_confirm_email_is_single_use() {
    let h = harness();
    let user = h.register("ana@example.com", "ana").await;
    let token = h
        .outbox
        .last_link_param("ana@example.com", "token")
        .await
        .unwrap();

    let err = h.service.confirm_email(user.id, "wrong").await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidUserToken));

    h.service.confirm_email(user.id, &token).await.unwrap();
    let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.email_confirmed);

    let err = h.service.confirm_email(user.id, &token).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::EmailAlreadyConfirmed));
}

#[tokio::test]
async fn test_resend_confirmation_replaces_previous_link() {
    let h = harness();
    let user = h.register("ana@example.com", "ana").await;
    let first = h
        .outbox
        .last_link_param("ana@example.com", "token")
        .await
        .unwrap();

    h.service.resend_confirmation("ana@example.com").await.unwrap();
    h.service.resend_confirmation("nobody@example.com").await.unwrap();
    let second = h
        .outbox
        .last_link_param("ana@example.com", "token")
        .await
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(h.outbox.sent().await.len(), 2);

    let err = h.service.confirm_email(user.id, &first).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidUserToken));
    h.service.confirm_email(user.id, &second).await.unwrap();
}

#[tokio::test]
async fn test_login_by_email_or_user_name() {
    let h = harness();
    let user = h.register("ana@example.com", "ana").await;

    let by_email = h.login("ANA@example.com").await;
    assert_eq!(by_email.user.id, user.id);
    let by_name = h.login("ana").await;
    assert_ne!(by_name.session_id, by_email.session_id);

    let claims = h
        .service
        .token_service()
        .verify_access_token(&by_name.access_token)
        .unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.sid, by_name.session_id);

    let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some());
}

#[tokio::test]
async fn test_login_failures() {
    let h = harness();
    h.register("ana@example.com", "ana").await;

    let err = h
        .service
        .login(login_input("nobody", PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidCredentials));

    let err = h
        .service
        .login(login_input("ana", "Wrong1!"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() {
    let h = harness();
    let user = h.register("ana@example.com", "ana").await;

    for _ in 0..4 {
        let err = h.service.login(login_input("ana", "Wrong1!")).await.unwrap_err();
        assert_eq!(err, DomainError::Auth(AuthError::InvalidCredentials));
    }
    let err = h.service.login(login_input("ana", "Wrong1!")).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::LockedOut { .. })));

    // the right password does not help while locked out
    let err = h.service.login(login_input("ana", PASSWORD)).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::LockedOut { .. })));

    let mut stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.access_failed_count, 0);
    stored.lockout_end = Some(Utc::now() - chrono::Duration::seconds(1));
    h.users.update(&stored).await.unwrap();
    h.login("ana").await;
}

#[tokio::test]
async fn test_successful_login_resets_failure_count() {
    let h = harness();
    let user = h.register("ana@example.com", "ana").await;
    for _ in 0..3 {
        let _ = h.service.login(login_input("ana", "Wrong1!")).await;
    }
    h.login("ana").await;
    let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.access_failed_count, 0);
}

#[tokio::test]
async fn test_lockout_disabled() {
    let h = harness_with(AuthConfig {
        jwt: JwtConfig::new("test-secret"),
        lockout: LockoutConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    });
    h.register("ana@example.com", "ana").await;
    for _ in 0..10 {
        let _ = h.service.login(login_input("ana", "Wrong1!")).await;
    }
    h.login("ana").await;
}

#[tokio::test]
async fn test_login_requires_confirmed_email_when_configured() {
    let h = harness_with(AuthConfig {
        jwt: JwtConfig::new("test-secret"),
        require_confirmed_email: true,
        ..Default::default()
    });
    let user = h.register("ana@example.com", "ana").await;

    let err = h.service.login(login_input("ana", PASSWORD)).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::EmailNotConfirmed));

    let token = h
        .outbox
        .last_link_param("ana@example.com", "token")
        .await
        .unwrap();
    h.service.confirm_email(user.id, &token).await.unwrap();
    h.login("ana").await;
}

#[tokio::test]
async fn test_deleted_account_cannot_login() {
    let h = harness();
    let mut user = h.register("ana@example.com", "ana").await;
    user.is_deleted = true;
    h.users.update(&user).await.unwrap();

    let err = h.service.login(login_input("ana", PASSWORD)).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::AccountDeleted));
    let err = h.service.get_user(user.id).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::UserNotFound));
}

#[tokio::test]
async fn test_password_reset_flow() {
    let h = harness();
    let user = h.register("ana@example.com", "ana").await;
    let session = h.login("ana").await;

    h.service.forgot_password("nobody@example.com").await.unwrap();
    h.service.forgot_password("ana@example.com").await.unwrap();
    let token = h
        .outbox
        .last_link_param("ana@example.com", "token")
        .await
        .unwrap();

    let err = h
        .service
        .reset_password("ana@example.com", &token, "weak")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::PasswordPolicy { .. })
    ));

    h.service
        .reset_password("ana@example.com", &token, "NewSecret2?")
        .await
        .unwrap();
    let err = h
        .service
        .reset_password("ana@example.com", &token, "NewSecret3?")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidUserToken));

    // every session was revoked
    let stored = h.sessions.find_by_id(session.session_id).await.unwrap().unwrap();
    assert!(stored.is_revoked());

    let err = h.service.login(login_input("ana", PASSWORD)).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidCredentials));
    let ok = h.service.login(login_input("ana", "NewSecret2?")).await.unwrap();
    assert_eq!(ok.user.id, user.id);

    let notice = h.outbox.last_to("ana@example.com").await.unwrap();
    assert!(notice.subject.contains("changed"));
}

#[tokio::test]
async fn test_reset_token_is_bound_to_the_user() {
    let h = harness();
    h.register("ana@example.com", "ana").await;
    h.register("bob@example.com", "bob").await;
    h.service.forgot_password("ana@example.com").await.unwrap();
    let token = h
        .outbox
        .last_link_param("ana@example.com", "token")
        .await
        .unwrap();

    let err = h
        .service
        .reset_password("bob@example.com", &token, "NewSecret2?")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidUserToken));
}

#[tokio::test]
async fn test_change_password() {
    let h = harness();
    let user = h.register("ana@example.com", "ana").await;

    let err = h
        .service
        .change_password(user.id, "Wrong1!", "NewSecret2?")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidCredentials));

    h.service
        .change_password(user.id, PASSWORD, "NewSecret2?")
        .await
        .unwrap();
    h.service.login(login_input("ana", "NewSecret2?")).await.unwrap();
}

#[tokio::test]
async fn test_role_administration() {
    let h = harness();
    let target = h.register("ana@example.com", "ana").await;
    let admin = Actor::new(Uuid::new_v4(), vec![Role::User, Role::Admin]);
    let plain = Actor::new(Uuid::new_v4(), vec![Role::User]);

    let err = h.service.assign_role(&plain, target.id, Role::Admin).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InsufficientPermissions));

    let user = h.service.assign_role(&admin, target.id, Role::Admin).await.unwrap();
    assert!(user.has_role(Role::Admin));
    // assigning twice is a no-op
    let user = h.service.assign_role(&admin, target.id, Role::Admin).await.unwrap();
    assert_eq!(user.roles, vec![Role::User, Role::Admin]);

    let err = h.service.remove_role(&admin, target.id, Role::User).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::BusinessRuleViolation { .. })
    ));

    let user = h.service.remove_role(&admin, target.id, Role::Admin).await.unwrap();
    assert_eq!(user.roles, vec![Role::User]);

    let err = h.service.remove_role(&admin, admin.user_id, Role::Admin).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::BusinessRuleViolation { .. })
    ));

    assert_eq!(h.service.count_users(&admin).await.unwrap(), 1);
    assert!(h.service.count_users(&plain).await.is_err());
}
