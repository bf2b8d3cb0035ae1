mod common;

use asset_tracker::domain::UserRole;
use asset_tracker::errors::AppError;
use asset_tracker::services::{
    IdentityService, ServiceContainer, UserService, CREDENTIALS_REQUIRED, USERNAME_TAKEN,
};
use common::{Harness, PASSWORD};

#[tokio::test]
async fn test_register_creates_plain_user() {
    let h = Harness::new().await;

    let user = h
        .services
        .identity()
        .register("alice".into(), "secret".into())
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::User);
    assert_ne!(user.password_hash, "secret");

    let logs = h.logs().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_id, user.id);
    assert_eq!(
        logs[0].action,
        format!("Registered account as alice (ID: {})", user.id)
    );
}

#[tokio::test]
async fn test_register_rejects_blank_and_taken_names() {
    let h = Harness::new().await;
    h.user("alice", UserRole::User).await;
    let identity = h.services.identity();

    match identity.register("".into(), "secret".into()).await {
        Err(AppError::Validation(msg)) => assert_eq!(msg, CREDENTIALS_REQUIRED),
        other => panic!("expected validation error, got {:?}", other),
    }
    match identity.register("bob".into(), "".into()).await {
        Err(AppError::Validation(msg)) => assert_eq!(msg, CREDENTIALS_REQUIRED),
        other => panic!("expected validation error, got {:?}", other),
    }
    match identity.register("alice".into(), "secret".into()).await {
        Err(AppError::Validation(msg)) => assert_eq!(msg, USERNAME_TAKEN),
        other => panic!("expected validation error, got {:?}", other),
    }

    assert_eq!(h.log_count().await, 0);
}

#[tokio::test]
async fn test_login_issues_resolvable_token() {
    let h = Harness::new().await;
    let alice = h.user("alice", UserRole::User).await;
    let identity = h.services.identity();

    let session = identity.login("alice".into(), PASSWORD.into()).await.unwrap();
    assert_eq!(session.user.id, alice.id);
    assert_eq!(session.token.token_type, "Bearer");

    let claims = identity.verify_token(&session.token.access_token).unwrap();
    assert_eq!(claims.sub, alice.id);

    let actor = identity
        .current_user(&session.token.access_token)
        .await
        .unwrap();
    assert_eq!(actor, Some(alice.clone()));

    assert_eq!(
        h.logs().await[0].action,
        format!("Logged in as alice (ID: {})", alice.id)
    );
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = Harness::new().await;
    h.user("alice", UserRole::User).await;
    let identity = h.services.identity();

    let wrong_password = identity.login("alice".into(), "nope".into()).await;
    assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));

    let unknown_user = identity.login("mallory".into(), PASSWORD.into()).await;
    assert!(matches!(unknown_user, Err(AppError::InvalidCredentials)));

    assert_eq!(h.log_count().await, 0);
}

#[tokio::test]
async fn test_garbage_token_resolves_to_no_one() {
    let h = Harness::new().await;

    let actor = h.services.identity().current_user("not-a-jwt").await.unwrap();
    assert_eq!(actor, None);
}

#[tokio::test]
async fn test_promotion_applies_to_existing_session() {
    let h = Harness::new().await;
    let admin = h.admin().await;
    let alice = h.user("alice", UserRole::User).await;
    let identity = h.services.identity();

    let session = identity.login("alice".into(), PASSWORD.into()).await.unwrap();
    h.services.users().promote_user(&admin, alice.id).await.unwrap();

    let actor = identity
        .current_user(&session.token.access_token)
        .await
        .unwrap()
        .expect("still signed in");
    assert_eq!(actor.role, UserRole::Admin);
}

#[tokio::test]
async fn test_logout_is_recorded() {
    let h = Harness::new().await;
    let alice = h.user("alice", UserRole::User).await;

    h.services.identity().logout(&alice).await.unwrap();

    assert_eq!(
        h.logs().await[0].action,
        format!("Logged out as alice (ID: {})", alice.id)
    );
}

#[tokio::test]
async fn test_bootstrap_admin() {
    let h = Harness::new().await;
    let identity = h.services.identity();

    let admin = identity
        .bootstrap_admin("root".into(), "secret".into())
        .await
        .unwrap();
    assert_eq!(admin.role, UserRole::Admin);
    assert_eq!(
        h.logs().await[0].action,
        format!("Admin account root (ID: {}) bootstrapped", admin.id)
    );

    let again = identity.bootstrap_admin("root".into(), "secret".into()).await;
    assert!(matches!(again, Err(AppError::Validation(_))));
}
