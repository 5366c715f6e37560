mod common;

use common::{create_user, setup_app};
use wishlist_backend::errors::DomainError;
use wishlist_backend::types::db::Role;

#[tokio::test]
async fn insert_rejects_short_password() {
    let app = setup_app().await;

    let err = app
        .user_service
        .insert(
            "Tester".to_string(),
            "tester".to_string(),
            Role::User,
            Some("1234567".to_string()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(err.to_string(), "Password min length is 8 characters");
}

#[tokio::test]
async fn insert_accepts_exactly_eight_character_password() {
    let app = setup_app().await;

    let user = app
        .user_service
        .insert(
            "Tester".to_string(),
            "tester".to_string(),
            Role::User,
            Some("12345678".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(user.username, "tester");
    assert!(user.password_hash.is_some());
}

#[tokio::test]
async fn stored_password_is_hashed() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", Some("password1")).await;

    let hash = user.password_hash.expect("password should be set");
    assert_ne!(hash, "password1");
    assert!(hash.starts_with("$argon2"));
}

#[tokio::test]
async fn duplicate_username_surfaces_store_error() {
    let app = setup_app().await;
    create_user(&app, "First", "samename", None).await;

    let err = app
        .user_service
        .insert("Second".to_string(), "samename".to_string(), Role::User, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Store(_)));
}

#[tokio::test]
async fn create_password_fails_for_missing_user() {
    let app = setup_app().await;

    let err = app
        .user_service
        .create_password("no-such-user", "password1")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert_eq!(err.to_string(), "User does not exist");
}

#[tokio::test]
async fn create_password_is_one_shot() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", None).await;

    let token = app
        .user_service
        .create_password(&user.id, "password1")
        .await
        .unwrap();
    assert!(token.value.starts_with("Bearer "));

    // A second attempt always conflicts, even with a valid new password
    let err = app
        .user_service
        .create_password(&user.id, "other-password")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(err.to_string(), "User already has password");
}

#[tokio::test]
async fn create_password_rejects_short_password_without_setting_it() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", None).await;

    let err = app
        .user_service
        .create_password(&user.id, "short")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Password min length is 8 characters");

    // Password is still unset, so the flow can be retried
    let user_after = app.user_service.find_by_id(&user.id).await.unwrap().unwrap();
    assert!(user_after.password_hash.is_none());
}

// The guarded update is the last line of defense: when another
// create_password slips in between the service's read and its write,
// the losing write must not overwrite the stored hash.
#[tokio::test]
async fn guarded_password_write_never_overwrites() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", None).await;

    let first = app
        .user_store
        .set_password_hash(&app.db, &user.id, "hash-a".to_string())
        .await
        .unwrap();
    assert!(first);

    let second = app
        .user_store
        .set_password_hash(&app.db, &user.id, "hash-b".to_string())
        .await
        .unwrap();
    assert!(!second);

    let stored = app.user_store.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash.as_deref(), Some("hash-a"));
}

#[tokio::test]
async fn login_fails_for_unknown_username() {
    let app = setup_app().await;

    let err = app
        .user_service
        .login("nosuchuser", "password1")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert_eq!(err.to_string(), "No user found with username nosuchuser");
}

#[tokio::test]
async fn login_fails_for_user_without_password() {
    let app = setup_app().await;
    create_user(&app, "Tester", "tester", None).await;

    // Indistinguishable from a wrong password
    let err = app.user_service.login("tester", "password1").await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized(_)));
    assert_eq!(err.to_string(), "Password not correct");
}

#[tokio::test]
async fn login_fails_for_wrong_password() {
    let app = setup_app().await;
    create_user(&app, "Tester", "tester", Some("password1")).await;

    let err = app.user_service.login("tester", "wrong-password").await.unwrap_err();
    assert_eq!(err.to_string(), "Password not correct");
}

#[tokio::test]
async fn login_returns_decodable_bearer_token() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", Some("password1")).await;

    let token = app.user_service.login("tester", "password1").await.unwrap();
    assert!(token.value.starts_with("Bearer "));

    let raw = token.value.strip_prefix("Bearer ").unwrap();
    let claims = app.token_service.decode(raw).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.username, "tester");
    assert_eq!(claims.role, Role::User);
}

#[tokio::test]
async fn create_password_token_allows_immediate_login() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", None).await;

    app.user_service
        .create_password(&user.id, "password1")
        .await
        .unwrap();

    let token = app.user_service.login("tester", "password1").await.unwrap();
    assert!(token.value.starts_with("Bearer "));
}

#[tokio::test]
async fn find_by_name_is_exact_match() {
    let app = setup_app().await;
    create_user(&app, "Tester", "tester", None).await;

    assert!(app.user_service.find_by_name("tester").await.unwrap().is_some());
    assert!(app.user_service.find_by_name("test").await.unwrap().is_none());
    assert!(app.user_service.find_by_name("Tester").await.unwrap().is_none());
}
