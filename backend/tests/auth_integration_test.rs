//! Integration tests for registration and login

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_returns_session() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, body) = app.get_auth("/api/v1/auth/me", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["email"], user.email);
    assert_eq!(body["has_profile"], false);

    app.cleanup_user(&user.email).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_registration_conflicts() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({"name": "Again", "email": user.email, "password": "another-password"});
    let (status, response) = app.post("/api/v1/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    let response: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["error"]["message"], "User already exists");

    app.cleanup_user(&user.email).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_round_trip() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    // Emails are matched case-insensitively
    let body = json!({"email": user.email.to_uppercase(), "password": common::TEST_PASSWORD});
    let (status, response) = app.post("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let session: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(session["email"], user.email);
    assert_eq!(session["token_type"], "Bearer");

    app.cleanup_user(&user.email).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_with_wrong_password() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({"email": user.email, "password": "wrong-password"});
    let (status, response) = app.post("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let response: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["error"]["message"], "Invalid credentials");

    app.cleanup_user(&user.email).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_unknown_account() {
    let app = common::TestApp::new().await;

    let body = json!({"email": "nobody@example.com", "password": "password123"});
    let (status, _) = app.post("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_passwords_are_not_stored_in_plaintext() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE email = $1")
        .bind(&user.email)
        .fetch_one(&app.pool)
        .await
        .unwrap();

    assert_ne!(stored, common::TEST_PASSWORD);
    assert!(stored.starts_with("$argon2"));

    app.cleanup_user(&user.email).await;
}
