//! Integration tests for profile endpoints

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

fn reference_profile() -> Value {
    json!({
        "name": "James Smith",
        "age": 25,
        "gender": "Male",
        "height": 170.0,
        "weight": 70.0,
        "goal": "Lose Weight",
        "activityLevel": "Sedentary",
        "dietaryRestrictions": "None"
    })
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_profile_absent_before_onboarding() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, body) = app.get_auth("/api/v1/profile", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "null");

    app.cleanup_user(&user.email).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_save_profile_derives_targets() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    // Supplied targets are ignored
    let mut body = reference_profile();
    body["targetCalories"] = json!(9999);

    let (status, response) = app.put_auth("/api/v1/profile", &body.to_string(), &user.token).await;
    assert_eq!(status, StatusCode::OK);
    let saved: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(saved["targetCalories"], 1471);
    assert_eq!(saved["targetProtein"], 84);

    let (_, fetched) = app.get_auth("/api/v1/profile", &user.token).await;
    let fetched: Value = serde_json::from_str(&fetched).unwrap();
    assert_eq!(fetched, saved);

    app.cleanup_user(&user.email).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_editing_profile_recomputes_targets() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    app.put_auth("/api/v1/profile", &reference_profile().to_string(), &user.token).await;

    let mut edited = reference_profile();
    edited["goal"] = json!("Maintain");
    let (status, response) = app.put_auth("/api/v1/profile", &edited.to_string(), &user.token).await;

    assert_eq!(status, StatusCode::OK);
    let saved: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(saved["targetCalories"], 1971);
    assert_eq!(saved["targetProtein"], 70);

    app.cleanup_user(&user.email).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_invalid_profile_rejected() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let mut body = reference_profile();
    body["height"] = json!(30.0);
    let (status, _) = app.put_auth("/api/v1/profile", &body.to_string(), &user.token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.cleanup_user(&user.email).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_unknown_activity_level_is_kept() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let mut body = reference_profile();
    body["activityLevel"] = json!("Athlete");
    let (status, response) = app.put_auth("/api/v1/profile", &body.to_string(), &user.token).await;

    assert_eq!(status, StatusCode::OK);
    let saved: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(saved["activityLevel"], "Athlete");
    assert_eq!(saved["targetCalories"], 1471);

    app.cleanup_user(&user.email).await;
}
