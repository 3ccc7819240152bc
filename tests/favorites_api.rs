mod common;

use common::{property_body, TestApp};
use http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_login_returns_token() {
    let app = TestApp::new();
    app.register("Asha", "asha@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().is_some());

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": "nope-nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("Asha", "asha@example.com").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Asha", "email": "asha@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_favorites_lifecycle() {
    let app = TestApp::new();
    let (token, _) = app.register("Asha", "asha@example.com").await;
    let property = app.create_property(&token, property_body("Flat", 900.0, 1, &[])).await;
    let id = property["id"].as_str().unwrap();

    let (status, _) = app
        .request(Method::POST, &format!("/api/favorites/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(Method::POST, &format!("/api/favorites/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (_, body) = app.get(&format!("/api/favorites/{}/status", id), Some(&token)).await;
    assert_eq!(body["data"]["isFavorite"], true);

    let (_, body) = app.get("/api/favorites", Some(&token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/favorites/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/favorites", Some(&token)).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/favorites/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_require_token() {
    let app = TestApp::new();
    let (status, _) = app.get("/api/favorites", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/favorites", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_recommendations_flow() {
    let app = TestApp::new();
    let (sender, sender_id) = app.register("Sender", "sender@example.com").await;
    let (recipient, _) = app.register("Recipient", "recipient@example.com").await;
    let property = app.create_property(&sender, property_body("Flat", 900.0, 1, &[])).await;
    let uri = format!("/api/recommendations/{}", property["id"].as_str().unwrap());

    let (status, _) = app
        .request(Method::POST, &uri, Some(&sender), Some(json!({ "email": "recipient@example.com" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::POST, &uri, Some(&sender), Some(json!({ "email": "recipient@example.com" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(Method::POST, &uri, Some(&sender), Some(json!({ "email": "ghost@example.com" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/recommendations", Some(&recipient)).await;
    let received = body["data"].as_array().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["from"]["email"], "sender@example.com");

    let (_, body) = app.get("/api/recommendations/properties", Some(&recipient)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app.get("/api/recommendations/stats", Some(&recipient)).await;
    assert_eq!(body["data"]["totalRecommendations"], 1);
    assert_eq!(body["data"]["recommendationsByUser"][sender_id.as_str()], 1);
}

#[tokio::test]
async fn test_favorites_follow_property_changes() {
    let app = TestApp::new();
    let (owner, _) = app.register("Owner", "owner@example.com").await;
    let (user, _) = app.register("Asha", "asha@example.com").await;
    let kept = app.create_property(&owner, property_body("Kept", 900.0, 2, &[])).await;
    let doomed = app.create_property(&owner, property_body("Doomed", 950.0, 2, &[])).await;
    let kept_id = kept["id"].as_str().unwrap();
    let doomed_id = doomed["id"].as_str().unwrap();

    for id in [kept_id, doomed_id] {
        let (status, _) = app
            .request(Method::POST, &format!("/api/favorites/{}", id), Some(&user), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = app.get("/api/favorites", Some(&user)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    app.request(
        Method::PUT,
        &format!("/api/properties/{}", kept_id),
        Some(&owner),
        Some(json!({ "bedrooms": 9 })),
    )
    .await;
    app.request(Method::DELETE, &format!("/api/properties/{}", doomed_id), Some(&owner), None)
        .await;

    let (_, body) = app.get("/api/favorites", Some(&user)).await;
    let favorites = body["data"].as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["id"], kept_id);
    assert_eq!(favorites[0]["bedrooms"], 9);
}
