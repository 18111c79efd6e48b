use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_cell::router::auth_routes;
use auth_cell::services::AuthService;
use shared_database::AppState;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn app() -> (TestConfig, Arc<AppState>, Router) {
    let config = TestConfig::default();
    let state = Arc::new(config.to_state());
    let router = auth_routes(state.clone());
    (config, state, router)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_bearer(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn register_then_login_then_me() {
    let (_, _, router) = app();

    let (status, body) = send(
        &router,
        post_json(
            "/register",
            json!({ "name": "Meera Nair", "username": "meera", "password": "monsoon-42", "age": 31 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "meera");

    let (status, body) = send(
        &router,
        post_json("/login", json!({ "username": "meera", "password": "monsoon-42" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "patient");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&router, with_bearer("GET", "/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "meera");
    assert_eq!(body["name"], "Meera Nair");
    assert_eq!(body["age"], 31);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let (_, _, router) = app();
    let request = json!({ "name": "Meera Nair", "username": "meera", "password": "pw", "age": 31 });

    let (status, _) = send(&router, post_json("/register", request.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, post_json("/register", request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn invalid_age_is_a_bad_request() {
    let (_, _, router) = app();

    let (status, _) = send(
        &router,
        post_json(
            "/register",
            json!({ "name": "Old Timer", "username": "old", "password": "pw", "age": 150 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_login_requires_admin_role() {
    let (_, state, router) = app();
    AuthService::new(&state).seed_admin("admin", "admin123").await.unwrap();

    let (status, body) = send(
        &router,
        post_json("/login", json!({ "username": "admin", "password": "admin123", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Admin User");

    let (status, body) = send(
        &router,
        post_json("/login", json!({ "username": "admin", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials.");
}

#[tokio::test]
async fn validate_reports_session_owner() {
    let (config, _, router) = app();
    let user = TestUser::patient("arjun").named("Arjun Mehta");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

    let (status, body) = send(&router, with_bearer("POST", "/validate", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["username"], "arjun");
    assert_eq!(body["name"], "Arjun Mehta");
    assert_eq!(body["role"], "patient");
}

#[tokio::test]
async fn expired_and_forged_tokens_are_rejected() {
    let (config, _, router) = app();
    let user = TestUser::patient("arjun");

    let expired = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);
    let (status, _) = send(&router, with_bearer("POST", "/validate", &expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = JwtTestUtils::create_invalid_signature_token(&user);
    let (status, body) = send(&router, with_bearer("POST", "/verify", &forged)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);

    let (status, _) = send(&router, with_bearer("GET", "/me", &forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validate_without_header_is_unauthorized() {
    let (_, _, router) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/validate")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");
}
