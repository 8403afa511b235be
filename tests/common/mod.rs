#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use learnx::config::cors::CorsConfig;
use learnx::config::jwt::JwtConfig;
use learnx::modules::auth::model::UserRole;
use learnx::router::init_router;
use learnx::state::AppState;
use learnx::utils::password::hash_password;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-integration-tests".to_string(),
        token_expiry: 86400,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    };
    init_router(state)
}

pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Inserts a user directly, bypassing the registration endpoint.
pub async fn create_test_user(pool: &PgPool, role: UserRole) -> TestUser {
    let email = format!("user-{}@test.com", Uuid::new_v4());
    let password = "testpass123".to_string();
    let hashed = hash_password(&password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password, role, age)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind("Test User")
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .bind(20)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        name: "Test User".to_string(),
        email,
        password,
    }
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/auth/login",
        json!({ "email": email, "password": password }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Creates a course through the API and returns the course body.
pub async fn create_test_course(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = post_json(
        app,
        "/api/courses/create",
        json!({ "title": title, "description": format!("About {title}") }),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["course"].clone()
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    request_json(app, "POST", uri, body, token).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    request_json(app, "PUT", uri, body, token).await
}

async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
