//! Shared fixtures for handler, middleware and service tests.

use crate::routes;
use crate::server::AppState;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use lib_auth::{hash_password, Identity, TokenConfig, TokenService};
use lib_core::model::store::models::{User, UserForCreate};
use lib_core::model::store::UserRepository;
use lib_core::{Config, DbPool};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

pub const TEST_SECRET: &str = "test-secret-key-must-be-at-least-32-characters-long!";

/// Migrated in-memory database. A single connection keeps every query on the
/// same in-memory database.
pub async fn setup_test_db() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test database");

    lib_core::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration_hours: 24,
    }
}

pub fn test_tokens() -> TokenService {
    TokenService::new(&TokenConfig::with_hours(TEST_SECRET, 24))
}

pub fn test_app(pool: DbPool) -> Router {
    routes::app(AppState::new(pool, test_config()), &[])
}

pub async fn create_user(pool: &DbPool, name: &str, email: &str, password: &str) -> User {
    let digest = hash_password(password).expect("hash password");
    UserRepository::create(
        pool,
        UserForCreate::new(name.to_string(), email.to_string(), digest),
    )
    .await
    .expect("create user")
}

pub fn identity_of(user: &User) -> Identity {
    Identity {
        user_id: user.id.clone(),
        email: user.email.clone(),
    }
}

/// `Authorization` header value for `user`.
pub fn bearer_for(user: &User) -> String {
    let token = test_tokens().issue(&user.id, &user.email).expect("issue token");
    format!("Bearer {}", token)
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get_request(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn body_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn count_rows(pool: &DbPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .expect("count query")
}
