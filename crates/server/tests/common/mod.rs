#![allow(dead_code)]

pub mod ws_helpers;

use argon2::PasswordHasher;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tars_server::{config::Config, db, routes, ws, AppState};

pub const TEST_RESPONDER_DELAY_MS: u64 = 100;

/// Create an in-memory SQLite pool with schema applied.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    db::apply_schema(&pool).await.unwrap();

    pool
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_path: ":memory:".into(),
        responder_delay_ms: TEST_RESPONDER_DELAY_MS,
        session_ttl_days: 30,
    }
}

pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState {
        db: pool,
        config: test_config(),
        gateway: Arc::new(ws::gateway::GatewayState::new()),
    })
}

/// Build a test Axum app with the given pool.
pub fn create_test_app(pool: SqlitePool) -> Router {
    routes::build_router(create_test_state(pool))
}

pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        format!("Bearer {}", token).parse().unwrap(),
    )
}

/// Create a test user directly in the database. Returns (user_id, session_token).
pub async fn create_test_user(
    pool: &SqlitePool,
    email: &str,
    first_name: Option<&str>,
    password: &str,
) -> (String, String) {
    let user_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let salt = argon2::password_hash::SaltString::generate(&mut rand::rngs::OsRng);
    let password_hash = argon2::Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();

    sqlx::query(
        r#"INSERT INTO "user" (id, email, first_name, password_hash, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(&user_id)
    .bind(email)
    .bind(first_name)
    .bind(&password_hash)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    let session_token = insert_session(pool, &user_id, chrono::Duration::days(30)).await;

    (user_id, session_token)
}

/// Insert a session for `user_id` expiring after `ttl` (negative for an expired one).
pub async fn insert_session(pool: &SqlitePool, user_id: &str, ttl: chrono::Duration) -> String {
    let session_token = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let expires_at = (chrono::Utc::now() + ttl).to_rfc3339();

    sqlx::query(
        r#"INSERT INTO "session" (id, user_id, token, expires_at, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&session_token)
    .bind(&expires_at)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    session_token
}

/// Write a raw value into a user's room storage, bypassing the room store.
pub async fn put_raw_room_value(pool: &SqlitePool, user_id: &str, room: &str, value: &str) {
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query("INSERT INTO room_storage (owner_id, key, value, updated_at) VALUES (?, ?, ?, ?)")
        .bind(user_id)
        .bind(room)
        .bind(value)
        .bind(&now)
        .execute(pool)
        .await
        .unwrap();
}

/// Read a user's raw room storage value, bypassing the room store.
pub async fn get_raw_room_value(pool: &SqlitePool, user_id: &str, room: &str) -> Option<String> {
    sqlx::query_scalar::<_, String>("SELECT value FROM room_storage WHERE owner_id = ? AND key = ?")
        .bind(user_id)
        .bind(room)
        .fetch_optional(pool)
        .await
        .unwrap()
}
