mod session;

pub use session::*;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use argon2::PasswordHasher;
use tars_shared::validation;

use crate::models::{AuthUser, SignUpRequest};
use crate::AppState;

/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignUpRequest>,
) -> impl IntoResponse {
    let email = body.email.trim().to_lowercase();
    let first_name = body
        .first_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let checks = validation::validate_email(&email)
        .and_then(|_| validation::validate_password(&body.password))
        .and_then(|_| validation::validate_first_name(first_name.as_deref().unwrap_or("")));
    if let Err(e) = checks {
        return (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": e}))).into_response();
    }

    // Check if email already exists
    let exists = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "user" WHERE email = ?"#)
        .bind(&email)
        .fetch_one(&state.db)
        .await;

    match exists {
        Ok(0) => {}
        Ok(_) => return email_taken(),
        Err(e) => {
            tracing::error!("Failed to check email: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Database error"})),
            )
                .into_response();
        }
    }

    let salt = argon2::password_hash::SaltString::generate(&mut rand::rngs::OsRng);
    let password_hash = match argon2::Argon2::default().hash_password(body.password.as_bytes(), &salt) {
        Ok(h) => h.to_string(),
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to hash password"})),
            )
                .into_response()
        }
    };

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"INSERT INTO "user" (id, email, first_name, password_hash, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(&user_id)
    .bind(&email)
    .bind(&first_name)
    .bind(&password_hash)
    .bind(&now)
    .execute(&state.db)
    .await;

    if let Err(e) = result {
        // Lost a race with a concurrent sign-up for the same address
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            return email_taken();
        }
        tracing::error!("Failed to insert user: {:?}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Failed to create user"})),
        )
            .into_response();
    }

    let ttl_days = state.config.session_ttl_days;
    let token = match create_session(&state.db, &user_id, ttl_days).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to create session: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to create session"})),
            )
                .into_response();
        }
    };

    tracing::info!("Registered user {}", user_id);

    let user = AuthUser {
        id: user_id,
        email,
        first_name,
    };
    session_response(user, token, ttl_days)
}

fn email_taken() -> axum::response::Response {
    (
        StatusCode::CONFLICT,
        Json(serde_json::json!({"error": "Email already registered"})),
    )
        .into_response()
}
