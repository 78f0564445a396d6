use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::middleware::auth::{extract_token, resolve_session, SESSION_COOKIE};
use crate::models::{AuthUser, SessionResponse, SignInRequest};
use crate::AppState;

/// Inserts a session row and returns its token.
pub(super) async fn create_session(
    db: &SqlitePool,
    user_id: &str,
    ttl_days: i64,
) -> Result<String, sqlx::Error> {
    let session_token = uuid::Uuid::new_v4().to_string();
    let session_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let expires_at = (chrono::Utc::now() + chrono::Duration::days(ttl_days)).to_rfc3339();

    sqlx::query(
        r#"INSERT INTO "session" (id, user_id, token, expires_at, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(&session_id)
    .bind(user_id)
    .bind(&session_token)
    .bind(&expires_at)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(session_token)
}

/// Response for a fresh session: the user, the token and the cookie.
pub(super) fn session_response(user: AuthUser, token: String, ttl_days: i64) -> Response {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl_days * 86_400
    );

    let mut headers = HeaderMap::new();
    if let Ok(value) = cookie.parse() {
        headers.insert("set-cookie", value);
    }

    let body = SessionResponse {
        user,
        token: Some(token),
    };

    (StatusCode::OK, headers, Json(body)).into_response()
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignInRequest>,
) -> impl IntoResponse {
    use argon2::PasswordVerifier;

    let email = body.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, (String, String, Option<String>, String)>(
        r#"SELECT id, email, first_name, password_hash FROM "user" WHERE email = ?"#,
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await
    .ok()
    .flatten();

    let (user_id, user_email, first_name, stored_hash) = match user {
        Some(u) => u,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "Invalid credentials"})),
            )
                .into_response()
        }
    };

    let parsed_hash = match argon2::PasswordHash::new(&stored_hash) {
        Ok(h) => h,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Internal error"})),
            )
                .into_response()
        }
    };

    if argon2::Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Invalid credentials"})),
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

    tracing::info!("User {} signed in", user_id);

    let user = AuthUser {
        id: user_id,
        email: user_email,
        first_name,
    };
    session_response(user, token, ttl_days)
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = extract_token(&headers) {
        let _ = sqlx::query(r#"DELETE FROM "session" WHERE token = ?"#)
            .bind(&token)
            .execute(&state.db)
            .await;
    }

    // Clear cookie
    let cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);

    let mut resp_headers = HeaderMap::new();
    if let Ok(value) = cookie.parse() {
        resp_headers.insert("set-cookie", value);
    }

    (StatusCode::OK, resp_headers, Json(serde_json::json!({}))).into_response()
}

/// GET /api/auth/get-session
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = match extract_token(&headers) {
        Some(t) => t,
        None => return Json(serde_json::json!(null)).into_response(),
    };

    match resolve_session(&state.db, &token).await {
        Ok(Some(user)) => Json(SessionResponse { user, token: None }).into_response(),
        Ok(None) => Json(serde_json::json!(null)).into_response(),
        Err(e) => {
            tracing::warn!("Session lookup failed: {:?}", e);
            Json(serde_json::json!(null)).into_response()
        }
    }
}
