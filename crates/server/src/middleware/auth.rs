use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::models::AuthUser;
use crate::AppState;

pub const SESSION_COOKIE: &str = "tars.session_token";

/// Extract session token from headers (Authorization or cookie).
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let token_from_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    let token_from_cookie = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .split(';')
        .filter_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
                .map(|t| t.to_string())
        })
        .next();

    token_from_header
        .or(token_from_cookie)
        .filter(|t| !t.is_empty())
}

/// Looks up an unexpired session. `Ok(None)` means signed out.
pub async fn resolve_session(db: &SqlitePool, token: &str) -> Result<Option<AuthUser>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, String, Option<String>, String)>(
        r#"SELECT u.id, u.email, u.first_name, s.expires_at
           FROM "session" s
           JOIN "user" u ON u.id = s.user_id
           WHERE s.token = ?"#,
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    let Some((id, email, first_name, expires_at)) = row else {
        return Ok(None);
    };

    let now = chrono::Utc::now().to_rfc3339();
    if expires_at < now {
        return Ok(None);
    }

    Ok(Some(AuthUser {
        id,
        email,
        first_name,
    }))
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = match extract_token(&parts.headers) {
            Some(t) => t,
            None => {
                return Err((
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({"error": "Not authenticated"})),
                )
                    .into_response())
            }
        };

        match resolve_session(&state.db, &token).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "Invalid session"})),
            )
                .into_response()),
            Err(e) => {
                tracing::error!("Session lookup failed: {:?}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "Database error"})),
                )
                    .into_response())
            }
        }
    }
}
