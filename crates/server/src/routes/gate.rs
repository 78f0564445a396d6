use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use tars_shared::constants::{APP_NAME, DEFAULT_ROOM, REACTION_EMOJIS};

use crate::chat::ChatError;
use crate::middleware::auth::{extract_token, resolve_session};
use crate::models::AuthUser;
use crate::store::{RoomStore, SqliteKv};
use crate::AppState;

/// GET /
///
/// Signed-in visitors are sent on to the chat view. Everyone else, including
/// visitors whose session could not be checked, gets the sign-in landing.
pub async fn landing(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = extract_token(&headers) {
        match resolve_session(&state.db, &token).await {
            Ok(Some(_)) => return Redirect::to("/chat").into_response(),
            Ok(None) => {}
            Err(e) => tracing::warn!("Identity check failed, showing landing: {:?}", e),
        }
    }

    Json(serde_json::json!({
        "app": APP_NAME,
        "signedIn": false,
        "signIn": "/api/auth/sign-in",
        "signUp": "/api/auth/sign-up",
    }))
    .into_response()
}

/// GET /chat
pub async fn chat_view(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ChatError> {
    let store = RoomStore::new(SqliteKv::new(state.db.clone(), user.id.clone()));
    let rooms = store.summaries().await?;
    let display_name = user.display_name().to_string();

    Ok(Json(serde_json::json!({
        "user": user,
        "displayName": display_name,
        "rooms": rooms,
        "defaultRoom": DEFAULT_ROOM,
        "reactions": REACTION_EMOJIS,
        "gateway": "/gateway",
    })))
}
