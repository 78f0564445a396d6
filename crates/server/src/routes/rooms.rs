use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use tars_shared::validation;

use crate::chat::ChatError;
use crate::models::AuthUser;
use crate::store::{RoomStore, SqliteKv};
use crate::AppState;

fn user_store(state: &AppState, user: &AuthUser) -> RoomStore<SqliteKv> {
    RoomStore::new(SqliteKv::new(state.db.clone(), user.id.clone()))
}

/// GET /api/rooms
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ChatError> {
    let rooms = user_store(&state, &user).summaries().await?;
    Ok(Json(rooms))
}

/// GET /api/rooms/{room}/messages
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    let room = validation::validate_room(&room).map_err(ChatError::InvalidRoom)?;
    let messages = user_store(&state, &user).load(room).await?;
    Ok(Json(messages))
}

/// DELETE /api/rooms/{room}/messages
pub async fn clear_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    let room = validation::validate_room(&room).map_err(ChatError::InvalidRoom)?;
    user_store(&state, &user).clear(room).await?;
    tracing::info!("User {} cleared {}", user.id, room);
    Ok(Json(serde_json::json!({})))
}
