use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::models::RemoteMessage;
use crate::AppState;

/// String form of `field`, the way a loose document schema would cast it.
/// Objects, arrays and null are dropped.
fn coerce_field(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// GET /api/messages
pub async fn list_messages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let items = sqlx::query_as::<_, RemoteMessage>(
        "SELECT id, room, text, sender, time FROM messages ORDER BY seq ASC",
    )
    .fetch_all(&state.db)
    .await;

    match items {
        Ok(items) => Json(items).into_response(),
        Err(e) => {
            tracing::error!("Failed to list messages: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Database error"})),
            )
                .into_response()
        }
    }
}

/// POST /api/messages
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if !body.is_object() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Expected a JSON object"})),
        )
            .into_response();
    }

    let message = RemoteMessage {
        id: uuid::Uuid::new_v4().to_string(),
        room: coerce_field(&body, "room"),
        text: coerce_field(&body, "text"),
        sender: coerce_field(&body, "sender"),
        time: coerce_field(&body, "time"),
    };

    let result = sqlx::query(
        "INSERT INTO messages (id, room, text, sender, time) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&message.id)
    .bind(&message.room)
    .bind(&message.text)
    .bind(&message.sender)
    .bind(&message.time)
    .execute(&state.db)
    .await;

    if let Err(e) = result {
        tracing::error!("Failed to insert message: {:?}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Failed to save message"})),
        )
            .into_response();
    }

    (StatusCode::CREATED, Json(message)).into_response()
}
