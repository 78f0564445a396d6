mod chat;
mod lifecycle;

use axum::{
    extract::{ws::{Message, WebSocket}, Query, State, WebSocketUpgrade},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::chat::ChatSession;
use crate::middleware::auth::{extract_token, resolve_session};
use crate::models::AuthUser;
use crate::store::SqliteKv;
use crate::ws::events::ClientEvent;
use crate::AppState;

pub type UserSession = ChatSession<SqliteKv>;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    match extract_session(&state, &headers, &query).await {
        Some(user) => ws
            .on_upgrade(move |socket| handle_socket(socket, state, user))
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Not authenticated"})),
        )
            .into_response(),
    }
}

async fn extract_session(
    state: &AppState,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
) -> Option<AuthUser> {
    let token = query
        .get("token")
        .filter(|t| !t.is_empty())
        .cloned()
        .or_else(|| extract_token(headers))?;

    match resolve_session(&state.db, &token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Gateway session lookup failed: {:?}", e);
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user: AuthUser) {
    let client_id = state.gateway.next_client_id().await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    state.gateway.register(client_id, user.id.clone(), tx).await;

    // Task to forward messages from mpsc to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_tx.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let session = match lifecycle::open_session(&state, client_id, &user).await {
        Some(s) => Arc::new(s),
        None => {
            // Dropping the sender lets the send task flush the error and stop
            state.gateway.unregister(client_id).await;
            let _ = send_task.await;
            return;
        }
    };

    // Receive loop
    let session_clone = Arc::clone(&session);
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                Message::Text(text) => {
                    let text_str: &str = &text;
                    match serde_json::from_str::<ClientEvent>(text_str) {
                        Ok(event) => chat::handle_client_event(&session_clone, event).await,
                        Err(e) => tracing::debug!("Ignoring malformed client event: {}", e),
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Whichever side ends first takes the other down. The receive side must
    // be fully stopped before close() so it cannot schedule another reply.
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
        _ = &mut recv_task => send_task.abort(),
    }

    lifecycle::handle_disconnect(&state, client_id, &session).await;
}
