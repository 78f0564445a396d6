use tars_shared::constants::REACTION_EMOJIS;

use crate::chat::{ChatSession, Responder};
use crate::models::AuthUser;
use crate::store::{RoomStore, SqliteKv};
use crate::ws::events::ServerEvent;
use crate::ws::gateway::ClientId;
use crate::AppState;

use super::UserSession;

/// Sends `ready` and opens the chat session on the default room.
pub async fn open_session(
    state: &AppState,
    client_id: ClientId,
    user: &AuthUser,
) -> Option<UserSession> {
    let store = RoomStore::new(SqliteKv::new(state.db.clone(), user.id.clone()));

    let rooms = match store.summaries().await {
        Ok(rooms) => rooms,
        Err(e) => {
            tracing::error!("Failed to load rooms for {}: {}", user.id, e);
            state
                .gateway
                .send_to(client_id, &ServerEvent::Error { message: "Failed to load rooms".into() })
                .await;
            return None;
        }
    };

    state
        .gateway
        .send_to(
            client_id,
            &ServerEvent::Ready {
                user: user.clone(),
                rooms,
                reactions: REACTION_EMOJIS.to_vec(),
            },
        )
        .await;

    let responder = Responder::new(state.config.responder_delay());
    match ChatSession::open(client_id, user.clone(), store, state.gateway.clone(), responder).await {
        Ok(session) => {
            tracing::info!("Client {} opened a chat session for {}", client_id, user.id);
            Some(session)
        }
        Err(e) => {
            tracing::error!("Failed to open chat session for {}: {}", user.id, e);
            state
                .gateway
                .send_to(client_id, &ServerEvent::Error { message: e.to_string() })
                .await;
            None
        }
    }
}

pub async fn handle_disconnect(state: &AppState, client_id: ClientId, session: &UserSession) {
    session.close().await;
    state.gateway.unregister(client_id).await;

    let remaining = state.gateway.connection_count(&session.user().id).await;
    tracing::info!(
        "Client {} disconnected ({} connections left for {})",
        client_id,
        remaining,
        session.user().id
    );
}
