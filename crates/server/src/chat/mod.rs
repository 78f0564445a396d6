//! Per-connection chat state: the current room, its message list, the
//! composer's edit target and the responder replies still in flight.
//!
//! Every mutation writes the room store first and only then replaces the
//! in-memory view, so a failed save leaves the view untouched.

pub mod responder;

pub use responder::Responder;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use tars_shared::constants::DEFAULT_ROOM;
use tars_shared::validation;

use crate::models::{AuthUser, MessageRecord, RoomSummary};
use crate::store::{KeyValueStore, RoomStore, StoreError};
use crate::ws::events::ServerEvent;
use crate::ws::gateway::{ClientId, GatewayState};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    InvalidRoom(String),
    #[error("{0}")]
    InvalidContent(String),
    #[error("{0}")]
    InvalidReaction(String),
    #[error("Message not found")]
    MessageNotFound,
    #[error("Not your message")]
    NotYourMessage,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChatError::InvalidRoom(_) => StatusCode::NOT_FOUND,
            ChatError::InvalidContent(_) | ChatError::InvalidReaction(_) => StatusCode::BAD_REQUEST,
            ChatError::MessageNotFound => StatusCode::NOT_FOUND,
            ChatError::NotYourMessage => StatusCode::FORBIDDEN,
            ChatError::Store(e) => {
                tracing::error!("Room store failure: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "Storage error"})),
                )
                    .into_response();
            }
        };
        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}

struct ViewState {
    room: &'static str,
    messages: Vec<MessageRecord>,
    editing: Option<String>,
    /// Responder replies not yet delivered, keyed by the message that triggered them.
    pending: HashMap<String, JoinHandle<()>>,
}

impl ViewState {
    fn position(&self, message_id: &str) -> Result<usize, ChatError> {
        self.messages
            .iter()
            .position(|m| m.id == message_id)
            .ok_or(ChatError::MessageNotFound)
    }
}

pub struct ChatSession<K> {
    client_id: ClientId,
    user: AuthUser,
    store: RoomStore<K>,
    gateway: Arc<GatewayState>,
    responder: Responder,
    view: Arc<Mutex<ViewState>>,
}

impl<K: KeyValueStore> ChatSession<K> {
    /// Creates a session positioned on the default room and pushes its state.
    pub async fn open(
        client_id: ClientId,
        user: AuthUser,
        store: RoomStore<K>,
        gateway: Arc<GatewayState>,
        responder: Responder,
    ) -> Result<Self, ChatError> {
        let session = Self {
            client_id,
            user,
            store,
            gateway,
            responder,
            view: Arc::new(Mutex::new(ViewState {
                room: DEFAULT_ROOM,
                messages: Vec::new(),
                editing: None,
                pending: HashMap::new(),
            })),
        };

        let messages = session.load_view(DEFAULT_ROOM).await?;
        session.view.lock().await.messages = messages.clone();
        session
            .emit(ServerEvent::RoomState {
                room: DEFAULT_ROOM.to_string(),
                messages,
                typing: false,
            })
            .await;

        Ok(session)
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub async fn current_room(&self) -> &'static str {
        self.view.lock().await.room
    }

    pub async fn messages(&self) -> Vec<MessageRecord> {
        self.view.lock().await.messages.clone()
    }

    pub async fn editing(&self) -> Option<String> {
        self.view.lock().await.editing.clone()
    }

    /// True while at least one responder reply is pending.
    pub async fn is_typing(&self) -> bool {
        !self.view.lock().await.pending.is_empty()
    }

    pub async fn room_summaries(&self) -> Result<Vec<RoomSummary>, ChatError> {
        Ok(self.store.summaries().await?)
    }

    pub async fn switch_room(&self, room: &str) -> Result<(), ChatError> {
        let room = validation::validate_room(room).map_err(ChatError::InvalidRoom)?;
        let mut view = self.view.lock().await;

        if view.room != room {
            self.cancel_pending(&mut view).await;
            view.messages = self.load_view(room).await?;
            view.room = room;
            view.editing = None;
        }

        self.emit(ServerEvent::RoomState {
            room: room.to_string(),
            messages: view.messages.clone(),
            typing: !view.pending.is_empty(),
        })
        .await;
        Ok(())
    }

    /// Submits the composer. Blank input is ignored. While an edit is in
    /// progress the input replaces the edited message's text; otherwise it
    /// is appended as a new message and a responder reply is scheduled.
    pub async fn send(&self, input: &str) -> Result<(), ChatError> {
        if input.trim().is_empty() {
            return Ok(());
        }
        validation::validate_message_content(input).map_err(ChatError::InvalidContent)?;

        let mut view = self.view.lock().await;
        let room = view.room;

        if let Some(target) = view.editing.clone() {
            let idx = match view.position(&target) {
                Ok(idx) => idx,
                Err(e) => {
                    view.editing = None;
                    return Err(e);
                }
            };
            let mut updated = view.messages.clone();
            updated[idx].text = input.to_string();
            updated[idx].edited = true;
            self.store.save(room, &updated).await?;
            view.messages = updated;
            view.editing = None;

            self.emit(ServerEvent::MessageEdit {
                room: room.to_string(),
                message_id: target,
                text: input.to_string(),
            })
            .await;
            return Ok(());
        }

        let record = MessageRecord::from_user(input, self.user.display_name());
        let mut updated = view.messages.clone();
        updated.push(record.clone());
        self.store.save(room, &updated).await?;
        view.messages = updated;

        let message_id = record.id.clone();
        self.emit(ServerEvent::Message {
            room: room.to_string(),
            message: record,
        })
        .await;

        self.schedule_reply(&mut view, message_id);
        self.emit(ServerEvent::Typing {
            room: room.to_string(),
            active: true,
        })
        .await;
        Ok(())
    }

    /// Puts the composer into edit mode for one of the user's own messages
    /// and returns the text to load into it.
    pub async fn begin_edit(&self, message_id: &str) -> Result<String, ChatError> {
        let mut view = self.view.lock().await;
        let idx = view.position(message_id)?;
        let text = {
            let msg = &view.messages[idx];
            if msg.sender != self.user.display_name() {
                return Err(ChatError::NotYourMessage);
            }
            msg.text.clone()
        };
        view.editing = Some(message_id.to_string());

        self.emit(ServerEvent::EditStarted {
            message_id: message_id.to_string(),
            text: text.clone(),
        })
        .await;
        Ok(text)
    }

    pub async fn cancel_edit(&self) {
        self.view.lock().await.editing = None;
        self.emit(ServerEvent::EditCancelled).await;
    }

    pub async fn delete(&self, message_id: &str) -> Result<(), ChatError> {
        let mut view = self.view.lock().await;
        let room = view.room;
        let idx = view.position(message_id)?;
        if view.messages[idx].sender != self.user.display_name() {
            return Err(ChatError::NotYourMessage);
        }

        let mut updated = view.messages.clone();
        updated.remove(idx);
        self.store.save(room, &updated).await?;
        view.messages = updated;

        if view.editing.as_deref() == Some(message_id) {
            view.editing = None;
        }

        self.emit(ServerEvent::MessageDelete {
            room: room.to_string(),
            message_id: message_id.to_string(),
        })
        .await;

        // A reply still owed to this message lands on the remaining list
        Ok(())
    }

    /// Appends `emoji` to a message's reactions. Duplicates are kept.
    pub async fn react(&self, message_id: &str, emoji: &str) -> Result<Vec<String>, ChatError> {
        validation::validate_reaction(emoji).map_err(ChatError::InvalidReaction)?;

        let mut view = self.view.lock().await;
        let room = view.room;
        let idx = view.position(message_id)?;

        let mut updated = view.messages.clone();
        updated[idx].add_reaction(emoji);
        let reactions = updated[idx].reactions.clone().unwrap_or_default();
        self.store.save(room, &updated).await?;
        view.messages = updated;

        self.emit(ServerEvent::ReactionAdd {
            room: room.to_string(),
            message_id: message_id.to_string(),
            emoji: emoji.to_string(),
            reactions: reactions.clone(),
        })
        .await;
        Ok(reactions)
    }

    /// Removes the current room's stored list and empties the view.
    pub async fn clear(&self) -> Result<(), ChatError> {
        let mut view = self.view.lock().await;
        let room = view.room;
        self.store.clear(room).await?;
        self.cancel_pending(&mut view).await;
        view.messages.clear();
        view.editing = None;

        self.emit(ServerEvent::RoomCleared {
            room: room.to_string(),
        })
        .await;
        Ok(())
    }

    /// Cancels every reply still in flight. Called when the connection ends.
    pub async fn close(&self) {
        let mut view = self.view.lock().await;
        let cancelled = view.pending.len();
        for (_, handle) in view.pending.drain() {
            handle.abort();
        }
        if cancelled > 0 {
            tracing::debug!(
                "Cancelled {} pending replies for client {}",
                cancelled,
                self.client_id
            );
        }
    }

    /// Pushes a failed operation back to the client as an `error` event.
    pub async fn report_error(&self, error: &ChatError) {
        let message = match error {
            ChatError::Store(e) => {
                tracing::error!("Room store failure for {}: {}", self.user.id, e);
                "Failed to save messages".to_string()
            }
            other => other.to_string(),
        };
        self.emit(ServerEvent::Error { message }).await;
    }

    async fn load_view(&self, room: &str) -> Result<Vec<MessageRecord>, ChatError> {
        match self.store.load(room).await {
            Ok(messages) => Ok(messages),
            Err(e @ StoreError::Corrupt { .. }) => {
                tracing::warn!("User {}: {}", self.user.id, e);
                self.emit(ServerEvent::Error {
                    message: format!("Messages in {} could not be read", room),
                })
                .await;
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn cancel_pending(&self, view: &mut ViewState) {
        if view.pending.is_empty() {
            return;
        }
        for (_, handle) in view.pending.drain() {
            handle.abort();
        }
        self.emit(ServerEvent::Typing {
            room: view.room.to_string(),
            active: false,
        })
        .await;
    }

    /// Spawns the delayed reply for `message_id`. The task needs the view
    /// lock to complete, so it can only run between other operations.
    fn schedule_reply(&self, view: &mut ViewState, message_id: String) {
        let room = view.room;
        let state = Arc::clone(&self.view);
        let store = self.store.clone();
        let gateway = Arc::clone(&self.gateway);
        let responder = self.responder.clone();
        let client_id = self.client_id;
        let key = message_id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(responder.delay()).await;

            let mut view = state.lock().await;
            view.pending.remove(&key);
            if view.room != room {
                return;
            }

            let mut updated = view.messages.clone();
            let (seen, reply) = responder.answer(&mut updated);
            match store.save(room, &updated).await {
                Ok(()) => {
                    view.messages = updated;
                    if !seen.is_empty() {
                        gateway
                            .send_to(
                                client_id,
                                &ServerEvent::MessagesSeen {
                                    room: room.to_string(),
                                    message_ids: seen,
                                },
                            )
                            .await;
                    }
                    gateway
                        .send_to(
                            client_id,
                            &ServerEvent::Message {
                                room: room.to_string(),
                                message: reply,
                            },
                        )
                        .await;
                }
                Err(e) => {
                    tracing::error!("Failed to save responder reply in {}: {}", room, e);
                    gateway
                        .send_to(
                            client_id,
                            &ServerEvent::Error {
                                message: "Failed to save reply".into(),
                            },
                        )
                        .await;
                }
            }

            if view.pending.is_empty() {
                gateway
                    .send_to(
                        client_id,
                        &ServerEvent::Typing {
                            room: room.to_string(),
                            active: false,
                        },
                    )
                    .await;
            }
        });

        view.pending.insert(message_id, handle);
    }

    async fn emit(&self, event: ServerEvent) {
        self.gateway.send_to(self.client_id, &event).await;
    }
}
