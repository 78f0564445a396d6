use serde::Serialize;

use crate::models::{AuthUser, MessageRecord, RoomSummary};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Ready {
        user: AuthUser,
        rooms: Vec<RoomSummary>,
        reactions: Vec<&'static str>,
    },
    RoomState {
        room: String,
        messages: Vec<MessageRecord>,
        typing: bool,
    },
    Message {
        room: String,
        message: MessageRecord,
    },
    MessageEdit {
        room: String,
        #[serde(rename = "messageId")]
        message_id: String,
        text: String,
    },
    MessageDelete {
        room: String,
        #[serde(rename = "messageId")]
        message_id: String,
    },
    ReactionAdd {
        room: String,
        #[serde(rename = "messageId")]
        message_id: String,
        emoji: String,
        reactions: Vec<String>,
    },
    MessagesSeen {
        room: String,
        #[serde(rename = "messageIds")]
        message_ids: Vec<String>,
    },
    Typing {
        room: String,
        active: bool,
    },
    EditStarted {
        #[serde(rename = "messageId")]
        message_id: String,
        text: String,
    },
    EditCancelled,
    RoomCleared {
        room: String,
    },
    Error {
        message: String,
    },
}
