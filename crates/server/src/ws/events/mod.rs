mod server_event;

pub use server_event::ServerEvent;

use serde::Deserialize;

// ── Client → Server Events ──

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinRoom {
        room: String,
    },
    SendMessage {
        content: String,
    },
    BeginEdit {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    CancelEdit,
    DeleteMessage {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    AddReaction {
        #[serde(rename = "messageId")]
        message_id: String,
        emoji: String,
    },
    ClearRoom,
    Ping,
}
