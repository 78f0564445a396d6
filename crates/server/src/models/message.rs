use serde::{Deserialize, Serialize};

use tars_shared::constants::RESPONDER_NAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Seen,
}

/// One entry of a room's stored list.
///
/// Only user-authored records carry a `status`. The `id` is assigned once
/// and every mutation addresses the record through it. Records stored
/// without one deserialize with an empty `id` until the store fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub id: String,
    pub text: String,
    pub sender: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub edited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<String>>,
}

impl MessageRecord {
    pub fn from_user(text: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            text: text.into(),
            sender: sender.into(),
            time: local_time(),
            status: Some(MessageStatus::Sent),
            edited: false,
            reactions: Some(Vec::new()),
        }
    }

    pub fn from_responder(text: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            text: text.into(),
            sender: RESPONDER_NAME.to_string(),
            time: local_time(),
            status: None,
            edited: false,
            reactions: None,
        }
    }

    pub fn add_reaction(&mut self, emoji: impl Into<String>) {
        self.reactions.get_or_insert_with(Vec::new).push(emoji.into());
    }
}

pub fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Wall-clock time formatted like a browser's `toLocaleTimeString()`.
pub fn local_time() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub name: String,
    pub message_count: usize,
}

/// Document in the remote message collection.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RemoteMessage {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}
