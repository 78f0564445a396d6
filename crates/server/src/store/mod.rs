//! Per-user room storage.
//!
//! A room's messages live under a single key (the room name) as one JSON
//! array. Every save rewrites the whole array.

mod sqlite;

pub use sqlite::SqliteKv;

use std::future::Future;

use tars_shared::constants::ROOMS;

use crate::models::{new_message_id, MessageRecord, RoomSummary};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored messages for room {room} are unreadable: {source}")]
    Corrupt {
        room: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode messages for room {room}: {source}")]
    Encode {
        room: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value storage scoped to a single visitor.
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Clone)]
pub struct RoomStore<K> {
    kv: K,
}

impl<K: KeyValueStore> RoomStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Stored list for `room`, or an empty list when nothing is stored yet.
    ///
    /// Records written before ids existed are given one here, and the list
    /// is saved back so the ids stay stable across loads.
    pub async fn load(&self, room: &str) -> Result<Vec<MessageRecord>, StoreError> {
        let Some(raw) = self.kv.get(room).await? else {
            return Ok(Vec::new());
        };
        let mut messages: Vec<MessageRecord> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                room: room.to_string(),
                source,
            })?;

        let mut backfilled = 0;
        for msg in messages.iter_mut().filter(|m| m.id.is_empty()) {
            msg.id = new_message_id();
            backfilled += 1;
        }
        if backfilled > 0 {
            tracing::debug!("Assigned ids to {} records in {}", backfilled, room);
            self.save(room, &messages).await?;
        }
        Ok(messages)
    }

    pub async fn save(&self, room: &str, messages: &[MessageRecord]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(messages).map_err(|source| StoreError::Encode {
            room: room.to_string(),
            source,
        })?;
        self.kv.set(room, raw).await
    }

    pub async fn clear(&self, room: &str) -> Result<(), StoreError> {
        self.kv.remove(room).await
    }

    pub async fn count(&self, room: &str) -> Result<usize, StoreError> {
        Ok(self.load(room).await?.len())
    }

    /// Message counts for every room, in sidebar order. An unreadable room
    /// counts as empty.
    pub async fn summaries(&self) -> Result<Vec<RoomSummary>, StoreError> {
        let mut rooms = Vec::with_capacity(ROOMS.len());
        for name in ROOMS {
            let message_count = match self.count(name).await {
                Ok(n) => n,
                Err(e @ StoreError::Corrupt { .. }) => {
                    tracing::warn!("{}", e);
                    0
                }
                Err(e) => return Err(e),
            };
            rooms.push(RoomSummary {
                name: name.to_string(),
                message_count,
            });
        }
        Ok(rooms)
    }
}
