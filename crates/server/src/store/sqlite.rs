use sqlx::SqlitePool;

use super::{KeyValueStore, StoreError};

/// `room_storage` rows belonging to one user.
#[derive(Clone)]
pub struct SqliteKv {
    db: SqlitePool,
    owner_id: String,
}

impl SqliteKv {
    pub fn new(db: SqlitePool, owner_id: impl Into<String>) -> Self {
        Self {
            db,
            owner_id: owner_id.into(),
        }
    }
}

impl KeyValueStore for SqliteKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM room_storage WHERE owner_id = ? AND key = ?",
        )
        .bind(&self.owner_id)
        .bind(key)
        .fetch_optional(&self.db)
        .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            r#"INSERT INTO room_storage (owner_id, key, value, updated_at) VALUES (?, ?, ?, ?)
               ON CONFLICT(owner_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(&self.owner_id)
        .bind(key)
        .bind(&value)
        .bind(&now)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM room_storage WHERE owner_id = ? AND key = ?")
            .bind(&self.owner_id)
            .bind(key)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
