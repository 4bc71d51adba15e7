//! libSQL backend: async `RecordStore` implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::RecordStore;

/// libSQL record store.
///
/// Stores a single connection that is reused for all operations.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db)?;
        store.run_migrations().await?;
        info!(path = %path.display(), "Record store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to create in-memory database: {e}")))?;

        let store = Self::from_database(db)?;
        store.run_migrations().await?;
        Ok(store)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl RecordStore for LibSqlStore {
    async fn run_migrations(&self) -> Result<(), StoreError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn get_record(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let mut rows = self
            .conn()
            .query("SELECT value FROM records WHERE key = ?1", params![key])
            .await
            .map_err(|e| StoreError::Query(format!("get_record: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("get_record: {e}")))?;
                match serde_json::from_str(&value_str) {
                    Ok(value) => Ok(Some(value)),
                    Err(e) => {
                        warn!(key, error = %e, "Stored record is not valid JSON, ignoring");
                        Ok(None)
                    }
                }
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("get_record: {e}"))),
        }
    }

    async fn set_record(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let value_str =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.conn()
            .execute(
                "INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value_str, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("set_record: {e}")))?;

        debug!(key, "Record written");
        Ok(())
    }

    async fn delete_record(&self, key: &str) -> Result<bool, StoreError> {
        let count = self
            .conn()
            .execute("DELETE FROM records WHERE key = ?1", params![key])
            .await
            .map_err(|e| StoreError::Query(format!("delete_record: {e}")))?;
        Ok(count > 0)
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut rows = self
            .conn()
            .query("SELECT key FROM records ORDER BY key", ())
            .await
            .map_err(|e| StoreError::Query(format!("list_keys: {e}")))?;

        let mut keys = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("list_keys: {e}")))?
        {
            let key: String = row
                .get(0)
                .map_err(|e| StoreError::Query(format!("list_keys: {e}")))?;
            keys.push(key);
        }
        Ok(keys)
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let count = self
            .conn()
            .execute("DELETE FROM records", ())
            .await
            .map_err(|e| StoreError::Query(format!("clear: {e}")))?;
        info!(count, "Record store cleared");
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> LibSqlStore {
        LibSqlStore::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn record_crud() {
        let store = test_store().await;
        let value = serde_json::json!({"pseudonym": "Ada", "avatar": "🌟"});

        store.set_record("user", &value).await.unwrap();
        let fetched = store.get_record("user").await.unwrap().unwrap();
        assert_eq!(fetched["pseudonym"], "Ada");

        // Upsert
        store
            .set_record("user", &serde_json::json!({"pseudonym": "Grace"}))
            .await
            .unwrap();
        let fetched = store.get_record("user").await.unwrap().unwrap();
        assert_eq!(fetched["pseudonym"], "Grace");
        assert!(fetched.get("avatar").is_none());

        assert!(store.delete_record("user").await.unwrap());
        assert!(store.get_record("user").await.unwrap().is_none());
        assert!(!store.delete_record("user").await.unwrap());
    }

    #[tokio::test]
    async fn non_json_value_reads_as_missing() {
        let store = test_store().await;
        store
            .conn()
            .execute(
                "INSERT INTO records (key, value) VALUES (?1, ?2)",
                params!["user", "{not json"],
            )
            .await
            .unwrap();
        assert!(store.get_record("user").await.unwrap().is_none());
        assert_eq!(store.list_keys().await.unwrap(), vec!["user".to_string()]);
    }

    #[tokio::test]
    async fn missing_record_is_none() {
        let store = test_store().await;
        assert!(store.get_record("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_and_clear() {
        let store = test_store().await;
        store
            .set_record("quizAnswers", &serde_json::json!([1, 0]))
            .await
            .unwrap();
        store
            .set_record("lastDailyCheckin", &serde_json::json!("2026-01-01T00:00:00Z"))
            .await
            .unwrap();

        let keys = store.list_keys().await.unwrap();
        assert_eq!(keys, vec!["lastDailyCheckin", "quizAnswers"]);

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.list_keys().await.unwrap().is_empty());
        assert_eq!(store.clear().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn local_file_persists_across_opens() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("neuromatch.db");

        {
            let store = LibSqlStore::new_local(&path).await.unwrap();
            store
                .set_record("quizAnswers", &serde_json::json!([3, 2, 1]))
                .await
                .unwrap();
        }
        assert!(path.exists());

        let reopened = LibSqlStore::new_local(&path).await.unwrap();
        let answers = reopened.get_record("quizAnswers").await.unwrap().unwrap();
        assert_eq!(answers, serde_json::json!([3, 2, 1]));
    }
}
