//! `RecordStore` trait: the key-value persistence sink.
//!
//! Values are JSON documents keyed by a short string. Last writer wins;
//! there is no schema versioning of the values themselves.

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend-agnostic key-value record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), StoreError>;

    /// Read a record. `Ok(None)` when the key was never written or its
    /// stored text is not JSON.
    async fn get_record(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Insert or replace a record.
    async fn set_record(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;

    /// Delete a record. Returns whether anything was removed.
    async fn delete_record(&self, key: &str) -> Result<bool, StoreError>;

    /// All stored keys, sorted.
    async fn list_keys(&self) -> Result<Vec<String>, StoreError>;

    /// Remove every record. Returns the number removed.
    async fn clear(&self) -> Result<usize, StoreError>;
}
