//! Store doubles for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::store::libsql_backend::LibSqlStore;
use crate::store::traits::RecordStore;

/// In-memory store whose writes can be switched to fail.
pub struct FlakyStore {
    inner: LibSqlStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub async fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: LibSqlStore::new_memory().await.unwrap(),
            fail_writes: AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Query("disk full".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn run_migrations(&self) -> Result<(), StoreError> {
        self.inner.run_migrations().await
    }

    async fn get_record(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        self.inner.get_record(key).await
    }

    async fn set_record(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        self.check()?;
        self.inner.set_record(key, value).await
    }

    async fn delete_record(&self, key: &str) -> Result<bool, StoreError> {
        self.check()?;
        self.inner.delete_record(key).await
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        self.inner.list_keys().await
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        self.check()?;
        self.inner.clear().await
    }
}
