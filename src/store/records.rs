//! Typed access to the app's records on top of a `RecordStore`.
//!
//! A record that was never written (or no longer parses) reads back as its
//! default value; callers never see a "missing record" error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::profile::UserProfile;
use crate::store::traits::RecordStore;

/// Record keys, matching the names the web client used.
pub mod record_keys {
    /// `{"pseudonym": ..., "avatar": ...}`
    pub const USER: &str = "user";
    /// Ordered list of option indices from the mindprint quiz.
    pub const QUIZ_ANSWERS: &str = "quizAnswers";
    /// ISO-8601 timestamp of the last completed daily check-in.
    pub const LAST_CHECKIN: &str = "lastDailyCheckin";
}

/// Everything the user can download from the settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub profile: serde_json::Value,
    pub quiz_answers: serde_json::Value,
    pub last_checkin: Option<String>,
}

impl ExportBundle {
    pub fn to_pretty_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Typed record accessors shared by every screen.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn RecordStore>,
}

impl Records {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    async fn read_or_default<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(value) = self.store.get_record(key).await? else {
            return Ok(T::default());
        };
        match serde_json::from_value(value) {
            Ok(v) => Ok(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "Unreadable record, using default");
                Ok(T::default())
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set_record(key, &value).await
    }

    // ── Profile ─────────────────────────────────────────────────────

    pub async fn profile(&self) -> Result<UserProfile, StoreError> {
        self.read_or_default(record_keys::USER).await
    }

    pub async fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.write(record_keys::USER, profile).await
    }

    // ── Quiz answers ────────────────────────────────────────────────

    /// Stored quiz answers, empty if the quiz was never completed.
    pub async fn quiz_answers(&self) -> Result<Vec<usize>, StoreError> {
        self.read_or_default(record_keys::QUIZ_ANSWERS).await
    }

    pub async fn set_quiz_answers(&self, answers: &[usize]) -> Result<(), StoreError> {
        self.write(record_keys::QUIZ_ANSWERS, &answers).await
    }

    // ── Daily check-in ──────────────────────────────────────────────

    pub async fn last_checkin(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let raw: Option<String> = self.read_or_default(record_keys::LAST_CHECKIN).await?;
        Ok(raw.and_then(|s| match DateTime::parse_from_rfc3339(&s) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(value = %s, error = %e, "Unparseable check-in timestamp");
                None
            }
        }))
    }

    pub async fn set_last_checkin(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.write(record_keys::LAST_CHECKIN, &at.to_rfc3339()).await
    }

    // ── Export / deletion ───────────────────────────────────────────

    /// Bundle the three user records as stored, with empty stand-ins for
    /// missing ones.
    pub async fn export(&self) -> Result<ExportBundle, StoreError> {
        let profile = self
            .store
            .get_record(record_keys::USER)
            .await?
            .unwrap_or_else(|| serde_json::json!({}));
        let quiz_answers = self
            .store
            .get_record(record_keys::QUIZ_ANSWERS)
            .await?
            .unwrap_or_else(|| serde_json::json!([]));
        let last_checkin = self
            .store
            .get_record(record_keys::LAST_CHECKIN)
            .await?
            .and_then(|v| v.as_str().map(String::from));

        Ok(ExportBundle {
            profile,
            quiz_answers,
            last_checkin,
        })
    }

    /// Drop every record in the store.
    pub async fn clear_all(&self) -> Result<usize, StoreError> {
        self.store.clear().await
    }
}
