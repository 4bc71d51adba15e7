//! Account actions: signup, settings, export, and deletion.

use serde::Serialize;

use crate::error::{ProfileError, Result};
use crate::navigation::{Navigator, Route};
use crate::profile::UserProfile;
use crate::store::{ExportBundle, Records};

/// Privacy and notification toggles on the settings screen.
///
/// Held in memory for the session only; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub match_visibility: bool,
    pub data_processing: bool,
    pub new_match_notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            match_visibility: true,
            data_processing: true,
            new_match_notifications: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    MatchVisibility,
    DataProcessing,
    NewMatchNotifications,
}

impl Preferences {
    /// Flip one toggle and return its new value.
    pub fn toggle(&mut self, which: Preference) -> bool {
        let slot = match which {
            Preference::MatchVisibility => &mut self.match_visibility,
            Preference::DataProcessing => &mut self.data_processing,
            Preference::NewMatchNotifications => &mut self.new_match_notifications,
        };
        *slot = !*slot;
        *slot
    }
}

/// Account operations over the record store.
#[derive(Clone)]
pub struct Account {
    records: Records,
    navigator: Navigator,
    preferences: Preferences,
}

impl Account {
    pub fn new(records: Records, navigator: Navigator) -> Self {
        Self {
            records,
            navigator,
            preferences: Preferences::default(),
        }
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn toggle_preference(&mut self, which: Preference) -> bool {
        let value = self.preferences.toggle(which);
        tracing::debug!(preference = ?which, value, "Preference toggled");
        value
    }

    /// Create the profile and head to the quiz.
    pub async fn signup(&self, pseudonym: &str, avatar: Option<&str>) -> Result<UserProfile> {
        let profile = UserProfile::signup(pseudonym, avatar)?;
        self.records.set_profile(&profile).await?;
        tracing::info!(avatar = %profile.avatar, "Signed up");
        self.navigator.navigate(Route::Quiz);
        Ok(profile)
    }

    /// Rename, keeping every other field of the stored profile.
    pub async fn save_pseudonym(&self, pseudonym: &str) -> Result<UserProfile> {
        if pseudonym.trim().is_empty() {
            return Err(ProfileError::EmptyPseudonym.into());
        }
        let mut profile = self.records.profile().await?;
        profile.pseudonym = pseudonym.to_string();
        self.records.set_profile(&profile).await?;
        tracing::info!("Pseudonym updated");
        Ok(profile)
    }

    pub async fn export_data(&self) -> Result<ExportBundle> {
        Ok(self.records.export().await?)
    }

    /// Wipe every record and return to the landing page.
    ///
    /// Returns `false` without touching anything when not confirmed.
    pub async fn delete_account(&self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Ok(false);
        }
        let removed = self.records.clear_all().await?;
        tracing::info!(removed, "Account deleted");
        self.navigator.navigate(Route::Landing);
        Ok(true)
    }
}
