//! User profile, signup validation, and the mindprint dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Avatars offered at signup. The first one is the default.
pub const AVATARS: [&str; 16] = [
    "🌟", "🎨", "🎭", "🌸", "🍀", "🌙", "☀️", "🦋", "🎪", "🌈", "🎯", "🎲", "🧩", "🎪", "🔮", "🌺",
];

/// Name used in greetings when no pseudonym is stored.
pub const FALLBACK_NAME: &str = "there";

/// Anonymous user profile created at signup.
///
/// Stored as JSON under the `user` record key. Both fields default so a
/// missing or partial record still renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub pseudonym: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
}

fn default_avatar() -> String {
    AVATARS[0].to_string()
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            pseudonym: String::new(),
            avatar: default_avatar(),
        }
    }
}

impl UserProfile {
    /// Validate signup input and build a profile.
    ///
    /// The pseudonym is stored as typed; only its trimmed form must be
    /// non-empty.
    pub fn signup(pseudonym: &str, avatar: Option<&str>) -> Result<Self, ProfileError> {
        if pseudonym.trim().is_empty() {
            return Err(ProfileError::EmptyPseudonym);
        }
        let avatar = match avatar {
            None => default_avatar(),
            Some(a) if AVATARS.contains(&a) => a.to_string(),
            Some(a) => return Err(ProfileError::UnknownAvatar(a.to_string())),
        };
        Ok(Self {
            pseudonym: pseudonym.to_string(),
            avatar,
        })
    }

    /// Pseudonym for greetings, falling back to "there".
    pub fn display_name(&self) -> &str {
        if self.pseudonym.trim().is_empty() {
            FALLBACK_NAME
        } else {
            &self.pseudonym
        }
    }

    pub fn is_registered(&self) -> bool {
        !self.pseudonym.trim().is_empty()
    }
}

/// One axis of the mindprint radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraitScore {
    pub name: &'static str,
    pub value: u8,
}

/// Radar values shown on the profile. Fixed demo data.
pub const MINDPRINT: [TraitScore; 6] = [
    TraitScore { name: "Analytical", value: 85 },
    TraitScore { name: "Creative", value: 72 },
    TraitScore { name: "Social", value: 68 },
    TraitScore { name: "Intuitive", value: 90 },
    TraitScore { name: "Practical", value: 75 },
    TraitScore { name: "Empathetic", value: 82 },
];

pub const TRAIT_BADGES: [&str; 5] = [
    "Deep Thinker",
    "Creative",
    "Empathetic",
    "Goal-Oriented",
    "Intuitive",
];

/// Everything the profile screen renders.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub profile: UserProfile,
    pub mindprint: Vec<TraitScore>,
    pub badges: Vec<&'static str>,
    pub quiz_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checkin: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn new(
        profile: UserProfile,
        quiz_answers: &[usize],
        last_checkin: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            profile,
            mindprint: MINDPRINT.to_vec(),
            badges: TRAIT_BADGES.to_vec(),
            quiz_completed: !quiz_answers.is_empty(),
            last_checkin,
        }
    }

    /// Plain-text rendering used by the CLI.
    pub fn render(&self) -> String {
        let mut parts = vec![format!(
            "{} Welcome back, {}!",
            self.profile.avatar,
            self.profile.display_name()
        )];

        parts.push("Your Mindprint:".to_string());
        for score in &self.mindprint {
            let bar = "█".repeat(usize::from(score.value / 10));
            parts.push(format!("  {:<11} {:>3} {}", score.name, score.value, bar));
        }
        parts.push(format!("Traits: {}", self.badges.join(", ")));

        if !self.quiz_completed {
            parts.push("You haven't taken the mindprint quiz yet.".to_string());
        }
        match self.last_checkin {
            Some(at) => parts.push(format!("Last check-in: {}", at.format("%Y-%m-%d %H:%M UTC"))),
            None => parts.push("No daily check-in yet.".to_string()),
        }

        parts.join("\n")
    }
}
