//! Fixed match dataset and lookup.

use serde::Serialize;

use crate::error::MatchError;

/// How a match is labelled on its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchType {
    Perfect,
    Great,
    Good,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perfect => write!(f, "Perfect Match"),
            Self::Great => write!(f, "Great Match"),
            Self::Good => write!(f, "Good Match"),
        }
    }
}

/// Colour band used for the compatibility figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityTier {
    /// 90 and above.
    Excellent,
    /// 85 to 89.
    Strong,
    Good,
}

impl CompatibilityTier {
    pub fn for_score(compatibility: u8) -> Self {
        if compatibility >= 90 {
            Self::Excellent
        } else if compatibility >= 85 {
            Self::Strong
        } else {
            Self::Good
        }
    }
}

/// A suggested match. All matches are hard-coded demo data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: &'static str,
    pub avatar: &'static str,
    pub pseudonym: &'static str,
    pub compatibility: u8,
    pub traits: [&'static str; 3],
    pub preview: &'static str,
    pub last_active: &'static str,
    pub match_type: MatchType,
}

impl Match {
    pub fn tier(&self) -> CompatibilityTier {
        CompatibilityTier::for_score(self.compatibility)
    }

    pub fn is_online(&self) -> bool {
        self.last_active == "Active now"
    }
}

pub static MATCHES: [Match; 3] = [
    Match {
        id: "1",
        avatar: "🎨",
        pseudonym: "ArtfulThinker",
        compatibility: 92,
        traits: ["Creative", "Analytical", "Empathetic"],
        preview: "Loves exploring the intersection of art and psychology",
        last_active: "Active now",
        match_type: MatchType::Perfect,
    },
    Match {
        id: "2",
        avatar: "🌙",
        pseudonym: "NightOwlPhilosopher",
        compatibility: 87,
        traits: ["Deep Thinker", "Intuitive", "Curious"],
        preview: "Enjoys late-night conversations about meaning and purpose",
        last_active: "2 hours ago",
        match_type: MatchType::Great,
    },
    Match {
        id: "3",
        avatar: "🌸",
        pseudonym: "BloomingMind",
        compatibility: 84,
        traits: ["Nurturing", "Creative", "Growth-Oriented"],
        preview: "Passionate about personal development and helping others grow",
        last_active: "1 day ago",
        match_type: MatchType::Good,
    },
];

pub fn all_matches() -> &'static [Match] {
    &MATCHES
}

pub fn find_match(id: &str) -> Result<&'static Match, MatchError> {
    MATCHES
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| MatchError::UnknownMatchIdentifier(id.to_string()))
}

/// Header figures on the matches screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub total: usize,
    pub highest_compatibility: u8,
}

pub fn summary() -> MatchSummary {
    MatchSummary {
        total: MATCHES.len(),
        highest_compatibility: MATCHES.iter().map(|m| m.compatibility).max().unwrap_or(0),
    }
}
