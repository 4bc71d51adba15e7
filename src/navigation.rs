//! Named application routes and the channel that carries navigation.

use std::fmt;

use serde::{Serialize, Serializer};
use tokio::sync::mpsc;

/// Every screen the app can show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Signup,
    Quiz,
    Processing,
    Profile,
    Matches,
    /// Chat with the match carrying this identifier.
    Chat(String),
    Daily,
    Settings,
    NotFound,
}

impl Route {
    /// Map a path to a route. Anything unrecognised is `NotFound`.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let path = trimmed.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(trimmed);
        match path {
            "/" | "" => Self::Landing,
            "/signup" => Self::Signup,
            "/quiz" => Self::Quiz,
            "/processing" => Self::Processing,
            "/profile" => Self::Profile,
            "/matches" => Self::Matches,
            "/daily" => Self::Daily,
            "/settings" => Self::Settings,
            other => match other.strip_prefix("/chat/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Self::Chat(id.to_string()),
                _ => Self::NotFound,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Quiz => "/quiz".to_string(),
            Self::Processing => "/processing".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Matches => "/matches".to_string(),
            Self::Chat(id) => format!("/chat/{id}"),
            Self::Daily => "/daily".to_string(),
            Self::Settings => "/settings".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Routes serialize as their path.
impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sends navigation requests to whoever owns the screen loop.
///
/// Cheap to clone; every screen and scheduled task gets its own handle.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Request a move to `route`. Dropped silently if the loop is gone.
    pub fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigate");
        if self.tx.send(route).is_err() {
            tracing::debug!("Navigation receiver dropped");
        }
    }
}
