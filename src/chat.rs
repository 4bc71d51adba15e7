//! Chat simulator: a scripted conversation with one of the fixed matches.
//!
//! There is no remote party. Every message the user sends schedules one
//! canned reply after a random delay. Replies are never cancelled by later
//! input, so two quick sends produce two replies, appended in the order
//! their timers expire. Closing the session drops the scheduler and with it
//! any replies still in flight.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::MatchError;
use crate::matches::{Match, find_match};
use crate::profile::UserProfile;
use crate::scheduler::Scheduler;

/// Suggestions offered until the user sends their first message.
pub const CONVERSATION_STARTERS: [&str; 4] = [
    "What's a creative project you're excited about?",
    "If you could learn any skill instantly, what would it be?",
    "What's something that made you think differently recently?",
    "How do you like to recharge after a busy day?",
];

/// Replies the simulated match picks from, uniformly and without memory.
pub const CANNED_REPLIES: [&str; 4] = [
    "That's fascinating! I love how you think about that.",
    "I totally relate to that perspective. It reminds me of...",
    "What an interesting way to look at it! Have you always felt this way?",
    "That resonates with me so much. I've been thinking about similar things lately.",
];

const DEFAULT_BROADCAST_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Match,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// Inclusive window the simulated reply delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyWindow {
    pub min: Duration,
    pub max: Duration,
}

impl ReplyWindow {
    /// Window between two bounds, in either order.
    pub fn new(a: Duration, b: Duration) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.reply_delay_min, config.reply_delay_max)
    }
}

impl Default for ReplyWindow {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// What the chat route shows.
pub enum ChatView {
    Active(ChatSession),
    /// The route named a match that does not exist.
    NotFound { id: String },
}

/// Open the chat route for `match_id`, rendering "not found" for unknown ids.
pub fn open_chat(match_id: &str, user: &UserProfile, window: ReplyWindow) -> ChatView {
    match ChatSession::open(match_id, user, window) {
        Ok(session) => ChatView::Active(session),
        Err(MatchError::UnknownMatchIdentifier(id)) => {
            tracing::info!(match_id = %id, "Chat opened for unknown match");
            ChatView::NotFound { id }
        }
    }
}

/// An open conversation with one match.
pub struct ChatSession {
    partner: &'static Match,
    user: UserProfile,
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    show_starters: bool,
    window: ReplyWindow,
    rng: Mutex<StdRng>,
    tx: broadcast::Sender<ChatMessage>,
    scheduler: Scheduler,
}

impl ChatSession {
    /// Open a session seeded with the match's welcome message.
    pub fn open(
        match_id: &str,
        user: &UserProfile,
        window: ReplyWindow,
    ) -> Result<Self, MatchError> {
        let partner = find_match(match_id)?;
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        let welcome = ChatMessage::new(
            Sender::Match,
            format!(
                "Hi {}! I'm excited to connect with someone who shares my mindset. \
                 What brings you joy in your daily life?",
                user.display_name()
            ),
        );
        tracing::info!(match_id, partner = partner.pseudonym, "Chat opened");
        Ok(Self {
            partner,
            user: user.clone(),
            messages: Arc::new(RwLock::new(vec![welcome])),
            show_starters: true,
            window,
            rng: Mutex::new(StdRng::from_entropy()),
            tx,
            scheduler: Scheduler::new("chat"),
        })
    }

    /// Builder: make reply delays and texts reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn partner(&self) -> &'static Match {
        self.partner
    }

    /// Avatar shown next to the user's own messages.
    pub fn user_avatar(&self) -> &str {
        &self.user.avatar
    }

    pub fn starters_visible(&self) -> bool {
        self.show_starters
    }

    pub fn starters(&self) -> &'static [&'static str] {
        &CONVERSATION_STARTERS
    }

    /// Subscribe to messages as they are appended (user and match alike).
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.tx.subscribe()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    /// Replies scheduled but not yet delivered.
    pub fn pending_replies(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Send `text` as the user.
    ///
    /// Blank input is ignored: no message, no reply. Otherwise the trimmed
    /// text is appended, the starters are hidden, and one reply is scheduled.
    pub async fn send_message(&mut self, text: &str) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let message = ChatMessage::new(Sender::User, text);
        self.messages.write().await.push(message.clone());
        let _ = self.tx.send(message.clone());
        self.show_starters = false;

        let (delay, reply) = self.draw_reply();
        let messages = Arc::clone(&self.messages);
        let tx = self.tx.clone();
        self.scheduler.schedule(delay, async move {
            let reply = ChatMessage::new(Sender::Match, reply);
            messages.write().await.push(reply.clone());
            let _ = tx.send(reply);
        });

        Some(message)
    }

    /// Send the conversation starter at `index`, if there is one.
    pub async fn send_starter(&mut self, index: usize) -> Option<ChatMessage> {
        let starter = CONVERSATION_STARTERS.get(index)?;
        self.send_message(starter).await
    }

    fn draw_reply(&self) -> (Duration, &'static str) {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        let min = self.window.min.as_millis() as u64;
        // An inverted window collapses to `min`.
        let max = (self.window.max.as_millis() as u64).max(min);
        let delay = Duration::from_millis(rng.gen_range(min..=max));
        let reply = CANNED_REPLIES[rng.gen_range(0..CANNED_REPLIES.len())];
        (delay, reply)
    }
}
