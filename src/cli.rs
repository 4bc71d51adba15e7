//! Terminal front end: reads commands from stdin and drives the screens.
//!
//! Screens are entered through the `Navigator`, so redirects scheduled by a
//! screen (the processing timer, for one) go through the same path as a
//! typed `/go`.

use std::pin::Pin;

use anyhow::Context;
use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;

use crate::account::{Account, Preference};
use crate::chat::{ChatMessage, ChatSession, ChatView, ReplyWindow, Sender, open_chat};
use crate::config::AppConfig;
use crate::matches::{all_matches, summary};
use crate::navigation::{Navigator, Route};
use crate::processing::ProcessingScreen;
use crate::profile::{AVATARS, Dashboard};
use crate::questionnaire::{CheckInState, DailyCheckIn, QuestionView, QuizScreen};
use crate::store::Records;

pub type InputStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Stream of trimmed, non-empty lines from stdin. Ends at EOF.
pub fn stdin_lines() -> InputStream {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    Box::pin(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|line| (line, rx))
    }))
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A 1-based number as typed, stored 0-based.
    Pick(usize),
    Next,
    Previous,
    Go(Route),
    Export,
    Delete,
    Toggle(usize),
    Help,
    Quit,
    Text(String),
}

impl Command {
    /// `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some(rest) = line.strip_prefix('/') {
            let (name, arg) = match rest.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, arg.trim()),
                None => (rest, ""),
            };
            let command = match name {
                "go" => Self::Go(Route::parse(arg)),
                "export" => Self::Export,
                "delete" => Self::Delete,
                "toggle" => match arg.parse::<usize>() {
                    Ok(n) if n >= 1 => Self::Toggle(n - 1),
                    _ => Self::Text(line.to_string()),
                },
                "help" => Self::Help,
                "quit" | "exit" => Self::Quit,
                _ => Self::Text(line.to_string()),
            };
            return Some(command);
        }
        let command = match line {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 => Self::Pick(n - 1),
                _ => Self::Text(other.to_string()),
            },
        };
        Some(command)
    }
}

const HELP: &str = "\
Commands:
  1..N          pick an option
  n / next      confirm and continue
  p / prev      previous question (quiz only)
  /go <path>    open a screen (/, /signup, /quiz, /profile, /matches, /chat/<id>, /daily, /settings)
  /export       write your data to a JSON file (settings)
  /delete       delete your account (settings)
  /toggle <n>   flip a preference (settings)
  /quit         exit";

enum Screen {
    Landing,
    Signup { avatar: Option<&'static str> },
    Quiz(QuizScreen),
    /// Held so the redirect timer lives as long as the screen.
    Processing { _timer: ProcessingScreen },
    Profile,
    Matches,
    Chat {
        session: ChatSession,
        feed: broadcast::Receiver<ChatMessage>,
    },
    ChatNotFound,
    Daily(DailyCheckIn),
    Settings { confirm_delete: bool },
    NotFound,
}

enum Event {
    Input(String),
    Navigate(Route),
    Reply(ChatMessage),
    Eof,
}

/// The interactive app: owns the current screen and the navigation channel.
pub struct App {
    config: AppConfig,
    records: Records,
    navigator: Navigator,
    routes: mpsc::UnboundedReceiver<Route>,
    account: Account,
    screen: Screen,
}

impl App {
    pub fn new(config: AppConfig, records: Records) -> Self {
        let (navigator, routes) = Navigator::new();
        let account = Account::new(records.clone(), navigator.clone());
        Self {
            config,
            records,
            navigator,
            routes,
            account,
            screen: Screen::Landing,
        }
    }

    /// Run until `/quit` or end of input.
    pub async fn run(mut self, mut input: InputStream) -> anyhow::Result<()> {
        self.navigator.navigate(Route::Landing);

        loop {
            let event = tokio::select! {
                line = input.next() => match line {
                    Some(line) => Event::Input(line),
                    None => Event::Eof,
                },
                Some(route) = self.routes.recv() => Event::Navigate(route),
                Some(message) = next_reply(&mut self.screen) => Event::Reply(message),
            };

            match event {
                Event::Input(line) => {
                    let Some(command) = Command::parse(&line) else {
                        continue;
                    };
                    if command == Command::Quit {
                        break;
                    }
                    if let Err(e) = self.handle(command, &line).await {
                        eprintln!("⚠️  {e:#}");
                    }
                }
                Event::Navigate(route) => {
                    if let Err(e) = self.enter(route).await {
                        eprintln!("⚠️  {e:#}");
                    }
                }
                Event::Reply(message) => {
                    if let Screen::Chat { session, .. } = &self.screen {
                        println!("{} {}", session.partner().avatar, message.text);
                    }
                }
                Event::Eof => break,
            }
            eprint!("> ");
        }

        tracing::info!("Goodbye");
        Ok(())
    }

    // ── Screen entry ────────────────────────────────────────────────

    async fn enter(&mut self, route: Route) -> anyhow::Result<()> {
        tracing::debug!(route = %route, "Entering screen");
        // Leaving a screen drops it, which cancels any timers it owns.
        self.screen = Screen::NotFound;

        self.screen = match route {
            Route::Landing => {
                println!("\n🧠 NeuroMatch\nConnect through how you think, not how you look.");
                println!("  1. Get started");
                if self.records.profile().await?.is_registered() {
                    println!("  (already signed up: /go /profile)");
                }
                Screen::Landing
            }
            Route::Signup => {
                println!("\nCreate your anonymous profile");
                println!(
                    "Pick an avatar by number (1-{}), then type your pseudonym:",
                    AVATARS.len()
                );
                let avatars: Vec<String> = AVATARS
                    .iter()
                    .enumerate()
                    .map(|(i, a)| format!("{}.{a}", i + 1))
                    .collect();
                println!("  {}", avatars.join("  "));
                Screen::Signup { avatar: None }
            }
            Route::Quiz => {
                let quiz = QuizScreen::start(self.records.clone(), self.navigator.clone())?;
                show_question(quiz.view());
                Screen::Quiz(quiz)
            }
            Route::Processing => {
                println!("\nAnalyzing your responses...");
                let screen =
                    ProcessingScreen::open(self.navigator.clone(), self.config.processing_delay);
                for step in screen.steps() {
                    println!("  • {step}");
                }
                Screen::Processing { _timer: screen }
            }
            Route::Profile => {
                let dashboard = Dashboard::new(
                    self.records.profile().await?,
                    &self.records.quiz_answers().await?,
                    self.records.last_checkin().await?,
                );
                println!("\n{}", dashboard.render());
                println!("  /go /matches   /go /daily   /go /settings");
                Screen::Profile
            }
            Route::Matches => {
                let stats = summary();
                println!(
                    "\nYour Matches ({} found, top compatibility {}%)",
                    stats.total, stats.highest_compatibility
                );
                for (i, m) in all_matches().iter().enumerate() {
                    let online = if m.is_online() { " ●" } else { "" };
                    println!(
                        "  {}. {} {} {}% [{}]{online}\n     {}\n     {} | {}",
                        i + 1,
                        m.avatar,
                        m.pseudonym,
                        m.compatibility,
                        m.match_type,
                        m.traits.join(", "),
                        m.preview,
                        m.last_active
                    );
                }
                println!("Pick a match to chat.");
                Screen::Matches
            }
            Route::Chat(id) => {
                let user = self.records.profile().await?;
                match open_chat(&id, &user, ReplyWindow::from_config(&self.config)) {
                    ChatView::Active(session) => {
                        let partner = session.partner();
                        println!("\nChat with {} {}", partner.avatar, partner.pseudonym);
                        for message in session.messages().await {
                            println!("{} {}", partner.avatar, message.text);
                        }
                        println!("Conversation starters:");
                        for (i, starter) in session.starters().iter().enumerate() {
                            println!("  {}. {starter}", i + 1);
                        }
                        let feed = session.subscribe();
                        Screen::Chat { session, feed }
                    }
                    ChatView::NotFound { id } => {
                        println!("\nMatch not found ({id}). /go /matches");
                        Screen::ChatNotFound
                    }
                }
            }
            Route::Daily => {
                let checkin = DailyCheckIn::start(self.records.clone())?;
                show_question(checkin.view());
                Screen::Daily(checkin)
            }
            Route::Settings => {
                let profile = self.records.profile().await?;
                let prefs = self.account.preferences();
                println!("\nSettings");
                println!("  Pseudonym: {} (type a new one to rename)", profile.display_name());
                println!("  /toggle 1  Match visibility: {}", on_off(prefs.match_visibility));
                println!("  /toggle 2  Data processing: {}", on_off(prefs.data_processing));
                println!(
                    "  /toggle 3  New match notifications: {}",
                    on_off(prefs.new_match_notifications)
                );
                println!("  /export   /delete");
                Screen::Settings {
                    confirm_delete: false,
                }
            }
            Route::NotFound => {
                println!("\n404: nothing here. /go /");
                Screen::NotFound
            }
        };
        Ok(())
    }

    // ── Input handling ──────────────────────────────────────────────

    /// Act on `command` for the current screen. `line` is the input as
    /// typed; screens that take free text fall back to it when a command
    /// has no meaning there.
    async fn handle(&mut self, command: Command, line: &str) -> anyhow::Result<()> {
        let line = line.trim();
        match command {
            Command::Help => {
                println!("{HELP}");
                return Ok(());
            }
            Command::Go(route) => {
                self.navigator.navigate(route);
                return Ok(());
            }
            _ => {}
        }

        match (&mut self.screen, command) {
            (Screen::Landing, Command::Pick(0) | Command::Next) => {
                self.navigator.navigate(Route::Signup);
            }
            (Screen::Signup { avatar }, Command::Pick(i)) if i < AVATARS.len() => {
                let a = AVATARS[i];
                *avatar = Some(a);
                println!("Avatar: {a}");
            }
            (
                Screen::Signup { avatar },
                Command::Pick(_) | Command::Next | Command::Previous | Command::Text(_),
            ) => {
                let avatar = *avatar;
                self.account.signup(line, avatar).await?;
            }
            (Screen::Quiz(quiz), command) => {
                match command {
                    Command::Pick(i) => quiz.select_option(i)?,
                    Command::Next => {
                        quiz.next().await?;
                    }
                    Command::Previous => {
                        quiz.previous()?;
                    }
                    _ => return Ok(()),
                }
                if let Some(view) = quiz.view() {
                    println!("\n{}", view.render());
                }
            }
            (Screen::Daily(checkin), command) => {
                match command {
                    Command::Pick(i) => checkin.select_option(i)?,
                    Command::Next => {
                        checkin.next().await?;
                    }
                    _ => return Ok(()),
                }
                match checkin.state() {
                    CheckInState::Asking => show_question(checkin.view()),
                    CheckInState::Complete(summary) => println!("\n{}", summary.render()),
                }
            }
            (Screen::Matches, Command::Pick(i)) => {
                if let Some(m) = all_matches().get(i) {
                    self.navigator.navigate(Route::Chat(m.id.to_string()));
                }
            }
            (Screen::Chat { session, .. }, Command::Pick(i))
                if session.starters_visible() && i < session.starters().len() =>
            {
                if let Some(sent) = session.send_starter(i).await {
                    println!("{} {}", session.user_avatar(), sent.text);
                }
            }
            (
                Screen::Chat { session, .. },
                Command::Pick(_) | Command::Next | Command::Previous | Command::Text(_),
            ) => {
                if let Some(sent) = session.send_message(line).await {
                    println!("{} {}", session.user_avatar(), sent.text);
                }
            }
            (Screen::Settings { confirm_delete }, command) => {
                // Whatever follows the delete prompt answers it.
                if std::mem::take(confirm_delete) {
                    let confirmed = matches!(line.to_lowercase().as_str(), "y" | "yes");
                    if !self.account.delete_account(confirmed).await? {
                        println!("Account kept.");
                    }
                    return Ok(());
                }
                match command {
                    Command::Delete => {
                        println!("This permanently deletes all your data. Type yes to confirm.");
                        *confirm_delete = true;
                    }
                    Command::Export => export_to_file(&self.account, &self.config).await?,
                    Command::Toggle(i) => {
                        let which = match i {
                            0 => Preference::MatchVisibility,
                            1 => Preference::DataProcessing,
                            2 => Preference::NewMatchNotifications,
                            _ => return Ok(()),
                        };
                        let value = self.account.toggle_preference(which);
                        println!("{which:?}: {}", on_off(value));
                    }
                    Command::Pick(_) | Command::Next | Command::Previous | Command::Text(_) => {
                        let profile = self.account.save_pseudonym(line).await?;
                        println!("Saved. Hello, {}!", profile.display_name());
                    }
                    _ => {}
                }
            }
            (_, Command::Export) => export_to_file(&self.account, &self.config).await?,
            _ => println!("(nothing to do here, /help for commands)"),
        }
        Ok(())
    }
}

/// Write the export bundle to the configured file name.
async fn export_to_file(account: &Account, config: &AppConfig) -> anyhow::Result<()> {
    let json = account.export_data().await?.to_pretty_json()?;
    let path = &config.export_file_name;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("writing export to {path}"))?;
    tracing::info!(path = %path, "Data exported");
    println!("Exported to {path}");
    Ok(())
}

/// Next match reply on the chat screen; never resolves elsewhere.
async fn next_reply(screen: &mut Screen) -> Option<ChatMessage> {
    let Screen::Chat { feed, .. } = screen else {
        return std::future::pending().await;
    };
    loop {
        match feed.recv().await {
            Ok(message) if message.sender == Sender::Match => return Some(message),
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Chat feed lagged");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

fn show_question(view: Option<QuestionView>) {
    if let Some(view) = view {
        println!("\n{}", view.render());
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::LibSqlStore;

    async fn app() -> App {
        let records = Records::new(Arc::new(LibSqlStore::new_memory().await.unwrap()));
        App::new(AppConfig::default(), records)
    }

    async fn type_line(app: &mut App, line: &str) {
        let command = Command::parse(line).unwrap();
        app.handle(command, line).await.unwrap();
    }

    async fn user_messages(app: &App) -> Vec<String> {
        let Screen::Chat { session, .. } = &app.screen else {
            panic!("not on the chat screen");
        };
        session
            .messages()
            .await
            .into_iter()
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.text)
            .collect()
    }

    #[tokio::test]
    async fn chat_sends_command_like_text_verbatim() {
        let mut app = app().await;
        app.enter(Route::Chat("1".to_string())).await.unwrap();

        type_line(&mut app, "2").await;
        for line in ["hello", "42", "next", "p", "3"] {
            type_line(&mut app, line).await;
        }
        assert_eq!(
            user_messages(&app).await,
            vec![
                crate::chat::CONVERSATION_STARTERS[1],
                "hello",
                "42",
                "next",
                "p",
                "3"
            ]
        );
    }

    #[tokio::test]
    async fn signup_accepts_command_like_pseudonym() {
        let mut app = app().await;
        app.enter(Route::Signup).await.unwrap();
        type_line(&mut app, "8").await;
        type_line(&mut app, "42").await;

        let profile = app.records.profile().await.unwrap();
        assert_eq!(profile.pseudonym, "42");
        assert_eq!(profile.avatar, AVATARS[7]);
        assert_eq!(app.routes.try_recv().ok(), Some(Route::Quiz));
    }

    #[tokio::test]
    async fn settings_rename_and_declined_delete() {
        let mut app = app().await;
        app.account.signup("Quill", None).await.unwrap();
        app.enter(Route::Settings).await.unwrap();

        type_line(&mut app, "n").await;
        assert_eq!(app.records.profile().await.unwrap().pseudonym, "n");

        type_line(&mut app, "/delete").await;
        type_line(&mut app, "no").await;
        assert!(app.records.profile().await.unwrap().is_registered());
        type_line(&mut app, "/delete").await;
        type_line(&mut app, "yes").await;
        assert!(!app.records.profile().await.unwrap().is_registered());
    }

    #[test]
    fn parses_navigation_and_picks() {
        assert_eq!(Command::parse("  "), None);
        assert_eq!(Command::parse("3"), Some(Command::Pick(2)));
        assert_eq!(Command::parse("0"), Some(Command::Text("0".into())));
        assert_eq!(Command::parse("n"), Some(Command::Next));
        assert_eq!(Command::parse("prev"), Some(Command::Previous));
        assert_eq!(
            Command::parse("/go /chat/2"),
            Some(Command::Go(Route::Chat("2".into())))
        );
        assert_eq!(Command::parse("/go /nowhere"), Some(Command::Go(Route::NotFound)));
    }

    #[test]
    fn parses_settings_commands() {
        assert_eq!(Command::parse("/export"), Some(Command::Export));
        assert_eq!(Command::parse("/delete"), Some(Command::Delete));
        assert_eq!(Command::parse("/toggle 2"), Some(Command::Toggle(1)));
        assert_eq!(Command::parse("/quit"), Some(Command::Quit));
        assert_eq!(
            Command::parse("/shrug hi"),
            Some(Command::Text("/shrug hi".into()))
        );
    }

    #[test]
    fn free_text_is_kept_trimmed() {
        assert_eq!(
            Command::parse("  hello there "),
            Some(Command::Text("hello there".into()))
        );
    }
}
