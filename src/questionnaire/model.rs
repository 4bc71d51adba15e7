//! Question definitions and the fixed quiz / daily check-in catalogs.

use serde::{Deserialize, Serialize};

/// What a daily check-in question asks about. Quiz questions carry no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mood,
    Intention,
    Authenticity,
}

/// A single selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl QuestionOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            emoji: None,
        }
    }

    /// Builder: attach an emoji shown next to the label.
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// A single-choice question. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Zero-based position in the questionnaire.
    pub position: usize,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}

/// An ordered, fixed list of questions plus the copy used to present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    pub title: String,
    pub subtitle: String,
    pub questions: Vec<Question>,
    /// Label of the primary button on every question but the last.
    pub next_label: String,
    /// Label of the primary button on the last question.
    pub finish_label: String,
}

impl Questionnaire {
    /// Build a questionnaire, assigning positions in declaration order.
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        questions: Vec<(String, Option<QuestionKind>, Vec<QuestionOption>)>,
    ) -> Self {
        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(position, (prompt, kind, options))| Question {
                position,
                prompt,
                kind,
                options,
            })
            .collect();
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            questions,
            next_label: "Next".to_string(),
            finish_label: "Complete".to_string(),
        }
    }

    /// Builder: set the primary button labels.
    pub fn with_labels(mut self, next: impl Into<String>, finish: impl Into<String>) -> Self {
        self.next_label = next.into();
        self.finish_label = finish.into();
        self
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    /// Option counts per position, in order.
    pub fn option_counts(&self) -> Vec<usize> {
        self.questions.iter().map(Question::option_count).collect()
    }

    /// Share of the questionnaire reached when `position` is on screen.
    ///
    /// The first question already counts as `1/N`, so the last one shows 100.
    pub fn progress_percent(&self, position: usize) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        let shown = (position + 1).min(self.questions.len());
        shown as f64 / self.questions.len() as f64 * 100.0
    }

    /// "Question 2 of 5"
    pub fn position_label(&self, position: usize) -> String {
        format!("Question {} of {}", position + 1, self.questions.len())
    }

    /// Primary button label for the question at `position`.
    pub fn action_label(&self, position: usize) -> &str {
        if position + 1 >= self.questions.len() {
            &self.finish_label
        } else {
            &self.next_label
        }
    }
}

fn plain(prompt: &str, options: [&str; 4]) -> (String, Option<QuestionKind>, Vec<QuestionOption>) {
    (
        prompt.to_string(),
        None,
        options.into_iter().map(QuestionOption::new).collect(),
    )
}

fn with_emoji(
    prompt: &str,
    kind: QuestionKind,
    options: [(&str, &str); 4],
) -> (String, Option<QuestionKind>, Vec<QuestionOption>) {
    (
        prompt.to_string(),
        Some(kind),
        options
            .into_iter()
            .map(|(label, emoji)| QuestionOption::new(label).with_emoji(emoji))
            .collect(),
    )
}

/// The five-question mindprint quiz taken after signup.
pub fn mindprint_quiz() -> Questionnaire {
    Questionnaire::new(
        "Mindprint Quiz",
        "Discover your unique cognitive signature",
        vec![
            plain(
                "When making decisions, I tend to:",
                [
                    "Trust my gut instinct immediately",
                    "Analyze all available data first",
                    "Seek input from others before deciding",
                    "Consider long-term consequences carefully",
                ],
            ),
            plain(
                "In social situations, I feel energized by:",
                [
                    "Large groups and networking events",
                    "Deep one-on-one conversations",
                    "Helping others solve problems",
                    "Sharing creative ideas and projects",
                ],
            ),
            plain(
                "My ideal weekend involves:",
                [
                    "Exploring new places or experiences",
                    "Reading, learning something new",
                    "Spending quality time with loved ones",
                    "Working on personal creative projects",
                ],
            ),
            plain(
                "When facing challenges, I typically:",
                [
                    "Tackle them head-on with determination",
                    "Break them down into smaller steps",
                    "Collaborate with others for solutions",
                    "Look for innovative approaches",
                ],
            ),
            plain(
                "What motivates me most is:",
                [
                    "Achievement and recognition",
                    "Understanding and knowledge",
                    "Connection and relationships",
                    "Creating something meaningful",
                ],
            ),
        ],
    )
    .with_labels("Next", "Complete Quiz")
}

/// The three-question daily check-in.
pub fn daily_checkin() -> Questionnaire {
    Questionnaire::new(
        "Daily Check-in",
        "Keep your mindprint fresh and accurate",
        vec![
            with_emoji(
                "Right now I'm feeling most:",
                QuestionKind::Mood,
                [
                    ("Energized & focused", "⚡"),
                    ("Calm & reflective", "🌙"),
                    ("Creative & inspired", "✨"),
                    ("Social & connected", "💫"),
                ],
            ),
            with_emoji(
                "Today I want to:",
                QuestionKind::Intention,
                [
                    ("Learn something new", "📚"),
                    ("Connect with others", "🤝"),
                    ("Create something beautiful", "🎨"),
                    ("Find inner peace", "🧘"),
                ],
            ),
            with_emoji(
                "I feel most like myself when:",
                QuestionKind::Authenticity,
                [
                    ("Solving complex problems", "🧩"),
                    ("Helping others grow", "🌱"),
                    ("Expressing my creativity", "🎭"),
                    ("Exploring new ideas", "🚀"),
                ],
            ),
        ],
    )
    .with_labels("Next Question", "Complete Check-in")
}
