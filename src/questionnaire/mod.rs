//! Questionnaires: the linear multi-step flow and the two screens built on it.
//!
//! The mindprint quiz and the daily check-in share one engine
//! (`QuestionnaireFlow`) configured with the per-question option counts and
//! whether the user may step back. The screens add persistence and
//! navigation around it.

pub mod checkin;
pub mod flow;
pub mod model;
pub mod quiz;
pub mod view;

pub use checkin::{CheckInState, CheckInSummary, DailyCheckIn};
pub use flow::{AdvanceOutcome, AnswerSet, FlowConfig, FlowPhase, QuestionnaireFlow};
pub use model::{Question, QuestionKind, QuestionOption, Questionnaire, daily_checkin, mindprint_quiz};
pub use quiz::QuizScreen;
pub use view::QuestionView;
