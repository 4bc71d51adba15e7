//! Questionnaire flow engine: linear single-choice progression.
//!
//! A flow walks a fixed list of questions front to back. Each position
//! needs a tentative selection before `advance()` commits it; the last
//! commit completes the flow and hands the ordered answers to the
//! completion callback exactly once. Retreat is opt-in.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::Questionnaire;
use crate::error::FlowError;

/// Where a flow is in its lifecycle.
///
/// `InProgress(p) → InProgress(p+1) → … → Complete`, with
/// `InProgress(p) → InProgress(p-1)` when retreat is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FlowPhase {
    InProgress { position: usize },
    Complete,
}

impl FlowPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress { position } => write!(f, "in_progress({position})"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Committed answers keyed by position.
///
/// Sparse while the flow runs, dense once it completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    answers: BTreeMap<usize, usize>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, position: usize, option: usize) {
        self.answers.insert(position, option);
    }

    pub fn get(&self, position: usize) -> Option<usize> {
        self.answers.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Every position in `0..question_count` has an answer.
    pub fn is_dense(&self, question_count: usize) -> bool {
        (0..question_count).all(|p| self.answers.contains_key(&p))
    }

    /// Answers in position order, or `None` if any position is missing.
    pub fn to_ordered(&self, question_count: usize) -> Option<Vec<usize>> {
        (0..question_count).map(|p| self.get(p)).collect()
    }
}

/// Static shape of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Number of options per question; its length is the question count.
    pub option_counts: Vec<usize>,
    /// Whether `retreat()` may move back a position.
    pub allow_retreat: bool,
}

impl FlowConfig {
    pub fn new(option_counts: Vec<usize>, allow_retreat: bool) -> Self {
        Self {
            option_counts,
            allow_retreat,
        }
    }

    pub fn for_questionnaire(questionnaire: &Questionnaire, allow_retreat: bool) -> Self {
        Self::new(questionnaire.option_counts(), allow_retreat)
    }

    pub fn question_count(&self) -> usize {
        self.option_counts.len()
    }
}

/// What a call to `advance()` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// No selection at the current position; nothing changed.
    Blocked,
    /// Committed and moved to the given position.
    Moved { position: usize },
    /// Committed the last answer; carries the full ordered answer list.
    Completed(Vec<usize>),
}

type CompletionCallback = Box<dyn FnOnce(&[usize]) + Send>;

/// The questionnaire flow engine.
pub struct QuestionnaireFlow {
    config: FlowConfig,
    phase: FlowPhase,
    selection: Option<usize>,
    answers: AnswerSet,
    on_complete: Option<CompletionCallback>,
}

impl QuestionnaireFlow {
    /// Start a flow at position 0 with nothing selected.
    pub fn new(config: FlowConfig) -> Result<Self, FlowError> {
        if config.question_count() == 0 {
            return Err(FlowError::EmptyQuestionnaire);
        }
        Ok(Self {
            config,
            phase: FlowPhase::InProgress { position: 0 },
            selection: None,
            answers: AnswerSet::new(),
            on_complete: None,
        })
    }

    /// Builder: register the callback that receives the ordered answers
    /// when the flow completes.
    pub fn on_complete(mut self, callback: impl FnOnce(&[usize]) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    /// Current position, or `None` once complete.
    pub fn position(&self) -> Option<usize> {
        match self.phase {
            FlowPhase::InProgress { position } => Some(position),
            FlowPhase::Complete => None,
        }
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn question_count(&self) -> usize {
        self.config.question_count()
    }

    pub fn allows_retreat(&self) -> bool {
        self.config.allow_retreat
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn can_advance(&self) -> bool {
        !self.is_complete() && self.selection.is_some()
    }

    /// The ordered answers `advance()` would complete with right now.
    ///
    /// `Some` only on the last question with a selection. Lets a caller
    /// persist the answers before the flow becomes terminal.
    pub fn pending_completion(&self) -> Option<Vec<usize>> {
        let position = self.position()?;
        let option = self.selection?;
        if position + 1 != self.config.question_count() {
            return None;
        }
        let mut answers = self.answers.clone();
        answers.record(position, option);
        answers.to_ordered(self.config.question_count())
    }

    pub fn can_retreat(&self) -> bool {
        self.config.allow_retreat && matches!(self.position(), Some(p) if p > 0)
    }

    /// Record `option` as the tentative selection for the current position.
    ///
    /// Repeated calls overwrite; only the last one is committed.
    pub fn select_option(&mut self, option: usize) -> Result<(), FlowError> {
        let position = self.position().ok_or(FlowError::AlreadyComplete)?;
        let option_count = self.config.option_counts[position];
        if option >= option_count {
            return Err(FlowError::InvalidSelection {
                index: option,
                option_count,
            });
        }
        self.selection = Some(option);
        Ok(())
    }

    /// Commit the tentative selection and move forward.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, FlowError> {
        let position = self.position().ok_or(FlowError::AlreadyComplete)?;
        let Some(option) = self.selection else {
            tracing::debug!(position, "Advance blocked: no selection");
            return Ok(AdvanceOutcome::Blocked);
        };

        self.answers.record(position, option);

        let last = self.config.question_count() - 1;
        if position < last {
            let next = position + 1;
            self.phase = FlowPhase::InProgress { position: next };
            // Revisiting an answered position (after a retreat) restores it.
            self.selection = if self.config.allow_retreat {
                self.answers.get(next)
            } else {
                None
            };
            return Ok(AdvanceOutcome::Moved { position: next });
        }

        self.phase = FlowPhase::Complete;
        self.selection = None;
        let ordered = self
            .answers
            .to_ordered(self.config.question_count())
            .unwrap_or_default();
        tracing::info!(answers = ?ordered, "Questionnaire flow complete");
        if let Some(callback) = self.on_complete.take() {
            callback(&ordered);
        }
        Ok(AdvanceOutcome::Completed(ordered))
    }

    /// Step back one position, restoring the answer recorded there.
    ///
    /// Returns `Ok(false)` when nothing moved: at position 0, or when the
    /// flow does not allow retreat.
    pub fn retreat(&mut self) -> Result<bool, FlowError> {
        let position = self.position().ok_or(FlowError::AlreadyComplete)?;
        if !self.config.allow_retreat || position == 0 {
            return Ok(false);
        }
        let previous = position - 1;
        self.phase = FlowPhase::InProgress { position: previous };
        self.selection = self.answers.get(previous);
        Ok(true)
    }
}

impl fmt::Debug for QuestionnaireFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionnaireFlow")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("selection", &self.selection)
            .field("answers", &self.answers)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn flow(counts: &[usize], allow_retreat: bool) -> QuestionnaireFlow {
        QuestionnaireFlow::new(FlowConfig::new(counts.to_vec(), allow_retreat)).unwrap()
    }

    #[test]
    fn empty_questionnaire_is_rejected() {
        let err = QuestionnaireFlow::new(FlowConfig::new(vec![], true)).unwrap_err();
        assert_eq!(err, FlowError::EmptyQuestionnaire);
    }

    #[test]
    fn advance_without_selection_changes_nothing() {
        let mut f = flow(&[4, 4, 4], false);
        for _ in 0..3 {
            assert_eq!(f.advance().unwrap(), AdvanceOutcome::Blocked);
        }
        assert_eq!(f.position(), Some(0));
        assert!(f.answers().is_empty());

        // Also holds mid-flow.
        f.select_option(2).unwrap();
        f.advance().unwrap();
        let before = f.answers().clone();
        assert_eq!(f.advance().unwrap(), AdvanceOutcome::Blocked);
        assert_eq!(f.position(), Some(1));
        assert_eq!(f.answers(), &before);
    }

    #[test]
    fn last_selection_wins() {
        let mut f = flow(&[4, 2], false);
        f.select_option(0).unwrap();
        f.select_option(3).unwrap();
        f.select_option(1).unwrap();
        f.advance().unwrap();
        assert_eq!(f.answers().get(0), Some(1));
    }

    #[test]
    fn out_of_range_selection_is_rejected_and_keeps_previous() {
        let mut f = flow(&[2, 4], false);
        f.select_option(1).unwrap();
        let err = f.select_option(2).unwrap_err();
        assert_eq!(
            err,
            FlowError::InvalidSelection {
                index: 2,
                option_count: 2
            }
        );
        assert_eq!(f.selection(), Some(1));
    }

    #[test]
    fn quiz_scenario_emits_ordered_answers() {
        let emitted: Arc<Mutex<Vec<Vec<usize>>>> = Arc::default();
        let sink = Arc::clone(&emitted);
        let mut f = flow(&[4; 5], true).on_complete(move |answers| {
            sink.lock().unwrap().push(answers.to_vec());
        });

        let picks = [1, 0, 3, 2, 0];
        let mut last = None;
        for pick in picks {
            f.select_option(pick).unwrap();
            last = Some(f.advance().unwrap());
        }

        assert_eq!(last, Some(AdvanceOutcome::Completed(vec![1, 0, 3, 2, 0])));
        assert_eq!(f.phase(), FlowPhase::Complete);
        assert_eq!(*emitted.lock().unwrap(), vec![vec![1, 0, 3, 2, 0]]);
    }

    #[test]
    fn completion_fires_once_and_freezes_state() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mut f = flow(&[3, 3, 3], false).on_complete(move |answers| {
            assert_eq!(answers.len(), 3);
            *counter.lock().unwrap() += 1;
        });

        for pick in [0, 2, 1] {
            f.select_option(pick).unwrap();
            f.advance().unwrap();
        }
        assert!(f.is_complete());
        assert!(f.answers().is_dense(3));

        assert_eq!(f.advance().unwrap_err(), FlowError::AlreadyComplete);
        assert_eq!(f.select_option(0).unwrap_err(), FlowError::AlreadyComplete);
        assert_eq!(f.retreat().unwrap_err(), FlowError::AlreadyComplete);
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(f.answers().to_ordered(3), Some(vec![0, 2, 1]));
    }

    #[test]
    fn retreat_at_start_is_noop() {
        let mut f = flow(&[4, 4], true);
        f.select_option(3).unwrap();
        assert!(!f.retreat().unwrap());
        assert_eq!(f.position(), Some(0));
        assert_eq!(f.selection(), Some(3));
    }

    #[test]
    fn retreat_rehydrates_previous_answer() {
        let mut f = flow(&[4, 4, 4], true);
        f.select_option(0).unwrap();
        f.advance().unwrap();
        assert_eq!(f.selection(), None);

        f.select_option(2).unwrap();
        assert!(f.retreat().unwrap());
        assert_eq!(f.position(), Some(0));
        // Option 0 is a real answer and must come back.
        assert_eq!(f.selection(), Some(0));

        // Position 1 was never committed, so it starts empty again.
        f.advance().unwrap();
        assert_eq!(f.position(), Some(1));
        assert_eq!(f.selection(), None);
    }

    #[test]
    fn advancing_onto_answered_position_restores_it() {
        let mut f = flow(&[4, 4, 4], true);
        f.select_option(1).unwrap();
        f.advance().unwrap();
        f.select_option(3).unwrap();
        f.advance().unwrap();

        f.retreat().unwrap();
        f.retreat().unwrap();
        assert_eq!(f.selection(), Some(1));
        f.advance().unwrap();
        assert_eq!(f.position(), Some(1));
        assert_eq!(f.selection(), Some(3));
    }

    #[test]
    fn forward_only_flow_ignores_retreat() {
        let mut f = flow(&[4, 4, 4], false);
        f.select_option(1).unwrap();
        f.advance().unwrap();
        assert!(!f.can_retreat());
        assert!(!f.retreat().unwrap());
        assert_eq!(f.position(), Some(1));
    }

    #[test]
    fn every_completed_answer_is_in_range() {
        let counts = [2, 3, 4, 2];
        let mut f = flow(&counts, true);
        let mut completed = None;
        for (pos, count) in counts.iter().enumerate() {
            f.select_option(count - 1).unwrap();
            if let AdvanceOutcome::Completed(a) = f.advance().unwrap() {
                assert_eq!(pos, counts.len() - 1);
                completed = Some(a);
            }
        }
        let answers = completed.unwrap();
        assert_eq!(answers.len(), counts.len());
        for (answer, count) in answers.iter().zip(counts) {
            assert!(*answer < count);
        }
    }

    #[test]
    fn pending_completion_matches_advance() {
        let mut f = flow(&[2, 2], true);
        assert_eq!(f.pending_completion(), None);
        f.select_option(1).unwrap();
        assert_eq!(f.pending_completion(), None);
        f.advance().unwrap();
        assert_eq!(f.pending_completion(), None);
        f.select_option(0).unwrap();
        assert_eq!(f.pending_completion(), Some(vec![1, 0]));
        assert!(!f.is_complete());
        assert_eq!(f.advance().unwrap(), AdvanceOutcome::Completed(vec![1, 0]));
        assert_eq!(f.pending_completion(), None);
    }

    #[test]
    fn phase_display_and_serde() {
        assert_eq!(FlowPhase::InProgress { position: 2 }.to_string(), "in_progress(2)");
        assert_eq!(FlowPhase::Complete.to_string(), "complete");
        let json = serde_json::to_value(FlowPhase::InProgress { position: 1 }).unwrap();
        assert_eq!(json["phase"], "in_progress");
        assert_eq!(json["position"], 1);
    }
}
