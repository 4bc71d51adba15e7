//! Mindprint quiz screen.
//!
//! Drives a retreat-enabled flow over the quiz catalog. When the last
//! answer is committed the ordered answers are written to the store and
//! the app moves on to the processing screen.

use crate::error::Result;
use crate::navigation::{Navigator, Route};
use crate::store::Records;

use super::flow::{AdvanceOutcome, FlowConfig, QuestionnaireFlow};
use super::model::{Questionnaire, mindprint_quiz};
use super::view::QuestionView;

pub struct QuizScreen {
    questionnaire: Questionnaire,
    flow: QuestionnaireFlow,
    records: Records,
    navigator: Navigator,
}

impl QuizScreen {
    /// Start the quiz from its first question.
    pub fn start(records: Records, navigator: Navigator) -> Result<Self> {
        Self::with_questionnaire(mindprint_quiz(), records, navigator)
    }

    pub fn with_questionnaire(
        questionnaire: Questionnaire,
        records: Records,
        navigator: Navigator,
    ) -> Result<Self> {
        let flow = QuestionnaireFlow::new(FlowConfig::for_questionnaire(&questionnaire, true))?;
        tracing::info!(questions = questionnaire.len(), "Quiz started");
        Ok(Self {
            questionnaire,
            flow,
            records,
            navigator,
        })
    }

    pub fn view(&self) -> Option<QuestionView> {
        QuestionView::capture(&self.questionnaire, &self.flow)
    }

    pub fn flow(&self) -> &QuestionnaireFlow {
        &self.flow
    }

    pub fn select_option(&mut self, option: usize) -> Result<()> {
        self.flow.select_option(option)?;
        Ok(())
    }

    /// Go back one question. `false` when already on the first.
    pub fn previous(&mut self) -> Result<bool> {
        Ok(self.flow.retreat()?)
    }

    /// Commit the current selection and move on.
    ///
    /// The final answers are written before the flow completes. A failed
    /// write leaves the last question open so `next()` can be retried.
    pub async fn next(&mut self) -> Result<AdvanceOutcome> {
        if let Some(answers) = self.flow.pending_completion() {
            self.records.set_quiz_answers(&answers).await?;
        }
        let outcome = self.flow.advance()?;
        match &outcome {
            AdvanceOutcome::Completed(answers) => {
                tracing::info!(answers = ?answers, "Quiz complete");
                self.navigator.navigate(Route::Processing);
            }
            AdvanceOutcome::Moved { position } => {
                tracing::debug!(position, "Quiz advanced");
            }
            AdvanceOutcome::Blocked => {}
        }
        Ok(outcome)
    }
}
