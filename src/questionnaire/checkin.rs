//! Daily check-in screen.
//!
//! A forward-only flow over three emoji questions. Completion stamps the
//! last-check-in record and swaps the question for a summary card; the
//! screen does not navigate on its own.

use chrono::Utc;
use serde::Serialize;

use crate::error::Result;
use crate::navigation::Route;
use crate::store::Records;

use super::flow::{AdvanceOutcome, FlowConfig, QuestionnaireFlow};
use super::model::{Questionnaire, daily_checkin};
use super::view::QuestionView;

/// Copy shown once the check-in is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInSummary {
    pub headline: &'static str,
    pub message: &'static str,
    pub highlights: [&'static str; 2],
    /// `(label, destination)` pairs.
    pub links: Vec<(&'static str, Route)>,
}

impl CheckInSummary {
    fn new() -> Self {
        Self {
            headline: "Daily Check-in Complete!",
            message: "Your responses help us refine your mindprint and find even better matches.",
            highlights: ["+5 data points", "2 new compatible minds"],
            links: vec![("View Matches", Route::Matches), ("See Profile", Route::Profile)],
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("✨ {}", self.headline),
            self.message.to_string(),
            format!("  {}   {}", self.highlights[0], self.highlights[1]),
        ];
        for (label, route) in &self.links {
            lines.push(format!("  {label}: /go {route}"));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInState {
    Asking,
    Complete(CheckInSummary),
}

pub struct DailyCheckIn {
    questionnaire: Questionnaire,
    flow: QuestionnaireFlow,
    records: Records,
    state: CheckInState,
}

impl DailyCheckIn {
    pub fn start(records: Records) -> Result<Self> {
        let questionnaire = daily_checkin();
        let flow = QuestionnaireFlow::new(FlowConfig::for_questionnaire(&questionnaire, false))?;
        Ok(Self {
            questionnaire,
            flow,
            records,
            state: CheckInState::Asking,
        })
    }

    pub fn state(&self) -> &CheckInState {
        &self.state
    }

    pub fn view(&self) -> Option<QuestionView> {
        QuestionView::capture(&self.questionnaire, &self.flow)
    }

    pub fn select_option(&mut self, option: usize) -> Result<()> {
        self.flow.select_option(option)?;
        Ok(())
    }

    /// Commit the current selection. The timestamp is stamped before the
    /// flow completes, so a failed write can be retried.
    pub async fn next(&mut self) -> Result<AdvanceOutcome> {
        let now = Utc::now();
        if self.flow.pending_completion().is_some() {
            self.records.set_last_checkin(now).await?;
        }
        let outcome = self.flow.advance()?;
        if let AdvanceOutcome::Completed(answers) = &outcome {
            tracing::info!(answers = ?answers, at = %now.to_rfc3339(), "Daily check-in complete");
            self.state = CheckInState::Complete(CheckInSummary::new());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::{Error, FlowError};
    use crate::store::LibSqlStore;
    use crate::store::testing::FlakyStore;

    async fn records() -> Records {
        Records::new(Arc::new(LibSqlStore::new_memory().await.unwrap()))
    }

    #[tokio::test]
    async fn completes_and_stamps_last_checkin() {
        let records = records().await;
        let mut checkin = DailyCheckIn::start(records.clone()).unwrap();
        let before = Utc::now();

        checkin.select_option(0).unwrap();
        assert_eq!(
            checkin.next().await.unwrap(),
            AdvanceOutcome::Moved { position: 1 }
        );
        checkin.select_option(2).unwrap();
        checkin.next().await.unwrap();
        checkin.select_option(1).unwrap();
        assert_eq!(
            checkin.next().await.unwrap(),
            AdvanceOutcome::Completed(vec![0, 2, 1])
        );

        let stamped = records.last_checkin().await.unwrap().unwrap();
        assert!(stamped >= before - chrono::Duration::seconds(1));
        assert!(checkin.view().is_none());
        match checkin.state() {
            CheckInState::Complete(summary) => {
                assert_eq!(summary.headline, "Daily Check-in Complete!");
                assert!(summary.render().contains("/go /matches"));
            }
            CheckInState::Asking => panic!("expected summary"),
        }
    }

    #[tokio::test]
    async fn failed_stamp_can_be_retried() {
        let store = FlakyStore::new().await;
        let records = Records::new(store.clone());
        let mut checkin = DailyCheckIn::start(records.clone()).unwrap();
        for choice in [0, 2] {
            checkin.select_option(choice).unwrap();
            checkin.next().await.unwrap();
        }
        checkin.select_option(1).unwrap();

        store.set_failing(true);
        assert!(matches!(checkin.next().await, Err(Error::Store(_))));
        assert_eq!(checkin.state(), &CheckInState::Asking);
        assert!(checkin.view().unwrap().can_advance);
        assert!(records.last_checkin().await.unwrap().is_none());

        store.set_failing(false);
        assert_eq!(
            checkin.next().await.unwrap(),
            AdvanceOutcome::Completed(vec![0, 2, 1])
        );
        assert!(matches!(checkin.state(), CheckInState::Complete(_)));
        assert!(records.last_checkin().await.unwrap().is_some());
    }

    #[test]
    fn summary_serializes_links_as_paths() {
        let json = serde_json::to_value(CheckInSummary::new()).unwrap();
        assert_eq!(json["links"][0], serde_json::json!(["View Matches", "/matches"]));
        assert_eq!(json["links"][1][1], "/profile");
    }

    #[tokio::test]
    async fn forward_only_starts_each_question_empty() {
        let mut checkin = DailyCheckIn::start(records().await).unwrap();
        checkin.select_option(3).unwrap();
        checkin.next().await.unwrap();

        let view = checkin.view().unwrap();
        assert!(!view.can_go_back);
        assert!(!view.can_advance);
        assert!(view.options.iter().all(|(_, _, s)| !s));
    }

    #[tokio::test]
    async fn no_changes_after_completion() {
        let records = records().await;
        let mut checkin = DailyCheckIn::start(records.clone()).unwrap();
        for _ in 0..3 {
            checkin.select_option(1).unwrap();
            checkin.next().await.unwrap();
        }
        let stamped = records.last_checkin().await.unwrap();

        assert!(matches!(
            checkin.select_option(0),
            Err(Error::Flow(FlowError::AlreadyComplete))
        ));
        assert!(checkin.next().await.is_err());
        assert_eq!(records.last_checkin().await.unwrap(), stamped);
    }
}
