//! Presentation snapshot of the question currently on screen.

use serde::Serialize;

use super::flow::QuestionnaireFlow;
use super::model::Questionnaire;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub title: String,
    pub position_label: String,
    /// Rounded progress, 0–100.
    pub progress: u8,
    pub prompt: String,
    /// `(label, emoji, selected)` per option.
    pub options: Vec<(String, Option<String>, bool)>,
    pub action_label: String,
    pub can_advance: bool,
    pub can_go_back: bool,
}

impl QuestionView {
    /// Snapshot the flow's current question. `None` once the flow is complete.
    pub fn capture(questionnaire: &Questionnaire, flow: &QuestionnaireFlow) -> Option<Self> {
        let position = flow.position()?;
        let question = questionnaire.question(position)?;
        let selected = flow.selection();
        Some(Self {
            title: questionnaire.title.clone(),
            position_label: questionnaire.position_label(position),
            progress: questionnaire.progress_percent(position).round() as u8,
            prompt: question.prompt.clone(),
            options: question
                .options
                .iter()
                .enumerate()
                .map(|(i, o)| (o.label.clone(), o.emoji.clone(), selected == Some(i)))
                .collect(),
            action_label: questionnaire.action_label(position).to_string(),
            can_advance: flow.can_advance(),
            can_go_back: flow.can_retreat(),
        })
    }

    /// Plain-text rendering used by the CLI.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("{} | {} ({}% complete)", self.title, self.position_label, self.progress),
            String::new(),
            self.prompt.clone(),
        ];
        for (i, (label, emoji, selected)) in self.options.iter().enumerate() {
            let marker = if *selected { "(•)" } else { "( )" };
            match emoji {
                Some(e) => lines.push(format!("  {marker} {}. {e} {label}", i + 1)),
                None => lines.push(format!("  {marker} {}. {label}", i + 1)),
            }
        }
        lines.push(String::new());
        let mut actions = Vec::new();
        if self.can_go_back {
            actions.push("[p] Previous".to_string());
        }
        if self.can_advance {
            actions.push(format!("[n] {}", self.action_label));
        } else {
            actions.push("pick an option (1-N)".to_string());
        }
        lines.push(actions.join("   "));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::flow::FlowConfig;
    use crate::questionnaire::model::{daily_checkin, mindprint_quiz};

    #[test]
    fn capture_reflects_selection_and_navigation() {
        let quiz = mindprint_quiz();
        let mut flow = QuestionnaireFlow::new(FlowConfig::for_questionnaire(&quiz, true)).unwrap();

        let view = QuestionView::capture(&quiz, &flow).unwrap();
        assert_eq!(view.progress, 20);
        assert!(!view.can_advance);
        assert!(!view.can_go_back);
        assert!(view.options.iter().all(|(_, _, s)| !s));

        flow.select_option(2).unwrap();
        flow.advance().unwrap();
        flow.select_option(1).unwrap();
        let view = QuestionView::capture(&quiz, &flow).unwrap();
        assert_eq!(view.position_label, "Question 2 of 5");
        assert!(view.can_advance);
        assert!(view.can_go_back);
        assert!(view.options[1].2);
        assert!(view.render().contains("(•) 2. Deep one-on-one conversations"));
    }

    #[test]
    fn daily_render_includes_emoji() {
        let daily = daily_checkin();
        let flow = QuestionnaireFlow::new(FlowConfig::for_questionnaire(&daily, false)).unwrap();
        let text = QuestionView::capture(&daily, &flow).unwrap().render();
        assert!(text.contains("⚡ Energized & focused"));
        assert!(!text.contains("[p] Previous"));
    }

    #[test]
    fn no_view_after_completion() {
        let daily = daily_checkin();
        let mut flow = QuestionnaireFlow::new(FlowConfig::for_questionnaire(&daily, false)).unwrap();
        for _ in 0..3 {
            flow.select_option(0).unwrap();
            flow.advance().unwrap();
        }
        assert!(QuestionView::capture(&daily, &flow).is_none());
    }
}
