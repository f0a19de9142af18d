use crate::answer::AnswerSet;
use crate::model::{Catalog, Question};
use crate::navigation::Progress;
use std::sync::Arc;

/// Error text when the fetched catalog has no questions.
pub const EMPTY_FORM_MESSAGE: &str = "Form contains no questions.";

/// Error text when a failure carries no message of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// What the presentation layer renders.
///
/// Only the session runtime produces these values, and it always replaces the
/// whole value on a transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Loading,
    InProgress(Progress),
    Submitted,
    /// Terminal for the session. Carries a human-readable message.
    Error(String),
}

impl UiState {
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            UiState::Error(UNKNOWN_ERROR_MESSAGE.to_string())
        } else {
            UiState::Error(message)
        }
    }

    /// The state right after a successful fetch.
    pub fn from_catalog(catalog: impl Into<Arc<Catalog>>) -> Self {
        match Progress::start(catalog) {
            Some(progress) => UiState::InProgress(progress),
            None => UiState::error(EMPTY_FORM_MESSAGE),
        }
    }

    pub fn progress(&self) -> Option<&Progress> {
        match self {
            UiState::InProgress(progress) => Some(progress),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.progress().map(Progress::current)
    }

    pub fn answers(&self) -> Option<&AnswerSet> {
        self.progress().map(Progress::answers)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, UiState::InProgress(_))
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, UiState::Submitted)
    }

    /// Whether the state only changes on an explicit restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UiState::Error(_))
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            UiState::Loading => "loading",
            UiState::InProgress(_) => "in_progress",
            UiState::Submitted => "submitted",
            UiState::Error(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    #[test]
    fn test_empty_catalog_is_error() {
        let state = UiState::from_catalog(Catalog::default());
        assert_eq!(state.error_message(), Some(EMPTY_FORM_MESSAGE));
        assert!(state.is_terminal());
    }

    #[test]
    fn test_catalog_starts_at_first_question() {
        let catalog = Catalog::new(vec![
            Question::new("first", QuestionKind::TextInput),
            Question::new("second", QuestionKind::TextInput),
        ]);
        let state = UiState::from_catalog(catalog);
        assert_eq!(state.current_question().map(|q| q.id.as_str()), Some("first"));
        assert_eq!(state.name(), "in_progress");
    }

    #[test]
    fn test_blank_error_gets_default_message() {
        assert_eq!(UiState::error("  ").error_message(), Some(UNKNOWN_ERROR_MESSAGE));
        assert_eq!(UiState::default(), UiState::Loading);
    }
}
