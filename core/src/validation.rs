//! Free-text answer validation.
//!
//! Validation only gates whether the advance affordance is enabled. It never
//! blocks the engine from storing an answer once advance is invoked.

use crate::answer::AnswerInput;
use crate::model::Question;
use regex::Regex;
use thiserror::Error;

/// Inline message shown under a non-empty answer that fails its pattern.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input.";

#[derive(Debug, Error)]
#[error("invalid answer pattern `{pattern}`: {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    source: regex::Error,
}

/// A compiled answer pattern. Matches the whole input, never a substring.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Whether the current input may be submitted with an advance action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Unanswered,
    /// Non-empty text that does not match the question's pattern.
    Invalid,
}

impl Readiness {
    pub fn can_advance(self) -> bool {
        self == Readiness::Ready
    }

    pub fn message(self) -> Option<&'static str> {
        match self {
            Readiness::Invalid => Some(INVALID_INPUT_MESSAGE),
            _ => None,
        }
    }
}

/// Validation rules of one question, compiled once per question.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    pattern: Option<Pattern>,
}

impl Validator {
    /// Compile the question's pattern. An uncompilable pattern is logged and
    /// then accepts everything, so a bad catalog never locks the user in.
    pub fn for_question(question: &Question) -> Self {
        if !question.kind.is_text() {
            return Self::default();
        }

        let pattern = match question.pattern.as_deref() {
            None | Some("") => None,
            Some(raw) => match Pattern::compile(raw) {
                Ok(pattern) => Some(pattern),
                Err(error) => {
                    tracing::warn!(question = %question.id, %error, "Ignoring answer pattern");
                    None
                }
            },
        };

        Self { pattern }
    }

    pub fn accepts(&self, text: &str) -> bool {
        self.pattern.as_ref().is_none_or(|p| p.matches(text))
    }

    pub fn readiness(&self, input: &AnswerInput) -> Readiness {
        if let AnswerInput::Text(text) = input {
            if !text.is_empty() && !self.accepts(text) {
                return Readiness::Invalid;
            }
        }

        if input.is_answered() {
            Readiness::Ready
        } else {
            Readiness::Unanswered
        }
    }
}

/// One-shot readiness check. Prefer a cached [`Validator`] per question when
/// checking on every keystroke.
pub fn readiness(question: &Question, input: &AnswerInput) -> Readiness {
    Validator::for_question(question).readiness(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn text_question(pattern: &str) -> Question {
        Question::new("q", QuestionKind::TextInput).with_pattern(pattern)
    }

    #[test]
    fn test_pattern_matches_whole_input() {
        let pattern = Pattern::compile("[0-9]+").unwrap();
        assert!(pattern.matches("123"));
        assert!(!pattern.matches("12a"));
        assert!(!pattern.matches("a12"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_group() {
        let pattern = Pattern::compile("yes|no").unwrap();
        assert!(pattern.matches("no"));
        assert!(!pattern.matches("yesno"));
        assert!(!pattern.matches("nope"));
    }

    #[test]
    fn test_readiness_states() {
        let question = text_question("[0-9]{3}");
        let validator = Validator::for_question(&question);

        assert_eq!(validator.readiness(&AnswerInput::Text(String::new())), Readiness::Unanswered);
        assert_eq!(validator.readiness(&AnswerInput::Text("12".into())), Readiness::Invalid);
        assert_eq!(validator.readiness(&AnswerInput::Text("123".into())), Readiness::Ready);
        assert_eq!(Readiness::Invalid.message(), Some(INVALID_INPUT_MESSAGE));
    }

    #[test]
    fn test_empty_or_missing_pattern_accepts() {
        let question = Question::new("q", QuestionKind::NumberInput).with_pattern("");
        assert!(Validator::for_question(&question).accepts("anything"));
        let question = Question::new("q", QuestionKind::TextInput);
        assert!(Validator::for_question(&question).accepts("anything"));
    }

    #[test]
    fn test_invalid_pattern_does_not_block() {
        let question = text_question("([unclosed");
        assert!(Pattern::compile("([unclosed").is_err());
        assert_eq!(
            readiness(&question, &AnswerInput::Text("x".into())),
            Readiness::Ready
        );
    }

    #[test]
    fn test_choice_questions_ignore_pattern() {
        let question = Question::new("q", QuestionKind::Radio)
            .with_options(["a", "b"])
            .with_pattern("z");
        assert_eq!(
            readiness(&question, &AnswerInput::Single(Some("a".into()))),
            Readiness::Ready
        );
        assert_eq!(readiness(&question, &AnswerInput::Single(None)), Readiness::Unanswered);
    }
}
