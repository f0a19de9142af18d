use crate::answer::AnswerSet;
use crate::model::QuestionId;
use crate::navigation::Progress;
use std::fmt;

/// The explicit result of one navigation action.
///
/// Every action on a [`Progress`] returns an `Outcome` instead of mutating
/// anything, so the caller can publish the next state as a whole value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Move to another question with the updated answers.
    Next(Progress),

    /// The form is finished; persist `answers`.
    Submit {
        answers: AnswerSet,
        reason: SubmitReason,
    },

    /// The action has no defined transition (skip on a non-skippable question).
    Ignored,
}

impl Outcome {
    pub fn is_submit(&self) -> bool {
        matches!(self, Outcome::Submit { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored)
    }

    pub fn into_progress(self) -> Option<Progress> {
        match self {
            Outcome::Next(progress) => Some(progress),
            _ => None,
        }
    }

    pub fn submitted_answers(&self) -> Option<&AnswerSet> {
        match self {
            Outcome::Submit { answers, .. } => Some(answers),
            _ => None,
        }
    }
}

/// Why navigation ended the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReason {
    /// The target was the submit sentinel (or `referTo` was absent).
    Sentinel,
    /// The target was the current question itself. Submitting is a policy
    /// choice for malformed catalogs, not a normal end of form.
    Loop,
    /// The target id does not exist in the catalog.
    Dangling(QuestionId),
}

impl SubmitReason {
    /// Whether the form ended through recovery from a catalog defect.
    pub fn is_recovery(&self) -> bool {
        !matches!(self, SubmitReason::Sentinel)
    }
}

impl fmt::Display for SubmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitReason::Sentinel => f.write_str("submit"),
            SubmitReason::Loop => f.write_str("navigation loop"),
            SubmitReason::Dangling(id) => write!(f, "dangling target `{id}`"),
        }
    }
}
