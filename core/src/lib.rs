//! # Surveyor Core
//!
//! Transport-agnostic heart of Surveyor: the question catalog and its wire
//! format, answers, free-text validation, and the navigation engine that turns
//! one user action into the next [`UiState`].
//!
//! Fetching catalogs and storing submissions are collaborator contracts
//! ([`FormSource`], [`SubmissionSink`]) implemented by other crates.

pub mod answer;
pub mod lint;
pub mod model;
pub mod navigation;
pub mod outcome;
pub mod schematic;
pub mod sink;
pub mod source;
pub mod state;
pub mod validation;

pub use answer::{AnswerInput, AnswerSet, MULTI_CHOICE_DELIMITER};
pub use lint::{Finding, FindingKind, LintReport, Severity, lint};
pub use model::{
    Catalog, Choice, NO_SKIP_SENTINEL, Question, QuestionId, QuestionKind, SUBMIT_SENTINEL, Target,
};
pub use navigation::{Hop, Progress, resolve};
pub use outcome::{Outcome, SubmitReason};
pub use schematic::Schematic;
pub use sink::{SinkError, SubmissionFeed, SubmissionRecord, SubmissionSink};
pub use source::{FormSource, SourceError};
pub use state::{EMPTY_FORM_MESSAGE, UNKNOWN_ERROR_MESSAGE, UiState};
pub use validation::{INVALID_INPUT_MESSAGE, Pattern, PatternError, Readiness, Validator};

pub mod prelude {
    pub use crate::answer::{AnswerInput, AnswerSet};
    pub use crate::model::{Catalog, Question, QuestionKind, Target};
    pub use crate::navigation::Progress;
    pub use crate::outcome::{Outcome, SubmitReason};
    pub use crate::sink::{SubmissionRecord, SubmissionSink};
    pub use crate::source::FormSource;
    pub use crate::state::UiState;
    pub use crate::validation::{Readiness, Validator};
}
