//! # Navigation: one hop per user action
//!
//! The engine resolves targets lazily. It never checks the reachability of the
//! whole catalog up front; a malformed target is discovered when a user action
//! follows it, and the form is then submitted with whatever was collected.
//!
//! * `referTo` / `skip` equal to the submit sentinel ends the form.
//! * A target equal to the current question's own id is a loop and also ends
//!   the form.
//! * A target missing from the catalog ends the form.

use crate::answer::AnswerSet;
use crate::model::{Catalog, Question, Target};
use crate::outcome::{Outcome, SubmitReason};
use std::sync::Arc;

/// Where a single hop lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hop {
    /// Index of the next question in catalog order.
    Question(usize),
    Submit(SubmitReason),
}

/// Resolve `target` as seen from the question `current_id`.
pub fn resolve(catalog: &Catalog, current_id: &str, target: &Target) -> Hop {
    match target {
        Target::Submit => Hop::Submit(SubmitReason::Sentinel),
        Target::Question(id) if id == current_id => {
            tracing::warn!(question = %id, "Navigation loop detected, forcing submit");
            Hop::Submit(SubmitReason::Loop)
        }
        Target::Question(id) => match catalog.position(id) {
            Some(index) => Hop::Question(index),
            None => {
                tracing::warn!(
                    from = %current_id,
                    target = %id,
                    "Navigation target missing from catalog, forcing submit"
                );
                Hop::Submit(SubmitReason::Dangling(id.clone()))
            }
        },
    }
}

/// An immutable snapshot of a form in progress.
///
/// Actions return a new `Progress` (inside an [`Outcome`]) rather than mutating
/// this one. The catalog is shared between snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    catalog: Arc<Catalog>,
    current: usize,
    answers: AnswerSet,
}

impl Progress {
    /// Begin at the first question, or `None` when the catalog is empty.
    pub fn start(catalog: impl Into<Arc<Catalog>>) -> Option<Self> {
        let catalog = catalog.into();
        if catalog.is_empty() {
            return None;
        }
        Some(Self {
            catalog,
            current: 0,
            answers: AnswerSet::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shared_catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn current(&self) -> &Question {
        &self.catalog.questions()[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Record `answer` for `question_id` and follow that question's `referTo`.
    ///
    /// An id that is not in the catalog has no `referTo`, so it submits.
    pub fn advance(&self, question_id: &str, answer: impl Into<String>) -> Outcome {
        let answers = self.answers.with(question_id, answer);
        let target = self
            .catalog
            .get(question_id)
            .map_or(Target::Submit, |q| q.refer_to.clone());

        tracing::debug!(question = %question_id, target = %target, "Advance");
        self.follow(&target, answers)
    }

    /// Follow the current question's skip target.
    ///
    /// Callers must not offer skip on a question without one; if they do, the
    /// action is [`Outcome::Ignored`].
    pub fn skip(&self) -> Outcome {
        let Some(target) = self.current().skip.clone() else {
            tracing::debug!(question = %self.current().id, "Skip ignored, question is not skippable");
            return Outcome::Ignored;
        };

        tracing::debug!(question = %self.current().id, target = %target, "Skip");
        self.follow(&target, self.answers.clone())
    }

    fn follow(&self, target: &Target, answers: AnswerSet) -> Outcome {
        match resolve(&self.catalog, &self.current().id, target) {
            Hop::Question(index) => Outcome::Next(Progress {
                catalog: Arc::clone(&self.catalog),
                current: index,
                answers,
            }),
            Hop::Submit(reason) => Outcome::Submit { answers, reason },
        }
    }
}
