//! Catalog lint.
//!
//! Reports every defect the navigation engine would silently recover from at
//! runtime, plus a few authoring mistakes. Linting is read-only and has no
//! influence on how a session navigates.

use crate::model::{Catalog, QuestionId, Target};
use crate::schematic::EdgeKind;
use crate::validation::Pattern;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    EmptyCatalog,
    DuplicateId,
    DanglingTarget { edge: EdgeKind, target: QuestionId },
    SelfLoop { edge: EdgeKind },
    InvalidPattern { message: String },
    MissingOptions,
    UnsupportedKind { tag: String },
    Unreachable,
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::UnsupportedKind { .. } | FindingKind::Unreachable => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingKind::EmptyCatalog => f.write_str("catalog has no questions"),
            FindingKind::DuplicateId => f.write_str("duplicate id, later definition is never used"),
            FindingKind::DanglingTarget { edge, target } => {
                write!(f, "{} target `{target}` does not exist", edge.label())
            }
            FindingKind::SelfLoop { edge } => write!(f, "{} points at itself", edge.label()),
            FindingKind::InvalidPattern { message } => write!(f, "{message}"),
            FindingKind::MissingOptions => f.write_str("choice question has no options"),
            FindingKind::UnsupportedKind { tag } => write!(f, "unsupported question type `{tag}`"),
            FindingKind::Unreachable => f.write_str("not reachable from the first question"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub question_id: Option<QuestionId>,
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: FindingKind,
}

impl Finding {
    fn new(question_id: Option<&str>, kind: FindingKind) -> Self {
        Self {
            question_id: question_id.map(str::to_string),
            severity: kind.severity(),
            kind,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.question_id {
            Some(id) => write!(f, "{level}: question `{id}`: {}", self.kind),
            None => write!(f, "{level}: {}", self.kind),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub findings: Vec<Finding>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    pub fn for_question<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings
            .iter()
            .filter(move |f| f.question_id.as_deref() == Some(id))
    }
}

pub fn lint(catalog: &Catalog) -> LintReport {
    let mut report = LintReport::default();
    if catalog.is_empty() {
        report.findings.push(Finding::new(None, FindingKind::EmptyCatalog));
        return report;
    }

    let mut seen = HashSet::new();
    let mut duplicates = HashSet::new();

    for (position, question) in catalog.iter().enumerate() {
        let id = question.id.as_str();
        if !seen.insert(id) {
            duplicates.insert(position);
            report.findings.push(Finding::new(Some(id), FindingKind::DuplicateId));
            continue;
        }

        let edges = std::iter::once((EdgeKind::Refer, &question.refer_to))
            .chain(question.skip.iter().map(|t| (EdgeKind::Skip, t)));
        for (edge, target) in edges {
            let Target::Question(target) = target else {
                continue;
            };
            if target == id {
                report.findings.push(Finding::new(Some(id), FindingKind::SelfLoop { edge }));
            } else if !catalog.contains(target) {
                report.findings.push(Finding::new(
                    Some(id),
                    FindingKind::DanglingTarget {
                        edge,
                        target: target.clone(),
                    },
                ));
            }
        }

        if question.kind.is_text() {
            if let Some(raw) = question.pattern.as_deref().filter(|p| !p.is_empty()) {
                if let Err(error) = Pattern::compile(raw) {
                    report.findings.push(Finding::new(
                        Some(id),
                        FindingKind::InvalidPattern {
                            message: error.to_string(),
                        },
                    ));
                }
            }
        }

        if question.kind.is_choice() && question.options.is_empty() {
            report.findings.push(Finding::new(Some(id), FindingKind::MissingOptions));
        }

        if !question.kind.is_supported() {
            report.findings.push(Finding::new(
                Some(id),
                FindingKind::UnsupportedKind {
                    tag: question.kind.to_string(),
                },
            ));
        }
    }

    let reachable = reachable_from_first(catalog);
    for (position, question) in catalog.iter().enumerate() {
        if !reachable.contains(&position) && !duplicates.contains(&position) {
            report
                .findings
                .push(Finding::new(Some(&question.id), FindingKind::Unreachable));
        }
    }

    report
}

/// Positions reachable from the first question over refer and skip edges.
fn reachable_from_first(catalog: &Catalog) -> HashSet<usize> {
    let mut visited = HashSet::from([0]);
    let mut queue = VecDeque::from([0]);

    while let Some(position) = queue.pop_front() {
        let question = &catalog.questions()[position];
        let targets = std::iter::once(&question.refer_to).chain(question.skip.iter());
        for target in targets {
            if let Some(next) = target.question_id().and_then(|id| catalog.position(id)) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    visited
}
