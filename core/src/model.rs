//! Question catalog model and its JSON wire format.
//!
//! The wire format carries two string sentinels. A `referTo` id of `"submit"`
//! ends the form, and a `skip` id of `"-1"` marks a question that cannot be
//! skipped. Both are promoted to [`Target`] on decode and written back verbatim
//! on encode, so a catalog survives a decode/encode cycle unchanged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a question, unique within a catalog.
pub type QuestionId = String;

/// Wire id that ends the form.
pub const SUBMIT_SENTINEL: &str = "submit";

/// Wire id that marks a question as not skippable.
pub const NO_SKIP_SENTINEL: &str = "-1";

/// The input widget a question asks for.
///
/// Unknown tags decode to [`QuestionKind::Other`] rather than failing the whole
/// catalog; the engine still navigates such questions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    TextInput,
    NumberInput,
    Radio,
    MultipleChoice,
    Other(String),
}

impl QuestionKind {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionKind::TextInput => "textInput",
            QuestionKind::NumberInput => "numberInput",
            QuestionKind::Radio => "radio",
            QuestionKind::MultipleChoice => "multipleChoice",
            QuestionKind::Other(tag) => tag,
        }
    }

    /// Free-text kinds, the only ones subject to pattern validation.
    pub fn is_text(&self) -> bool {
        matches!(self, QuestionKind::TextInput | QuestionKind::NumberInput)
    }

    /// Kinds answered by picking from `options`.
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionKind::Radio | QuestionKind::MultipleChoice)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, QuestionKind::Other(_))
    }
}

impl From<String> for QuestionKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "textInput" => QuestionKind::TextInput,
            "numberInput" => QuestionKind::NumberInput,
            "radio" => QuestionKind::Radio,
            "multipleChoice" => QuestionKind::MultipleChoice,
            _ => QuestionKind::Other(tag),
        }
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a navigation action leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Another question in the catalog (which may or may not exist).
    Question(QuestionId),
    /// The end of the form.
    Submit,
}

impl Target {
    /// Decode a wire id, recognising the submit sentinel.
    pub fn from_wire(id: impl Into<String>) -> Self {
        let id = id.into();
        if id == SUBMIT_SENTINEL {
            Target::Submit
        } else {
            Target::Question(id)
        }
    }

    pub fn question(id: impl Into<String>) -> Self {
        Target::Question(id.into())
    }

    pub fn wire_id(&self) -> &str {
        match self {
            Target::Question(id) => id,
            Target::Submit => SUBMIT_SENTINEL,
        }
    }

    pub fn question_id(&self) -> Option<&str> {
        match self {
            Target::Question(id) => Some(id),
            Target::Submit => None,
        }
    }

    pub fn is_submit(&self) -> bool {
        matches!(self, Target::Submit)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

/// A selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
}

impl Choice {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// One question definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuestionWire", into = "QuestionWire")]
pub struct Question {
    pub id: QuestionId,
    pub kind: QuestionKind,
    /// Display label. Absence is a valid state, not an error.
    pub label: Option<String>,
    pub options: Vec<Choice>,
    /// Forward target. An absent `referTo` on the wire means [`Target::Submit`].
    pub refer_to: Target,
    /// Skip target, `None` when the question cannot be skipped.
    pub skip: Option<Target>,
    /// Regular expression a free-text answer must match in full.
    pub pattern: Option<String>,
}

impl Question {
    /// A question that submits on advance and cannot be skipped.
    pub fn new(id: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            options: Vec::new(),
            refer_to: Target::Submit,
            skip: None,
            pattern: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values.into_iter().map(Choice::new).collect();
        self
    }

    pub fn refer_to(mut self, target: Target) -> Self {
        self.refer_to = target;
        self
    }

    pub fn skip_to(mut self, target: Target) -> Self {
        self.skip = Some(target);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn can_skip(&self) -> bool {
        self.skip.is_some()
    }

    /// Whether advancing from this question ends the form.
    pub fn is_last(&self) -> bool {
        self.refer_to.is_submit()
    }
}

#[derive(Serialize, Deserialize)]
struct TargetRef {
    id: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionWire {
    id: String,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<Choice>>,
    #[serde(default)]
    refer_to: Option<TargetRef>,
    #[serde(default)]
    skip: Option<TargetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    regex: Option<String>,
}

impl From<QuestionWire> for Question {
    fn from(wire: QuestionWire) -> Self {
        let skip = wire
            .skip
            .filter(|r| r.id != NO_SKIP_SENTINEL)
            .map(|r| Target::from_wire(r.id));

        Self {
            id: wire.id,
            kind: wire.kind,
            label: wire.label,
            options: wire.options.unwrap_or_default(),
            refer_to: wire
                .refer_to
                .map(|r| Target::from_wire(r.id))
                .unwrap_or(Target::Submit),
            skip,
            pattern: wire.regex,
        }
    }
}

impl From<Question> for QuestionWire {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            kind: question.kind,
            label: question.label,
            options: (!question.options.is_empty()).then_some(question.options),
            refer_to: Some(TargetRef {
                id: question.refer_to.wire_id().to_string(),
            }),
            skip: Some(TargetRef {
                id: question
                    .skip
                    .as_ref()
                    .map_or(NO_SKIP_SENTINEL, Target::wire_id)
                    .to_string(),
            }),
            regex: question.pattern,
        }
    }
}

/// The ordered question list of one form session.
///
/// Lookups by id resolve to the first question carrying that id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CatalogWire", into = "CatalogWire")]
pub struct Catalog {
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

#[derive(Serialize, Deserialize)]
struct CatalogWire {
    record: Vec<Question>,
}

impl From<CatalogWire> for Catalog {
    fn from(wire: CatalogWire) -> Self {
        Catalog::new(wire.record)
    }
}

impl From<Catalog> for CatalogWire {
    fn from(catalog: Catalog) -> Self {
        Self {
            record: catalog.questions,
        }
    }
}

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Self {
        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            index.entry(question.id.clone()).or_insert(position);
        }
        Self { questions, index }
    }

    /// Decode the `{ "record": [...] }` wire shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn first(&self) -> Option<&Question> {
        self.questions.first()
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.position(id).map(|i| &self.questions[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl FromIterator<Question> for Catalog {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        Catalog::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"{
        "record": [
            {
                "id": "1",
                "type": "textInput",
                "label": "Name?",
                "referTo": { "id": "2" },
                "skip": { "id": "-1" },
                "regex": "[A-Za-z ]+"
            },
            {
                "id": "2",
                "type": "multipleChoice",
                "options": [{ "value": "Red" }, { "value": "Blue" }],
                "referTo": { "id": "submit" },
                "skip": { "id": "submit" }
            }
        ],
        "metadata": { "private": false }
    }"#;

    #[test]
    fn test_decode_sentinels() {
        let catalog = Catalog::from_json(FORM).unwrap();
        assert_eq!(catalog.len(), 2);

        let first = catalog.first().unwrap();
        assert_eq!(first.kind, QuestionKind::TextInput);
        assert_eq!(first.refer_to, Target::question("2"));
        assert_eq!(first.skip, None);
        assert_eq!(first.pattern.as_deref(), Some("[A-Za-z ]+"));

        let second = catalog.get("2").unwrap();
        assert_eq!(second.label(), None);
        assert_eq!(second.options.len(), 2);
        assert!(second.is_last());
        assert_eq!(second.skip, Some(Target::Submit));
    }

    #[test]
    fn test_absent_refer_to_means_submit() {
        let json = r#"{ "record": [ { "id": "a", "type": "radio", "skip": { "id": "-1" } } ] }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.first().unwrap().refer_to, Target::Submit);
    }

    #[test]
    fn test_unknown_kind_is_kept() {
        let json = r#"{ "record": [ { "id": "a", "type": "slider", "skip": { "id": "-1" } } ] }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let kind = &catalog.first().unwrap().kind;
        assert_eq!(kind, &QuestionKind::Other("slider".to_string()));
        assert!(!kind.is_supported());
    }

    #[test]
    fn test_encode_writes_wire_sentinels() {
        let question = Question::new("q", QuestionKind::TextInput);
        let value = serde_json::to_value(&question).unwrap();

        assert_eq!(value["type"], "textInput");
        assert_eq!(value["referTo"]["id"], "submit");
        assert_eq!(value["skip"]["id"], "-1");
        assert!(value.get("options").is_none());
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first() {
        let catalog = Catalog::new(vec![
            Question::new("dup", QuestionKind::TextInput).with_label("first"),
            Question::new("dup", QuestionKind::TextInput).with_label("second"),
        ]);
        assert_eq!(catalog.position("dup"), Some(0));
        assert_eq!(catalog.get("dup").unwrap().label(), Some("first"));
    }
}
