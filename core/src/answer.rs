//! Answers: the per-session answer set and the input union the presentation
//! layer builds before handing a single string to the engine.

use crate::model::{Question, QuestionId, QuestionKind};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Separator used when a multi-choice selection is flattened to one string.
pub const MULTI_CHOICE_DELIMITER: &str = ", ";

/// Question id to raw answer, in the order questions were first answered.
///
/// Overwriting an answer keeps its original position. Serializes as a plain
/// JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    entries: Vec<(QuestionId, String)>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, answer)| answer.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Record an answer, returning the one it replaced.
    pub fn insert(&mut self, id: impl Into<String>, answer: impl Into<String>) -> Option<String> {
        let id = id.into();
        let answer = answer.into();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some((_, slot)) => Some(std::mem::replace(slot, answer)),
            None => {
                self.entries.push((id, answer));
                None
            }
        }
    }

    /// A copy of this set with one more answer recorded.
    pub fn with(&self, id: impl Into<String>, answer: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.insert(id, answer);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (id, answer) in iter {
            set.insert(id, answer);
        }
        set
    }
}

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, answer) in &self.entries {
            map.serialize_entry(id, answer)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AnswerSetVisitor;

        impl<'de> Visitor<'de> for AnswerSetVisitor {
            type Value = AnswerSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of question ids to answers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AnswerSet, A::Error> {
                let mut set = AnswerSet::new();
                while let Some((id, answer)) = access.next_entry::<String, String>()? {
                    set.insert(id, answer);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(AnswerSetVisitor)
    }
}

/// The in-progress answer to the current question, shaped by its kind.
///
/// The engine never sees this type: [`AnswerInput::finalize`] turns it into the
/// single string an advance action carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    Text(String),
    Single(Option<String>),
    /// Selected values in the order they were picked.
    Multi(Vec<String>),
}

impl AnswerInput {
    /// An empty input of the right shape for `question`.
    pub fn for_question(question: &Question) -> Self {
        match question.kind {
            QuestionKind::Radio => AnswerInput::Single(None),
            QuestionKind::MultipleChoice => AnswerInput::Multi(Vec::new()),
            _ => AnswerInput::Text(String::new()),
        }
    }

    /// Replace free text. Ignored for choice inputs.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if let AnswerInput::Text(current) = self {
            *current = text.into();
        }
    }

    /// Pick the single option. Ignored for other inputs.
    pub fn select(&mut self, value: impl Into<String>) {
        if let AnswerInput::Single(current) = self {
            *current = Some(value.into());
        }
    }

    /// Flip one option of a multi-choice selection. Ignored for other inputs.
    pub fn toggle(&mut self, value: &str) {
        if let AnswerInput::Multi(selected) = self {
            match selected.iter().position(|v| v == value) {
                Some(i) => {
                    selected.remove(i);
                }
                None => selected.push(value.to_string()),
            }
        }
    }

    pub fn is_selected(&self, value: &str) -> bool {
        match self {
            AnswerInput::Text(_) => false,
            AnswerInput::Single(current) => current.as_deref() == Some(value),
            AnswerInput::Multi(selected) => selected.iter().any(|v| v == value),
        }
    }

    pub fn is_answered(&self) -> bool {
        match self {
            AnswerInput::Text(text) => !text.trim().is_empty(),
            AnswerInput::Single(current) => current.as_deref().is_some_and(|v| !v.trim().is_empty()),
            AnswerInput::Multi(selected) => !selected.is_empty(),
        }
    }

    pub fn finalize(&self) -> String {
        match self {
            AnswerInput::Text(text) => text.clone(),
            AnswerInput::Single(current) => current.clone().unwrap_or_default(),
            AnswerInput::Multi(selected) => selected.join(MULTI_CHOICE_DELIMITER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut answers = AnswerSet::new();
        answers.insert("1", "a");
        answers.insert("2", "b");
        assert_eq!(answers.insert("1", "c"), Some("a".to_string()));

        let order: Vec<_> = answers.iter().collect();
        assert_eq!(order, vec![("1", "c"), ("2", "b")]);
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let before: AnswerSet = [("1", "a")].into_iter().collect();
        let after = before.with("2", "b");
        assert_eq!(before.len(), 1);
        assert_eq!(after.get("2"), Some("b"));
    }

    #[test]
    fn test_json_is_plain_object_in_answer_order() {
        let answers: AnswerSet = [("10", "x"), ("2", "y")].into_iter().collect();
        let json = answers.to_json().unwrap();
        assert_eq!(json, r#"{"10":"x","2":"y"}"#);
        assert_eq!(AnswerSet::from_json(&json).unwrap(), answers);
    }

    #[test]
    fn test_multi_choice_flattens_in_selection_order() {
        let question = Question::new("q", QuestionKind::MultipleChoice)
            .with_options(["Red", "Green", "Blue"]);
        let mut input = AnswerInput::for_question(&question);
        assert!(!input.is_answered());

        input.toggle("Blue");
        input.toggle("Red");
        input.toggle("Green");
        input.toggle("Green");

        assert!(input.is_answered());
        assert_eq!(input.finalize(), "Blue, Red");
    }

    #[test]
    fn test_blank_text_is_unanswered() {
        let mut input = AnswerInput::Text(String::new());
        input.set_text("   ");
        assert!(!input.is_answered());
        input.set_text(" hi ");
        assert!(input.is_answered());
        assert_eq!(input.finalize(), " hi ");
    }

    #[test]
    fn test_single_select_replaces() {
        let mut input = AnswerInput::Single(None);
        input.select("Yes");
        input.select("No");
        assert!(input.is_selected("No"));
        assert!(!input.is_selected("Yes"));
        assert_eq!(input.finalize(), "No");
    }
}
