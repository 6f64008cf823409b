use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::model::ItemId;

//
// ─── LECTURE ───────────────────────────────────────────────────────────────────
//

/// A reading item. Its body is opaque to progress tracking; only the count
/// and the identity matter.
///
/// Any JSON value is accepted. A bare string becomes the title; an object
/// contributes an unsigned integer `id` and string `title`/`body` when present.
/// Everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lecture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl<'de> Deserialize<'de> for Lecture {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_value(&Value::deserialize(deserializer)?))
    }
}

impl Lecture {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(title) => Self {
                title: Some(title.clone()),
                ..Self::default()
            },
            Value::Object(fields) => {
                let text = |names: &[&str]| {
                    names
                        .iter()
                        .find_map(|name| fields.get(*name).and_then(Value::as_str))
                        .map(str::to_owned)
                };
                Self {
                    id: fields.get("id").and_then(Value::as_u64).map(ItemId::new),
                    title: text(&["title", "name"]),
                    body: text(&["body", "content", "text"]),
                }
            }
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            body: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }
}

//
// ─── FLASHCARD ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default, rename = "f", alias = "front")]
    pub front: String,
    #[serde(default, rename = "b", alias = "back")]
    pub back: String,
}

impl Flashcard {
    #[must_use]
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

//
// ─── QUIZ QUESTION ─────────────────────────────────────────────────────────────
//

/// A multiple-choice question.
///
/// The correct option is stored by index into `options`. A question with no
/// options, or whose correct index falls outside them, is still shown but can
/// never be answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default, rename = "q", alias = "prompt")]
    pub prompt: String,
    #[serde(default, rename = "o", alias = "options")]
    pub options: Vec<String>,
    #[serde(default, rename = "c", alias = "correct")]
    pub correct: Option<usize>,
    #[serde(default, rename = "e", alias = "explanation")]
    pub explanation: String,
}

impl QuizQuestion {
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct: usize,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct: Some(correct),
            explanation: explanation.into(),
        }
    }

    /// Whether the question has options and a correct index pointing into them.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        self.correct.is_some_and(|c| c < self.options.len())
    }

    /// True only when `selected` names the stored correct option.
    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        self.is_answerable() && self.correct == Some(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_without_options_is_not_answerable() {
        let q = QuizQuestion {
            prompt: "Empty".into(),
            options: Vec::new(),
            correct: Some(0),
            explanation: String::new(),
        };
        assert!(!q.is_answerable());
        assert!(!q.is_correct(0));
    }

    #[test]
    fn out_of_range_correct_index_is_never_correct() {
        let q = QuizQuestion::new("Q", ["a", "b"], 5, "");
        assert!(!q.is_answerable());
        assert!(!q.is_correct(5));
    }

    #[test]
    fn short_and_long_field_names_both_parse() {
        let short: QuizQuestion =
            serde_json::from_str(r#"{"q":"Why?","o":["x","y","z"],"c":2,"e":"Because"}"#)
                .unwrap();
        let long: QuizQuestion = serde_json::from_str(
            r#"{"prompt":"Why?","options":["x","y","z"],"correct":2,"explanation":"Because"}"#,
        )
        .unwrap();
        assert_eq!(short, long);
        assert!(short.is_correct(2));

        let card: Flashcard = serde_json::from_str(r#"{"front":"F","back":"B"}"#).unwrap();
        assert_eq!(card, Flashcard::new("F", "B"));
    }

    #[test]
    fn lectures_accept_any_json_shape() {
        let lectures: Vec<Lecture> = serde_json::from_str(
            r#"[
                {"id": 4, "title": "Intro", "content": "<p>Hello</p>"},
                {"id": "m1", "title": "String id"},
                "Chapter 1",
                {"id": -3, "title": 7, "extra": [1, 2]},
                null,
                42
            ]"#,
        )
        .unwrap();

        assert_eq!(lectures.len(), 6);
        assert_eq!(lectures[0].id, Some(ItemId::new(4)));
        assert_eq!(lectures[0].body.as_deref(), Some("<p>Hello</p>"));
        assert_eq!(lectures[1].id, None);
        assert_eq!(lectures[1].title.as_deref(), Some("String id"));
        assert_eq!(lectures[2], Lecture::titled("Chapter 1"));
        assert_eq!(lectures[3], Lecture::default());
        assert_eq!(lectures[4], Lecture::default());
        assert_eq!(lectures[5], Lecture::default());
    }
}
