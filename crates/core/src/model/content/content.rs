use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::content::{Flashcard, Lecture, QuizQuestion};
use crate::model::{CollectionKind, ItemId};

//
// ─── CONTENT TYPES ─────────────────────────────────────────────────────────────
//

/// The immutable item collections of one study deck, loaded once per session.
///
/// Any collection missing from the source, or `null`, defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyContent {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub lectures: Vec<Lecture>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub flashcards: Vec<Flashcard>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub quiz: Vec<QuizQuestion>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

//
// ─── CONTENT IMPL ──────────────────────────────────────────────────────────────
//

impl StudyContent {
    #[must_use]
    pub fn new(
        lectures: Vec<Lecture>,
        flashcards: Vec<Flashcard>,
        quiz: Vec<QuizQuestion>,
    ) -> Self {
        Self {
            lectures,
            flashcards,
            quiz,
        }
    }

    /// Number of items loaded for a collection.
    #[must_use]
    pub fn len(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Lecture => self.lectures.len(),
            CollectionKind::Flashcard => self.flashcards.len(),
            CollectionKind::Question => self.quiz.len(),
        }
    }

    /// Sum of all collection sizes, as loaded.
    #[must_use]
    pub fn total_items(&self) -> usize {
        CollectionKind::ALL.iter().map(|kind| self.len(*kind)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Identities of every lecture, in content order.
    ///
    /// Explicit ids are used only when every lecture carries one and no two
    /// are equal; otherwise each lecture is identified by its index.
    #[must_use]
    pub fn lecture_ids(&self) -> Vec<ItemId> {
        let explicit: Option<Vec<ItemId>> =
            self.lectures.iter().map(|lecture| lecture.id).collect();
        match explicit {
            Some(ids) if ids.iter().collect::<HashSet<_>>().len() == ids.len() => ids,
            _ => (0..self.lectures.len()).map(ItemId::from_index).collect(),
        }
    }

    /// Whether `id` names an item that exists in the given collection.
    #[must_use]
    pub fn contains(&self, kind: CollectionKind, id: ItemId) -> bool {
        match kind {
            CollectionKind::Lecture => self.lecture_ids().contains(&id),
            CollectionKind::Flashcard | CollectionKind::Question => id
                .as_index()
                .is_some_and(|index| index < self.len(kind)),
        }
    }

    #[must_use]
    pub fn flashcard(&self, original: usize) -> Option<&Flashcard> {
        self.flashcards.get(original)
    }

    #[must_use]
    pub fn question(&self, original: usize) -> Option<&QuizQuestion> {
        self.quiz.get(original)
    }
}
