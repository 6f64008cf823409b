use std::collections::HashSet;

use crate::model::{CollectionKind, ItemId, StudyContent};

/// Which items have been completed, by original identity.
///
/// One set per collection: lectures read, flashcards seen, questions answered
/// correctly. Membership only grows; the sole way to shrink it is to replace
/// the whole state (e.g. a progress reset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionState {
    lectures: HashSet<ItemId>,
    flashcards: HashSet<ItemId>,
    questions: HashSet<ItemId>,
}

impl CompletionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted id lists. Duplicates collapse.
    #[must_use]
    pub fn from_ids(
        lectures: impl IntoIterator<Item = ItemId>,
        flashcards: impl IntoIterator<Item = ItemId>,
        questions: impl IntoIterator<Item = ItemId>,
    ) -> Self {
        Self {
            lectures: lectures.into_iter().collect(),
            flashcards: flashcards.into_iter().collect(),
            questions: questions.into_iter().collect(),
        }
    }

    fn set(&self, kind: CollectionKind) -> &HashSet<ItemId> {
        match kind {
            CollectionKind::Lecture => &self.lectures,
            CollectionKind::Flashcard => &self.flashcards,
            CollectionKind::Question => &self.questions,
        }
    }

    fn set_mut(&mut self, kind: CollectionKind) -> &mut HashSet<ItemId> {
        match kind {
            CollectionKind::Lecture => &mut self.lectures,
            CollectionKind::Flashcard => &mut self.flashcards,
            CollectionKind::Question => &mut self.questions,
        }
    }

    /// Record `id` as complete. Returns `true` only if it was not already.
    pub fn mark_complete(&mut self, kind: CollectionKind, id: ItemId) -> bool {
        self.set_mut(kind).insert(id)
    }

    #[must_use]
    pub fn is_complete(&self, kind: CollectionKind, id: ItemId) -> bool {
        self.set(kind).contains(&id)
    }

    #[must_use]
    pub fn count(&self, kind: CollectionKind) -> usize {
        self.set(kind).len()
    }

    #[must_use]
    pub fn total_completed(&self) -> usize {
        CollectionKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_completed() == 0
    }

    /// Ids of one collection in ascending order.
    #[must_use]
    pub fn sorted_ids(&self, kind: CollectionKind) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.set(kind).iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Drop ids that do not name an item in `content`.
    ///
    /// Returns how many were dropped. Stored progress can outlive a content
    /// file edit; unknown ids would otherwise push the ratio past 100%.
    pub fn retain_known(&mut self, content: &StudyContent) -> usize {
        let before = self.total_completed();
        for kind in CollectionKind::ALL {
            self.set_mut(kind).retain(|id| content.contains(kind, *id));
        }
        before - self.total_completed()
    }
}
