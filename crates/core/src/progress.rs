use serde::Serialize;

use crate::completion::CompletionState;
use crate::model::StudyContent;

/// Aggregate completion across every collection.
///
/// Derived on demand from content and completion state; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn compute(content: &StudyContent, completion: &CompletionState) -> Self {
        Self::from_counts(completion.total_completed(), content.total_items())
    }

    /// `round(100 * completed / total)`, half rounding up; 0 when `total` is 0.
    #[must_use]
    pub fn from_counts(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percentage: rounded_percentage(completed, total).unwrap_or(0),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Every milestone completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.percentage == 100
    }
}

/// `None` when `total` is 0.
fn rounded_percentage(completed: usize, total: usize) -> Option<u8> {
    let completed = u128::try_from(completed.min(total)).ok()?;
    let total = u128::try_from(total).ok()?;
    let rounded = (200 * completed + total).checked_div(2 * total)?;
    u8::try_from(rounded.min(100)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CollectionKind, Flashcard, ItemId, Lecture, QuizQuestion};

    #[test]
    fn zero_total_never_divides() {
        let snapshot = ProgressSnapshot::from_counts(0, 0);
        assert_eq!(snapshot.percentage, 0);
        assert!(!snapshot.is_finished());

        let snapshot = ProgressSnapshot::compute(&StudyContent::default(), &CompletionState::new());
        assert_eq!(snapshot, ProgressSnapshot { completed: 0, total: 0, percentage: 0 });
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(ProgressSnapshot::from_counts(1, 3).percentage, 33);
        assert_eq!(ProgressSnapshot::from_counts(2, 3).percentage, 67);
        assert_eq!(ProgressSnapshot::from_counts(1, 8).percentage, 13);
        assert_eq!(ProgressSnapshot::from_counts(1, 200).percentage, 1);
        assert_eq!(ProgressSnapshot::from_counts(3, 3).percentage, 100);
    }

    #[test]
    fn compute_sums_all_collections() {
        let content = StudyContent::new(
            vec![Lecture::titled("l")],
            vec![Flashcard::new("a", "b"), Flashcard::new("c", "d")],
            vec![QuizQuestion::new("q", ["x"], 0, "")],
        );
        let mut completion = CompletionState::new();
        completion.mark_complete(CollectionKind::Flashcard, ItemId::new(1));
        completion.mark_complete(CollectionKind::Question, ItemId::new(0));

        let snapshot = ProgressSnapshot::compute(&content, &completion);

        assert_eq!(snapshot.completed, 2);
        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.percentage, 50);
        assert_eq!(snapshot.remaining(), 2);
    }

    #[test]
    fn finished_at_full_completion() {
        assert!(ProgressSnapshot::from_counts(4, 4).is_finished());
        assert!(!ProgressSnapshot::from_counts(99, 100).is_finished());
    }

    #[test]
    fn widening_handles_the_largest_counts() {
        let snapshot = ProgressSnapshot::from_counts(usize::MAX, usize::MAX);
        assert_eq!(snapshot.percentage, 100);
        assert_eq!(ProgressSnapshot::from_counts(usize::MAX / 2, usize::MAX).percentage, 50);
        // Completed beyond total is clamped.
        assert_eq!(ProgressSnapshot::from_counts(7, 5).percentage, 100);
    }
}
