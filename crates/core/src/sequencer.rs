//! Presentation ordering for shuffled collections.
//!
//! A [`Permutation`] maps presentation positions to original indices and
//! back. A [`Sequencer`] pairs one with a cursor that wraps around in both
//! directions.

use rand::Rng;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SequencerError {
    #[error("navigation step must be -1 or +1, got {0}")]
    InvalidStep(i64),
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

/// One move of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Backward,
    Forward,
}

impl Step {
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Step::Backward => Step::Forward,
            Step::Forward => Step::Backward,
        }
    }
}

impl TryFrom<i64> for Step {
    type Error = SequencerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Step::Backward),
            1 => Ok(Step::Forward),
            other => Err(SequencerError::InvalidStep(other)),
        }
    }
}

/// Circular move: `(cursor + step + len) mod len`.
///
/// Returns `None` for an empty collection.
#[must_use]
pub fn advance(len: usize, cursor: usize, step: Step) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let cursor = cursor % len;
    Some(match step {
        Step::Forward => (cursor + 1) % len,
        Step::Backward => (cursor + len - 1) % len,
    })
}

//
// ─── PERMUTATION ───────────────────────────────────────────────────────────────
//

/// A bijection between presentation positions and original indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    order: Vec<usize>,
    positions: Vec<usize>,
}

impl Permutation {
    /// Uniformly random ordering of `0..n`.
    ///
    /// Fisher-Yates: walk from the last index down to 1 and swap each slot with
    /// a uniformly chosen index in `0..=i`.
    pub fn generate<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = rng.random_range(0..=i);
            order.swap(i, j);
        }
        Self::from_order_unchecked(order)
    }

    /// Build from an explicit ordering, if it is a bijection over `0..len`.
    #[must_use]
    pub fn from_order(order: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; order.len()];
        for &original in &order {
            match seen.get_mut(original) {
                Some(slot) if !*slot => *slot = true,
                _ => return None,
            }
        }
        Some(Self::from_order_unchecked(order))
    }

    fn from_order_unchecked(order: Vec<usize>) -> Self {
        let mut positions = vec![0; order.len()];
        for (position, &original) in order.iter().enumerate() {
            positions[original] = position;
        }
        Self { order, positions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Original index shown at presentation `position`.
    #[must_use]
    pub fn original_at(&self, position: usize) -> Option<usize> {
        self.order.get(position).copied()
    }

    /// Presentation position of the item with the given original index.
    #[must_use]
    pub fn position_of(&self, original: usize) -> Option<usize> {
        self.positions.get(original).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }
}

//
// ─── SEQUENCER ─────────────────────────────────────────────────────────────────
//

/// A permutation plus a cursor into it.
///
/// The cursor is always in `[0, len)`; for an empty permutation there is no
/// cursor and every navigation or lookup returns `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequencer {
    permutation: Permutation,
    cursor: usize,
}

impl Sequencer {
    pub fn shuffled<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        Self::from_permutation(Permutation::generate(n, rng))
    }

    #[must_use]
    pub fn from_permutation(permutation: Permutation) -> Self {
        Self {
            permutation,
            cursor: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    #[must_use]
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.cursor)
    }

    /// `permutation[cursor]`.
    #[must_use]
    pub fn current_original(&self) -> Option<usize> {
        self.permutation.original_at(self.cursor)
    }

    /// Move the cursor one step, wrapping at both ends.
    pub fn advance(&mut self, step: Step) -> Option<usize> {
        let next = advance(self.len(), self.cursor, step)?;
        self.cursor = next;
        Some(next)
    }

    /// Reshuffle the same item count and rewind to position 0.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.permutation = Permutation::generate(self.len(), rng);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_bijection(permutation: &Permutation, n: usize) {
        assert_eq!(permutation.len(), n);
        let mut sorted = permutation.as_slice().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn generate_is_a_bijection_for_many_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..50 {
            let permutation = Permutation::generate(n, &mut rng);
            assert_bijection(&permutation, n);
            for position in 0..n {
                let original = permutation.original_at(position).unwrap();
                assert_eq!(permutation.position_of(original), Some(position));
            }
        }
    }

    #[test]
    fn generate_reaches_every_ordering_of_three() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..6000 {
            let permutation = Permutation::generate(3, &mut rng);
            *counts.entry(permutation.as_slice().to_vec()).or_insert(0_u32) += 1;
        }
        assert_eq!(counts.len(), 6);
        // Each of the 6 orderings expects ~1000 hits.
        assert!(counts.values().all(|&c| (800..1200).contains(&c)));
    }

    #[test]
    fn from_order_rejects_non_bijections() {
        assert!(Permutation::from_order(vec![0, 0, 1]).is_none());
        assert!(Permutation::from_order(vec![0, 3]).is_none());
        let ok = Permutation::from_order(vec![2, 0, 1]).unwrap();
        assert_eq!(ok.position_of(2), Some(0));
        assert_eq!(ok.original_at(2), Some(1));
    }

    #[test]
    fn advance_wraps_in_both_directions() {
        assert_eq!(advance(5, 4, Step::Forward), Some(0));
        assert_eq!(advance(5, 0, Step::Backward), Some(4));
        assert_eq!(advance(1, 0, Step::Forward), Some(0));
        assert_eq!(advance(0, 0, Step::Forward), None);
    }

    #[test]
    fn advance_then_inverse_returns_to_cursor() {
        for len in 1..8 {
            for cursor in 0..len {
                for step in [Step::Forward, Step::Backward] {
                    let moved = advance(len, cursor, step).unwrap();
                    assert_eq!(advance(len, moved, step.inverse()), Some(cursor));
                }
            }
        }
    }

    #[test]
    fn step_rejects_other_sizes() {
        assert_eq!(Step::try_from(1), Ok(Step::Forward));
        assert_eq!(Step::try_from(-1), Ok(Step::Backward));
        assert_eq!(Step::try_from(2), Err(SequencerError::InvalidStep(2)));
        assert_eq!(Step::try_from(0), Err(SequencerError::InvalidStep(0)));
    }

    #[test]
    fn empty_sequencer_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sequencer = Sequencer::shuffled(0, &mut rng);
        assert_eq!(sequencer.cursor(), None);
        assert_eq!(sequencer.current_original(), None);
        assert_eq!(sequencer.advance(Step::Forward), None);
        sequencer.regenerate(&mut rng);
        assert!(sequencer.is_empty());
    }

    #[test]
    fn regenerate_rewinds_cursor() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sequencer = Sequencer::shuffled(6, &mut rng);
        sequencer.advance(Step::Forward);
        sequencer.advance(Step::Forward);
        assert_eq!(sequencer.cursor(), Some(2));

        sequencer.regenerate(&mut rng);
        assert_eq!(sequencer.cursor(), Some(0));
        assert_bijection(sequencer.permutation(), 6);
    }

    #[test]
    fn permutation_is_stable_until_regenerated() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sequencer = Sequencer::shuffled(10, &mut rng);
        let before = sequencer.permutation().clone();
        for _ in 0..25 {
            sequencer.advance(Step::Forward);
        }
        assert_eq!(sequencer.permutation(), &before);
    }
}
