use storage::Theme;
use study_core::Step;
use study_core::model::{CollectionKind, ItemId};

/// Everything the presentation layer can ask of a session.
///
/// Each command is safe to repeat and to issue in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MarkLectureRead(ItemId),
    NavigateFlashcard(Step),
    /// Reveal or hide the back of the current flashcard.
    FlipFlashcard,
    ReshuffleFlashcards,
    /// Select an option (0-based) of the current question.
    SubmitAnswer(usize),
    NextQuestion,
    ToggleTheme,
}

/// Side effects a transition asks the controller to perform, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PersistProgress,
    PersistTheme(Theme),
    Render,
}

/// Result of submitting a quiz answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    /// Nothing recorded; the question stays open for another try.
    Incorrect,
    /// Already answered correctly; the selection was ignored.
    Locked,
    /// No current question, the question cannot be answered, or the option
    /// does not exist.
    Unavailable,
}

/// What a command did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// An item was shown or acknowledged. `newly_completed` is false when it
    /// was already complete.
    Completed {
        kind: CollectionKind,
        id: ItemId,
        newly_completed: bool,
    },
    Flipped {
        showing_back: bool,
    },
    Answered(AnswerOutcome),
    QuestionShown {
        original: usize,
    },
    ThemeChanged(Theme),
    /// Nothing to act on: empty collection or unknown id.
    Ignored,
}

/// A state transition: what happened plus the effects to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Transition {
    #[must_use]
    pub fn ignored() -> Self {
        Self {
            outcome: Outcome::Ignored,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn render(outcome: Outcome) -> Self {
        Self {
            outcome,
            effects: vec![Effect::Render],
        }
    }

    /// Persist first, then render.
    #[must_use]
    pub fn persist_and_render(outcome: Outcome) -> Self {
        Self {
            outcome,
            effects: vec![Effect::PersistProgress, Effect::Render],
        }
    }

    /// Render, persisting only when `outcome` recorded a new completion.
    #[must_use]
    pub fn after_completion(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed {
                newly_completed: true,
                ..
            }
            | Outcome::Answered(AnswerOutcome::Correct) => Self::persist_and_render(outcome),
            _ => Self::render(outcome),
        }
    }

    #[must_use]
    pub fn persists(&self) -> bool {
        self.effects.contains(&Effect::PersistProgress)
    }
}
