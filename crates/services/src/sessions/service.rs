use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::Theme;
use study_core::model::{CollectionKind, ItemId, StudyContent};
use study_core::{CompletionState, ProgressSnapshot, Sequencer, Step};
use tracing::debug;

use super::command::{AnswerOutcome, Command, Effect, Outcome, Transition};
use super::view::{
    Feedback, FlashcardView, LectureView, OptionMark, OptionView, QuestionView, QuizView,
    SessionView,
};

const CORRECT_FALLBACK: &str = "Correct!";
const NO_EXPLANATION: &str = "No explanation available.";

/// Build the session RNG: seeded for reproducible orderings, OS entropy otherwise.
#[must_use]
pub fn session_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// All mutable state of one study session.
///
/// `apply` is a pure state transition: it never touches storage and instead
/// reports the effects the caller must run.
pub struct StudySession {
    content: Arc<StudyContent>,
    completion: CompletionState,
    flashcards: Sequencer,
    quiz: Sequencer,
    showing_back: bool,
    wrong_picks: Vec<usize>,
    feedback: Option<Feedback>,
    theme: Theme,
    rng: StdRng,
}

impl StudySession {
    /// Build a session over loaded content and restored completion state.
    ///
    /// Restored ids that no longer name an item are dropped.
    #[must_use]
    pub fn new(
        content: Arc<StudyContent>,
        mut completion: CompletionState,
        theme: Theme,
        mut rng: StdRng,
    ) -> Self {
        let dropped = completion.retain_known(&content);
        if dropped > 0 {
            debug!(dropped, "ignoring stored progress for unknown items");
        }
        let flashcards = Sequencer::shuffled(content.flashcards.len(), &mut rng);
        let quiz = Sequencer::shuffled(content.quiz.len(), &mut rng);

        Self {
            content,
            completion,
            flashcards,
            quiz,
            showing_back: false,
            wrong_picks: Vec::new(),
            feedback: None,
            theme,
            rng,
        }
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionState {
        &self.completion
    }

    #[must_use]
    pub fn flashcards(&self) -> &Sequencer {
        &self.flashcards
    }

    #[must_use]
    pub fn quiz(&self) -> &Sequencer {
        &self.quiz
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        ProgressSnapshot::compute(&self.content, &self.completion)
    }

    /// Show the first flashcard, which counts as seeing it.
    pub fn open(&mut self) -> Transition {
        self.show_current_flashcard()
    }

    pub fn apply(&mut self, command: Command) -> Transition {
        let transition = match command {
            Command::MarkLectureRead(id) => self.mark_lecture_read(id),
            Command::NavigateFlashcard(step) => self.navigate_flashcard(step),
            Command::FlipFlashcard => self.flip_flashcard(),
            Command::ReshuffleFlashcards => self.reshuffle_flashcards(),
            Command::SubmitAnswer(selected) => self.submit_answer(selected),
            Command::NextQuestion => self.next_question(),
            Command::ToggleTheme => self.toggle_theme(),
        };
        debug!(?command, outcome = ?transition.outcome, "command applied");
        transition
    }

    fn mark_lecture_read(&mut self, id: ItemId) -> Transition {
        if !self.content.contains(CollectionKind::Lecture, id) {
            return Transition::ignored();
        }
        let newly_completed = self.completion.mark_complete(CollectionKind::Lecture, id);
        Transition::after_completion(Outcome::Completed {
            kind: CollectionKind::Lecture,
            id,
            newly_completed,
        })
    }

    fn show_current_flashcard(&mut self) -> Transition {
        self.showing_back = false;
        let Some(original) = self.flashcards.current_original() else {
            return Transition::ignored();
        };
        let id = ItemId::from_index(original);
        let newly_completed = self.completion.mark_complete(CollectionKind::Flashcard, id);
        Transition::after_completion(Outcome::Completed {
            kind: CollectionKind::Flashcard,
            id,
            newly_completed,
        })
    }

    fn navigate_flashcard(&mut self, step: Step) -> Transition {
        if self.flashcards.advance(step).is_none() {
            return Transition::ignored();
        }
        self.show_current_flashcard()
    }

    fn flip_flashcard(&mut self) -> Transition {
        if self.flashcards.is_empty() {
            return Transition::ignored();
        }
        self.showing_back = !self.showing_back;
        Transition::render(Outcome::Flipped {
            showing_back: self.showing_back,
        })
    }

    fn reshuffle_flashcards(&mut self) -> Transition {
        if self.flashcards.is_empty() {
            return Transition::ignored();
        }
        self.flashcards.regenerate(&mut self.rng);
        self.show_current_flashcard()
    }

    fn submit_answer(&mut self, selected: usize) -> Transition {
        let rejected = |outcome| Transition {
            outcome: Outcome::Answered(outcome),
            effects: Vec::new(),
        };

        let Some(original) = self.quiz.current_original() else {
            return rejected(AnswerOutcome::Unavailable);
        };
        let id = ItemId::from_index(original);
        if self.completion.is_complete(CollectionKind::Question, id) {
            return rejected(AnswerOutcome::Locked);
        }
        let Some(question) = self.content.question(original) else {
            return rejected(AnswerOutcome::Unavailable);
        };
        if !question.is_answerable() || selected >= question.options.len() {
            return rejected(AnswerOutcome::Unavailable);
        }

        if question.is_correct(selected) {
            let explanation = if question.explanation.trim().is_empty() {
                CORRECT_FALLBACK.to_owned()
            } else {
                question.explanation.clone()
            };
            self.completion.mark_complete(CollectionKind::Question, id);
            self.feedback = Some(Feedback::Correct(explanation));
            Transition::after_completion(Outcome::Answered(AnswerOutcome::Correct))
        } else {
            if !self.wrong_picks.contains(&selected) {
                self.wrong_picks.push(selected);
            }
            self.feedback = Some(Feedback::Incorrect);
            Transition::render(Outcome::Answered(AnswerOutcome::Incorrect))
        }
    }

    fn next_question(&mut self) -> Transition {
        if self.quiz.advance(Step::Forward).is_none() {
            return Transition::ignored();
        }
        self.wrong_picks.clear();
        self.feedback = None;
        match self.quiz.current_original() {
            Some(original) => Transition::render(Outcome::QuestionShown { original }),
            None => Transition::ignored(),
        }
    }

    fn toggle_theme(&mut self) -> Transition {
        self.theme = self.theme.toggled();
        Transition {
            outcome: Outcome::ThemeChanged(self.theme),
            effects: vec![Effect::PersistTheme(self.theme), Effect::Render],
        }
    }

    //
    // ─── VIEWS ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            lectures: self.lecture_views(),
            flashcard: self.flashcard_view(),
            quiz: self.quiz_view(),
            progress: self.progress(),
            theme: self.theme,
        }
    }

    fn lecture_views(&self) -> Vec<LectureView> {
        self.content
            .lectures
            .iter()
            .zip(self.content.lecture_ids())
            .map(|(lecture, id)| LectureView {
                id,
                title: lecture
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Lecture {id}")),
                read: self.completion.is_complete(CollectionKind::Lecture, id),
            })
            .collect()
    }

    fn flashcard_view(&self) -> Option<FlashcardView> {
        let position = self.flashcards.cursor()?;
        let original = self.flashcards.current_original()?;
        let card = self.content.flashcard(original)?;
        Some(FlashcardView {
            position,
            total: self.flashcards.len(),
            original,
            front: card.front.clone(),
            back: card.back.clone(),
            showing_back: self.showing_back,
        })
    }

    fn quiz_view(&self) -> QuizView {
        let (Some(position), Some(original)) = (self.quiz.cursor(), self.quiz.current_original())
        else {
            return QuizView::Empty;
        };
        let Some(question) = self.content.question(original) else {
            return QuizView::Empty;
        };

        let locked = self
            .completion
            .is_complete(CollectionKind::Question, ItemId::from_index(original));
        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let mark = if locked && question.correct == Some(index) {
                    OptionMark::Correct
                } else if self.wrong_picks.contains(&index) {
                    OptionMark::Incorrect
                } else {
                    OptionMark::Neutral
                };
                OptionView {
                    index,
                    text: text.clone(),
                    mark,
                }
            })
            .collect();

        // A question completed in an earlier visit shows its explanation again.
        let feedback = match (&self.feedback, locked) {
            (Some(feedback), _) => Some(feedback.clone()),
            (None, true) => Some(Feedback::Correct(if question.explanation.trim().is_empty() {
                NO_EXPLANATION.to_owned()
            } else {
                question.explanation.clone()
            })),
            (None, false) => None,
        };

        QuizView::Question(QuestionView {
            position,
            total: self.quiz.len(),
            original,
            prompt: question.prompt.clone(),
            options,
            answerable: question.is_answerable(),
            locked,
            feedback,
        })
    }
}

impl fmt::Debug for StudySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("flashcards_len", &self.flashcards.len())
            .field("flashcard_cursor", &self.flashcards.cursor())
            .field("quiz_len", &self.quiz.len())
            .field("quiz_cursor", &self.quiz.cursor())
            .field("completed", &self.completion.total_completed())
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
