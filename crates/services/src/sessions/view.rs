use storage::Theme;
use study_core::ProgressSnapshot;
use study_core::model::ItemId;

/// Render-ready snapshot of a whole session, rebuilt after every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub lectures: Vec<LectureView>,
    pub flashcard: Option<FlashcardView>,
    pub quiz: QuizView,
    pub progress: ProgressSnapshot,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureView {
    pub id: ItemId,
    pub title: String,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardView {
    /// 0-based presentation position.
    pub position: usize,
    pub total: usize,
    pub original: usize,
    pub front: String,
    pub back: String,
    pub showing_back: bool,
}

impl FlashcardView {
    /// `"k / n"`, 1-based.
    #[must_use]
    pub fn counter(&self) -> String {
        format!("{} / {}", self.position + 1, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizView {
    Empty,
    Question(QuestionView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub position: usize,
    pub total: usize,
    pub original: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    /// False when the question has no options or a bad correct index.
    pub answerable: bool,
    pub locked: bool,
    pub feedback: Option<Feedback>,
}

impl QuestionView {
    #[must_use]
    pub fn title(&self) -> String {
        format!("Question {}", self.position + 1)
    }

    #[must_use]
    pub fn counter(&self) -> String {
        format!("{} / {}", self.position + 1, self.total)
    }

    /// The next-question control is offered once the question is answered.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.locked
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Answered correctly; carries the explanation to show.
    Correct(String),
    Incorrect,
}

impl Feedback {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Feedback::Correct(explanation) => explanation,
            Feedback::Incorrect => "Incorrect.",
        }
    }
}
