mod command;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use command::{AnswerOutcome, Command, Effect, Outcome, Transition};
pub use service::{StudySession, session_rng};
pub use view::{
    Feedback, FlashcardView, LectureView, OptionMark, OptionView, QuestionView, QuizView,
    SessionView,
};
pub use workflow::{Dispatched, SessionController};
