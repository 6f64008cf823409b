pub mod content;
mod ids;

pub use content::{Flashcard, Lecture, QuizQuestion, StudyContent};
pub use ids::{CollectionKind, ItemId, ParseIdError};
