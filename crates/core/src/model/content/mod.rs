pub mod content;
pub mod items;

pub use content::StudyContent;
pub use items::{Flashcard, Lecture, QuizQuestion};
