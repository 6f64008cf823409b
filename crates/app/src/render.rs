use std::io::{self, Write};

use services::sessions::{Feedback, OptionMark, QuizView, SessionView};
use services::{AnswerOutcome, Outcome};
use storage::Theme;
use study_core::ProgressSnapshot;

pub fn progress_line(progress: &ProgressSnapshot) -> String {
    let mut line = format!(
        "{} / {} milestones completed ({}%)",
        progress.completed, progress.total, progress.percentage
    );
    if progress.is_finished() {
        line.push_str(" - all done!");
    }
    line
}

pub fn render_view(out: &mut impl Write, view: &SessionView) -> io::Result<()> {
    let rule = match view.theme {
        Theme::Light => "----------------------------------------",
        Theme::Dark => "========================================",
    };
    writeln!(out, "{rule}")?;
    writeln!(out, "Progress: {}", progress_line(&view.progress))?;

    if !view.lectures.is_empty() {
        writeln!(out)?;
        writeln!(out, "Lectures")?;
        for lecture in &view.lectures {
            let mark = if lecture.read { "x" } else { " " };
            writeln!(out, "  [{mark}] {:>3}  {}", lecture.id.to_string(), lecture.title)?;
        }
    }

    writeln!(out)?;
    match &view.flashcard {
        Some(card) => {
            writeln!(out, "Flashcard {}", card.counter())?;
            if card.showing_back {
                writeln!(out, "  back:  {}", card.back)?;
            } else {
                writeln!(out, "  front: {}", card.front)?;
            }
        }
        None => writeln!(out, "No flashcards")?,
    }

    writeln!(out)?;
    match &view.quiz {
        QuizView::Empty => writeln!(out, "No questions available.")?,
        QuizView::Question(question) => {
            writeln!(out, "{} ({})", question.title(), question.counter())?;
            writeln!(out, "  {}", question.prompt)?;
            if !question.answerable {
                writeln!(out, "  This question has no options defined.")?;
            } else {
                for option in &question.options {
                    let mark = match option.mark {
                        OptionMark::Neutral => ' ',
                        OptionMark::Correct => '+',
                        OptionMark::Incorrect => '-',
                    };
                    writeln!(out, "  {mark} {}. {}", option.index + 1, option.text)?;
                }
            }
            match &question.feedback {
                Some(Feedback::Correct(explanation)) => writeln!(out, "  {explanation}")?,
                Some(Feedback::Incorrect) => writeln!(out, "  Incorrect. Try again.")?,
                None => {}
            }
            if question.can_advance() {
                writeln!(out, "  (q for the next question)")?;
            }
        }
    }
    writeln!(out, "{rule}")
}

/// One-line notice for outcomes the view alone does not explain.
pub fn outcome_notice(outcome: &Outcome) -> Option<&'static str> {
    match outcome {
        Outcome::Answered(AnswerOutcome::Locked) => Some("Already answered."),
        Outcome::Answered(AnswerOutcome::Unavailable) => Some("No such option."),
        Outcome::Ignored => Some("Nothing to do."),
        _ => None,
    }
}

pub fn render_failure(out: &mut impl Write, reason: &str) -> io::Result<()> {
    writeln!(out, "Could not load study content: {reason}")?;
    writeln!(out, "Fix the content source and type `reload`, or `exit`.")
}
