use std::fmt;

use services::Command;
use study_core::Step;
use study_core::model::ItemId;

/// One line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Show,
    Help,
    Reload,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidNumber { raw: String },
    InvalidStep { raw: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Unknown(raw) => write!(f, "unknown command: {raw} (try `help`)"),
            InputError::MissingArgument { command } => write!(f, "{command} requires a value"),
            InputError::InvalidNumber { raw } => write!(f, "not a valid number: {raw}"),
            InputError::InvalidStep { raw } => write!(f, "step must be -1 or 1, got {raw}"),
        }
    }
}

impl std::error::Error for InputError {}

pub const HELP: &str = "\
Commands:
  n, next            next flashcard
  p, prev            previous flashcard
  move <-1|1>        move the flashcard cursor by one step
  f, flip            show the other side of the flashcard
  s, shuffle         reshuffle flashcards
  a, answer <k>      answer option k (1-based) of the current question
  q, question        next question
  r, read <id>       mark lecture <id> as read
  t, theme           toggle dark mode
  show               redraw the session (also: empty line)
  reload             retry loading content
  help               this text
  exit, quit         leave";

pub fn parse_line(line: &str) -> Result<Input, InputError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(Input::Show);
    };
    let arg = parts.next();

    let input = match head.to_ascii_lowercase().as_str() {
        "n" | "next" => Input::Command(Command::NavigateFlashcard(Step::Forward)),
        "p" | "prev" => Input::Command(Command::NavigateFlashcard(Step::Backward)),
        "move" => {
            let raw = arg.ok_or(InputError::MissingArgument { command: "move" })?;
            let value: i64 = raw.parse().map_err(|_| InputError::InvalidNumber {
                raw: raw.to_owned(),
            })?;
            let step = Step::try_from(value).map_err(|_| InputError::InvalidStep {
                raw: raw.to_owned(),
            })?;
            Input::Command(Command::NavigateFlashcard(step))
        }
        "f" | "flip" => Input::Command(Command::FlipFlashcard),
        "s" | "shuffle" => Input::Command(Command::ReshuffleFlashcards),
        "a" | "answer" => {
            let raw = arg.ok_or(InputError::MissingArgument { command: "answer" })?;
            let choice: usize = raw
                .parse()
                .ok()
                .filter(|k| *k >= 1)
                .ok_or_else(|| InputError::InvalidNumber {
                    raw: raw.to_owned(),
                })?;
            Input::Command(Command::SubmitAnswer(choice - 1))
        }
        "q" | "question" => Input::Command(Command::NextQuestion),
        "r" | "read" => {
            let raw = arg.ok_or(InputError::MissingArgument { command: "read" })?;
            let id: ItemId = raw.parse().map_err(|_| InputError::InvalidNumber {
                raw: raw.to_owned(),
            })?;
            Input::Command(Command::MarkLectureRead(id))
        }
        "t" | "theme" => Input::Command(Command::ToggleTheme),
        "show" => Input::Show,
        "reload" => Input::Reload,
        "h" | "help" | "?" => Input::Help,
        "exit" | "quit" => Input::Quit,
        _ => return Err(InputError::Unknown(head.to_owned())),
    };
    Ok(input)
}
