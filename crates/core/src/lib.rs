#![forbid(unsafe_code)]

pub mod completion;
pub mod model;
pub mod progress;
pub mod sequencer;

pub use completion::CompletionState;
pub use progress::ProgressSnapshot;
pub use sequencer::{Permutation, Sequencer, SequencerError, Step};
