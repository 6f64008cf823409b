#![forbid(unsafe_code)]

pub mod progress;
pub mod repository;
pub mod sqlite;
pub mod theme;

pub use progress::{PROGRESS_KEY, ProgressGateway, ProgressRecord};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
pub use theme::{THEME_KEY, Theme, ThemeStore};
