//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while loading study content.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("could not read content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("content request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("content is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted by the session controller.
///
/// Storage failures during a dispatch are not errors: they are logged and
/// reported through `Dispatched::persisted`.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Content never loaded; every command is refused until a reload.
    #[error("study content is not loaded: {reason}")]
    NotLoaded { reason: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
