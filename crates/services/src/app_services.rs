use storage::Storage;
use study_core::ProgressSnapshot;

use crate::content_service::{ContentService, ContentSource};
use crate::error::{AppServicesError, ContentError};
use crate::sessions::{SessionController, session_rng};

/// Assembles storage and content loading for the binary.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    content: ContentService,
    source: ContentSource,
    seed: Option<u64>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: Storage, source: ContentSource, seed: Option<u64>) -> Self {
        Self {
            storage,
            content: ContentService::new(),
            source,
            seed,
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        source: ContentSource,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(storage, source, seed))
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Load content and open a study session.
    pub async fn start_session(&self) -> SessionController {
        SessionController::start(
            &self.storage,
            &self.content,
            &self.source,
            session_rng(self.seed),
        )
        .await
    }

    /// Retry loading content into an existing controller.
    pub async fn reload_session(&self, controller: &mut SessionController) {
        controller
            .reload(
                &self.storage,
                &self.content,
                &self.source,
                session_rng(self.seed),
            )
            .await;
    }

    /// Progress of the stored state against the current content, without
    /// opening a session (so nothing is marked).
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the content cannot be loaded.
    pub async fn stored_progress(&self) -> Result<ProgressSnapshot, ContentError> {
        let content = self.content.load(&self.source).await?;
        let mut completion = self.storage.progress().load().await;
        completion.retain_known(&content);
        Ok(ProgressSnapshot::compute(&content, &completion))
    }

    /// Forget all stored completion.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the backend write fails.
    pub async fn reset_progress(&self) -> Result<(), AppServicesError> {
        self.storage.progress().clear().await?;
        Ok(())
    }
}
