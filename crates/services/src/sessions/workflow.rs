use std::sync::Arc;

use rand::rngs::StdRng;
use storage::{ProgressGateway, Storage, ThemeStore};
use study_core::ProgressSnapshot;
use study_core::model::StudyContent;
use tracing::{error, info, warn};

use super::command::{Command, Effect, Outcome, Transition};
use super::service::StudySession;
use super::view::SessionView;
use crate::content_service::{ContentService, ContentSource};
use crate::error::{ContentError, SessionError};

/// Result of dispatching one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub outcome: Outcome,
    /// False when a requested progress write failed. In-memory state is kept.
    pub persisted: bool,
    pub view: SessionView,
}

impl Dispatched {
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.view.progress
    }
}

enum SessionState {
    Ready(Box<StudySession>),
    Failed { reason: String },
}

/// Owns the single study session and runs the effects of its transitions.
///
/// Within a dispatch the order is fixed: state mutation, then persistence,
/// then the progress snapshot returned in the view.
pub struct SessionController {
    progress: ProgressGateway,
    themes: ThemeStore,
    state: SessionState,
}

impl SessionController {
    /// Load content, restore progress and theme, and show the first flashcard.
    ///
    /// A content failure does not error: the controller starts in a failed
    /// state that refuses commands and reports the reason.
    pub async fn start(
        storage: &Storage,
        content: &ContentService,
        source: &ContentSource,
        rng: StdRng,
    ) -> Self {
        let loaded = content.load(source).await;
        Self::start_with(storage, loaded, rng).await
    }

    /// Start from already-resolved content.
    pub async fn start_with(
        storage: &Storage,
        content: Result<StudyContent, ContentError>,
        rng: StdRng,
    ) -> Self {
        let progress = storage.progress();
        let themes = storage.theme();

        let state = match content {
            Ok(content) => {
                let completion = progress.load().await;
                let theme = themes.load().await;
                SessionState::Ready(Box::new(StudySession::new(
                    Arc::new(content),
                    completion,
                    theme,
                    rng,
                )))
            }
            Err(err) => {
                error!(error = %err, "failed to load study content");
                SessionState::Failed {
                    reason: err.to_string(),
                }
            }
        };

        let mut controller = Self {
            progress,
            themes,
            state,
        };
        if let SessionState::Ready(session) = &mut controller.state {
            let opening = session.open();
            let persisted = controller.run_effects(&opening).await;
            if !persisted {
                warn!("initial progress write failed");
            }
        }
        if let Some(snapshot) = controller.progress_snapshot() {
            info!(
                completed = snapshot.completed,
                total = snapshot.total,
                percentage = snapshot.percentage,
                "study session started"
            );
        }
        controller
    }

    /// Retry a failed start (or restart a running one) with fresh content.
    pub async fn reload(
        &mut self,
        storage: &Storage,
        content: &ContentService,
        source: &ContentSource,
        rng: StdRng,
    ) {
        *self = Self::start(storage, content, source, rng).await;
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// Why the session could not start, if it could not.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SessionState::Ready(_) => None,
            SessionState::Failed { reason } => Some(reason),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&StudySession> {
        match &self.state {
            SessionState::Ready(session) => Some(&**session),
            SessionState::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn progress_snapshot(&self) -> Option<ProgressSnapshot> {
        self.session().map(StudySession::progress)
    }

    /// Current view.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoaded` if content never loaded.
    pub fn view(&self) -> Result<SessionView, SessionError> {
        match &self.state {
            SessionState::Ready(session) => Ok(session.view()),
            SessionState::Failed { reason } => Err(SessionError::NotLoaded {
                reason: reason.clone(),
            }),
        }
    }

    /// Apply a command and run its effects.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoaded` if content never loaded. Storage
    /// failures are logged and reported through `Dispatched::persisted`.
    pub async fn dispatch(&mut self, command: Command) -> Result<Dispatched, SessionError> {
        let transition = match &mut self.state {
            SessionState::Ready(session) => session.apply(command),
            SessionState::Failed { reason } => {
                return Err(SessionError::NotLoaded {
                    reason: reason.clone(),
                });
            }
        };

        let persisted = self.run_effects(&transition).await;
        let view = self.view()?;
        Ok(Dispatched {
            outcome: transition.outcome,
            persisted,
            view,
        })
    }

    /// End the session and hand back its final progress.
    #[must_use]
    pub fn finish(self) -> Option<ProgressSnapshot> {
        let snapshot = self.progress_snapshot();
        if let Some(snapshot) = snapshot {
            info!(
                completed = snapshot.completed,
                total = snapshot.total,
                "study session finished"
            );
        }
        snapshot
    }

    async fn run_effects(&self, transition: &Transition) -> bool {
        let SessionState::Ready(session) = &self.state else {
            return false;
        };

        let mut persisted = true;
        for effect in &transition.effects {
            match effect {
                Effect::PersistProgress => {
                    if let Err(err) = self.progress.save(session.completion()).await {
                        warn!(error = %err, "could not persist progress; keeping in-memory state");
                        persisted = false;
                    }
                }
                Effect::PersistTheme(theme) => {
                    if let Err(err) = self.themes.save(*theme).await {
                        warn!(error = %err, "could not persist theme");
                    }
                }
                // The caller rebuilds the view once all writes are done.
                Effect::Render => {}
            }
        }
        persisted
    }
}
