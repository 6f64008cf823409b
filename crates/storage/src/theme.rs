use std::sync::Arc;
use tracing::warn;

use crate::repository::{KeyValueStore, StorageError};

/// Storage key for the display theme flag.
pub const THEME_KEY: &str = "darkMode";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Only the literal `"true"` selects the dark theme.
    #[must_use]
    pub fn from_flag(raw: &str) -> Self {
        if raw == "true" { Theme::Dark } else { Theme::Light }
    }

    #[must_use]
    pub fn as_flag(self) -> &'static str {
        if self.is_dark() { "true" } else { "false" }
    }
}

/// Reads and writes the theme flag. Shares the progress backend.
#[derive(Clone)]
pub struct ThemeStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn load(&self) -> Theme {
        match self.kv.get(THEME_KEY).await {
            Ok(raw) => raw.as_deref().map_or(Theme::Light, Theme::from_flag),
            Err(err) => {
                warn!(error = %err, "could not read theme flag; using light theme");
                Theme::Light
            }
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend write fails.
    pub async fn save(&self, theme: Theme) -> Result<(), StorageError> {
        self.kv.set(THEME_KEY, theme.as_flag()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    #[test]
    fn flag_parsing_is_strict() {
        assert_eq!(Theme::from_flag("true"), Theme::Dark);
        assert_eq!(Theme::from_flag("false"), Theme::Light);
        assert_eq!(Theme::from_flag("TRUE"), Theme::Light);
        assert_eq!(Theme::from_flag("1"), Theme::Light);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[tokio::test]
    async fn theme_round_trips_through_store() {
        let store = InMemoryStore::new();
        let themes = ThemeStore::new(Arc::new(store.clone()));
        assert_eq!(themes.load().await, Theme::Light);

        themes.save(Theme::Dark).await.unwrap();
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("true"));
        assert_eq!(themes.load().await, Theme::Dark);
    }
}
