//! Persistence of completion state under a single fixed key.

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use study_core::CompletionState;
use study_core::model::{CollectionKind, ItemId};
use tracing::{debug, warn};

use crate::repository::{KeyValueStore, StorageError};

/// Storage key holding the serialized [`ProgressRecord`].
pub const PROGRESS_KEY: &str = "maritimeEthicsProgress";

/// Persisted shape of the three completion sets.
///
/// Missing or `null` fields read as empty lists. The older `doneFC` / `doneQ`
/// field names are accepted on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub read_lectures: Vec<ItemId>,
    #[serde(default, alias = "doneFC", deserialize_with = "null_as_empty")]
    pub done_flashcards: Vec<ItemId>,
    #[serde(default, alias = "doneQ", deserialize_with = "null_as_empty")]
    pub done_questions: Vec<ItemId>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ItemId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ItemId>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProgressRecord {
    #[must_use]
    pub fn from_state(state: &CompletionState) -> Self {
        Self {
            read_lectures: state.sorted_ids(CollectionKind::Lecture),
            done_flashcards: state.sorted_ids(CollectionKind::Flashcard),
            done_questions: state.sorted_ids(CollectionKind::Question),
        }
    }

    #[must_use]
    pub fn into_state(self) -> CompletionState {
        CompletionState::from_ids(
            self.read_lectures,
            self.done_flashcards,
            self.done_questions,
        )
    }

    /// Parse a stored value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the text is not JSON or does not
    /// have the record's shape.
    pub fn decode(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

/// Mirrors completion state into a [`KeyValueStore`]. Holds no state itself.
#[derive(Clone)]
pub struct ProgressGateway {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProgressGateway {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            key: PROGRESS_KEY.to_owned(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the stored record with `state`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the backend write fails.
    pub async fn save(&self, state: &CompletionState) -> Result<(), StorageError> {
        let raw = ProgressRecord::from_state(state).encode()?;
        self.kv.set(&self.key, &raw).await?;
        debug!(key = %self.key, completed = state.total_completed(), "progress saved");
        Ok(())
    }

    /// Read the stored record.
    ///
    /// Never fails: an absent key, an unreadable backend, or a malformed value
    /// all yield empty state. The latter two are logged.
    pub async fn load(&self) -> CompletionState {
        let raw = match self.kv.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no stored progress");
                return CompletionState::new();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "could not read stored progress; starting empty");
                return CompletionState::new();
            }
        };

        match ProgressRecord::decode(&raw) {
            Ok(record) => record.into_state(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored progress is malformed; starting empty");
                CompletionState::new()
            }
        }
    }

    /// Delete the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend write fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn gateway() -> (InMemoryStore, ProgressGateway) {
        let store = InMemoryStore::new();
        let gateway = ProgressGateway::new(Arc::new(store.clone()));
        (store, gateway)
    }

    fn sample_state() -> CompletionState {
        CompletionState::from_ids(
            [ItemId::new(2), ItemId::new(0)],
            [ItemId::new(4)],
            [ItemId::new(1), ItemId::new(3)],
        )
    }

    #[tokio::test]
    async fn load_after_save_round_trips() {
        let (_, gateway) = gateway();
        let state = sample_state();
        gateway.save(&state).await.unwrap();
        assert_eq!(gateway.load().await, state);
    }

    #[tokio::test]
    async fn save_writes_the_documented_layout() {
        let (store, gateway) = gateway();
        gateway.save(&sample_state()).await.unwrap();

        let raw = store.get(PROGRESS_KEY).await.unwrap().unwrap();
        assert_eq!(
            raw,
            r#"{"readLectures":[0,2],"doneFlashcards":[4],"doneQuestions":[1,3]}"#
        );
    }

    #[tokio::test]
    async fn absent_key_loads_empty() {
        let (_, gateway) = gateway();
        assert!(gateway.load().await.is_empty());
    }

    #[tokio::test]
    async fn non_json_loads_empty() {
        let (store, gateway) = gateway();
        store.set(PROGRESS_KEY, "not json").await.unwrap();
        assert_eq!(gateway.load().await, CompletionState::new());
    }

    #[tokio::test]
    async fn wrong_shape_loads_empty() {
        let (store, gateway) = gateway();
        for raw in [
            "[1,2,3]",
            "null",
            "42",
            r#"{"readLectures":"oops"}"#,
            r#"{"doneFlashcards":[-1]}"#,
        ] {
            store.set(PROGRESS_KEY, raw).await.unwrap();
            assert!(gateway.load().await.is_empty(), "expected empty for {raw}");
        }
    }

    #[tokio::test]
    async fn missing_and_null_fields_default_to_empty() {
        let (store, gateway) = gateway();
        store
            .set(PROGRESS_KEY, r#"{"readLectures":[1],"doneQuestions":null}"#)
            .await
            .unwrap();

        let state = gateway.load().await;
        assert!(state.is_complete(CollectionKind::Lecture, ItemId::new(1)));
        assert_eq!(state.total_completed(), 1);
    }

    #[tokio::test]
    async fn legacy_field_names_are_read() {
        let (store, gateway) = gateway();
        store
            .set(PROGRESS_KEY, r#"{"readLectures":[],"doneFC":[0,1],"doneQ":[2]}"#)
            .await
            .unwrap();

        let state = gateway.load().await;
        assert_eq!(state.count(CollectionKind::Flashcard), 2);
        assert!(state.is_complete(CollectionKind::Question, ItemId::new(2)));
    }

    #[tokio::test]
    async fn save_overwrites_and_clear_removes() {
        let (store, gateway) = gateway();
        gateway.save(&sample_state()).await.unwrap();
        gateway.save(&CompletionState::new()).await.unwrap();
        assert!(gateway.load().await.is_empty());

        gateway.save(&sample_state()).await.unwrap();
        gateway.clear().await.unwrap();
        assert_eq!(store.get(PROGRESS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn custom_key_is_isolated() {
        let (store, gateway) = gateway();
        let other = gateway.clone().with_key("otherDeck");
        other.save(&sample_state()).await.unwrap();

        assert!(gateway.load().await.is_empty());
        assert!(store.get("otherDeck").await.unwrap().is_some());
        assert_eq!(other.key(), "otherDeck");
    }
}
