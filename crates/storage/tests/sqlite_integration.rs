use study_core::CompletionState;
use study_core::model::{CollectionKind, ItemId};
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteStore;
use storage::{PROGRESS_KEY, Theme};

#[tokio::test]
async fn sqlite_kv_overwrites_and_removes() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_basic?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert_eq!(store.get("missing").await.unwrap(), None);

    store.set("k", "first").await.unwrap();
    store.set("k", "second").await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));

    store.remove("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("first migrate");
    store.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn sqlite_progress_round_trip() {
    let storage = Storage::sqlite("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("open storage");
    let gateway = storage.progress();

    let mut state = CompletionState::new();
    state.mark_complete(CollectionKind::Lecture, ItemId::new(3));
    state.mark_complete(CollectionKind::Flashcard, ItemId::new(0));
    state.mark_complete(CollectionKind::Question, ItemId::new(2));
    gateway.save(&state).await.unwrap();

    assert_eq!(gateway.load().await, state);
}

#[tokio::test]
async fn sqlite_corrupt_progress_loads_empty() {
    let storage = Storage::sqlite("sqlite:file:memdb_corrupt?mode=memory&cache=shared")
        .await
        .expect("open storage");
    storage.kv.set(PROGRESS_KEY, "not json").await.unwrap();

    let state = storage.progress().load().await;
    assert_eq!(state, CompletionState::new());
}

#[tokio::test]
async fn sqlite_theme_shares_backend_with_progress() {
    let storage = Storage::sqlite("sqlite:file:memdb_theme?mode=memory&cache=shared")
        .await
        .expect("open storage");

    storage.theme().save(Theme::Dark).await.unwrap();
    storage.progress().save(&CompletionState::new()).await.unwrap();

    assert_eq!(storage.theme().load().await, Theme::Dark);
    assert!(storage.kv.get(PROGRESS_KEY).await.unwrap().is_some());
}
