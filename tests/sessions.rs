//! Session lifecycle against the file-backed key-value store.

use aerodoc::sessions::{
    ChatMessage, ChatSession, ChatSessionStore, DEFAULT_TITLE, STORAGE_KEY, SEED_GREETING,
};
use aerodoc::storage::{FileKvStore, KeyValueStore};
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> ChatSessionStore {
    let kv = FileKvStore::new(dir.path().to_path_buf()).unwrap();
    ChatSessionStore::load(Box::new(kv))
}

#[test]
fn fresh_store_starts_with_one_seeded_session() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);

    assert_eq!(store.len(), 1);
    let session = store.active_session();
    assert_eq!(session.title, DEFAULT_TITLE);
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].text, SEED_GREETING);
}

#[test]
fn sessions_survive_a_reload() {
    let dir = TempDir::new().unwrap();
    let snapshot: Vec<ChatSession> = {
        let mut store = file_store(&dir);
        let id = store.active_id().to_string();
        store
            .append_message(&id, ChatMessage::user("Какой порядок запуска ВС?"))
            .unwrap();
        store.create_session();
        store.sessions().to_vec()
    };

    let restored = file_store(&dir);
    assert_eq!(restored.sessions(), snapshot.as_slice());
}

#[test]
fn corrupt_file_falls_back_to_seeded_session() {
    let dir = TempDir::new().unwrap();
    let kv = FileKvStore::new(dir.path().to_path_buf()).unwrap();
    kv.set(STORAGE_KEY, "definitely not json").unwrap();

    let store = ChatSessionStore::load(Box::new(kv));
    assert_eq!(store.len(), 1);
    assert_eq!(store.active_session().title, DEFAULT_TITLE);
}

#[test]
fn first_question_becomes_the_title_and_history_grows() {
    let dir = TempDir::new().unwrap();
    let mut store = file_store(&dir);
    let id = store.active_id().to_string();

    store
        .append_message(&id, ChatMessage::user("Как подготовиться к буксировке ВС?"))
        .unwrap();

    let session = store.active_session();
    // 34 characters, cut at 28 with the ellipsis marker.
    assert_eq!(session.title, "Как подготовиться к буксиров…");
    assert_eq!(session.messages.len(), 2);
}

#[test]
fn deleting_everything_always_leaves_a_usable_store() {
    let dir = TempDir::new().unwrap();
    let mut store = file_store(&dir);
    store.create_session();
    store.create_session();

    let ids: Vec<String> = store.sessions().iter().map(|s| s.id.clone()).collect();
    for id in &ids {
        store.delete_session(id);
        assert!(!store.is_empty());
        let active = store.active_id().to_string();
        assert!(store.sessions().iter().any(|s| s.id == active));
    }

    // The last delete reseeded; the fresh session is active and usable.
    let id = store.active_id().to_string();
    assert!(!ids.contains(&id));
    store.append_message(&id, ChatMessage::user("вопрос")).unwrap();
}

#[test]
fn updated_at_ordering_drives_the_sidebar() {
    let dir = TempDir::new().unwrap();
    let mut store = file_store(&dir);
    let first = store.active_id().to_string();
    let second = store.create_session();

    // Newest first by default.
    let order: Vec<&str> = store
        .sessions_by_recency()
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(order, vec![second.as_str(), first.as_str()]);
}
