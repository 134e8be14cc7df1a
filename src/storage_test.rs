use super::*;

fn temp_session_path() -> PathBuf {
    std::env::temp_dir().join(format!("postboard-{}", uuid::Uuid::new_v4())).join("session.json")
}

// =============================================================
// load_stored_session
// =============================================================

#[test]
fn absent_key_loads_empty_session() {
    let storage = MemoryStorage::new();
    assert_eq!(load_stored_session(&storage).unwrap(), StoredSession::default());
}

#[test]
fn valid_json_loads_session() {
    let storage = MemoryStorage::with_value(r#"{"userId":"u1","token":"t1"}"#);
    let stored = load_stored_session(&storage).unwrap();
    assert_eq!(stored, StoredSession { user_id: "u1".into(), token: "t1".into() });
}

#[test]
fn malformed_json_is_a_parse_error() {
    let storage = MemoryStorage::with_value("{oops");
    let err = load_stored_session(&storage).unwrap_err();
    assert!(matches!(err, StoreError::SessionParse(_)));
}

#[test]
fn save_then_load_through_memory() {
    let storage = MemoryStorage::new();
    let stored = StoredSession { user_id: "u9".into(), token: "tok".into() };
    save_stored_session(&storage, &stored).unwrap();
    assert_eq!(storage.read().unwrap().as_deref(), Some(r#"{"userId":"u9","token":"tok"}"#));
    storage.remove().unwrap();
    assert_eq!(storage.read().unwrap(), None);
}

// =============================================================
// FileStorage
// =============================================================

#[test]
fn file_storage_creates_parent_dirs_and_round_trips() {
    let path = temp_session_path();
    let storage = FileStorage::new(&path);
    assert_eq!(storage.read().unwrap(), None);

    storage.write(r#"{"userId":"u1","token":"t1"}"#).unwrap();
    assert!(path.exists());
    assert_eq!(load_stored_session(&storage).unwrap().token, "t1");

    storage.remove().unwrap();
    assert!(!path.exists());
    if let Some(parent) = path.parent() {
        let _ = std::fs::remove_dir(parent);
    }
}

#[test]
fn file_storage_remove_missing_is_ok() {
    let storage = FileStorage::new(temp_session_path());
    assert!(storage.remove().is_ok());
}
