use dermadetect_app::storage::{AUTH_TOKEN_KEY, FileStore, KeyValueStore, MemoryStore};

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    FileStore::new(&path).set(AUTH_TOKEN_KEY, "tok-1").unwrap();
    FileStore::new(&path).set("theme", "dark").unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
    assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(reopened.get("missing").unwrap(), None);
}

#[test]
fn file_store_remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));

    store.remove(AUTH_TOKEN_KEY).unwrap();
    store.set(AUTH_TOKEN_KEY, "tok-1").unwrap();
    store.remove(AUTH_TOKEN_KEY).unwrap();
    store.remove(AUTH_TOKEN_KEY).unwrap();
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("never-written.json"));
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert!(!store.path().exists());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(FileStore::new(&path).get(AUTH_TOKEN_KEY).is_err());
}

#[test]
fn memory_store_overwrites() {
    let store = MemoryStore::new();
    store.set(AUTH_TOKEN_KEY, "a").unwrap();
    store.set(AUTH_TOKEN_KEY, "b").unwrap();
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("b"));
    store.remove(AUTH_TOKEN_KEY).unwrap();
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
}
