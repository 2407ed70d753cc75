use std::fs;
use std::path::PathBuf;

use serde_json::json;
use uuid::Uuid;

use todo_backend::models::Database;
use todo_backend::store::{JsonFileStore, Store};

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("todo-backend-test-{}.json", Uuid::new_v4()))
}

fn sample_database() -> Database {
    serde_json::from_value(json!({
        "users": {
            "alice": {
                "password": "secret",
                "todos": [
                    { "id": 1, "text": "a", "completed": false, "due": "tomorrow" },
                    { "id": 2, "text": "b", "completed": true }
                ]
            }
        }
    }))
    .expect("sample database deserializes")
}

#[tokio::test]
async fn missing_file_loads_empty_database() {
    let store = JsonFileStore::new(temp_path());

    let db = store.load().await.expect("load");
    assert!(db.users.is_empty());
}

#[tokio::test]
async fn save_then_load_roundtrip() {
    let path = temp_path();
    let store = JsonFileStore::new(&path);

    store.save(&sample_database()).await.expect("save");
    let db = store.load().await.expect("load");

    let alice = db.users.get("alice").expect("alice exists");
    assert_eq!(alice.password, "secret");
    assert_eq!(alice.todos.len(), 2);
    assert_eq!(alice.todos[0].id, 1);
    assert!(!alice.todos[0].completed);
    // Extra caller-supplied fields survive the disk roundtrip.
    assert_eq!(alice.todos[0].extra["due"], json!("tomorrow"));

    // The file itself is pretty-printed JSON with a top-level "users" key.
    let raw = fs::read_to_string(&path).expect("read file");
    assert!(raw.starts_with("{\n"));
    assert!(raw.contains("\"users\""));

    fs::remove_file(&path).ok();
}

#[tokio::test]
async fn save_overwrites_previous_contents() {
    let path = temp_path();
    let store = JsonFileStore::new(&path);

    store.save(&sample_database()).await.expect("save");
    store.save(&Database::default()).await.expect("save again");

    let db = store.load().await.expect("load");
    assert!(db.users.is_empty());

    fs::remove_file(&path).ok();
}

#[tokio::test]
async fn corrupt_file_is_an_error() {
    let path = temp_path();
    fs::write(&path, "not json {").expect("write corrupt file");

    let store = JsonFileStore::new(&path);
    assert!(store.load().await.is_err());

    fs::remove_file(&path).ok();
}
