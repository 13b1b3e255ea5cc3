//! Session directory persistence tests.

use std::fs;

use quadrant::config::Config;
use quadrant::persistence::Persistence;
use quadrant::task::Quadrant;

use crate::fixtures::{sample_board, TestSession};

#[test]
fn test_stored_value_is_bare_json_array() {
    let session = TestSession::new();
    session.persistence().save(&sample_board()).unwrap();

    let raw = fs::read_to_string(session.item_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = value.as_array().expect("top-level array");
    assert_eq!(items.len(), 4);

    let first = &items[0];
    assert_eq!(first["id"], "report");
    assert_eq!(first["content"], "report");
    assert_eq!(first["status"], "DO_FIRST");
    assert_eq!(first["completed"], false);
    assert_eq!(first["order"], 0);
}

#[test]
fn test_save_leaves_no_temp_file() {
    let session = TestSession::new();
    session.persistence().save(&sample_board()).unwrap();

    let names: Vec<String> = fs::read_dir(&session.path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["tasks.json"]);
}

#[test]
fn test_malformed_blob_loads_empty() {
    let session = TestSession::new();
    fs::create_dir_all(&session.path).unwrap();
    fs::write(session.item_path(), "{not json").unwrap();

    assert!(session.reload().is_empty());

    // The next save replaces the bad blob.
    let mut board = session.store();
    board.add("fresh", Quadrant::DoFirst).unwrap();
    assert_eq!(session.reload().len(), 1);
}

#[test]
fn test_missing_completed_field_defaults_false() {
    let session = TestSession::new();
    fs::create_dir_all(&session.path).unwrap();
    fs::write(
        session.item_path(),
        r#"[{"id":"legacy","content":"old","status":"DELEGATE","order":3}]"#,
    )
    .unwrap();

    let tasks = session.reload();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, Quadrant::Delegate);
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].order, 3);
}

#[test]
fn test_configured_storage_key_names_the_file() {
    let session = TestSession::new();
    let config = Config {
        storage_key: Some("board".to_string()),
        ..session.config()
    };

    let persistence = Persistence::from_config(&config);
    assert!(persistence.is_attached());
    persistence.save(&sample_board()).unwrap();

    assert!(session.path.join("board.json").exists());
    assert!(!session.item_path().exists());
    assert_eq!(Persistence::from_config(&config).load().len(), 4);
}

#[test]
fn test_clear_removes_the_board() {
    let session = TestSession::new();
    let persistence = session.persistence();
    persistence.save(&sample_board()).unwrap();

    persistence.clear().unwrap();
    assert!(!session.item_path().exists());
    assert!(session.reload().is_empty());

    // Clearing twice is fine.
    persistence.clear().unwrap();
}

#[test]
fn test_detached_persistence_is_noop() {
    let persistence = Persistence::detached();
    assert!(!persistence.is_attached());
    persistence.save(&sample_board()).unwrap();
    assert!(persistence.load().is_empty());
    persistence.clear().unwrap();
}

#[test]
fn test_fractional_order_still_loads_board() {
    let session = TestSession::new();
    fs::create_dir_all(&session.path).unwrap();
    fs::write(
        session.item_path(),
        r#"[{"id":"a","content":"kept","status":"DO_FIRST","completed":false,"order":1.5},
            {"id":"b","content":"also kept","status":"ELIMINATE","completed":true,"order":2}]"#,
    )
    .unwrap();

    let tasks = session.reload();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].order, 1);
    assert_eq!(tasks[1].content, "also kept");
}

#[test]
fn test_add_after_largest_order_does_not_overflow() {
    let session = TestSession::new();
    fs::create_dir_all(&session.path).unwrap();
    fs::write(
        session.item_path(),
        format!(
            r#"[{{"id":"a","content":"last","status":"DO_FIRST","completed":false,"order":{}}}]"#,
            i64::MAX
        ),
    )
    .unwrap();

    let mut board = session.store();
    board.add("after", Quadrant::DoFirst).unwrap();

    let tasks = session.reload();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].content, "after");
    assert_eq!(tasks[1].order, i64::MAX);
}

#[test]
fn test_storage_key_with_path_is_rejected() {
    let session = TestSession::new();
    let config = Config {
        storage_key: Some("../escape".to_string()),
        ..session.config()
    };

    let persistence = Persistence::from_config(&config);
    assert!(persistence.save(&sample_board()).is_err());
    assert!(persistence.load().is_empty());
    assert!(!session.temp_dir.path().join("escape.json").exists());
}
