//! End-to-end board tests over a real session directory.
//!
//! Every mutating step is followed by a reload through a fresh
//! persistence, the way a new process would see the store.

use quadrant::store;
use quadrant::task::Quadrant;

use crate::fixtures::{contents, TestSession};

/// Test: E2E Happy Path
/// Given empty storage
/// When tasks are added, moved, completed and deleted
/// Then each reload returns exactly the state just saved
#[test]
fn test_e2e_add_move_complete_delete() {
    let session = TestSession::new();
    let mut board = session.store();
    assert!(board.tasks().is_empty());

    let report = board.add("Write report", Quadrant::DoFirst).unwrap().unwrap();
    let reloaded = session.reload();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].content, "Write report");
    assert_eq!(reloaded[0].status, Quadrant::DoFirst);
    assert_eq!(reloaded[0].order, 0);
    assert!(!reloaded[0].completed);

    let client = board.add("Call client", Quadrant::DoLater).unwrap().unwrap();
    let reloaded = session.reload();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[1].order, 1);

    board.reorder(&report, Quadrant::DoLater, 0).unwrap();
    let reloaded = session.reload();
    assert_eq!(reloaded, board.tasks());
    assert_eq!(
        contents(&reloaded, Quadrant::DoLater),
        ["Write report", "Call client"]
    );
    assert!(contents(&reloaded, Quadrant::DoFirst).is_empty());

    board.complete(&report, true).unwrap();
    let reloaded = session.reload();
    assert!(store::find(&reloaded, &report).unwrap().completed);

    board.delete(&client).unwrap();
    let reloaded = session.reload();
    assert_eq!(reloaded.len(), 1);
    assert!(store::find(&reloaded, &client).is_none());
    assert_eq!(reloaded[0].content, "Write report");
    assert_eq!(reloaded[0].status, Quadrant::DoLater);
    assert!(reloaded[0].completed);
}

/// Test: a second store opened on the same session sees earlier writes.
#[test]
fn test_e2e_state_survives_new_store() {
    let session = TestSession::new();
    {
        let mut board = session.store();
        board.add("a", Quadrant::Delegate).unwrap();
        board.add("b", Quadrant::Delegate).unwrap();
    }

    let mut board = session.store();
    assert_eq!(contents(board.tasks(), Quadrant::Delegate), ["a", "b"]);

    let c = board.add("c", Quadrant::Delegate).unwrap().unwrap();
    assert_eq!(store::find(board.tasks(), &c).unwrap().order, 2);
}

/// Test: blank adds are rejected at the store boundary and write nothing.
#[test]
fn test_e2e_blank_add_is_rejected() {
    let session = TestSession::new();
    let mut board = session.store();

    assert!(board.add("   ", Quadrant::DoFirst).unwrap().is_none());
    assert!(board.add("", Quadrant::DoFirst).unwrap().is_none());
    assert!(board.tasks().is_empty());
    assert!(!session.item_path().exists());
}

/// Test: edits with blank content keep the previous content on disk.
#[test]
fn test_e2e_blank_edit_keeps_content() {
    let session = TestSession::new();
    let mut board = session.store();
    let id = board.add("Draft", Quadrant::DoFirst).unwrap().unwrap();

    board.update(&id, "  ").unwrap();
    assert_eq!(session.reload()[0].content, "Draft");

    board.update(&id, "Final").unwrap();
    assert_eq!(session.reload()[0].content, "Final");
}

/// Test: completing twice is the same as once.
#[test]
fn test_e2e_complete_is_idempotent() {
    let session = TestSession::new();
    let mut board = session.store();
    let id = board.add("Pay rent", Quadrant::DoFirst).unwrap().unwrap();

    board.complete(&id, true).unwrap();
    let once = session.reload();
    board.complete(&id, true).unwrap();
    assert_eq!(session.reload(), once);
}

/// Test: operations on unknown ids change nothing.
#[test]
fn test_e2e_unknown_ids_are_noops() {
    let session = TestSession::new();
    let mut board = session.store();
    board.add("keep", Quadrant::DoFirst).unwrap();
    let before = session.reload();

    let ghost = "does-not-exist".into();
    board.update(&ghost, "x").unwrap();
    board.complete(&ghost, true).unwrap();
    board.reorder(&ghost, Quadrant::Eliminate, 0).unwrap();
    board.delete(&ghost).unwrap();

    assert_eq!(session.reload(), before);
}
