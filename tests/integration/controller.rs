//! Keyboard-driven board tests.
//!
//! The controller runs through `dispatch`, so save commands really hit the
//! session directory.

use crossterm::event::KeyCode;

use quadrant::drag::{DragIntent, DropTarget};
use quadrant::tea::{Message, Mode};
use quadrant::task::Quadrant;

use crate::fixtures::{contents, sample_board, BoardHarness, TestSession};

fn harness_with_sample(session: &TestSession) -> BoardHarness {
    session.persistence().save(&sample_board()).unwrap();
    BoardHarness::new(session.persistence())
}

/// Test: the keyboard flow from the empty board to a saved task.
#[test]
fn test_keyboard_add_is_saved() {
    let session = TestSession::new();
    let mut board = BoardHarness::new(session.persistence());

    board.press(KeyCode::Char('2'));
    board.add("Plan offsite");

    let stored = session.reload();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, Quadrant::DoLater);
    assert_eq!(stored[0].content, "Plan offsite");
}

/// Test: an empty add keeps the prompt open and writes nothing.
#[test]
fn test_keyboard_blank_add_keeps_prompt() {
    let session = TestSession::new();
    let mut board = BoardHarness::new(session.persistence());

    board.add("  ");
    assert!(matches!(board.model.mode, Mode::Input(_)));
    assert!(board.model.notification.is_some());
    assert!(!session.item_path().exists());

    // Still typing in the same prompt
    board.type_text("real");
    board.press(KeyCode::Enter);
    assert_eq!(session.reload()[0].content, "  real");
}

/// Test: toggling completion persists.
#[test]
fn test_keyboard_complete_is_saved() {
    let session = TestSession::new();
    let mut board = harness_with_sample(&session);

    board.press(KeyCode::Char('x'));
    let stored = session.reload();
    assert!(stored[0].completed);
    assert!(!stored[1].completed);
}

/// Test: delete requires confirmation, then persists.
#[test]
fn test_keyboard_delete_is_saved() {
    let session = TestSession::new();
    let mut board = harness_with_sample(&session);

    board.press(KeyCode::Char('j'));
    board.press(KeyCode::Char('d'));
    assert_eq!(session.reload().len(), 4, "nothing deleted before confirm");

    board.press(KeyCode::Enter);
    assert_eq!(contents(&session.reload(), Quadrant::DoFirst), ["report"]);
}

/// Test: Keyboard drag across quadrants
/// Given a grabbed task hovering over another quadrant
/// Then nothing is written until the drop
#[test]
fn test_keyboard_drag_writes_only_on_drop() {
    let session = TestSession::new();
    let mut board = harness_with_sample(&session);
    let before = session.reload();

    board.press(KeyCode::Char('m'));
    board.press(KeyCode::Char('3'));
    assert_eq!(board.model.tasks[0].status, Quadrant::Delegate);
    assert_eq!(session.reload(), before, "drag-over is not persisted");

    board.press(KeyCode::Enter);
    let stored = session.reload();
    assert_eq!(contents(&stored, Quadrant::Delegate), ["report"]);
    assert_eq!(contents(&stored, Quadrant::DoFirst), ["invoice"]);
    assert_eq!(board.model.mode, Mode::Board);
    let notification = board.model.notification.as_ref().unwrap();
    assert_eq!(notification.message, "Moved to Delegate");
}

/// Test: a drag released with Esc restores the board and writes nothing.
#[test]
fn test_keyboard_drag_cancel_restores() {
    let session = TestSession::new();
    let mut board = harness_with_sample(&session);
    let before = session.reload();

    board.press(KeyCode::Char('m'));
    board.press(KeyCode::Char('l'));
    board.press(KeyCode::Char('l'));
    board.press(KeyCode::Esc);

    assert_eq!(board.model.tasks, before);
    assert_eq!(session.reload(), before);
}

/// Test: dropping onto a task in another quadrant takes its slot.
#[test]
fn test_drop_on_task_in_other_quadrant() {
    let session = TestSession::new();
    let mut board = harness_with_sample(&session);

    let intents = [
        DragIntent::start("newsletter".into()),
        DragIntent::over("newsletter".into(), Some(DropTarget::resolve("DO_FIRST"))),
        DragIntent::over("newsletter".into(), Some(DropTarget::resolve("invoice"))),
        DragIntent::end("newsletter".into(), Some(DropTarget::resolve("invoice"))),
    ];
    for intent in intents {
        board.send(Message::Drag(intent));
    }

    let stored = session.reload();
    assert_eq!(
        contents(&stored, Quadrant::DoFirst),
        ["report", "newsletter", "invoice"]
    );
    assert!(contents(&stored, Quadrant::Eliminate).is_empty());
}

/// Test: dropping back onto itself is a no-op on disk.
#[test]
fn test_drop_on_self_writes_nothing() {
    let session = TestSession::new();
    let mut board = harness_with_sample(&session);
    let before = session.reload();

    board.send(Message::Drag(DragIntent::start("client".into())));
    board.send(Message::Drag(DragIntent::end(
        "client".into(),
        Some(DropTarget::resolve("client")),
    )));

    assert_eq!(session.reload(), before);
    assert_eq!(board.model.mode, Mode::Board);
}

/// Test: the board opens on whatever is already stored.
#[test]
fn test_controller_loads_existing_board() {
    let session = TestSession::new();
    let board = harness_with_sample(&session);

    let snapshot = board.model.snapshot();
    assert_eq!(snapshot.quadrants[0].tasks.len(), 2);
    assert_eq!(snapshot.quadrants[1].tasks.len(), 1);
    assert!(snapshot.quadrants[2].tasks.is_empty());
    assert_eq!(snapshot.quadrants[3].tasks[0].content, "newsletter");
    assert!(snapshot.persisted);
}

#[test]
fn test_quit_key() {
    let session = TestSession::new();
    let mut board = BoardHarness::new(session.persistence());
    assert!(board.press(KeyCode::Char('q')));
}
