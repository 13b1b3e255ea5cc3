//! Performance thresholds for large boards.
//!
//! The thresholds are generous; they catch accidental quadratic blowups,
//! not micro-regressions.

use std::time::Instant;

use quadrant::store;
use quadrant::task::{Quadrant, Task};

use crate::fixtures::TestSession;

fn large_board(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| Task::new(format!("task {i}"), Quadrant::ALL[i % 4], i as i64))
        .collect()
}

#[test]
fn test_reorder_on_large_board() {
    let tasks = large_board(5000);
    let ids: Vec<_> = tasks.iter().take(100).map(|t| t.id.clone()).collect();

    let start = Instant::now();
    let mut current = tasks;
    for (i, id) in ids.iter().enumerate() {
        current = store::reorder(&current, id, Quadrant::ALL[(i + 1) % 4], i);
    }
    let elapsed = start.elapsed();

    assert_eq!(current.len(), 5000);
    assert!(
        elapsed.as_millis() < 1000,
        "100 reorders of 5000 tasks took {:?}",
        elapsed
    );
}

#[test]
fn test_save_and_load_large_board() {
    let session = TestSession::new();
    let persistence = session.persistence();
    let tasks = large_board(2000);

    let start = Instant::now();
    persistence.save(&tasks).unwrap();
    let loaded = session.reload();
    let elapsed = start.elapsed();

    assert_eq!(loaded, tasks);
    assert!(
        elapsed.as_millis() < 1000,
        "Save + load of 2000 tasks took {:?}",
        elapsed
    );
}
