use crate::task::{Quadrant, TaskId};
use crate::tea::{Mode, Notification};
use std::sync::atomic::{AtomicU64, Ordering};

/// One task row as the UI sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: TaskId,
    pub content: String,
    pub completed: bool,
    /// The task is currently grabbed.
    pub is_dragged: bool,
    /// The grabbed task would be dropped onto this row.
    pub is_drop_target: bool,
}

/// One quadrant's filtered task list.
#[derive(Debug, Clone)]
pub struct QuadrantView {
    pub quadrant: Quadrant,
    pub tasks: Vec<TaskView>,
    /// Selected row, only set on the focused quadrant.
    pub selected: Option<usize>,
    /// The grabbed task would be appended to this quadrant.
    pub is_drop_target: bool,
}

impl QuadrantView {
    pub fn empty(quadrant: Quadrant) -> Self {
        Self {
            quadrant,
            tasks: Vec::new(),
            selected: None,
            is_drop_target: false,
        }
    }

    /// (completed, total) for the column heading.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|t| t.completed).count();
        (done, self.tasks.len())
    }
}

static VERSION_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct RenderState {
    pub version: u64,
    /// Indexed by `Quadrant::index`.
    pub quadrants: [QuadrantView; 4],
    pub focus: Quadrant,
    pub mode: Mode,
    /// Grabbed task, drawn as a floating preview.
    pub drag_preview: Option<TaskView>,
    pub input_buffer: String,
    /// Target quadrant shown in the add prompt.
    pub pending_quadrant: Quadrant,
    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,
    /// False when no session store is available - shown as a badge.
    pub persisted: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            version: 0,
            quadrants: Quadrant::ALL.map(QuadrantView::empty),
            focus: Quadrant::DoFirst,
            mode: Mode::Board,
            drag_preview: None,
            input_buffer: String::new(),
            pending_quadrant: Quadrant::DoFirst,
            notification: None,
            show_keymap: false,
            persisted: true,
        }
    }
}
