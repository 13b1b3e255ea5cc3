//! Drag-and-drop state machine for moving tasks between quadrants.
//!
//! Gestures arrive as tagged [`DragIntent`]s, independent of how they were
//! captured (keyboard grab in the TUI, or anything else). The machine has
//! two states: idle, or dragging one task.
//!
//! - drag-over a quadrant reassigns the dragged task's status in UI state
//!   only, for live feedback; it is never persisted
//! - drag-end commits the placement through [`store::reorder`]
//! - drag-end without a usable target discards the gesture

use crate::store;
use crate::task::{Quadrant, Task, TaskId};

/// Element under the pointer: a whole quadrant or a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Quadrant(Quadrant),
    Task(TaskId),
}

impl DropTarget {
    /// Resolve a raw element identifier. Quadrant identifiers (`DO_FIRST`,
    /// ...) name quadrants, anything else names a task.
    pub fn resolve(id: &str) -> Self {
        match Quadrant::from_id(id) {
            Some(quadrant) => DropTarget::Quadrant(quadrant),
            None => DropTarget::Task(TaskId::from(id)),
        }
    }

    fn is_task(&self, id: &TaskId) -> bool {
        matches!(self, DropTarget::Task(t) if t == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Start,
    Over,
    End,
}

/// A single drag gesture step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragIntent {
    pub kind: DragKind,
    pub dragged: TaskId,
    pub target: Option<DropTarget>,
}

impl DragIntent {
    pub fn start(dragged: TaskId) -> Self {
        Self {
            kind: DragKind::Start,
            dragged,
            target: None,
        }
    }

    pub fn over(dragged: TaskId, target: Option<DropTarget>) -> Self {
        Self {
            kind: DragKind::Over,
            dragged,
            target,
        }
    }

    pub fn end(dragged: TaskId, target: Option<DropTarget>) -> Self {
        Self {
            kind: DragKind::End,
            dragged,
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(TaskId),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    pub fn dragged(&self) -> Option<&TaskId> {
        match self {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }
}

/// Result of feeding one intent to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing changed.
    Ignored,
    /// Drag began.
    Started,
    /// UI-only status change; the collection must not be saved.
    Previewed(Vec<Task>),
    /// Placement committed; the collection must be saved.
    Committed(Vec<Task>),
    /// Drag ended without a placement.
    Cancelled,
}

/// Apply `intent` to `state` over the current collection.
pub fn apply(state: &mut DragState, tasks: &[Task], intent: DragIntent) -> DragOutcome {
    match intent.kind {
        DragKind::Start => {
            if store::find(tasks, &intent.dragged).is_some() {
                *state = DragState::Dragging(intent.dragged);
                DragOutcome::Started
            } else {
                DragOutcome::Ignored
            }
        }
        DragKind::Over => drag_over(tasks, &intent),
        DragKind::End => {
            *state = DragState::Idle;
            drag_end(tasks, &intent)
        }
    }
}

fn drag_over(tasks: &[Task], intent: &DragIntent) -> DragOutcome {
    let Some(target) = &intent.target else {
        return DragOutcome::Ignored;
    };
    if target.is_task(&intent.dragged) {
        return DragOutcome::Ignored;
    }
    let DropTarget::Quadrant(quadrant) = target else {
        return DragOutcome::Ignored;
    };

    let Some(task) = store::find(tasks, &intent.dragged) else {
        return DragOutcome::Ignored;
    };
    if task.status == *quadrant {
        return DragOutcome::Ignored;
    }

    let preview = tasks
        .iter()
        .map(|t| {
            if t.id == intent.dragged {
                Task {
                    status: *quadrant,
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        })
        .collect();
    DragOutcome::Previewed(preview)
}

fn drag_end(tasks: &[Task], intent: &DragIntent) -> DragOutcome {
    let Some(target) = &intent.target else {
        return DragOutcome::Cancelled;
    };
    if target.is_task(&intent.dragged) || store::find(tasks, &intent.dragged).is_none() {
        return DragOutcome::Cancelled;
    }

    match target {
        DropTarget::Quadrant(quadrant) => {
            let index = store::count_in(tasks, *quadrant);
            DragOutcome::Committed(store::reorder(tasks, &intent.dragged, *quadrant, index))
        }
        DropTarget::Task(over_id) => {
            let Some(over) = store::find(tasks, over_id) else {
                return DragOutcome::Cancelled;
            };
            let index = store::position_in_quadrant(tasks, over_id).unwrap_or(0);
            DragOutcome::Committed(store::reorder(tasks, &intent.dragged, over.status, index))
        }
    }
}
