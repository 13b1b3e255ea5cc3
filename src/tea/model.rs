//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model is pure application state - no channels, no handles, no runtime infrastructure.

use crate::config::Config;
use crate::drag::{DragState, DropTarget};
use crate::persistence::Persistence;
use crate::render::{next_version, QuadrantView, RenderState, TaskView};
use crate::store;
use crate::task::{Quadrant, Task, TaskId};

/// Level of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Error notification - displayed in red with "Error:" prefix
    Error,
    /// Informational notification - displayed in green
    Info,
}

/// A notification message to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Application UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Board,
    Input(InputKind),
    /// A task is grabbed and follows the cursor until dropped.
    Dragging,
}

/// Types of input prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    AddTask,
    EditTask,
    ConfirmDelete,
}

impl InputKind {
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::AddTask => "New task",
            InputKind::EditTask => "Edit task",
            InputKind::ConfirmDelete => "Delete?",
        }
    }
}

/// Pure application state - the single source of truth.
pub struct Model {
    // Core state
    pub tasks: Vec<Task>,
    pub focus: Quadrant,
    /// Selected row per quadrant, indexed by `Quadrant::index`.
    pub selected: [usize; 4],
    pub mode: Mode,

    // Drag state
    pub drag: DragState,
    /// Element currently under the grabbed task.
    pub drop_target: Option<DropTarget>,
    /// Collection as it was when the drag started, restored on cancel.
    pub drag_origin: Option<Vec<Task>>,

    // Input state
    pub input_buffer: String,
    pub notification: Option<Notification>,
    /// Target quadrant of the add dialog.
    pub pending_quadrant: Quadrant,
    pub pending_edit: Option<TaskId>,
    pub pending_delete: Option<TaskId>,

    // UI toggle state
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,

    /// Whether saves reach a session store (false: nothing survives exit).
    pub persisted: bool,

    // Config (immutable after init)
    pub config: Config,
}

impl Model {
    pub fn new(tasks: Vec<Task>, config: Config, persisted: bool) -> Self {
        let focus = config.effective_default_quadrant();
        Self {
            tasks,
            focus,
            selected: [0; 4],
            mode: Mode::default(),
            drag: DragState::Idle,
            drop_target: None,
            drag_origin: None,
            input_buffer: String::new(),
            notification: None,
            pending_quadrant: focus,
            pending_edit: None,
            pending_delete: None,
            show_keymap: false,
            dirty: true,
            persisted,
            config,
        }
    }

    /// Load model from the session store.
    pub fn load(config: Config, persistence: &Persistence) -> Self {
        Self::new(persistence.load(), config, persistence.is_attached())
    }

    // Accessor methods for update and UI

    /// Tasks in `quadrant`, in board order.
    pub fn quadrant_tasks(&self, quadrant: Quadrant) -> Vec<&Task> {
        store::in_quadrant(&self.tasks, quadrant)
    }

    pub fn selected_index(&self, quadrant: Quadrant) -> usize {
        self.selected[quadrant.index()]
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.quadrant_tasks(self.focus)
            .get(self.selected_index(self.focus))
            .copied()
    }

    /// Point the selection of the task's quadrant at task `id` and focus it.
    pub fn select_task(&mut self, id: &TaskId) {
        let Some(task) = store::find(&self.tasks, id) else {
            return;
        };
        let quadrant = task.status;
        if let Some(pos) = store::position_in_quadrant(&self.tasks, id) {
            self.focus = quadrant;
            self.selected[quadrant.index()] = pos;
        }
    }

    /// Keep every selection inside its quadrant.
    pub fn clamp_selection(&mut self) {
        for quadrant in Quadrant::ALL {
            let count = store::count_in(&self.tasks, quadrant);
            let sel = &mut self.selected[quadrant.index()];
            *sel = (*sel).min(count.saturating_sub(1));
        }
    }

    /// Create an immutable snapshot for the render thread.
    ///
    /// Each snapshot gets a monotonically increasing version number,
    /// enabling the render thread to skip redundant renders.
    pub fn snapshot(&self) -> RenderState {
        let dragged = self.drag.dragged();
        let hovered = match &self.drop_target {
            Some(DropTarget::Task(id)) => Some(id),
            _ => None,
        };

        let quadrants = Quadrant::ALL.map(|quadrant| {
            let tasks: Vec<TaskView> = self
                .quadrant_tasks(quadrant)
                .into_iter()
                .map(|t| TaskView {
                    id: t.id.clone(),
                    content: t.content.clone(),
                    completed: t.completed,
                    is_dragged: dragged == Some(&t.id),
                    is_drop_target: hovered == Some(&t.id),
                })
                .collect();
            let selected = (quadrant == self.focus && !tasks.is_empty())
                .then(|| self.selected_index(quadrant));
            QuadrantView {
                quadrant,
                tasks,
                selected,
                is_drop_target: self.drop_target == Some(DropTarget::Quadrant(quadrant)),
            }
        });

        let drag_preview = dragged
            .and_then(|id| store::find(&self.tasks, id))
            .map(|t| TaskView {
                id: t.id.clone(),
                content: t.content.clone(),
                completed: t.completed,
                is_dragged: true,
                is_drop_target: false,
            });

        RenderState {
            version: next_version(),
            quadrants,
            focus: self.focus,
            mode: self.mode,
            drag_preview,
            input_buffer: self.input_buffer.clone(),
            pending_quadrant: self.pending_quadrant,
            notification: self.notification.clone(),
            show_keymap: self.show_keymap,
            persisted: self.persisted,
        }
    }
}
