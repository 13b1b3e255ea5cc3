//! Pure update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute. Every intent that changes
//! the task collection goes through a `store` transform and emits
//! `Command::SaveTasks`; drag previews are the one exception.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::drag::{self, DragIntent, DragKind, DragOutcome, DropTarget};
use crate::store;
use crate::task::{Quadrant, TaskId};
use crate::{qlog, qlog_debug, qlog_warn};

use super::command::Command;
use super::message::Message;
use super::model::{InputKind, Mode, Model, Notification, NotificationLevel};

/// Helper to set an error notification and mark model as dirty.
fn set_error(model: &mut Model, message: String) {
    qlog_warn!("UI Error: {}", message);
    model.notification = Some(Notification {
        level: NotificationLevel::Error,
        message,
    });
    model.dirty = true;
}

fn set_info(model: &mut Model, message: String) {
    model.notification = Some(Notification {
        level: NotificationLevel::Info,
        message,
    });
    model.dirty = true;
}

/// Pure update function: Model + Message → Commands
///
/// The function itself has no side effects - all I/O happens via returned Commands.
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => {
            model.notification = None; // Clear notification on any key press
            model.dirty = true;
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                cmds.push(Command::Quit);
                return cmds;
            }
            match model.mode {
                Mode::Board => update_board_mode(model, key, &mut cmds),
                Mode::Input(kind) => update_input_mode(model, key, kind, &mut cmds),
                Mode::Dragging => update_drag_mode(model, key, &mut cmds),
            }
        }

        Message::Resize(_, _) => {
            model.dirty = true;
        }

        Message::Drag(intent) => {
            if matches!(model.mode, Mode::Input(_)) {
                qlog_debug!("Message::Drag ignored while input is open");
            } else {
                apply_drag(model, intent, &mut cmds);
            }
        }

        Message::TasksSaved => {
            qlog_debug!("Message::TasksSaved");
        }

        Message::TasksSaveFailed(err) => {
            qlog_warn!("Message::TasksSaveFailed err={}", err);
            set_error(model, format!("Failed to save tasks: {}", err));
        }
    }

    cmds
}

fn update_board_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let count = store::count_in(&model.tasks, model.focus);
            if count > 0 {
                let sel = &mut model.selected[model.focus.index()];
                *sel = (*sel + 1) % count;
            }
        }

        KeyCode::Char('k') | KeyCode::Up => {
            let count = store::count_in(&model.tasks, model.focus);
            if count > 0 {
                let sel = &mut model.selected[model.focus.index()];
                *sel = sel.checked_sub(1).unwrap_or(count - 1);
            }
        }

        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            model.focus = model.focus.next();
        }

        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
            model.focus = model.focus.prev();
        }

        KeyCode::Char(c @ '1'..='4') => {
            if let Some(quadrant) = quadrant_for_digit(c) {
                model.focus = quadrant;
            }
        }

        KeyCode::Char('n') => {
            model.mode = Mode::Input(InputKind::AddTask);
            model.pending_quadrant = model.focus;
            model.input_buffer.clear();
        }

        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(task) = model.selected_task() {
                let (id, content) = (task.id.clone(), task.content.clone());
                model.pending_edit = Some(id);
                model.input_buffer = content;
                model.mode = Mode::Input(InputKind::EditTask);
            }
        }

        KeyCode::Char('d') => {
            if let Some(task) = model.selected_task() {
                model.pending_delete = Some(task.id.clone());
                model.mode = Mode::Input(InputKind::ConfirmDelete);
                model.input_buffer.clear();
            }
        }

        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(task) = model.selected_task() {
                let (id, completed) = (task.id.clone(), !task.completed);
                qlog_debug!("Toggle completion id={} completed={}", id.short(), completed);
                model.tasks = store::complete(&model.tasks, &id, completed);
                cmds.push(Command::SaveTasks);
            }
        }

        KeyCode::Char('m') => {
            if let Some(task) = model.selected_task() {
                let id = task.id.clone();
                apply_drag(model, DragIntent::start(id), cmds);
            }
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            cmds.push(Command::Quit);
        }

        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
        }

        _ => {}
    }
}

fn update_input_mode(model: &mut Model, key: KeyEvent, kind: InputKind, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Enter => submit_input(model, kind, cmds),

        KeyCode::Tab if kind == InputKind::AddTask => {
            model.pending_quadrant = model.pending_quadrant.next();
        }

        KeyCode::BackTab if kind == InputKind::AddTask => {
            model.pending_quadrant = model.pending_quadrant.prev();
        }

        KeyCode::Esc => close_input(model),

        KeyCode::Backspace if kind != InputKind::ConfirmDelete => {
            model.input_buffer.pop();
        }

        KeyCode::Char(c) if kind != InputKind::ConfirmDelete => {
            model.input_buffer.push(c);
        }

        _ => {}
    }
}

fn submit_input(model: &mut Model, kind: InputKind, cmds: &mut Vec<Command>) {
    match kind {
        InputKind::AddTask => {
            if model.input_buffer.trim().is_empty() {
                // Input stays open for correction.
                set_error(model, "Task content cannot be empty".to_string());
                return;
            }
            let quadrant = model.pending_quadrant;
            model.tasks = store::add(&model.tasks, &model.input_buffer, quadrant);
            if let Some(id) = model.tasks.last().map(|t| t.id.clone()) {
                qlog!("Task added: quadrant={} id={}", quadrant.id(), id.short());
                model.select_task(&id);
            }
            close_input(model);
            cmds.push(Command::SaveTasks);
        }

        InputKind::EditTask => {
            let content = std::mem::take(&mut model.input_buffer);
            let id = model.pending_edit.take();
            close_input(model);

            let Some(id) = id else { return };
            if content.trim().is_empty() {
                qlog_debug!("Edit of {} discarded: empty content", id.short());
                return;
            }
            model.tasks = store::update(&model.tasks, &id, &content);
            cmds.push(Command::SaveTasks);
        }

        InputKind::ConfirmDelete => {
            let id = model.pending_delete.take();
            close_input(model);

            if let Some(id) = id {
                qlog!("Task deleted: id={}", id.short());
                model.tasks = store::delete(&model.tasks, &id);
                model.clamp_selection();
                cmds.push(Command::SaveTasks);
            }
        }
    }
}

fn close_input(model: &mut Model) {
    model.input_buffer.clear();
    model.pending_edit = None;
    model.pending_delete = None;
    model.mode = Mode::Board;
}

/// Keyboard grab: arrows pick the element under the grabbed task, Enter
/// drops, Esc releases without a target.
fn update_drag_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    let Some(dragged) = model.drag.dragged().cloned() else {
        model.mode = Mode::Board;
        return;
    };

    match key.code {
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            let target = model.focus.next();
            hover_quadrant(model, dragged, target, cmds);
        }

        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
            let target = model.focus.prev();
            hover_quadrant(model, dragged, target, cmds);
        }

        KeyCode::Char(c @ '1'..='4') => {
            if let Some(quadrant) = quadrant_for_digit(c) {
                hover_quadrant(model, dragged, quadrant, cmds);
            }
        }

        KeyCode::Char('j') | KeyCode::Down => hover_task(model, dragged, 1, cmds),

        KeyCode::Char('k') | KeyCode::Up => hover_task(model, dragged, -1, cmds),

        KeyCode::Enter => {
            let target = model.drop_target.clone();
            apply_drag(model, DragIntent::end(dragged, target), cmds);
        }

        KeyCode::Esc => apply_drag(model, DragIntent::end(dragged, None), cmds),

        _ => {}
    }
}

fn hover_quadrant(
    model: &mut Model,
    dragged: TaskId,
    quadrant: Quadrant,
    cmds: &mut Vec<Command>,
) {
    model.focus = quadrant;
    apply_drag(
        model,
        DragIntent::over(dragged, Some(DropTarget::Quadrant(quadrant))),
        cmds,
    );
}

fn hover_task(
    model: &mut Model,
    dragged: TaskId,
    delta: isize,
    cmds: &mut Vec<Command>,
) {
    let ids: Vec<_> = model
        .quadrant_tasks(model.focus)
        .iter()
        .map(|t| t.id.clone())
        .collect();
    if ids.is_empty() {
        return;
    }

    let current = model.selected_index(model.focus).min(ids.len() - 1);
    let next = current
        .saturating_add_signed(delta)
        .min(ids.len() - 1);
    model.selected[model.focus.index()] = next;

    let target = DropTarget::Task(ids[next].clone());
    apply_drag(model, DragIntent::over(dragged, Some(target)), cmds);
}

/// Feed one drag intent through the state machine and fold the outcome
/// back into the model.
fn apply_drag(model: &mut Model, intent: DragIntent, cmds: &mut Vec<Command>) {
    let kind = intent.kind;
    let dragged = intent.dragged.clone();
    let target = intent.target.clone();

    let outcome = drag::apply(&mut model.drag, &model.tasks, intent);
    qlog_debug!("apply_drag kind={:?} id={} outcome={}", kind, dragged.short(), outcome_name(&outcome));

    if kind == DragKind::Over && model.drag.is_dragging() {
        model.drop_target = target;
    }

    match outcome {
        DragOutcome::Ignored => {}

        DragOutcome::Started => {
            model.drag_origin = Some(model.tasks.clone());
            model.drop_target = None;
            model.mode = Mode::Dragging;
            model.select_task(&dragged);
        }

        DragOutcome::Previewed(tasks) => {
            model.tasks = tasks;
            model.select_task(&dragged);
        }

        DragOutcome::Committed(tasks) => {
            qlog!("Task moved: id={}", dragged.short());
            let from = model
                .drag_origin
                .as_deref()
                .and_then(|origin| store::find(origin, &dragged))
                .map(|t| t.status);
            let to = store::find(&tasks, &dragged).map(|t| t.status);
            model.tasks = tasks;
            finish_drag(model);
            model.select_task(&dragged);
            if let Some(to) = to.filter(|to| from != Some(*to)) {
                set_info(model, format!("Moved to {}", to.label()));
            }
            cmds.push(Command::SaveTasks);
        }

        DragOutcome::Cancelled => {
            if let Some(origin) = model.drag_origin.take() {
                model.tasks = origin;
            }
            finish_drag(model);
            model.select_task(&dragged);
            model.clamp_selection();
        }
    }

    model.dirty = true;
}

fn finish_drag(model: &mut Model) {
    model.drop_target = None;
    model.drag_origin = None;
    model.mode = Mode::Board;
}

fn quadrant_for_digit(c: char) -> Option<Quadrant> {
    c.to_digit(10)
        .and_then(|d| (d as usize).checked_sub(1))
        .and_then(Quadrant::from_index)
}

fn outcome_name(outcome: &DragOutcome) -> &'static str {
    match outcome {
        DragOutcome::Ignored => "ignored",
        DragOutcome::Started => "started",
        DragOutcome::Previewed(_) => "previewed",
        DragOutcome::Committed(_) => "committed",
        DragOutcome::Cancelled => "cancelled",
    }
}
