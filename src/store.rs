//! Task store: the board's mutation module.
//!
//! Every transform takes the current collection and returns a new one; the
//! input slice is never modified. [`TaskStore`] pairs the transforms with a
//! [`Persistence`] and saves after each mutating intent.
//!
//! Placement within a quadrant is positional: a task's position in the
//! quadrant's filtered projection of the collection is its order. The
//! `order` field is assigned at creation only.

use crate::persistence::Persistence;
use crate::task::{Quadrant, Task, TaskId};
use crate::{qlog, qlog_debug, Error, Result};

/// Append a new task with a fresh id.
///
/// Content is not validated here; callers reject blank content first.
pub fn add(tasks: &[Task], content: &str, status: Quadrant) -> Vec<Task> {
    let mut updated = tasks.to_vec();
    updated.push(Task::new(content, status, next_order(tasks)));
    updated
}

/// Replace the content of task `id`. Blank content leaves the task as is.
pub fn update(tasks: &[Task], id: &TaskId, content: &str) -> Vec<Task> {
    if content.trim().is_empty() {
        return tasks.to_vec();
    }
    tasks
        .iter()
        .map(|task| {
            if &task.id == id {
                Task {
                    content: content.to_string(),
                    ..task.clone()
                }
            } else {
                task.clone()
            }
        })
        .collect()
}

pub fn delete(tasks: &[Task], id: &TaskId) -> Vec<Task> {
    tasks.iter().filter(|task| &task.id != id).cloned().collect()
}

pub fn complete(tasks: &[Task], id: &TaskId, completed: bool) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if &task.id == id {
                Task {
                    completed,
                    ..task.clone()
                }
            } else {
                task.clone()
            }
        })
        .collect()
}

/// Move task `id` into `destination` at `new_index` within that quadrant.
///
/// The moved task is taken out, the rest split into tasks already in
/// `destination` and everything else, and the moved task is inserted into
/// the destination group (an index past the end appends). The result is the
/// other tasks followed by the destination group. An unknown id returns the
/// collection unchanged.
pub fn reorder(tasks: &[Task], id: &TaskId, destination: Quadrant, new_index: usize) -> Vec<Task> {
    let Some(moved) = tasks.iter().find(|task| &task.id == id) else {
        return tasks.to_vec();
    };

    let (mut in_destination, others): (Vec<Task>, Vec<Task>) = tasks
        .iter()
        .filter(|task| &task.id != id)
        .cloned()
        .partition(|task| task.status == destination);

    let index = new_index.min(in_destination.len());
    in_destination.insert(
        index,
        Task {
            status: destination,
            ..moved.clone()
        },
    );

    let mut updated = others;
    updated.extend(in_destination);
    updated
}

/// Order value for the next created task. Saturates at `i64::MAX`.
pub fn next_order(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .map(|t| t.order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Tasks in `quadrant`, in board order.
pub fn in_quadrant(tasks: &[Task], quadrant: Quadrant) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == quadrant).collect()
}

/// Number of tasks in `quadrant`.
pub fn count_in(tasks: &[Task], quadrant: Quadrant) -> usize {
    tasks.iter().filter(|t| t.status == quadrant).count()
}

/// Index of task `id` within its own quadrant.
pub fn position_in_quadrant(tasks: &[Task], id: &TaskId) -> Option<usize> {
    let task = find(tasks, id)?;
    in_quadrant(tasks, task.status)
        .iter()
        .position(|t| &t.id == id)
}

pub fn find<'a>(tasks: &'a [Task], id: &TaskId) -> Option<&'a Task> {
    tasks.iter().find(|t| &t.id == id)
}

/// Resolve a full id or a unique id prefix.
pub fn find_by_prefix<'a>(tasks: &'a [Task], prefix: &str) -> Result<&'a Task> {
    if let Some(task) = tasks.iter().find(|t| t.id.as_str() == prefix) {
        return Ok(task);
    }
    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|t| !prefix.is_empty() && t.id.as_str().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task),
        [] => Err(Error::TaskNotFound(prefix.to_string())),
        _ => Err(Error::AmbiguousTaskId {
            prefix: prefix.to_string(),
            matches: matches.len(),
        }),
    }
}

/// The board's operation surface: the collection plus its persistence.
///
/// Each mutating call replaces the collection with the transform's result
/// and saves it.
pub struct TaskStore {
    tasks: Vec<Task>,
    persistence: Persistence,
}

impl TaskStore {
    /// Load the stored collection.
    pub fn load(persistence: Persistence) -> Self {
        let tasks = persistence.load();
        qlog_debug!("TaskStore::load tasks={}", tasks.len());
        Self { tasks, persistence }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Add a task. Blank content is rejected and returns `None`.
    pub fn add(&mut self, content: &str, status: Quadrant) -> Result<Option<TaskId>> {
        if content.trim().is_empty() {
            qlog_debug!("TaskStore::add rejected blank content");
            return Ok(None);
        }
        let tasks = add(&self.tasks, content, status);
        let id = tasks.last().map(|t| t.id.clone());
        self.commit(tasks)?;
        qlog!("Task added: quadrant={} id={:?}", status.id(), id.as_ref().map(TaskId::short));
        Ok(id)
    }

    pub fn update(&mut self, id: &TaskId, content: &str) -> Result<()> {
        qlog_debug!("TaskStore::update id={}", id.short());
        let tasks = update(&self.tasks, id, content);
        self.commit(tasks)
    }

    pub fn delete(&mut self, id: &TaskId) -> Result<()> {
        qlog!("Task deleted: id={}", id.short());
        let tasks = delete(&self.tasks, id);
        self.commit(tasks)
    }

    pub fn complete(&mut self, id: &TaskId, completed: bool) -> Result<()> {
        qlog_debug!("TaskStore::complete id={} completed={}", id.short(), completed);
        let tasks = complete(&self.tasks, id, completed);
        self.commit(tasks)
    }

    pub fn reorder(&mut self, id: &TaskId, destination: Quadrant, new_index: usize) -> Result<()> {
        qlog_debug!(
            "TaskStore::reorder id={} destination={} index={}",
            id.short(),
            destination.id(),
            new_index
        );
        let tasks = reorder(&self.tasks, id, destination, new_index);
        self.commit(tasks)
    }

    fn commit(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.tasks = tasks;
        self.persistence.save(&self.tasks)
    }
}
