//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Temporary session directories
//! - Driving the board controller with key presses
//! - Predefined boards

#![allow(dead_code)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tempfile::TempDir;

use quadrant::app::dispatch;
use quadrant::config::Config;
use quadrant::persistence::{Persistence, SessionDirStore};
use quadrant::store::{self, TaskStore};
use quadrant::task::{Quadrant, Task, TaskId};
use quadrant::tea::{Message, Model};

/// A session directory that lives as long as the test.
pub struct TestSession {
    /// The temporary directory acting as the runtime dir.
    pub temp_dir: TempDir,
    /// Path of the session directory inside it.
    pub path: PathBuf,
}

impl TestSession {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("quadrant");
        Self { temp_dir, path }
    }

    /// Fresh persistence over the session directory, as a new process
    /// would open it.
    pub fn persistence(&self) -> Persistence {
        Persistence::new(Box::new(SessionDirStore::new(&self.path)), "tasks")
    }

    /// Config pointing at this session directory.
    pub fn config(&self) -> Config {
        Config {
            session_dir: Some(self.path.to_string_lossy().into_owned()),
            ..Config::default()
        }
    }

    pub fn store(&self) -> TaskStore {
        TaskStore::load(self.persistence())
    }

    /// Reload what is currently on disk.
    pub fn reload(&self) -> Vec<Task> {
        self.persistence().load()
    }

    pub fn item_path(&self) -> PathBuf {
        self.path.join("tasks.json")
    }
}

/// A task with a readable fixed id.
pub fn task(id: &str, status: Quadrant) -> Task {
    Task {
        id: TaskId::from(id),
        content: id.to_string(),
        status,
        completed: false,
        order: 0,
    }
}

/// Two tasks in Do First, one in Do Later, one in Eliminate.
pub fn sample_board() -> Vec<Task> {
    let mut tasks = vec![
        task("report", Quadrant::DoFirst),
        task("invoice", Quadrant::DoFirst),
        task("client", Quadrant::DoLater),
        task("newsletter", Quadrant::Eliminate),
    ];
    for (i, t) in tasks.iter_mut().enumerate() {
        t.order = i as i64;
    }
    tasks
}

/// Contents of `quadrant` in board order.
pub fn contents(tasks: &[Task], quadrant: Quadrant) -> Vec<String> {
    store::in_quadrant(tasks, quadrant)
        .iter()
        .map(|t| t.content.clone())
        .collect()
}

/// A controller wired to a persistence, like the logic thread.
pub struct BoardHarness {
    pub model: Model,
    pub persistence: Persistence,
}

impl BoardHarness {
    pub fn new(persistence: Persistence) -> Self {
        let model = Model::load(Config::default(), &persistence);
        Self { model, persistence }
    }

    /// Press one key; returns true when the board asked to quit.
    pub fn press(&mut self, code: KeyCode) -> bool {
        let key = KeyEvent::new(code, KeyModifiers::empty());
        dispatch(&mut self.model, &self.persistence, Message::Key(key))
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Open the add prompt, type `content`, and submit.
    pub fn add(&mut self, content: &str) {
        self.press(KeyCode::Char('n'));
        self.type_text(content);
        self.press(KeyCode::Enter);
    }

    pub fn send(&mut self, msg: Message) -> bool {
        dispatch(&mut self.model, &self.persistence, msg)
    }

    pub fn stored(&self) -> Vec<Task> {
        self.persistence.load()
    }
}
