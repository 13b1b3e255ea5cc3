pub mod config;
pub mod drag;
pub mod error;
pub mod log;
pub mod persistence;
pub mod store;
pub mod task;

// Decoupled game loop architecture
pub mod app;
pub mod render;
pub mod tea;
pub mod ui;

pub use error::{Error, Result};
pub use persistence::{KeyValueStore, MemoryStore, Persistence, SessionDirStore};
pub use store::TaskStore;
pub use task::{Quadrant, Task, TaskId};
