//! File logger for quadrant.
//!
//! The TUI owns the terminal, so every line goes to `~/.quadrant/quadrant.log`,
//! truncated when the process starts. `--debug` or `QUADRANT_DEBUG=1` raises
//! the level to DEBUG; `QUADRANT_DEBUG=trace` also records key events.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::config::Config;

const LOG_FILE: &str = "quadrant.log";
const DEBUG_ENV: &str = "QUADRANT_DEBUG";

static SINK: OnceLock<Mutex<File>> = OnceLock::new();
static LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    fn from_env_value(value: &str) -> Option<Level> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "debug" => Some(Level::Debug),
            "trace" => Some(Level::Trace),
            _ => None,
        }
    }
}

/// Level for this run: whichever of the flag and the environment asks
/// for more detail.
fn startup_level(debug_flag: bool, env: Option<&str>) -> Level {
    let from_env = env.and_then(Level::from_env_value);
    let from_flag = debug_flag.then_some(Level::Debug);
    from_env.max(from_flag).unwrap_or(Level::Info)
}

/// Set the level and open a fresh log file. Returns the log path, or
/// `None` when no log file could be opened; logging is then silent.
pub fn init(debug: bool) -> Option<PathBuf> {
    let env = std::env::var(DEBUG_ENV).ok();
    LEVEL.store(startup_level(debug, env.as_deref()) as u8, Ordering::SeqCst);

    let dir = Config::quadrant_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .ok()?;
    SINK.set(Mutex::new(file)).ok()?;
    Some(path)
}

pub fn enabled(level: Level) -> bool {
    level as u8 <= LEVEL.load(Ordering::Relaxed)
}

fn format_line(timestamp: &str, level: Level, msg: &str) -> String {
    format!("[{}] [{}] {}", timestamp, level.tag(), msg)
}

pub fn write(level: Level, msg: &str) {
    let Some(sink) = SINK.get() else {
        return;
    };
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
    let mut file = sink.lock().unwrap_or_else(|e| e.into_inner());
    let _ = writeln!(file, "{}", format_line(&timestamp, level, msg));
}

/// Log at an explicit level. The message is only formatted when the level
/// is enabled.
#[macro_export]
macro_rules! qlog_at {
    ($level:expr, $($arg:tt)*) => {
        if $crate::log::enabled($level) {
            $crate::log::write($level, &format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! qlog {
    ($($arg:tt)*) => { $crate::qlog_at!($crate::log::Level::Info, $($arg)*) };
}

#[macro_export]
macro_rules! qlog_error {
    ($($arg:tt)*) => { $crate::qlog_at!($crate::log::Level::Error, $($arg)*) };
}

#[macro_export]
macro_rules! qlog_warn {
    ($($arg:tt)*) => { $crate::qlog_at!($crate::log::Level::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! qlog_debug {
    ($($arg:tt)*) => { $crate::qlog_at!($crate::log::Level::Debug, $($arg)*) };
}

/// Key events and other per-frame detail; needs `QUADRANT_DEBUG=trace`.
#[macro_export]
macro_rules! qlog_trace {
    ($($arg:tt)*) => { $crate::qlog_at!($crate::log::Level::Trace, $($arg)*) };
}
