//! Task data model for the quadrant board.
//!
//! A task is the unit of storage: plain data, no behavior beyond display
//! and parsing helpers. The board's mutations live in [`crate::store`].

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::Error;

/// Unique identifier for a task.
///
/// Fresh ids are UUID v4 strings. Stored ids are accepted as any string,
/// so a board written by another tool still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new unique task identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Return the first 8 characters of the id for display.
    pub fn short(&self) -> String {
        self.0.chars().take(8).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One of the four fixed priority quadrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quadrant {
    #[default]
    DoFirst,
    DoLater,
    Delegate,
    Eliminate,
}

impl Quadrant {
    /// All quadrants in board order (top-left, top-right, bottom-left, bottom-right).
    pub const ALL: [Quadrant; 4] = [
        Quadrant::DoFirst,
        Quadrant::DoLater,
        Quadrant::Delegate,
        Quadrant::Eliminate,
    ];

    /// Identifier used in storage and as a drop target.
    pub fn id(&self) -> &'static str {
        match self {
            Quadrant::DoFirst => "DO_FIRST",
            Quadrant::DoLater => "DO_LATER",
            Quadrant::Delegate => "DELEGATE",
            Quadrant::Eliminate => "ELIMINATE",
        }
    }

    /// Column heading.
    pub fn title(&self) -> &'static str {
        match self {
            Quadrant::DoFirst => "DO FIRST",
            Quadrant::DoLater => "DO LATER",
            Quadrant::Delegate => "DELEGATE",
            Quadrant::Eliminate => "ELIMINATE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::DoFirst => "Do First",
            Quadrant::DoLater => "Do Later",
            Quadrant::Delegate => "Delegate",
            Quadrant::Eliminate => "Eliminate",
        }
    }

    /// Position in [`Quadrant::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Quadrant::DoFirst => 0,
            Quadrant::DoLater => 1,
            Quadrant::Delegate => 2,
            Quadrant::Eliminate => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Quadrant> {
        Self::ALL.get(index).copied()
    }

    /// Exact match on the storage identifier (`DO_FIRST`, ...).
    pub fn from_id(id: &str) -> Option<Quadrant> {
        Self::ALL.into_iter().find(|q| q.id() == id)
    }

    /// Next quadrant, wrapping around.
    pub fn next(&self) -> Quadrant {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous quadrant, wrapping around.
    pub fn prev(&self) -> Quadrant {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Quadrant {
    type Err = Error;

    /// Lenient parsing for command-line input: `DO_FIRST`, `do-first`,
    /// `do first`, `dofirst` and `1`..`4` all name the same quadrant.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "dofirst" | "1" => Ok(Quadrant::DoFirst),
            "dolater" | "2" => Ok(Quadrant::DoLater),
            "delegate" | "3" => Ok(Quadrant::Delegate),
            "eliminate" | "4" => Ok(Quadrant::Eliminate),
            _ => Err(Error::UnknownQuadrant(s.to_string())),
        }
    }
}

/// A single item on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    pub status: Quadrant,
    #[serde(default)]
    pub completed: bool,
    /// Creation sequence number. Placement within a quadrant is positional;
    /// this field is kept for storage compatibility and is never rewritten.
    #[serde(deserialize_with = "deserialize_order")]
    pub order: i64,
}

/// Stored boards may carry any JSON number here. Fractions are truncated
/// and out-of-range values saturate.
fn deserialize_order<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    Ok(match Number::deserialize(deserializer)? {
        Number::Int(n) => n,
        Number::Float(f) => f as i64,
    })
}

impl Task {
    pub fn new(content: impl Into<String>, status: Quadrant, order: i64) -> Self {
        Self {
            id: TaskId::new(),
            content: content.into(),
            status,
            completed: false,
            order,
        }
    }
}
