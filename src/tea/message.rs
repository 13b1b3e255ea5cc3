//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function - terminal events, drag
//! gestures from any capture layer, and command completion callbacks.

use crossterm::event::KeyEvent;

use crate::drag::DragIntent;

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    /// A drag gesture step, already decoded into a tagged intent.
    Drag(DragIntent),

    // State persistence
    TasksSaved,
    TasksSaveFailed(String),
}
