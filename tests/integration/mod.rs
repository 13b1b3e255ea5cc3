//! Integration test suite for the quadrant board.
//!
//! These tests drive the public surface end to end: the task store over a
//! real session directory, and the board controller fed with synthetic key
//! events through the same dispatch loop the TUI uses.
//!
//! # Test Categories
//!
//! - `board_e2e`: Full add/move/complete/delete flows with reloads
//! - `session_store`: Session directory layout and degraded stores
//! - `controller`: Keyboard-driven board, including the drag gesture
//! - `performance`: Thresholds for large boards

mod fixtures;

mod board_e2e;
mod controller;
mod performance;
mod session_store;
