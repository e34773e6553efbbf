// ABOUTME: TUI module. Ratatui full-screen interface for ghdev.
// ABOUTME: Landing search, live analysis progress, statistics, leaderboard, and toasts.

pub mod input;
pub mod state;
pub mod text_input;
pub mod ui;
pub mod widgets;

pub use state::*;
