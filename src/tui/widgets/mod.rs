// ABOUTME: TUI widget sub-modules, one per screen region.
// ABOUTME: Each widget is a rendering function over a slice of AppState plus the active palette.

pub mod leaderboard;
pub mod progress;
pub mod search;
pub mod stats;
pub mod status;
pub mod toast;
