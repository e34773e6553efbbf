// ABOUTME: Library root for ghdev. Re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod api;
pub mod app;
pub mod config;
pub mod format;
pub mod headless;
pub mod logging;
pub mod prefs;
pub mod stream;
pub mod theme;
pub mod tui;
