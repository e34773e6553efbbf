// ABOUTME: Tracing subscriber setup for the TUI (log file) and headless commands (stderr).
// ABOUTME: Filter comes from GHDEV_LOG when set, else the configured level.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const LOG_ENV: &str = "GHDEV_LOG";

/// `GHDEV_LOG` wins over the configured level when it is non-blank.
fn directive(env_value: Option<String>, level: &str) -> String {
    env_value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| level.to_string())
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::new(directive(std::env::var(LOG_ENV).ok(), &config.log.level))
}

/// Log to the configured file. The TUI owns the terminal, so nothing goes to
/// stdout or stderr while it runs.
pub fn init_file(config: &Config) -> anyhow::Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}

/// Log to stderr, keeping stdout clean for command output.
pub fn init_stderr(config: &Config) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directive_overrides_level() {
        assert_eq!(directive(Some("ghdev=debug".to_string()), "info"), "ghdev=debug");
    }

    #[test]
    fn blank_env_falls_back_to_level() {
        assert_eq!(directive(Some("  ".to_string()), "warn"), "warn");
        assert_eq!(directive(None, "info"), "info");
    }
}
