// ABOUTME: Configuration loading for ghdev.
// ABOUTME: Reads ~/.ghdev/config.toml, applies GHDEV_* environment overrides, and resolves data paths.

use std::path::PathBuf;

use serde::Deserialize;

use crate::theme::Theme;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            ui: UiConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Where the statistics backend and the profile API live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub api_url: String,
    pub ws_url: String,
    /// Base URL for public profile lookups. Point this at a server-side proxy
    /// when authenticated requests are needed; the client never holds tokens.
    pub github_api_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            ws_url: "ws://localhost:8000".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

/// Terminal UI preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
    pub tick_millis: u64,
    pub toast_seconds: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            tick_millis: 250,
            toast_seconds: 5,
        }
    }
}

/// Log output settings. `GHDEV_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load config from ~/.ghdev/config.toml, falling back to defaults, then
    /// apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override service URLs from `GHDEV_*` variables. The lookup is injected
    /// so tests don't touch the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty("GHDEV_API_URL") {
            self.service.api_url = url;
        }
        if let Some(url) = non_empty("GHDEV_WS_URL") {
            self.service.ws_url = url;
        }
        if let Some(url) = non_empty("GHDEV_GITHUB_API_URL") {
            self.service.github_api_url = url;
        }
    }

    /// Root directory for everything ghdev writes.
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ghdev")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Path to the optional secrets/overrides env file.
    pub fn secrets_env_path() -> PathBuf {
        Self::data_dir().join(".env")
    }

    /// Path to the cached search preferences record.
    pub fn preferences_path() -> PathBuf {
        Self::data_dir().join("searchData.json")
    }

    /// Path to the log file used while the TUI owns the terminal.
    pub fn log_path(&self) -> PathBuf {
        self.log
            .file
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("ghdev.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.service.api_url, "http://localhost:8000");
        assert_eq!(config.service.ws_url, "ws://localhost:8000");
        assert_eq!(config.service.request_timeout_seconds, 30);
        assert_eq!(config.ui.theme, Theme::Dark);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
[service]
api_url = "https://api.example.dev"
ws_url = "wss://api.example.dev"
request_timeout_seconds = 10

[ui]
theme = "light"
tick_millis = 100

[log]
level = "debug"
file = "/tmp/ghdev.log"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.api_url, "https://api.example.dev");
        assert_eq!(config.service.ws_url, "wss://api.example.dev");
        assert_eq!(config.service.request_timeout_seconds, 10);
        assert_eq!(config.ui.theme, Theme::Light);
        assert_eq!(config.ui.tick_millis, 100);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/ghdev.log"));
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let toml_str = r#"
[ui]
theme = "light"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ui.theme, Theme::Light);
        assert_eq!(config.ui.toast_seconds, 5);
        assert_eq!(config.service.github_api_url, "https://api.github.com");
    }

    #[test]
    fn env_overrides_replace_service_urls() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "GHDEV_API_URL" => Some("http://backend:9000".to_string()),
            "GHDEV_WS_URL" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.service.api_url, "http://backend:9000");
        // Blank values are ignored.
        assert_eq!(config.service.ws_url, "ws://localhost:8000");
    }
}
