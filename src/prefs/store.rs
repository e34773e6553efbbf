// ABOUTME: Cached search preferences: the last submitted username and ignore lists.
// ABOUTME: JSON record at ~/.ghdev/searchData.json, written atomically via tmp + rename.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::SearchOptions;
use crate::config::Config;
use crate::stream::SessionRequest;

/// Stored in place of an empty ignore list.
pub const NONE_SENTINEL: &str = "None";

/// The persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPreferences {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub ignore_dirs: Vec<String>,
    #[serde(default)]
    pub ignore_extensions: Vec<String>,
}

fn or_sentinel(list: &[String]) -> Vec<String> {
    if list.is_empty() {
        vec![NONE_SENTINEL.to_string()]
    } else {
        list.to_vec()
    }
}

fn without_sentinel(list: &[String]) -> Vec<String> {
    list.iter()
        .filter(|item| item.as_str() != NONE_SENTINEL)
        .cloned()
        .collect()
}

impl SearchPreferences {
    /// Record for a search submission. Empty lists become `["None"]`.
    pub fn for_submission(username: &str, options: &SearchOptions) -> Self {
        Self {
            username: username.to_string(),
            ignore_dirs: or_sentinel(&options.ignore_dirs),
            ignore_extensions: or_sentinel(&options.ignore_extensions),
        }
    }

    /// Session request for `username` using these ignore lists as stored.
    pub fn request_for(&self, username: &str) -> SessionRequest {
        SessionRequest {
            username: username.to_string(),
            ignore_dirs: or_sentinel(&self.ignore_dirs),
            ignore_extensions: or_sentinel(&self.ignore_extensions),
        }
    }

    /// Editable ignore lists, with sentinels removed.
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            ignore_dirs: without_sentinel(&self.ignore_dirs),
            ignore_extensions: without_sentinel(&self.ignore_extensions),
        }
    }
}

/// Session request when nothing is cached yet.
pub fn default_request(username: &str) -> SessionRequest {
    SearchPreferences::for_submission(username, &SearchOptions::default()).request_for(username)
}

/// Load the cached record from its default location.
pub fn load_preferences() -> anyhow::Result<Option<SearchPreferences>> {
    load_preferences_from(&Config::preferences_path())
}

/// Load from an explicit path. `Ok(None)` when the file does not exist.
pub fn load_preferences_from(path: &Path) -> anyhow::Result<Option<SearchPreferences>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let prefs: SearchPreferences = serde_json::from_str(&content)?;
    Ok(Some(prefs))
}

/// Overwrite the cached record at its default location.
pub fn save_preferences(prefs: &SearchPreferences) -> anyhow::Result<()> {
    save_preferences_to(&Config::preferences_path(), prefs)
}

/// Save to an explicit path (atomic write via tmp + rename).
pub fn save_preferences_to(path: &Path, prefs: &SearchPreferences) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(prefs)?;
    std::fs::write(&tmp_path, &content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
