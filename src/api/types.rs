// ABOUTME: Wire types for the backend REST calls and the public profile API.
// ABOUTME: Search option defaults, leaderboard pages, and GitHub user metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two user-editable ignore lists sent with every analysis request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub ignore_dirs: Vec<String>,
    #[serde(default)]
    pub ignore_extensions: Vec<String>,
}

/// One leaderboard row as returned by `getLeaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub lines_of_code: u64,
    #[serde(default)]
    pub date_requested: Option<String>,
}

/// A page of leaderboard rows plus the total number of ranked users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub count: u64,
}

/// Public profile metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl GitHubUser {
    /// Display name, falling back to the login when the profile has none.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.login)
    }

    /// Calendar year the account was created, if known.
    pub fn joined_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.created_at.map(|t| t.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profile_with_nulls() {
        let json = r#"{
            "login": "octocat",
            "name": null,
            "avatar_url": "https://avatars.example/u/583231",
            "bio": null,
            "public_repos": 8,
            "followers": 9000,
            "following": 9,
            "created_at": "2011-01-25T18:44:36Z"
        }"#;
        let user: GitHubUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.display_name(), "octocat");
        assert_eq!(user.public_repos, 8);
        assert_eq!(user.joined_year(), Some(2011));
    }

    #[test]
    fn display_name_prefers_name() {
        let user = GitHubUser {
            login: "octocat".to_string(),
            name: Some("The Octocat".to_string()),
            avatar_url: None,
            bio: None,
            public_repos: 0,
            followers: 0,
            following: 0,
            created_at: None,
        };
        assert_eq!(user.display_name(), "The Octocat");
        assert_eq!(user.joined_year(), None);
    }

    #[test]
    fn parses_leaderboard_page() {
        let json = r#"{
            "users": [
                {"id": 3, "username": "alice", "lines_of_code": 120000,
                 "date_requested": "2024-05-01"},
                {"id": 9, "username": "bob", "lines_of_code": 900}
            ],
            "count": 45
        }"#;
        let page: LeaderboardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 45);
        assert_eq!(page.users.len(), 2);
        assert_eq!(page.users[1].date_requested, None);
    }

    #[test]
    fn search_options_missing_lists_default_empty() {
        let opts: SearchOptions =
            serde_json::from_str(r#"{"ignore_dirs": ["node_modules"]}"#).unwrap();
        assert_eq!(opts.ignore_dirs, vec!["node_modules".to_string()]);
        assert!(opts.ignore_extensions.is_empty());
    }
}
