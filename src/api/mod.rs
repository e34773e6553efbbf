// ABOUTME: HTTP client for the statistics backend and the public profile API.
// ABOUTME: Read-only REST calls plus the refresh trigger and endpoint URL building.

pub mod leaderboard;
pub mod types;

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::stream::protocol::SessionRequest;

pub use leaderboard::{PAGE_SIZE, Pagination};
pub use types::{GitHubUser, LeaderboardResponse, SearchOptions, UserRecord};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

/// Append path segments to a base URL, percent-encoding each segment.
///
/// `endpoint("http://host/api/", &["getLinesOfCode", "octocat"])` yields
/// `http://host/api/getLinesOfCode/octocat`.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Thin wrapper over a shared `reqwest::Client`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_url: String,
    github_api_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(service: &ServiceConfig) -> Result<Self, ApiError> {
        let timeout = Duration::from_secs(service.request_timeout_seconds);
        // No client-wide timeout: it would also cut off long-lived event streams.
        let http = reqwest::Client::builder()
            .user_agent(concat!("ghdev/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            api_url: service.api_url.clone(),
            github_api_url: service.github_api_url.clone(),
            timeout,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Default ignore lists offered on the search screen.
    pub async fn search_options(&self) -> Result<SearchOptions, ApiError> {
        let url = endpoint(&self.api_url, &["getExtensions"])?;
        self.get_json(url).await
    }

    /// One page (1-based) of the global leaderboard.
    pub async fn leaderboard(&self, page: u32) -> Result<LeaderboardResponse, ApiError> {
        let mut url = endpoint(&self.api_url, &["getLeaderboard"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string());
        self.get_json(url).await
    }

    /// Public profile for `username`, or `None` when the user does not exist.
    pub async fn profile(&self, username: &str) -> Result<Option<GitHubUser>, ApiError> {
        let url = endpoint(&self.github_api_url, &["users", username])?;
        debug!(%url, "fetching profile");
        let response = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .timeout(self.timeout)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response, &url)?;
        Ok(Some(response.json().await?))
    }

    /// Ask the backend to drop its cached totals for `username` and recount.
    pub async fn trigger_refresh(&self, username: &str) -> Result<(), ApiError> {
        let url = endpoint(&self.api_url, &["refreshAccountData", username])?;
        debug!(%url, "triggering refresh");
        let response = self.http.get(url.clone()).timeout(self.timeout).send().await?;
        check_status(response, &url)?;
        Ok(())
    }

    /// Event-stream URL that delivers the refreshed analysis.
    pub fn refresh_stream_url(&self, request: &SessionRequest) -> Result<Url, ApiError> {
        let mut url = endpoint(&self.api_url, &["getLinesOfCode", &request.username])?;
        url.query_pairs_mut()
            .append_pair("ignore_dirs", &request.ignore_dirs.join(","))
            .append_pair("ignore_extensions", &request.ignore_extensions.join(","));
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.http.get(url.clone()).timeout(self.timeout).send().await?;
        let response = check_status(response, &url)?;
        Ok(response.json().await?)
    }
}

fn check_status(response: reqwest::Response, url: &Url) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status,
            url: url.to_string(),
        })
    }
}
