// ABOUTME: Message taxonomy for the analysis channels.
// ABOUTME: The outbound session request and control frames, and the closed set of inbound messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// First frame sent on a streaming channel. Immutable once the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub username: String,
    pub ignore_dirs: Vec<String>,
    pub ignore_extensions: Vec<String>,
}

/// Frames the client sends on the streaming channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Request(SessionRequest),
    HeartbeatResponse,
    Close,
}

impl ClientMessage {
    pub fn to_json(&self) -> String {
        match self {
            ClientMessage::Request(request) => json!({
                "username": request.username,
                "ignore_dirs": request.ignore_dirs,
                "ignore_extensions": request.ignore_extensions,
            })
            .to_string(),
            ClientMessage::HeartbeatResponse => json!({ "type": "heartbeat_response" }).to_string(),
            ClientMessage::Close => json!({ "type": "close" }).to_string(),
        }
    }
}

/// Every message the backend pushes, keyed by its `type` field.
///
/// Tags this client does not know decode to `Unrecognized` so newer servers
/// can add message kinds without breaking older clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Progress {
        /// Absent on some progress frames; the previous repo name is kept.
        #[serde(default)]
        repo: Option<String>,
        #[serde(rename = "processedRepos", default)]
        processed_repos: u64,
        #[serde(rename = "totalRepos", default)]
        total_repos: u64,
    },
    Result {
        #[serde(default)]
        total_lines_of_code: u64,
        #[serde(default)]
        lines_of_code_per_language: BTreeMap<String, u64>,
    },
    Complete,
    Error {
        #[serde(default)]
        message: String,
    },
    Heartbeat,
    #[serde(other)]
    Unrecognized,
}

impl ServerMessage {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Wire tag, for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            ServerMessage::Progress { .. } => "progress",
            ServerMessage::Result { .. } => "result",
            ServerMessage::Complete => "complete",
            ServerMessage::Error { .. } => "error",
            ServerMessage::Heartbeat => "heartbeat",
            ServerMessage::Unrecognized => "unrecognized",
        }
    }
}
