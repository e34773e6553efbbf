// ABOUTME: Session state and the pure reducer that folds inbound messages into it.
// ABOUTME: Lifecycle transitions, progress percentage, result capture, and the side effects to run.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::protocol::ServerMessage;

/// Where a session is in its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    Connecting,
    Streaming,
    Completed,
    Failed(String),
}

impl Lifecycle {
    /// Completed and Failed accept no further messages.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Lifecycle::Completed | Lifecycle::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Connecting => "connecting",
            Lifecycle::Streaming => "streaming",
            Lifecycle::Completed => "completed",
            Lifecycle::Failed(_) => "failed",
        }
    }
}

/// Live counters from `progress` messages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressSnapshot {
    pub current_repo: String,
    pub processed: u64,
    pub total: u64,
    /// Always within [0, 100].
    pub percentage: f64,
}

/// Final totals from the `result` message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSnapshot {
    pub total_lines: u64,
    pub lines_per_language: BTreeMap<String, u64>,
}

/// Everything the view needs to draw one session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionView {
    pub lifecycle: Lifecycle,
    pub progress: ProgressSnapshot,
    pub result: Option<ResultSnapshot>,
}

/// Side effect the channel owner must perform after a reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    RespondHeartbeat,
    Close,
}

/// processed/total as a percentage clamped to [0, 100]; 0 when total is 0.
pub fn percentage(processed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (processed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

impl SessionView {
    pub fn connecting() -> Self {
        Self {
            lifecycle: Lifecycle::Connecting,
            ..Self::default()
        }
    }

    /// The request is out and the channel is ready to deliver messages.
    pub fn opened(mut self) -> Self {
        if !self.lifecycle.is_terminal() {
            self.lifecycle = Lifecycle::Streaming;
        }
        self
    }

    /// A transport-level failure. No-op once terminal.
    pub fn failed(mut self, reason: impl Into<String>) -> Self {
        if !self.lifecycle.is_terminal() {
            self.lifecycle = Lifecycle::Failed(reason.into());
        }
        self
    }

    /// The peer closed the channel. Terminal states are kept; anything else
    /// means the analysis never finished.
    pub fn closed_by_peer(self) -> Self {
        self.failed("connection closed before the analysis completed")
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.lifecycle {
            Lifecycle::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Fold one inbound message into the session.
pub fn reduce(mut state: SessionView, message: &ServerMessage) -> (SessionView, Effect) {
    if state.lifecycle.is_terminal() {
        debug!(tag = message.tag(), "message after terminal state ignored");
        return (state, Effect::None);
    }

    match message {
        ServerMessage::Progress {
            repo,
            processed_repos,
            total_repos,
        } => {
            if let Some(repo) = repo {
                state.progress.current_repo = repo.clone();
            }
            state.progress.total = *total_repos;
            state.progress.processed = (*processed_repos).min(*total_repos);
            state.progress.percentage = percentage(state.progress.processed, state.progress.total);
            (state, Effect::None)
        }
        ServerMessage::Result {
            total_lines_of_code,
            lines_of_code_per_language,
        } => {
            if state.result.is_some() {
                warn!("duplicate result message ignored");
            } else {
                state.result = Some(ResultSnapshot {
                    total_lines: *total_lines_of_code,
                    lines_per_language: lines_of_code_per_language.clone(),
                });
            }
            (state, Effect::None)
        }
        ServerMessage::Complete => {
            state.lifecycle = Lifecycle::Completed;
            (state, Effect::Close)
        }
        ServerMessage::Error { message } => {
            state.lifecycle = Lifecycle::Failed(message.clone());
            (state, Effect::Close)
        }
        ServerMessage::Heartbeat => {
            let effect = if state.lifecycle == Lifecycle::Streaming {
                Effect::RespondHeartbeat
            } else {
                Effect::None
            };
            (state, effect)
        }
        ServerMessage::Unrecognized => {
            debug!("unrecognized message kind ignored");
            (state, Effect::None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streaming() -> SessionView {
        SessionView::connecting().opened()
    }

    fn progress(repo: Option<&str>, processed: u64, total: u64) -> ServerMessage {
        ServerMessage::Progress {
            repo: repo.map(str::to_string),
            processed_repos: processed,
            total_repos: total,
        }
    }

    fn result(total: u64, langs: &[(&str, u64)]) -> ServerMessage {
        ServerMessage::Result {
            total_lines_of_code: total,
            lines_of_code_per_language: langs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn percentage_is_ratio_times_hundred() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(4, 4), 100.0);
        assert_eq!(percentage(0, 7), 0.0);
    }

    #[test]
    fn percentage_with_zero_total_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn percentage_is_clamped() {
        assert_eq!(percentage(9, 4), 100.0);
    }

    #[test]
    fn progress_updates_snapshot() {
        let (state, effect) = reduce(streaming(), &progress(Some("r1"), 1, 4));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.progress.current_repo, "r1");
        assert_eq!(state.progress.processed, 1);
        assert_eq!(state.progress.total, 4);
        assert_eq!(state.progress.percentage, 25.0);
    }

    #[test]
    fn progress_without_repo_keeps_previous_name() {
        let (state, _) = reduce(streaming(), &progress(Some("r1"), 1, 4));
        let (state, _) = reduce(state, &progress(None, 4, 4));
        assert_eq!(state.progress.current_repo, "r1");
        assert_eq!(state.progress.percentage, 100.0);
    }

    #[test]
    fn processed_never_exceeds_total() {
        let (state, _) = reduce(streaming(), &progress(None, 10, 4));
        assert_eq!(state.progress.processed, 4);
        assert_eq!(state.progress.percentage, 100.0);
    }

    #[test]
    fn result_is_stored_without_ending_session() {
        let (state, effect) = reduce(streaming(), &result(12345, &[(".ts", 10000)]));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.lifecycle, Lifecycle::Streaming);
        assert_eq!(state.result.as_ref().unwrap().total_lines, 12345);
    }

    #[test]
    fn second_result_is_ignored() {
        let (state, _) = reduce(streaming(), &result(10, &[]));
        let (state, _) = reduce(state, &result(99, &[]));
        assert_eq!(state.result.unwrap().total_lines, 10);
    }

    #[test]
    fn complete_closes() {
        let (state, effect) = reduce(streaming(), &ServerMessage::Complete);
        assert_eq!(state.lifecycle, Lifecycle::Completed);
        assert_eq!(effect, Effect::Close);
    }

    #[test]
    fn error_fails_and_closes() {
        let (state, effect) = reduce(
            streaming(),
            &ServerMessage::Error {
                message: "user has no public repositories".to_string(),
            },
        );
        assert_eq!(effect, Effect::Close);
        assert_eq!(
            state.failure_message(),
            Some("user has no public repositories")
        );
    }

    #[test]
    fn heartbeat_requests_response_only_while_streaming() {
        let (state, effect) = reduce(streaming(), &ServerMessage::Heartbeat);
        assert_eq!(effect, Effect::RespondHeartbeat);
        assert_eq!(state, streaming());

        let (_, effect) = reduce(SessionView::connecting(), &ServerMessage::Heartbeat);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn unrecognized_changes_nothing() {
        let before = reduce(streaming(), &progress(Some("r1"), 1, 2)).0;
        let (after, effect) = reduce(before.clone(), &ServerMessage::Unrecognized);
        assert_eq!(after, before);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn terminal_states_are_idempotent() {
        let messages = [
            progress(Some("late"), 3, 3),
            result(1, &[(".rs", 1)]),
            ServerMessage::Complete,
            ServerMessage::Error {
                message: "late".to_string(),
            },
            ServerMessage::Heartbeat,
        ];

        let (completed, _) = reduce(streaming(), &ServerMessage::Complete);
        let (failed, _) = reduce(
            streaming(),
            &ServerMessage::Error {
                message: "boom".to_string(),
            },
        );
        for terminal in [completed, failed] {
            for msg in &messages {
                let (after, effect) = reduce(terminal.clone(), msg);
                assert_eq!(after, terminal);
                assert_eq!(effect, Effect::None);
            }
        }
    }

    #[test]
    fn transport_failures_do_not_override_terminal_states() {
        let (completed, _) = reduce(streaming(), &ServerMessage::Complete);
        assert_eq!(completed.clone().closed_by_peer(), completed);
        assert_eq!(completed.clone().failed("reset"), completed);

        let dropped = streaming().closed_by_peer();
        assert!(dropped.failure_message().unwrap().contains("closed"));
    }

    #[test]
    fn documented_scenario() {
        let state = streaming();
        let (state, _) = reduce(state, &progress(Some("r1"), 1, 4));
        assert_eq!(state.progress.percentage, 25.0);
        let (state, _) = reduce(state, &progress(None, 4, 4));
        assert_eq!(state.progress.percentage, 100.0);
        let (state, _) = reduce(state, &result(12345, &[(".ts", 10000), (".css", 2345)]));
        let (state, effect) = reduce(state, &ServerMessage::Complete);
        assert_eq!(effect, Effect::Close);
        assert_eq!(state.lifecycle, Lifecycle::Completed);
        assert_eq!(
            crate::format::thousands(state.result.unwrap().total_lines),
            "12,345"
        );
    }
}
