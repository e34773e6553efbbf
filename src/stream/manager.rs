// ABOUTME: Owns at most one live analysis session at a time.
// ABOUTME: Issues connection ids, cancels superseded sessions, and filters stale updates.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::driver::{SessionContext, SessionUpdate, run_refresh_session, run_socket_session};
use super::protocol::SessionRequest;
use crate::api::ApiClient;

/// How long shutdown waits for a cancelled session to release its channel.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Monotonic id for each session opened by a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct SessionHandle {
    id: ConnectionId,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            // The task may already have finished; nothing to do then.
            let _ = cancel.send(());
        }
    }
}

pub struct ConnectionManager {
    next_id: u64,
    current: Option<SessionHandle>,
    updates: mpsc::Sender<SessionUpdate>,
}

impl ConnectionManager {
    /// Every session publishes into `updates`, tagged with its id.
    pub fn new(updates: mpsc::Sender<SessionUpdate>) -> Self {
        Self {
            next_id: 0,
            current: None,
            updates,
        }
    }

    /// Cancel whatever is running and start a new session from `run`.
    ///
    /// `run` receives the context for the new session and is spawned on the
    /// current runtime.
    pub fn open_with<F, Fut>(&mut self, run: F) -> ConnectionId
    where
        F: FnOnce(SessionContext) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let ctx = SessionContext {
            connection: id,
            updates: self.updates.clone(),
            cancel: cancel_rx,
        };
        let task = tokio::spawn(run(ctx));
        debug!(connection = %id, "session opened");
        self.current = Some(SessionHandle {
            id,
            cancel: Some(cancel_tx),
            task,
        });
        id
    }

    /// Open the WebSocket analysis channel.
    pub fn open_socket(&mut self, ws_url: &str, request: SessionRequest) -> ConnectionId {
        let ws_url = ws_url.to_string();
        self.open_with(move |ctx| run_socket_session(ws_url, request, ctx))
    }

    /// Trigger a refresh and follow it over the event stream.
    pub fn open_refresh(&mut self, api: &ApiClient, request: SessionRequest) -> ConnectionId {
        let api = api.clone();
        self.open_with(move |ctx| run_refresh_session(api, request, ctx))
    }

    /// Cancel the current session, if any. Its later updates become stale.
    pub fn cancel(&mut self) {
        if let Some(mut handle) = self.current.take() {
            debug!(connection = %handle.id, "cancelling session");
            handle.cancel();
        }
    }

    /// True only for updates from the session the manager currently owns.
    pub fn accepts(&self, id: ConnectionId) -> bool {
        self.current.as_ref().is_some_and(|h| h.id == id)
    }

    pub fn current(&self) -> Option<ConnectionId> {
        self.current.as_ref().map(|h| h.id)
    }

    /// Cancel the current session and wait briefly for it to close its channel.
    pub async fn shutdown(&mut self) {
        if let Some(mut handle) = self.current.take() {
            handle.cancel();
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut handle.task).await {
                Ok(Ok(())) => debug!(connection = %handle.id, "session shut down"),
                Ok(Err(e)) => warn!(connection = %handle.id, error = %e, "session task failed"),
                Err(_) => {
                    warn!(connection = %handle.id, "session did not stop in time; aborting");
                    handle.task.abort();
                }
            }
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.cancel();
    }
}
