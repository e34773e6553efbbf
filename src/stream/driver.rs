// ABOUTME: Session driver. Pumps one channel through the reducer and publishes snapshots.
// ABOUTME: Sends the opening request, answers heartbeats, honors cancellation, and closes on terminal states.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::manager::ConnectionId;
use super::protocol::{ClientMessage, ServerMessage, SessionRequest};
use super::reducer::{Effect, SessionView, reduce};
use super::sse::SseTransport;
use super::transport::{StreamError, Transport, WsTransport};
use crate::api::{ApiClient, endpoint};

/// Shown when the channel cannot be established at all.
pub const CONNECT_FAILED: &str = "Failed to connect to the statistics service";

/// A full session snapshot tagged with the connection that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub connection: ConnectionId,
    pub view: SessionView,
}

/// Per-channel behavior differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Send the session request as the first frame.
    pub send_request: bool,
    /// Reply to `heartbeat` with `heartbeat_response`.
    pub answer_heartbeats: bool,
    /// Send `{"type":"close"}` before releasing the channel on cancellation.
    pub notify_close: bool,
}

impl DriverOptions {
    /// The primary WebSocket channel.
    pub const SOCKET: Self = Self {
        send_request: true,
        answer_heartbeats: true,
        notify_close: true,
    };

    /// The receive-only refresh event stream.
    pub const REFRESH: Self = Self {
        send_request: false,
        answer_heartbeats: false,
        notify_close: false,
    };
}

/// Handles the outbound half of a session: where updates go and how to stop.
pub struct SessionContext {
    pub connection: ConnectionId,
    pub updates: mpsc::Sender<SessionUpdate>,
    pub cancel: oneshot::Receiver<()>,
}

impl SessionContext {
    /// Returns false when nobody is listening anymore.
    async fn publish(&self, view: &SessionView) -> bool {
        self.updates
            .send(SessionUpdate {
                connection: self.connection,
                view: view.clone(),
            })
            .await
            .is_ok()
    }
}

/// Run a session over an already-open transport until it reaches a terminal
/// state, the peer goes away, or the session is cancelled. Returns the last
/// state the driver reached.
pub async fn drive<T: Transport>(
    mut transport: T,
    request: &SessionRequest,
    options: DriverOptions,
    mut ctx: SessionContext,
) -> SessionView {
    let mut view = SessionView::connecting();

    if options.send_request
        && let Err(e) = transport.send(&ClientMessage::Request(request.clone())).await
    {
        warn!(connection = %ctx.connection, error = %e, "failed to send session request");
        transport.close().await;
        view = view.failed(CONNECT_FAILED);
        ctx.publish(&view).await;
        return view;
    }

    view = view.opened();
    if !ctx.publish(&view).await {
        transport.close().await;
        return view;
    }

    loop {
        let frame = tokio::select! {
            biased;
            _ = &mut ctx.cancel => {
                debug!(connection = %ctx.connection, "session cancelled");
                if options.notify_close && transport.is_open() {
                    if let Err(e) = transport.send(&ClientMessage::Close).await {
                        debug!(error = %e, "close notification not delivered");
                    }
                }
                transport.close().await;
                return view;
            }
            frame = transport.recv() => frame,
        };

        let text = match frame {
            Some(Ok(text)) => text,
            Some(Err(e)) => {
                warn!(connection = %ctx.connection, error = %e, "transport failed");
                transport.close().await;
                view = view.failed(transport_failure_message(&e));
                ctx.publish(&view).await;
                return view;
            }
            None => {
                info!(connection = %ctx.connection, "channel closed by server");
                let closed = view.clone().closed_by_peer();
                if closed != view {
                    view = closed;
                    ctx.publish(&view).await;
                }
                return view;
            }
        };

        let message = match ServerMessage::decode(&text) {
            Ok(message) => message,
            Err(e) => {
                warn!(
                    connection = %ctx.connection,
                    error = %e,
                    payload = %text,
                    "dropping malformed frame"
                );
                continue;
            }
        };
        if message == ServerMessage::Unrecognized {
            debug!(connection = %ctx.connection, payload = %text, "unrecognized message kind");
        }

        let (next, effect) = reduce(view.clone(), &message);
        let changed = next != view;
        view = next;

        match effect {
            Effect::None => {}
            Effect::RespondHeartbeat => {
                if options.answer_heartbeats && transport.is_open() {
                    if let Err(e) = transport.send(&ClientMessage::HeartbeatResponse).await {
                        warn!(
                            connection = %ctx.connection,
                            error = %e,
                            "heartbeat response failed"
                        );
                    }
                }
            }
            Effect::Close => transport.close().await,
        }

        if changed && !ctx.publish(&view).await {
            transport.close().await;
            return view;
        }
        if view.lifecycle.is_terminal() {
            info!(connection = %ctx.connection, state = view.lifecycle.label(), "session finished");
            return view;
        }
    }
}

fn transport_failure_message(error: &StreamError) -> String {
    format!("Connection lost: {}", error)
}

/// Open the primary WebSocket channel for `request.username` and drive it.
pub async fn run_socket_session(ws_url: String, request: SessionRequest, mut ctx: SessionContext) {
    let connecting = SessionView::connecting();
    if !ctx.publish(&connecting).await {
        return;
    }

    let url = match endpoint(&ws_url, &["getLinesOfCode", &request.username]) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, ws_url = %ws_url, "invalid websocket url");
            ctx.publish(&connecting.failed(CONNECT_FAILED)).await;
            return;
        }
    };

    let connected = tokio::select! {
        biased;
        _ = &mut ctx.cancel => return,
        res = WsTransport::connect(&url) => res,
    };
    match connected {
        Ok(transport) => {
            drive(transport, &request, DriverOptions::SOCKET, ctx).await;
        }
        Err(e) => {
            warn!(%url, error = %e, "websocket connect failed");
            ctx.publish(&connecting.failed(CONNECT_FAILED)).await;
        }
    }
}

/// Trigger a backend refresh for `request.username` and follow the result
/// over the event-stream channel.
pub async fn run_refresh_session(api: ApiClient, request: SessionRequest, mut ctx: SessionContext) {
    let connecting = SessionView::connecting();
    if !ctx.publish(&connecting).await {
        return;
    }

    let url = match api.refresh_stream_url(&request) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "invalid refresh url");
            ctx.publish(&connecting.failed(CONNECT_FAILED)).await;
            return;
        }
    };

    let connected = tokio::select! {
        biased;
        _ = &mut ctx.cancel => return,
        res = SseTransport::connect(api.http(), url) => res,
    };
    let transport = match connected {
        Ok(transport) => transport,
        Err(e) => {
            warn!(error = %e, "event stream connect failed");
            ctx.publish(&connecting.failed(CONNECT_FAILED)).await;
            return;
        }
    };

    let trigger_api = api.clone();
    let username = request.username.clone();
    tokio::spawn(async move {
        if let Err(e) = trigger_api.trigger_refresh(&username).await {
            warn!(username = %username, error = %e, "refresh trigger failed");
        }
    });

    drive(transport, &request, DriverOptions::REFRESH, ctx).await;
}
