// ABOUTME: Transport seam for analysis channels, with the WebSocket implementation.
// ABOUTME: Session drivers talk to a Transport so tests can substitute scripted channels.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use super::protocol::ClientMessage;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(#[from] crate::api::ApiError),
    #[error("server answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("channel is closed")]
    Closed,
    #[error("channel does not accept outbound messages")]
    SendUnsupported,
}

/// A bidirectional (or receive-only) text-frame channel.
#[async_trait]
pub trait Transport: Send {
    /// Send one frame.
    async fn send(&mut self, message: &ClientMessage) -> Result<(), StreamError>;

    /// Next inbound text payload. `None` once the peer has closed the channel.
    async fn recv(&mut self) -> Option<Result<String, StreamError>>;

    /// Release the channel. Safe to call more than once.
    async fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// WebSocket channel to the analysis endpoint.
pub struct WsTransport {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    open: bool,
}

impl WsTransport {
    pub async fn connect(url: &Url) -> Result<Self, StreamError> {
        debug!(%url, "opening websocket");
        let (socket, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
        Ok(Self { socket, open: true })
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, message: &ClientMessage) -> Result<(), StreamError> {
        if !self.open {
            return Err(StreamError::Closed);
        }
        self.socket.send(Message::text(message.to_json())).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String, StreamError>> {
        while self.open {
            match self.socket.next().await {
                None => self.open = false,
                Some(Err(e)) => {
                    self.open = false;
                    return Some(Err(e.into()));
                }
                Some(Ok(Message::Text(text))) => return Some(Ok(text.as_str().to_owned())),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => warn!(len = bytes.len(), "dropping non-utf8 binary frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "server closed websocket");
                    self.open = false;
                }
                // Ping/pong are answered by tungstenite itself.
                Some(Ok(_)) => {}
            }
        }
        None
    }

    async fn close(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = self.socket.close(None).await {
                debug!(error = %e, "websocket close handshake failed");
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
