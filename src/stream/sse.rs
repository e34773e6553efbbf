// ABOUTME: Server-Sent Events transport used by the refresh channel.
// ABOUTME: Incremental line decoder for `data:` payloads over a streamed HTTP body.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tracing::debug;
use url::Url;

use super::protocol::ClientMessage;
use super::transport::{StreamError, Transport};

/// Splits an event-stream body into event payloads.
///
/// Only `data` fields matter here; multi-line data is joined with `\n`,
/// comment lines and other fields are skipped, and an event is emitted on the
/// blank line that terminates it.
#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of body bytes, returning every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut events = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                let raw = std::mem::take(&mut self.line);
                let text = String::from_utf8_lossy(&raw);
                let line = text.strip_suffix('\r').unwrap_or(text.as_ref());
                if let Some(event) = self.take_line(line) {
                    events.push(event);
                }
            } else {
                self.line.push(byte);
            }
        }
        events
    }

    fn take_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            let event = self.data.join("\n");
            self.data.clear();
            return Some(event);
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }
}

/// Receive-only channel over an event-stream response body.
pub struct SseTransport {
    body: BoxStream<'static, Result<Vec<u8>, StreamError>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    open: bool,
}

impl SseTransport {
    pub async fn connect(client: &reqwest::Client, url: Url) -> Result<Self, StreamError> {
        debug!(%url, "opening event stream");
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StreamError::Status(response.status()));
        }
        Ok(Self::from_stream(response.bytes_stream()))
    }

    /// Wrap any byte-chunk stream.
    pub fn from_stream<S, B, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]>,
        E: Into<StreamError>,
    {
        let body = stream
            .map(|chunk| chunk.map(|b| b.as_ref().to_vec()).map_err(Into::<StreamError>::into))
            .boxed();
        Self {
            body,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            open: true,
        }
    }
}

#[async_trait]
impl Transport for SseTransport {
    async fn send(&mut self, _message: &ClientMessage) -> Result<(), StreamError> {
        Err(StreamError::SendUnsupported)
    }

    async fn recv(&mut self) -> Option<Result<String, StreamError>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if !self.open {
                return None;
            }
            match self.body.next().await {
                Some(Ok(chunk)) => self.pending.extend(self.decoder.feed(&chunk)),
                Some(Err(e)) => {
                    self.open = false;
                    return Some(Err(e));
                }
                None => self.open = false,
            }
        }
    }

    async fn close(&mut self) {
        self.open = false;
        self.pending.clear();
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
