// ABOUTME: Progress-ingestion pipeline for a single analysis session.
// ABOUTME: Wire protocol, reducer, projector, transports, session driver, and the connection manager.

pub mod driver;
pub mod manager;
pub mod projector;
pub mod protocol;
pub mod reducer;
pub mod sse;
pub mod transport;

pub use driver::{CONNECT_FAILED, DriverOptions, SessionContext, SessionUpdate, drive};
pub use manager::{ConnectionId, ConnectionManager};
pub use projector::{DerivedMetrics, LanguageLines, project};
pub use protocol::{ClientMessage, ServerMessage, SessionRequest};
pub use reducer::{Effect, Lifecycle, ProgressSnapshot, ResultSnapshot, SessionView, reduce};
pub use transport::{StreamError, Transport, WsTransport};
