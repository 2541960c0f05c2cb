//! Transport abstraction layer for Horde.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! how clients reach a server. A connection here is a stream of *lines*:
//! the transport owns framing, everything above it sees one command or one
//! rendered event per call.
//!
//! # Feature Flags
//!
//! - `tcp` (default): newline-framed TCP via `tokio::net`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "tcp")]
mod tcp;

pub use error::TransportError;
#[cfg(feature = "tcp")]
pub use tcp::{MAX_LINE_LEN, TcpConnection, TcpTransport};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Stops handing out connections. Later `accept` calls fail.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// A single client connection that exchanges lines.
///
/// `send` and `recv` may be called concurrently from different tasks; a
/// reader blocked in `recv` never holds up a writer.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Writes bytes to the peer verbatim. Callers supply the terminator.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads the next line, without its terminator.
    ///
    /// Returns `Ok(None)` when the peer closed the connection.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes our half of the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "ivan");
        map.insert(ConnectionId::new(2), "olga");
        assert_eq!(map[&ConnectionId::new(1)], "ivan");
        assert_ne!(ConnectionId::new(1), ConnectionId::new(2));
    }
}
