//! Error types for the protocol layer.
//!
//! Each crate in Horde defines its own error enum. When you see a
//! `ProtocolError`, the problem is in reading or writing a command,
//! never in networking or room management.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A client line could not be turned into an [`Event`](crate::Event).
    ///
    /// Covers too few tokens, an unknown verb, the wrong number of
    /// arguments and non-integer coordinates. The string is the offending
    /// input (trimmed) so it can be logged as-is.
    #[error("bad command, won't parse: {0:?}")]
    BadInput(String),

    /// Serialization failed (turning an event into JSON bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning JSON bytes into an event).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
