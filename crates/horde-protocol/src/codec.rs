//! Codec trait and implementations for turning events into bytes and back.
//!
//! A connection speaks exactly one codec. The server holds it as
//! `Arc<dyn Codec>`, so the methods are concrete over [`Event`] rather
//! than generic: the trait must stay dyn-compatible.
//!
//! Two codecs ship with the crate:
//!
//! - [`TextCodec`], the line protocol a human can type into `nc`.
//! - [`JsonCodec`], one JSON object per line, for programmatic clients.

use crate::{Event, ProtocolError, parse};

/// Converts [`Event`]s and free-form notices to and from bytes.
///
/// Every encoded frame is newline-terminated; the transport writes it as-is.
pub trait Codec: Send + Sync + 'static {
    /// Decodes one inbound line (terminator optional).
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] when the line is not a valid command.
    fn decode(&self, line: &[u8]) -> Result<Event, ProtocolError>;

    /// Encodes one outbound event as a complete line.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] when the codec cannot represent the event.
    fn encode(&self, event: &Event) -> Result<Vec<u8>, ProtocolError>;

    /// Encodes a human-readable notice (greetings, lobby listings, game
    /// over). The default passes the text through untouched.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] when the codec cannot represent the text.
    fn encode_notice(&self, text: &str) -> Result<Vec<u8>, ProtocolError> {
        Ok(text.as_bytes().to_vec())
    }
}

// ---------------------------------------------------------------------------
// TextCodec
// ---------------------------------------------------------------------------

/// The plain line protocol.
///
/// ```rust
/// use horde_protocol::{Codec, Event, Position, TextCodec};
///
/// let codec = TextCodec;
/// let line = codec.encode(&Event::walk("crawler-leg-eater", Position::new(3, 1))).unwrap();
/// assert_eq!(line, b"WALK crawler-leg-eater 3 1\n");
///
/// let shot = codec.decode(b"SHOOT 3 1\n").unwrap();
/// assert_eq!(shot, Event::shoot(Position::new(3, 1)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn decode(&self, line: &[u8]) -> Result<Event, ProtocolError> {
        parse(line)
    }

    fn encode(&self, event: &Event) -> Result<Vec<u8>, ProtocolError> {
        Ok(format!("{event}\n").into_bytes())
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// One JSON object per line, using the internally tagged form of [`Event`].
///
/// Notices are wrapped as `{"type":"NOTICE","text":"..."}` so a client can
/// tell them apart from game events.
///
/// This is behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn decode(&self, line: &[u8]) -> Result<Event, ProtocolError> {
        serde_json::from_slice(line.trim_ascii()).map_err(ProtocolError::Decode)
    }

    fn encode(&self, event: &Event) -> Result<Vec<u8>, ProtocolError> {
        let mut bytes = serde_json::to_vec(event).map_err(ProtocolError::Encode)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn encode_notice(&self, text: &str) -> Result<Vec<u8>, ProtocolError> {
        let notice = serde_json::json!({ "type": "NOTICE", "text": text });
        let mut bytes = serde_json::to_vec(&notice).map_err(ProtocolError::Encode)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_text_codec_frames_with_newline() {
        let codec = TextCodec;
        let bytes = codec
            .encode(&Event::boom("ivan", vec!["crawler-eye-eater".into()]))
            .unwrap();
        assert_eq!(bytes, b"BOOM ivan 1 [crawler-eye-eater]\n");
    }

    #[test]
    fn test_text_codec_notice_passthrough() {
        let codec = TextCodec;
        let bytes = codec.encode_notice("# zombies win\n").unwrap();
        assert_eq!(bytes, b"# zombies win\n");
    }

    #[test]
    fn test_text_codec_rejects_garbage() {
        assert!(TextCodec.decode(b"hello").is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_decodes_client_shot() {
        let codec = JsonCodec;
        let e = codec
            .decode(br#"{"type":"SHOOT","target":{"x":4,"y":2}}"#)
            .unwrap();
        assert_eq!(e, Event::shoot(Position::new(4, 2)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_encodes_one_object_per_line() {
        let codec = JsonCodec;
        let bytes = codec
            .encode(&Event::walk("rabbit-leg-knight", Position::new(5, 5)))
            .unwrap();

        assert_eq!(bytes.last(), Some(&b'\n'));
        assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 1);

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["type"], "WALK");
        assert_eq!(value["actor"], "rabbit-leg-knight");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_wraps_notices() {
        let bytes = JsonCodec.encode_notice("# players win\n").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["type"], "NOTICE");
        assert_eq!(value["text"], "# players win\n");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_decode_error() {
        assert!(matches!(
            JsonCodec.decode(b"{not json"),
            Err(ProtocolError::Decode(_))
        ));
    }
}
