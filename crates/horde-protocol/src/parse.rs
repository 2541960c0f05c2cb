//! The text command language.
//!
//! Clients type one command per line, tokens separated by whitespace:
//!
//! ```text
//! START ivan
//! JOIN the-wall
//! NEW woods
//! SHOOT 4 7
//! ```
//!
//! Verbs are case-insensitive. Payloads (names, room names) keep their
//! case; rooms are looked up case-insensitively further up the stack.

use crate::{Event, EventKind, Position, ProtocolError};

/// Parses one client line into an [`Event`].
///
/// Surrounding whitespace and line terminators are ignored. A parsed
/// `SHOOT` has an empty actor: the wire does not say who is shooting, the
/// session layer fills it in.
///
/// # Errors
///
/// [`ProtocolError::BadInput`] when the line has fewer than two tokens,
/// an unknown verb, the wrong number of arguments for its verb, or
/// coordinates that are not integers.
///
/// ```rust
/// use horde_protocol::{parse, Event, Position};
///
/// assert_eq!(parse(b"shoot 1 2\n").unwrap(), Event::shoot(Position::new(1, 2)));
/// assert!(parse(b"SHOOT one two").is_err());
/// ```
pub fn parse(line: &[u8]) -> Result<Event, ProtocolError> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    let bad = || ProtocolError::BadInput(text.to_string());

    let args: Vec<&str> = text.split_whitespace().collect();
    if args.len() < 2 {
        return Err(bad());
    }

    let kind = EventKind::from_verb(args[0]).ok_or_else(bad)?;
    match (kind, args.len()) {
        (EventKind::Shoot, 3) => {
            let x = args[1].parse().map_err(|_| bad())?;
            let y = args[2].parse().map_err(|_| bad())?;
            Ok(Event::shoot(Position::new(x, y)))
        }
        (EventKind::Start, 2) => Ok(Event::Start {
            name: args[1].to_string(),
        }),
        (EventKind::Join, 2) => Ok(Event::Join {
            room: args[1].to_string(),
        }),
        (EventKind::New, 2) => Ok(Event::New {
            room: args[1].to_string(),
        }),
        // WALK and BOOM are server-side events; clients may not send them.
        _ => Err(bad()),
    }
}
