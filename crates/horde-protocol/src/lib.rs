//! Wire protocol for Horde.
//!
//! This crate defines what players and zombies say to a room:
//!
//! - **Types** ([`Event`], [`EventKind`], [`Position`]): the discrete
//!   things that happen in an arena (a zombie walks, a player shoots, a
//!   shot goes boom, a client starts, joins or creates a room).
//! - **Parsing** ([`parse`]): the text command language clients type.
//! - **Codec** ([`Codec`] trait, [`TextCodec`], [`JsonCodec`]): how those
//!   events are converted to and from bytes on a connection.
//! - **Errors** ([`ProtocolError`]): what can go wrong on the way.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw lines) and the room
//! engine (typed events). It knows nothing about rooms or zombies, only
//! how to read and write events.
//!
//! ```text
//! Transport (lines) → Protocol (Event) → Session → Room
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod parse;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::{Codec, TextCodec};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use parse::parse;
pub use types::{Event, EventKind, Position};
