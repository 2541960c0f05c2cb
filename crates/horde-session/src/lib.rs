//! Player sessions for Horde.
//!
//! This crate sits between a client connection and a room:
//!
//! 1. **Lobby**: picking or creating a room and choosing a name before
//!    play starts ([`Session`], [`LobbyAction`]).
//! 2. **Player proxy**: once playing, the room talks to a
//!    [`PlayerHandle`] and the connection talks to the matching
//!    [`PlayerEndpoint`]. Neither side sees the other's transport.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room (above)      ← owns PlayerHandles: notify, process_event, disconnect
//!     ↕  channels
//! Session (this)    ← PlayerEndpoint: commands in, Outbound out
//!     ↕
//! Connection (below)
//! ```

mod error;
mod player;
mod session;

pub use error::SessionError;
pub use player::{Outbound, PlayerEndpoint, PlayerHandle, PlayerSender, COMMAND_BUFFER};
pub use session::{DEFAULT_NAME, LobbyAction, Session, SessionState};
