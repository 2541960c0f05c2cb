//! Unified error type for a Horde server.

use horde_protocol::ProtocolError;
use horde_room::RoomError;
use horde_session::SessionError;
use horde_transport::TransportError;
use horde_zombie::ZombieError;

/// Top-level error that wraps every crate's error.
///
/// The `#[from]` conversions let `?` lift sub-crate errors across layers.
#[derive(Debug, thiserror::Error)]
pub enum HordeError {
    /// Socket trouble: bind, accept, read, write.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A line that could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Room lookup, lifecycle or membership failure.
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Zombie(#[from] ZombieError),
}
