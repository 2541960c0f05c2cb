//! Error types for the session layer.

/// Errors that can occur while a player talks to its room.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The room side of this player is gone: the room ended, stopped or
    /// dropped the player.
    #[error("player {0} is no longer attached to a room")]
    Detached(String),

    /// The command is not valid at this point of the session.
    #[error("unexpected command {0} for player {1}")]
    Unexpected(horde_protocol::EventKind, String),
}
