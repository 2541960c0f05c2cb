//! Error types for the room layer.

use horde_zombie::ZombieError;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room with this name.
    #[error("room {0:?} not found")]
    NotFound(String),

    /// A room with this name (ignoring case) already exists.
    #[error("room {0:?} already exists")]
    AlreadyExists(String),

    /// The room is in a state that doesn't allow this operation, such as
    /// running a room twice.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),

    /// The room is over; it takes no more players or zombies.
    #[error("room {0:?} has ended")]
    Ended(String),

    /// A zombie could not be attached.
    #[error(transparent)]
    Zombie(#[from] ZombieError),
}
