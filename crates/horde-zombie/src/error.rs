//! Error types for zombie actors.

/// Errors returned by [`Zombie`](crate::Zombie) lifecycle calls.
#[derive(Debug, thiserror::Error)]
pub enum ZombieError {
    /// `summon` was called on a zombie that already belongs to a room.
    #[error("zombie {0} is already summoned")]
    AlreadySummoned(String),

    /// `run` or `step` was called before `summon`.
    #[error("zombie has not been summoned")]
    NotSummoned,

    /// The room's cancellation scope fired.
    #[error("zombie {0} was cancelled")]
    Cancelled(String),

    /// The zombie was killed.
    #[error("zombie {0} is dead")]
    Dead(String),

    /// Nobody reads the movement queue any more.
    #[error("zombie {0} lost its room")]
    Detached(String),
}
