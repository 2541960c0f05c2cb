//! Room configuration, lifecycle state and status snapshots.

use std::time::Duration;

use horde_zombie::ClockConfig;
use serde::{Deserialize, Serialize};

use crate::{Scoreboard, Verdict};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Engine settings for a room. The arena itself is described by its
/// [`Rules`](crate::Rules).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Capacity of each of the two event queues (player shots, zombie moves).
    pub event_buffer: usize,

    /// Capacity of the command queue (add player, add zombie).
    pub command_buffer: usize,

    /// Movement interval of the zombies the room spawns itself.
    /// Zero puts them in manual mode.
    pub move_interval: Duration,

    /// Random delay before a spawned zombie's first move.
    pub move_jitter: Duration,

    /// Seed for spawn points and spawned zombies. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            event_buffer: 16,
            command_buffer: 64,
            move_interval: Duration::from_secs(3),
            move_jitter: Duration::ZERO,
            seed: None,
        }
    }
}

impl RoomConfig {
    /// The clock given to zombies this room spawns.
    pub fn clock(&self) -> ClockConfig {
        ClockConfig {
            interval: self.move_interval,
            initial_jitter: self.move_jitter,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions are strictly ordered:
///
/// ```text
/// Created → Initialized → Running → Ended
/// ```
///
/// A room may also jump to `Ended` from any state when it is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    /// Built, no queues yet.
    Created,
    /// Queues allocated, pre-configured zombies summoned.
    Initialized,
    /// The processing loop is live.
    Running,
    /// Decided or stopped. Final.
    Ended,
}

impl RoomState {
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Initialized),
            Self::Initialized => Some(Self::Running),
            Self::Running => Some(Self::Ended),
            Self::Ended => None,
        }
    }

    /// Whether a room in this state may move to `target`: one step
    /// forward, or straight to `Ended` from anywhere but `Ended`.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target) || (target == Self::Ended && self != Self::Ended)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Initialized => write!(f, "initialized"),
            Self::Running => write!(f, "running"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// A snapshot of a room, published on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomStatus {
    pub name: String,
    pub state: RoomState,
    pub score: Scoreboard,
    /// Set once, when the room is decided.
    pub verdict: Option<Verdict>,
    pub players: usize,
    pub zombies: usize,
}

impl RoomStatus {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            state: RoomState::Created,
            score: Scoreboard::default(),
            verdict: None,
            players: 0,
            zombies: 0,
        }
    }
}
