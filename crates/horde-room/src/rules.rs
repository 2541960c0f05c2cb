//! What makes one arena different from another.
//!
//! The engine (see [`Room`](crate::Room)) is the same for every arena; the
//! differences live behind [`Rules`]: where zombies spawn, what a zombie at
//! a given spot means, what a hit is worth and when the game is over.

use std::fmt;

use horde_protocol::Position;
use horde_zombie::ZombieKind;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Points per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Zombies downed by players.
    pub players: u32,
    /// Times a zombie reached the wall.
    pub zombies: u32,
}

/// How a room ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    ZombiesWin,
    PlayersWin,
}

impl Verdict {
    /// The notice every player gets before being disconnected.
    pub const fn notice(self) -> &'static str {
        match self {
            Self::ZombiesWin => "# zombies win\n",
            Self::PlayersWin => "# players win\n",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZombiesWin => f.write_str("zombies win"),
            Self::PlayersWin => f.write_str("players win"),
        }
    }
}

/// What a zombie's move means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing; the move is just shown to players.
    Pass,
    /// The zombie scores and is sent back to a spawn point.
    WallReached,
}

/// What a hit on a zombie means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Players score and the zombie is sent back to a spawn point.
    Score,
    /// The zombie keeps the arrow; nothing else happens.
    Register,
}

/// The rule set of an arena.
///
/// Called only from the room's processing task, one event at a time.
pub trait Rules: Send + Sync + 'static {
    /// Name a room gets when nobody names it.
    fn default_name(&self) -> &str;

    /// Notice sent to a player joining the room called `room`.
    fn greeting(&self, room: &str) -> String;

    /// Where a new or respawned zombie appears.
    fn spawn_point(&self, rng: &mut dyn RngCore) -> Position;

    /// Kind of zombie spawned for every player that joins, if any.
    fn reinforcement(&self) -> Option<ZombieKind> {
        None
    }

    fn resolve_movement(&self, _at: Position) -> MoveOutcome {
        MoveOutcome::Pass
    }

    /// `downed` is what the zombie itself reported for the hit.
    fn resolve_hit(&self, downed: bool) -> HitOutcome;

    /// Decides the game, if it is decided. The zombies' threshold is
    /// checked first, so a tie goes to the zombies.
    fn verdict(&self, _score: &Scoreboard) -> Option<Verdict> {
        None
    }
}
