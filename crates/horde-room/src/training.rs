//! Training grounds: shoot at zombies all day, nobody ever wins.

use horde_protocol::Position;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{HitOutcome, Rules};

/// An arena with no wall and no score. Hits are registered on the zombie
/// and that is all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingGrounds {
    pub width: i32,
    pub height: i32,
}

impl Default for TrainingGrounds {
    fn default() -> Self {
        Self {
            width: 29,
            height: 9,
        }
    }
}

impl Rules for TrainingGrounds {
    fn default_name(&self) -> &str {
        "training grounds"
    }

    fn greeting(&self, room: &str) -> String {
        format!("# {room}\n# Nobody keeps score here. Practice your aim.\n")
    }

    fn spawn_point(&self, rng: &mut dyn RngCore) -> Position {
        Position::new(
            rng.random_range(0..=self.width.max(0)),
            rng.random_range(0..self.height.max(1)),
        )
    }

    fn resolve_hit(&self, _downed: bool) -> HitOutcome {
        HitOutcome::Register
    }
}
