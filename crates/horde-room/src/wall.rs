//! The wall: zombies crawl in from the right, archers hold the wall at x = 0.

use horde_protocol::Position;
use horde_zombie::ZombieKind;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{HitOutcome, MoveOutcome, Rules, Scoreboard, Verdict};

/// A bounded arena with a wall and a score threshold per side.
///
/// Zombies spawn on the far edge (`x == width`, random row) and every
/// player that joins brings one more crawler along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TheWall {
    /// Spawn column; the arena spans `0..=width`.
    pub width: i32,
    /// Rows are `0..height`.
    pub height: i32,
    /// Downed zombies the players need.
    pub players_to_win: u32,
    /// Wall reaches the zombies need.
    pub zombies_to_win: u32,
}

impl Default for TheWall {
    fn default() -> Self {
        Self {
            width: 29,
            height: 9,
            players_to_win: 5,
            zombies_to_win: 5,
        }
    }
}

impl Rules for TheWall {
    fn default_name(&self) -> &str {
        "THE-WALL"
    }

    fn greeting(&self, room: &str) -> String {
        format!("# {room}\n# Zombies are coming !!! Prepare your bows warriors !!!\n")
    }

    fn spawn_point(&self, rng: &mut dyn RngCore) -> Position {
        Position::new(self.width, rng.random_range(0..self.height.max(1)))
    }

    fn reinforcement(&self) -> Option<ZombieKind> {
        Some(ZombieKind::Crawler)
    }

    fn resolve_movement(&self, at: Position) -> MoveOutcome {
        if at.x == 0 {
            MoveOutcome::WallReached
        } else {
            MoveOutcome::Pass
        }
    }

    fn resolve_hit(&self, downed: bool) -> HitOutcome {
        if downed {
            HitOutcome::Score
        } else {
            HitOutcome::Register
        }
    }

    fn verdict(&self, score: &Scoreboard) -> Option<Verdict> {
        if score.zombies >= self.zombies_to_win {
            Some(Verdict::ZombiesWin)
        } else if score.players >= self.players_to_win {
            Some(Verdict::PlayersWin)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_spawn_on_far_edge() {
        let wall = TheWall::default();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let p = wall.spawn_point(&mut rng);
            assert_eq!(p.x, 29);
            assert!((0..9).contains(&p.y), "row {}", p.y);
        }
    }

    #[test]
    fn test_wall_at_column_zero() {
        let wall = TheWall::default();
        assert_eq!(wall.resolve_movement(Position::new(0, 3)), MoveOutcome::WallReached);
        // Only the step onto the wall counts, not a stale step past it.
        assert_eq!(wall.resolve_movement(Position::new(-1, 3)), MoveOutcome::Pass);
        assert_eq!(wall.resolve_movement(Position::new(1, 3)), MoveOutcome::Pass);
    }

    #[test]
    fn test_only_downed_zombies_score() {
        let wall = TheWall::default();
        assert_eq!(wall.resolve_hit(true), HitOutcome::Score);
        assert_eq!(wall.resolve_hit(false), HitOutcome::Register);
    }

    #[test]
    fn test_verdict_thresholds_are_inclusive() {
        let wall = TheWall::default();
        assert_eq!(wall.verdict(&Scoreboard { players: 4, zombies: 4 }), None);
        assert_eq!(
            wall.verdict(&Scoreboard { players: 5, zombies: 0 }),
            Some(Verdict::PlayersWin)
        );
        assert_eq!(
            wall.verdict(&Scoreboard { players: 0, zombies: 7 }),
            Some(Verdict::ZombiesWin)
        );
    }

    #[test]
    fn test_tie_goes_to_zombies() {
        let wall = TheWall::default();
        assert_eq!(
            wall.verdict(&Scoreboard { players: 5, zombies: 5 }),
            Some(Verdict::ZombiesWin)
        );
    }

    #[test]
    fn test_greeting_names_room() {
        let text = TheWall::default().greeting("THE-WALL");
        assert!(text.starts_with("# THE-WALL\n"));
        assert!(text.ends_with("Prepare your bows warriors !!!\n"));
    }
}
