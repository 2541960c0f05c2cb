//! Zombies for Horde.
//!
//! A [`Zombie`] is an autonomous actor: once summoned into a room and run,
//! it moves on its own [`MoveClock`] and publishes a `WALK` event for every
//! move on the room's movement queue. The room never drives it directly;
//! it only reads its position, hits it, resets it and, through the room's
//! [`CancelScope`], stops it.
//!
//! # Integration
//!
//! ```ignore
//! let scope = CancelScope::new();
//! let (moves_tx, mut moves_rx) = mpsc::channel(16);
//!
//! let zombie = Zombie::random(ZombieKind::Crawler);
//! zombie.reset(Position::new(29, 4));
//! zombie.summon(scope.token(), moves_tx)?;
//! zombie.run()?;
//!
//! while let Some(walk) = moves_rx.recv().await { /* ... */ }
//! scope.cancel(); // every zombie of the room stops
//! ```

mod clock;
mod error;
mod names;
mod scope;
mod zombie;

pub use clock::{ClockConfig, ClockTick, MoveClock};
pub use error::ZombieError;
pub use names::NamePool;
pub use scope::{CancelScope, CancelToken};
pub use zombie::{Movement, Zombie, ZombieKind};
