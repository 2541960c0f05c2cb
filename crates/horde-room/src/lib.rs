//! The room engine for Horde.
//!
//! A room is one arena: a single processing task (actor) that merges the
//! shots of its players with the moves of its zombies, applies the room's
//! [`Rules`], keeps score and fans the results back out.
//!
//! # Key types
//!
//! - [`Room`]: owns one arena: lifecycle (`init`, `run`, `stop`) and membership
//! - [`RoomHandle`]: cheap clone for adding players and zombies from anywhere
//! - [`Rules`]: what differs between arenas; [`TheWall`] and [`TrainingGrounds`]
//! - [`RoomState`], [`RoomStatus`]: lifecycle and a live snapshot of the room
//! - [`RoomConfig`]: queue sizes, movement clock, RNG seed
//! - [`RoomDirectory`]: the named rooms a server offers in its lobby

mod config;
mod directory;
mod error;
mod room;
mod rules;
mod training;
mod wall;

pub use config::{RoomConfig, RoomState, RoomStatus};
pub use directory::{LobbyEntry, RoomDirectory};
pub use error::RoomError;
pub use room::{Room, RoomHandle};
pub use rules::{HitOutcome, MoveOutcome, Rules, Scoreboard, Verdict};
pub use training::TrainingGrounds;
pub use wall::TheWall;
