//! # Horde
//!
//! A multiplayer arena where players shoot arrows at zombies over a plain
//! line protocol. Every arena is a room: one processing task that merges
//! player shots with zombie moves, keeps score and fans results out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use horde::prelude::*;
//!
//! # async fn run() -> Result<(), HordeError> {
//! horde::init_tracing();
//!
//! let wall = Room::new(TheWall::default()).zombie(Zombie::random(ZombieKind::Crawler));
//! let server = HordeServer::builder()
//!     .bind("0.0.0.0:3333")
//!     .room(wall, true)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```
//!
//! Then `nc localhost 3333`, type `START ivan` and `SHOOT 28 4`.

mod error;
mod handler;
mod logging;
mod server;

pub use error::HordeError;
pub use logging::init_tracing;
pub use server::{HordeServer, HordeServerBuilder, RoomFactory};

/// Everything needed to set up a server and its rooms.
pub mod prelude {
    pub use crate::{HordeError, HordeServer, HordeServerBuilder, RoomFactory};

    pub use horde_protocol::{Codec, Event, Position, TextCodec};
    #[cfg(feature = "json")]
    pub use horde_protocol::JsonCodec;
    pub use horde_room::{
        LobbyEntry, Room, RoomConfig, RoomHandle, RoomState, RoomStatus, Rules, Scoreboard,
        TheWall, TrainingGrounds, Verdict,
    };
    pub use horde_session::{Outbound, PlayerEndpoint, PlayerHandle};
    pub use horde_zombie::{ClockConfig, Zombie, ZombieKind};
}
