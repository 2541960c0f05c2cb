//! Room directory: the named rooms a server offers and routes players to.

use horde_session::PlayerHandle;
use serde::Serialize;

use crate::{Room, RoomError, RoomHandle, RoomState};

/// One line of the lobby listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbyEntry {
    pub name: String,
    pub default: bool,
    pub players: usize,
    pub state: RoomState,
}

/// Owns every room of a server.
///
/// Names are unique ignoring ASCII case, and lookups ignore case too:
/// `JOIN the-wall` finds `THE-WALL`. Decided rooms stay listed until the
/// directory shuts down.
#[derive(Default)]
pub struct RoomDirectory {
    rooms: Vec<Room>,
    default: Option<usize>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room and starts it if it is not running yet.
    ///
    /// The first room registered with `default = true` becomes the room
    /// players land in when they pick none; later ones replace it.
    ///
    /// # Errors
    /// [`RoomError::AlreadyExists`] on a name clash, or any error from
    /// starting the room.
    pub fn register(&mut self, mut room: Room, default: bool) -> Result<RoomHandle, RoomError> {
        let name = room.name();
        if self.position(&name).is_some() {
            return Err(RoomError::AlreadyExists(name));
        }

        match room.state() {
            RoomState::Created => room.start()?,
            RoomState::Initialized => room.run()?,
            RoomState::Running => {}
            RoomState::Ended => return Err(RoomError::InvalidState(format!("room {name} has ended"))),
        }

        let handle = room.handle();
        self.rooms.push(room);
        if default {
            self.default = Some(self.rooms.len() - 1);
        }
        tracing::info!(room = %name, default, rooms = self.rooms.len(), "room registered");
        Ok(handle)
    }

    /// Builds a room with `factory`, names it `name` and registers it.
    ///
    /// # Errors
    /// [`RoomError::AlreadyExists`] if a room by that name is listed; the
    /// factory is not called then.
    pub fn create(
        &mut self,
        name: &str,
        factory: impl FnOnce() -> Room,
    ) -> Result<RoomHandle, RoomError> {
        if self.position(name).is_some() {
            return Err(RoomError::AlreadyExists(name.to_string()));
        }
        let mut room = factory();
        room.set_name(name);
        self.register(room, false)
    }

    /// The lobby listing, in registration order.
    pub fn lobby(&self) -> Vec<LobbyEntry> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(idx, room)| {
                let status = room.status();
                LobbyEntry {
                    name: status.name,
                    default: self.default == Some(idx),
                    players: status.players,
                    state: status.state,
                }
            })
            .collect()
    }

    /// Looks up a room by name, or the default room for `None`.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] for an unknown name, or for `None` when no
    /// default room is set.
    pub fn handle(&self, name: Option<&str>) -> Result<RoomHandle, RoomError> {
        let idx = match name {
            Some(name) => self
                .position(name)
                .ok_or_else(|| RoomError::NotFound(name.to_string()))?,
            None => self
                .default
                .ok_or_else(|| RoomError::NotFound("default room".to_string()))?,
        };
        Ok(self.rooms[idx].handle())
    }

    pub fn default_name(&self) -> Option<String> {
        self.default.map(|idx| self.rooms[idx].name())
    }

    /// Adds `player` to the room called `name`.
    pub async fn join(&self, name: &str, player: PlayerHandle) -> Result<(), RoomError> {
        self.handle(Some(name))?.add_player(player).await
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Stops every room and empties the directory.
    pub async fn shutdown(&mut self) {
        tracing::info!(rooms = self.rooms.len(), "shutting down rooms");
        for mut room in self.rooms.drain(..) {
            room.stop().await;
        }
        self.default = None;
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rooms
            .iter()
            .position(|room| room.name().eq_ignore_ascii_case(name))
    }
}
