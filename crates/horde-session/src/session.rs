//! The lobby: what a client does between connecting and playing.
//!
//! ```text
//!   Lobby ──(START <name>)──→ Playing
//!     │ ↺ JOIN <room>   remember the room to join
//!     │ ↺ NEW <room>    ask the server for a new room (and select it)
//! ```

use horde_protocol::Event;

/// Name a client has until it sends `START`.
pub const DEFAULT_NAME: &str = "unknown warrior";

/// Where a client is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Picking a room and a name.
    Lobby,
    /// Named and handed over to a room.
    Playing,
}

/// What the server should do after a lobby command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyAction {
    /// The client picked an existing room.
    Select(String),
    /// The client wants a new room with this name.
    Create(String),
    /// The client is ready to play under this name.
    Start(String),
    /// Nothing to do (shots in the lobby, commands after START).
    Ignore,
}

/// One client's lobby state.
#[derive(Debug, Clone)]
pub struct Session {
    name: String,
    selected_room: Option<String>,
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            selected_room: None,
            state: SessionState::Lobby,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last room picked with `JOIN` or `NEW`, if any.
    pub fn selected_room(&self) -> Option<&str> {
        self.selected_room.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Forgets the selected room, e.g. after it turned out not to exist.
    pub fn clear_selection(&mut self) {
        self.selected_room = None;
    }

    /// Applies one lobby command.
    pub fn apply(&mut self, event: Event) -> LobbyAction {
        if self.state == SessionState::Playing {
            return LobbyAction::Ignore;
        }

        match event {
            Event::Join { room } => {
                tracing::debug!(room = %room, "room selected");
                self.selected_room = Some(room.clone());
                LobbyAction::Select(room)
            }
            Event::New { room } => {
                self.selected_room = Some(room.clone());
                LobbyAction::Create(room)
            }
            Event::Start { name } => {
                self.name = name.clone();
                self.state = SessionState::Playing;
                LobbyAction::Start(name)
            }
            Event::Walk { .. } | Event::Shoot { .. } | Event::Boom { .. } => {
                LobbyAction::Ignore
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_protocol::Position;

    #[test]
    fn test_new_session_is_unnamed_lobby() {
        let s = Session::new();
        assert_eq!(s.name(), "unknown warrior");
        assert_eq!(s.selected_room(), None);
        assert_eq!(s.state(), SessionState::Lobby);
    }

    #[test]
    fn test_join_then_start() {
        let mut s = Session::new();
        assert_eq!(
            s.apply(Event::Join { room: "woods".into() }),
            LobbyAction::Select("woods".into())
        );
        assert_eq!(
            s.apply(Event::Start { name: "ivan".into() }),
            LobbyAction::Start("ivan".into())
        );
        assert_eq!(s.name(), "ivan");
        assert_eq!(s.selected_room(), Some("woods"));
        assert_eq!(s.state(), SessionState::Playing);
    }

    #[test]
    fn test_last_selection_wins() {
        let mut s = Session::new();
        s.apply(Event::Join { room: "woods".into() });
        assert_eq!(
            s.apply(Event::New { room: "moon".into() }),
            LobbyAction::Create("moon".into())
        );
        assert_eq!(s.selected_room(), Some("moon"));

        s.clear_selection();
        assert_eq!(s.selected_room(), None);
    }

    #[test]
    fn test_shots_in_lobby_are_ignored() {
        let mut s = Session::new();
        assert_eq!(
            s.apply(Event::shoot(Position::new(1, 1))),
            LobbyAction::Ignore
        );
        assert_eq!(s.state(), SessionState::Lobby);
    }

    #[test]
    fn test_commands_after_start_are_ignored() {
        let mut s = Session::new();
        s.apply(Event::Start { name: "ivan".into() });
        assert_eq!(
            s.apply(Event::Start { name: "olga".into() }),
            LobbyAction::Ignore
        );
        assert_eq!(
            s.apply(Event::Join { room: "woods".into() }),
            LobbyAction::Ignore
        );
        assert_eq!(s.name(), "ivan");
    }
}
