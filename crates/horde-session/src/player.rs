//! The player proxy: one channel pair per playing client.
//!
//! A room never touches a socket. It holds a [`PlayerHandle`] and can
//! notify, forward events and disconnect through it. The connection side
//! holds the [`PlayerEndpoint`], feeding commands in and draining
//! [`Outbound`] messages out.
//!
//! ```text
//!               commands (bounded)
//! PlayerEndpoint ────────────────→ PlayerHandle::take_inbox → room loop
//!                ←──────────────── PlayerHandle::notify / process_event
//!               Outbound (unbounded)
//! ```
//!
//! Outbound delivery is unbounded so that a slow client can never stall
//! the room's processing loop.

use horde_protocol::{Event, EventKind, Position};
use tokio::sync::mpsc;

use crate::SessionError;

/// How many commands a player may queue before `send` waits.
pub const COMMAND_BUFFER: usize = 32;

/// Something the room wants a client to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A game event (movement, boom).
    Event(Event),
    /// Free-form text, already newline-terminated.
    Notice(String),
    /// The room is done with this player; close the connection.
    Disconnect,
}

/// Sender half of a player's outbound channel.
pub type PlayerSender = mpsc::UnboundedSender<Outbound>;

// ---------------------------------------------------------------------------
// PlayerHandle (room side)
// ---------------------------------------------------------------------------

/// The room's view of a player.
///
/// All sends are fire-and-forget: they never wait and they report whether
/// the client side is still listening.
#[derive(Debug)]
pub struct PlayerHandle {
    name: String,
    outbox: PlayerSender,
    inbox: Option<mpsc::Receiver<Event>>,
}

impl PlayerHandle {
    /// Creates a connected handle/endpoint pair for a player called `name`.
    pub fn new(name: impl Into<String>) -> (PlayerHandle, PlayerEndpoint) {
        let name = name.into();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();

        let handle = PlayerHandle {
            name: name.clone(),
            outbox: outbox_tx,
            inbox: Some(command_rx),
        };
        let endpoint = PlayerEndpoint {
            name,
            commands: command_tx,
            outbox: outbox_rx,
        };
        (handle, endpoint)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sends a text notice. Returns `false` if the client is gone.
    pub fn notify(&self, text: &str) -> bool {
        self.outbox.send(Outbound::Notice(text.to_string())).is_ok()
    }

    /// Forwards a game event. Returns `false` if the client is gone.
    pub fn process_event(&self, event: &Event) -> bool {
        self.outbox.send(Outbound::Event(event.clone())).is_ok()
    }

    /// Tells the client side to hang up.
    pub fn disconnect(&self) {
        let _ = self.outbox.send(Outbound::Disconnect);
    }

    /// Takes the receiver of this player's commands. Only the first call
    /// returns `Some`; the room moves it into a forwarding task.
    pub fn take_inbox(&mut self) -> Option<mpsc::Receiver<Event>> {
        self.inbox.take()
    }
}

// ---------------------------------------------------------------------------
// PlayerEndpoint (connection side)
// ---------------------------------------------------------------------------

/// The client's view of its room membership.
#[derive(Debug)]
pub struct PlayerEndpoint {
    name: String,
    commands: mpsc::Sender<Event>,
    outbox: mpsc::UnboundedReceiver<Outbound>,
}

impl PlayerEndpoint {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sends a command to the room, stamping this player as the actor.
    ///
    /// Only `SHOOT` is meaningful in a room; lobby commands are refused.
    ///
    /// # Errors
    /// [`SessionError::Unexpected`] for anything but a shot,
    /// [`SessionError::Detached`] once the room stopped listening.
    pub async fn send(&self, event: Event) -> Result<(), SessionError> {
        if event.kind() != EventKind::Shoot {
            return Err(SessionError::Unexpected(event.kind(), self.name.clone()));
        }
        self.commands
            .send(event.with_actor(self.name.as_str()))
            .await
            .map_err(|_| SessionError::Detached(self.name.clone()))
    }

    /// Fires at `(x, y)`.
    pub async fn shoot(&self, x: i32, y: i32) -> Result<(), SessionError> {
        self.send(Event::shoot(Position::new(x, y))).await
    }

    /// Waits for the next outbound message. `None` once the room dropped
    /// its handle and everything queued has been read.
    pub async fn recv(&mut self) -> Option<Outbound> {
        self.outbox.recv().await
    }

    /// Returns a queued outbound message without waiting.
    pub fn try_recv(&mut self) -> Option<Outbound> {
        self.outbox.try_recv().ok()
    }

    /// Splits into the command sender and the outbound receiver, so that
    /// reading from a socket and writing to it can run as separate tasks.
    pub fn into_parts(self) -> (mpsc::Sender<Event>, mpsc::UnboundedReceiver<Outbound>) {
        (self.commands, self.outbox)
    }
}
