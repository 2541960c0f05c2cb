//! `HordeServer` builder and accept loop.
//!
//! This ties the layers together: transport → protocol → session → room.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use horde_protocol::{Codec, TextCodec};
use horde_room::{LobbyEntry, Room, RoomDirectory, TrainingGrounds};
use horde_transport::{TcpTransport, Transport, TransportError};
use horde_zombie::{Zombie, ZombieKind};
use tokio::sync::Mutex;

use crate::HordeError;
use crate::handler::handle_connection;

/// Builds the rooms players create with `NEW <room>`.
pub type RoomFactory = Arc<dyn Fn() -> Room + Send + Sync>;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) rooms: Mutex<RoomDirectory>,
    pub(crate) codec: Arc<dyn Codec>,
    pub(crate) factory: RoomFactory,
}

/// A training grounds with one dummy to shoot at.
fn training_room() -> Room {
    Room::new(TrainingGrounds::default()).zombie(Zombie::random(ZombieKind::Dummy))
}

/// Builder for configuring and starting a server.
///
/// ```rust,ignore
/// let server = HordeServer::builder()
///     .bind("0.0.0.0:3333")
///     .room(Room::new(TheWall::default()), true)
///     .build()
///     .await?;
/// ```
pub struct HordeServerBuilder {
    bind_addr: String,
    codec: Arc<dyn Codec>,
    rooms: Vec<(Room, bool)>,
    factory: Option<RoomFactory>,
}

impl HordeServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3333".to_string(),
            codec: Arc::new(TextCodec),
            rooms: Vec::new(),
            factory: None,
        }
    }

    /// Sets the address to bind to. Port `0` picks a free one.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the wire format. Defaults to [`TextCodec`].
    pub fn codec(mut self, codec: impl Codec) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Adds a room to the lobby. With `default`, players who pick no room
    /// land in it.
    pub fn room(mut self, room: Room, default: bool) -> Self {
        self.rooms.push((room, default));
        self
    }

    /// Sets how `NEW <room>` builds a room. Defaults to a training
    /// grounds with one dummy.
    pub fn room_factory(mut self, factory: impl Fn() -> Room + Send + Sync + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Binds the listener and starts every configured room. Must be called
    /// inside a Tokio runtime.
    ///
    /// # Errors
    /// Fails if the address cannot be bound, two rooms share a name, or a
    /// room cannot be started.
    pub async fn build(self) -> Result<HordeServer, HordeError> {
        let transport = TcpTransport::bind(&self.bind_addr).await?;

        let mut directory = RoomDirectory::new();
        for (room, default) in self.rooms {
            directory.register(room, default)?;
        }

        let factory: RoomFactory = match self.factory {
            Some(factory) => factory,
            None => Arc::new(training_room),
        };

        let state = Arc::new(ServerState {
            rooms: Mutex::new(directory),
            codec: self.codec,
            factory,
        });

        Ok(HordeServer { transport, state })
    }
}

impl Default for HordeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound server.
///
/// Call [`run`](Self::run) or [`run_until`](Self::run_until) to start
/// accepting connections.
pub struct HordeServer {
    transport: TcpTransport,
    state: Arc<ServerState>,
}

impl HordeServer {
    pub fn builder() -> HordeServerBuilder {
        HordeServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, HordeError> {
        Ok(self.transport.local_addr()?)
    }

    /// The lobby listing as clients see it.
    pub async fn lobby(&self) -> Vec<LobbyEntry> {
        self.state.rooms.lock().await.lobby()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), HordeError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` resolves, then stops every
    /// room. Players still in a room are disconnected as it stops.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), HordeError> {
        let rooms = self.state.rooms.lock().await.len();
        tracing::info!(rooms, "horde server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(TransportError::Shutdown) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        self.transport.shutdown().await?;
        self.state.rooms.lock().await.shutdown().await;
        tracing::info!("horde server stopped");
        Ok(())
    }
}
