//! Per-connection handler: lobby, room assignment and the play pump.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Send the lobby banner listing the rooms
//!   2. Read `JOIN` / `NEW` / `START` until `START <name>`
//!   3. Hand a `PlayerHandle` to the chosen room (or the default room)
//!   4. Pump: shots go to the room, room output goes to the socket

use std::fmt::Write as _;
use std::sync::Arc;

use horde_protocol::{Codec, Event};
use horde_room::{LobbyEntry, RoomError, RoomHandle};
use horde_session::{LobbyAction, Outbound, PlayerHandle, Session};
use horde_transport::{Connection, TcpConnection};
use tokio::sync::mpsc;

use crate::HordeError;
use crate::server::ServerState;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: TcpConnection,
    state: Arc<ServerState>,
) -> Result<(), HordeError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), "handling new connection");

    // --- Step 1: Lobby ---
    let lobby = state.rooms.lock().await.lobby();
    send_notice(&conn, &*state.codec, &lobby_banner(&lobby)).await?;

    let Some(session) = run_lobby(&conn, &state).await? else {
        tracing::debug!(%conn_id, "client left from the lobby");
        return Ok(());
    };
    let name = session.name().to_string();

    // --- Step 2: Room ---
    let Some(room) = pick_room(&conn, &state, session.selected_room()).await? else {
        conn.close().await?;
        return Ok(());
    };

    let (player, endpoint) = PlayerHandle::new(name.as_str());
    let (commands, outbox) = endpoint.into_parts();
    let mut writer = tokio::spawn(write_outbound(
        Arc::clone(&conn),
        Arc::clone(&state.codec),
        outbox,
    ));

    match room.add_player(player).await {
        Ok(()) => {
            tracing::info!(%conn_id, player = %name, room = %room.name(), "player entered room");
        }
        Err(RoomError::Ended(room)) => {
            // The room already told the player; let the writer flush it.
            tracing::info!(%conn_id, player = %name, room = %room, "room has ended");
            let _ = writer.await;
            return Ok(());
        }
        Err(e) => {
            writer.abort();
            return Err(e.into());
        }
    }

    // --- Step 3: Play ---
    loop {
        tokio::select! {
            finished = &mut writer => {
                if let Ok(Err(e)) = finished {
                    tracing::debug!(%conn_id, error = %e, "writer failed");
                }
                tracing::info!(%conn_id, player = %name, "room released player");
                return Ok(());
            }
            line = conn.recv() => {
                let Some(line) = line? else {
                    tracing::info!(%conn_id, player = %name, "player left");
                    break;
                };
                if !forward_command(&state, &commands, &name, &line).await {
                    break;
                }
            }
        }
    }

    // Dropping the outbox makes the room forget this player on its next
    // broadcast.
    writer.abort();
    Ok(())
}

/// Reads lobby commands until `START`. `None` if the client hung up first.
async fn run_lobby(
    conn: &TcpConnection,
    state: &ServerState,
) -> Result<Option<Session>, HordeError> {
    let mut session = Session::new();

    while let Some(line) = conn.recv().await? {
        let event = match state.codec.decode(&line) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(conn_id = %conn.id(), error = %e, "dropping lobby line");
                continue;
            }
        };

        match session.apply(event) {
            LobbyAction::Select(room) => {
                tracing::debug!(conn_id = %conn.id(), room = %room, "room selected");
            }
            LobbyAction::Create(room) => {
                let created = {
                    let mut rooms = state.rooms.lock().await;
                    rooms.create(&room, || (state.factory)())
                };
                match created {
                    Ok(_) => {
                        tracing::info!(conn_id = %conn.id(), room = %room, "room created by client");
                        send_notice(conn, &*state.codec, &format!("# room {room} created\n"))
                            .await?;
                    }
                    // Selecting an existing room is still a valid choice.
                    Err(RoomError::AlreadyExists(_)) => {
                        send_notice(conn, &*state.codec, &format!("# room {room} already exists\n"))
                            .await?;
                    }
                    Err(e) => {
                        tracing::warn!(conn_id = %conn.id(), room = %room, error = %e, "room creation failed");
                        session.clear_selection();
                        send_notice(conn, &*state.codec, &format!("# {e}\n")).await?;
                    }
                }
            }
            LobbyAction::Start(name) => {
                tracing::debug!(conn_id = %conn.id(), player = %name, "player starting");
                return Ok(Some(session));
            }
            LobbyAction::Ignore => {
                tracing::debug!(conn_id = %conn.id(), "ignoring command in the lobby");
            }
        }
    }

    Ok(None)
}

/// Resolves the selected room, falling back to the default room. `None`
/// (after telling the client) when there is nowhere to go.
async fn pick_room(
    conn: &TcpConnection,
    state: &ServerState,
    selected: Option<&str>,
) -> Result<Option<RoomHandle>, HordeError> {
    let (room, missing) = {
        let rooms = state.rooms.lock().await;
        match selected {
            Some(name) => match rooms.handle(Some(name)) {
                Ok(room) => (Some(room), None),
                Err(_) => (rooms.handle(None).ok(), Some(name)),
            },
            None => (rooms.handle(None).ok(), None),
        }
    };

    if let Some(name) = missing {
        send_notice(conn, &*state.codec, &format!("# there is no room called {name}\n")).await?;
    }
    match room {
        Some(room) => {
            if missing.is_some() {
                send_notice(conn, &*state.codec, &format!("# joining {} instead\n", room.name()))
                    .await?;
            }
            Ok(Some(room))
        }
        None => {
            send_notice(conn, &*state.codec, "# no room to join, bye\n").await?;
            Ok(None)
        }
    }
}

/// Decodes one line from a playing client and passes shots on to the room.
/// Returns `false` once the room stopped listening.
async fn forward_command(
    state: &ServerState,
    commands: &mpsc::Sender<Event>,
    name: &str,
    line: &[u8],
) -> bool {
    match state.codec.decode(line) {
        Ok(event @ Event::Shoot { .. }) => commands.send(event.with_actor(name)).await.is_ok(),
        Ok(other) => {
            tracing::debug!(player = %name, event = %other, "ignoring command while playing");
            true
        }
        Err(e) => {
            tracing::debug!(player = %name, error = %e, "dropping malformed line");
            true
        }
    }
}

/// Writes everything the room sends until it disconnects the player, then
/// closes the socket.
async fn write_outbound(
    conn: Arc<TcpConnection>,
    codec: Arc<dyn Codec>,
    mut outbox: mpsc::UnboundedReceiver<Outbound>,
) -> Result<(), HordeError> {
    while let Some(message) = outbox.recv().await {
        let bytes = match message {
            Outbound::Event(event) => codec.encode(&event)?,
            Outbound::Notice(text) => codec.encode_notice(&text)?,
            Outbound::Disconnect => break,
        };
        conn.send(&bytes).await?;
    }
    conn.close().await?;
    Ok(())
}

async fn send_notice(conn: &TcpConnection, codec: &dyn Codec, text: &str) -> Result<(), HordeError> {
    let bytes = codec.encode_notice(text)?;
    conn.send(&bytes).await?;
    Ok(())
}

/// The text a client sees right after connecting.
pub(crate) fn lobby_banner(rooms: &[LobbyEntry]) -> String {
    let mut text = String::from(
        "# Please select room from list above. If you do not\n\
         # select the room, after `START <name>` you will be\n\
         # forced into default room. Please select room with\n\
         # `JOIN <room>` command.\n\
         # \n",
    );
    for room in rooms {
        let _ = write!(text, "#    {}", room.name);
        if room.default {
            text.push_str(" (default)");
        }
        text.push('\n');
    }
    text.push_str("# \n# you can use `NEW <name>` to create a new world.\n");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_room::RoomState;

    fn entry(name: &str, default: bool) -> LobbyEntry {
        LobbyEntry {
            name: name.to_string(),
            default,
            players: 0,
            state: RoomState::Running,
        }
    }

    #[test]
    fn test_banner_marks_default_room() {
        let banner = lobby_banner(&[entry("training grounds", true), entry("THE-WALL", false)]);
        assert!(banner.contains("#    training grounds (default)\n"));
        assert!(banner.contains("#    THE-WALL\n"));
        assert!(!banner.contains("THE-WALL (default)"));
        assert!(banner.ends_with("# you can use `NEW <name>` to create a new world.\n"));
    }

    #[test]
    fn test_banner_lines_are_comments() {
        let banner = lobby_banner(&[entry("woods", false)]);
        assert!(banner.lines().all(|line| line.starts_with('#')));
    }

    #[test]
    fn test_banner_without_rooms() {
        let banner = lobby_banner(&[]);
        assert!(banner.starts_with("# Please select room"));
        assert!(!banner.contains("(default)"));
    }
}
