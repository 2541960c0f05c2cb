//! Integration tests for the room directory.

use std::time::Duration;

use horde_room::{Room, RoomConfig, RoomDirectory, RoomError, RoomState, TheWall, TrainingGrounds};
use horde_session::{Outbound, PlayerHandle};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

fn config() -> RoomConfig {
    RoomConfig {
        move_interval: Duration::ZERO,
        seed: Some(11),
        ..RoomConfig::default()
    }
}

fn training() -> Room {
    Room::with_config(TrainingGrounds::default(), config())
}

fn wall() -> Room {
    Room::with_config(TheWall::default(), config())
}

#[tokio::test]
async fn test_register_starts_rooms() {
    let mut directory = RoomDirectory::new();
    assert!(directory.is_empty());

    let handle = directory.register(training(), true).unwrap();
    assert_eq!(handle.status().state, RoomState::Running);

    let mut initialized = wall();
    initialized.init().unwrap();
    let handle = directory.register(initialized, false).unwrap();
    assert_eq!(handle.status().state, RoomState::Running);

    assert_eq!(directory.len(), 2);
    directory.shutdown().await;
}

#[tokio::test]
async fn test_lobby_lists_rooms_in_order() {
    let mut directory = RoomDirectory::new();
    directory.register(training(), true).unwrap();
    directory.register(wall(), false).unwrap();

    let lobby = directory.lobby();
    let names: Vec<_> = lobby.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["training grounds", "THE-WALL"]);
    assert!(lobby[0].default);
    assert!(!lobby[1].default);
    assert_eq!(directory.default_name().as_deref(), Some("training grounds"));

    directory.shutdown().await;
}

#[tokio::test]
async fn test_names_are_unique_ignoring_case() {
    let mut directory = RoomDirectory::new();
    directory.register(wall(), false).unwrap();

    let mut clash = training();
    clash.set_name("the-wall");
    assert!(matches!(
        directory.register(clash, false),
        Err(RoomError::AlreadyExists(name)) if name == "the-wall"
    ));

    let mut called = false;
    let result = directory.create("The-Wall", || {
        called = true;
        training()
    });
    assert!(matches!(result, Err(RoomError::AlreadyExists(_))));
    assert!(!called, "factory must not run on a clash");
    assert_eq!(directory.len(), 1);

    directory.shutdown().await;
}

#[tokio::test]
async fn test_create_names_the_room() {
    let mut directory = RoomDirectory::new();
    let handle = directory.create("Woods", training).unwrap();
    assert_eq!(handle.name(), "Woods");

    let entry = &directory.lobby()[0];
    assert_eq!(entry.name, "Woods");
    assert!(!entry.default);
    assert_eq!(entry.state, RoomState::Running);

    directory.shutdown().await;
}

#[tokio::test]
async fn test_lookup() {
    let mut directory = RoomDirectory::new();
    assert!(matches!(directory.handle(None), Err(RoomError::NotFound(_))));

    directory.register(training(), true).unwrap();
    directory.register(wall(), false).unwrap();

    assert_eq!(directory.handle(None).unwrap().name(), "training grounds");
    assert_eq!(directory.handle(Some("the-wall")).unwrap().name(), "THE-WALL");
    assert!(matches!(
        directory.handle(Some("moon")),
        Err(RoomError::NotFound(name)) if name == "moon"
    ));

    directory.shutdown().await;
}

#[tokio::test]
async fn test_join_routes_player_and_counts_it() {
    let mut directory = RoomDirectory::new();
    directory.register(training(), true).unwrap();
    directory.create("woods", training).unwrap();

    let (player, mut endpoint) = PlayerHandle::new("ivan");
    timeout(WAIT, directory.join("WOODS", player))
        .await
        .unwrap()
        .unwrap();

    match timeout(WAIT, endpoint.recv()).await.unwrap() {
        Some(Outbound::Notice(text)) => assert!(text.starts_with("# woods\n"), "{text:?}"),
        other => panic!("unexpected {other:?}"),
    }

    let lobby = directory.lobby();
    assert_eq!(lobby[0].players, 0);
    assert_eq!(lobby[1].players, 1);

    directory.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_stops_every_room() {
    let mut directory = RoomDirectory::new();
    let a = directory.register(training(), true).unwrap();
    let b = directory.register(wall(), false).unwrap();

    directory.shutdown().await;
    assert!(directory.is_empty());
    assert_eq!(a.status().state, RoomState::Ended);
    assert_eq!(b.status().state, RoomState::Ended);

    let (player, mut endpoint) = PlayerHandle::new("late");
    assert!(matches!(a.add_player(player).await, Err(RoomError::Ended(_))));
    assert_eq!(
        endpoint.try_recv(),
        Some(Outbound::Notice("# this room is closed\n".into()))
    );
    assert_eq!(endpoint.try_recv(), Some(Outbound::Disconnect));
}
