//! Integration tests for the zombie actor lifecycle.

use std::time::Duration;

use horde_protocol::{Event, Position};
use horde_zombie::{CancelScope, ClockConfig, Zombie, ZombieError, ZombieKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn manual(kind: ZombieKind) -> Zombie {
    Zombie::with_clock(kind, StdRng::seed_from_u64(11), ClockConfig::manual())
}

#[tokio::test]
async fn test_summon_names_by_kind() {
    let scope = CancelScope::new();
    let (tx, _rx) = mpsc::channel(4);

    for (kind, prefix) in [
        (ZombieKind::Crawler, "crawler-"),
        (ZombieKind::Rabbit, "rabbit-"),
        (ZombieKind::Dummy, "dummy-"),
    ] {
        let z = manual(kind);
        assert_eq!(z.name(), "");
        z.summon(scope.token(), tx.clone()).unwrap();
        assert!(z.name().starts_with(prefix), "{}", z.name());
        assert_eq!(z.name().split('-').count(), 3);
    }
}

#[tokio::test]
async fn test_summon_twice_fails() {
    let scope = CancelScope::new();
    let (tx, _rx) = mpsc::channel(4);
    let z = manual(ZombieKind::Crawler);

    z.summon(scope.token(), tx.clone()).unwrap();
    let name = z.name().to_string();
    assert!(matches!(
        z.summon(scope.token(), tx),
        Err(ZombieError::AlreadySummoned(n)) if n == name
    ));
    assert_eq!(z.name(), name);
}

#[tokio::test]
async fn test_run_and_step_need_summon() {
    let z = manual(ZombieKind::Crawler);
    assert!(matches!(z.run(), Err(ZombieError::NotSummoned)));
    assert!(matches!(z.step().await, Err(ZombieError::NotSummoned)));
}

#[tokio::test]
async fn test_step_publishes_walk() {
    let scope = CancelScope::new();
    let (tx, mut rx) = mpsc::channel(4);
    let z = manual(ZombieKind::Crawler);
    z.summon(scope.token(), tx).unwrap();
    z.run().unwrap();
    z.run().unwrap(); // already running: no-op

    z.reset(Position::new(29, 3));
    let sent = z.step().await.unwrap();
    let got = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();

    assert_eq!(got, sent);
    assert_eq!(got, Event::walk(z.name(), Position::new(28, 3)));
}

#[tokio::test]
async fn test_step_fails_after_cancel() {
    let scope = CancelScope::new();
    let (tx, mut rx) = mpsc::channel(4);
    let z = manual(ZombieKind::Rabbit);
    z.summon(scope.token(), tx).unwrap();
    z.run().unwrap();

    scope.cancel();
    assert!(matches!(z.step().await, Err(ZombieError::Cancelled(_))));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_step_fails_after_kill() {
    let scope = CancelScope::new();
    let (tx, _rx) = mpsc::channel(4);
    let z = manual(ZombieKind::Crawler);
    z.summon(scope.token(), tx).unwrap();
    z.run().unwrap();

    z.kill();
    assert!(!z.is_alive());
    assert!(matches!(z.step().await, Err(ZombieError::Dead(_))));
    assert!(matches!(z.run(), Err(ZombieError::Dead(_))));
}

#[tokio::test]
async fn test_step_fails_when_room_gone() {
    let scope = CancelScope::new();
    let (tx, rx) = mpsc::channel(4);
    let z = manual(ZombieKind::Dummy);
    z.summon(scope.token(), tx).unwrap();
    drop(rx);

    assert!(matches!(z.step().await, Err(ZombieError::Detached(_))));
}

#[tokio::test(start_paused = true)]
async fn test_running_zombie_walks_on_its_own() {
    let scope = CancelScope::new();
    let (tx, mut rx) = mpsc::channel(16);
    let z = Zombie::seeded(ZombieKind::Crawler, 5);
    z.summon(scope.token(), tx).unwrap();
    z.reset(Position::new(29, 2));
    z.run().unwrap();

    for x in [28, 27, 26] {
        let walk = timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("zombie should move within an interval")
            .expect("channel open");
        assert_eq!(walk, Event::walk(z.name(), Position::new(x, 2)));
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_the_timer() {
    let scope = CancelScope::new();
    let (tx, mut rx) = mpsc::channel(16);
    let z = Zombie::seeded(ZombieKind::Rabbit, 5);
    z.summon(scope.token(), tx).unwrap();
    z.run().unwrap();

    timeout(Duration::from_secs(10), rx.recv()).await.unwrap().unwrap();
    scope.cancel();

    let after = timeout(Duration::from_secs(60), rx.recv()).await;
    assert!(after.is_err(), "cancelled zombie moved: {after:?}");
}
