use horde::prelude::*;

/// Where the server listens unless `HORDE_ADDR` says otherwise.
const DEFAULT_ADDR: &str = "0.0.0.0:3333";

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// Somewhere to practise: one dummy that never goes down.
fn training_grounds() -> Room {
    Room::new(TrainingGrounds::default()).zombie(Zombie::random(ZombieKind::Dummy))
}

/// The real thing: two crawlers heading for the wall.
fn the_wall() -> Room {
    Room::new(TheWall::default())
        .zombie(Zombie::random(ZombieKind::Crawler))
        .zombie(Zombie::random(ZombieKind::Crawler))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    horde::init_tracing();

    let addr = std::env::var("HORDE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let server = HordeServer::builder()
        .bind(&addr)
        .room(training_grounds(), true)
        .room(the_wall(), false)
        .room_factory(training_grounds)
        .build()
        .await?;

    tracing::info!(addr = %server.local_addr()?, "arena is open, connect with `nc`");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_rooms() {
        let mut wall = the_wall();
        assert_eq!(wall.name(), "THE-WALL");
        wall.start().unwrap();
        assert_eq!(wall.status().zombies, 2);
        wall.stop().await;

        let mut training = training_grounds();
        training.start().unwrap();
        assert_eq!(training.status().zombies, 1);
        training.stop().await;
    }
}
