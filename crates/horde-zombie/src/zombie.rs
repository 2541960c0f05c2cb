//! The zombie actor.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use horde_protocol::{Event, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{CancelToken, ClockConfig, MoveClock, NamePool, ZombieError};

// ---------------------------------------------------------------------------
// Kinds and movement
// ---------------------------------------------------------------------------

/// How a zombie picks its next position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// One step towards the wall: `x - 1`, `y` unchanged.
    Crawl,
    /// Both coordinates redrawn independently from `min..max`.
    Jump { min: i32, max: i32 },
    /// Always at the same spot.
    Stand(Position),
}

/// The three breeds of zombie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZombieKind {
    /// Crawls towards the wall. One arrow downs it.
    Crawler,
    /// Jumps around at random. One arrow downs it.
    Rabbit,
    /// Stands at (5, 5) and takes arrows forever. Target practice.
    Dummy,
}

impl ZombieKind {
    /// Name prefix, so players can tell breeds apart.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Crawler => "crawler",
            Self::Rabbit => "rabbit",
            Self::Dummy => "dummy",
        }
    }

    pub const fn movement(self) -> Movement {
        match self {
            Self::Crawler => Movement::Crawl,
            Self::Rabbit => Movement::Jump { min: 1, max: 6 },
            Self::Dummy => Movement::Stand(Position::new(5, 5)),
        }
    }

    /// Whether a single hit takes this zombie down.
    pub const fn is_downed_by_hit(self) -> bool {
        !matches!(self, Self::Dummy)
    }
}

impl fmt::Display for ZombieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

// ---------------------------------------------------------------------------
// Zombie
// ---------------------------------------------------------------------------

/// Where a summoned zombie reports to.
struct Link {
    token: CancelToken,
    moves: mpsc::Sender<Event>,
}

struct Inner {
    kind: ZombieKind,
    name: OnceLock<String>,
    names: NamePool,
    /// Both coordinates in one word, see [`Position::to_bits`].
    position: AtomicU64,
    alive: AtomicBool,
    hits: AtomicU32,
    rng: Mutex<StdRng>,
    clock: ClockConfig,
    link: OnceLock<Link>,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// A handle to one zombie. Clones share the same zombie.
///
/// Every accessor is safe to call from any task while the zombie is
/// moving; the position is a single atomic word, so a reader always sees
/// an `(x, y)` pair that belonged to one move.
#[derive(Clone)]
pub struct Zombie {
    inner: Arc<Inner>,
}

impl Zombie {
    /// Creates a zombie that draws its name, jumps and clock jitter from
    /// `rng`. It moves every 3 seconds once running.
    pub fn new(kind: ZombieKind, rng: StdRng) -> Self {
        Self::with_clock(kind, rng, ClockConfig::default())
    }

    pub fn with_clock(kind: ZombieKind, rng: StdRng, clock: ClockConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                kind,
                name: OnceLock::new(),
                names: NamePool::default(),
                position: AtomicU64::new(Position::default().to_bits()),
                alive: AtomicBool::new(true),
                hits: AtomicU32::new(0),
                rng: Mutex::new(rng),
                clock,
                link: OnceLock::new(),
                task: Mutex::new(None),
            }),
        }
    }

    /// A zombie with a reproducible RNG.
    pub fn seeded(kind: ZombieKind, seed: u64) -> Self {
        Self::new(kind, StdRng::seed_from_u64(seed))
    }

    /// A zombie with an OS-seeded RNG.
    pub fn random(kind: ZombieKind) -> Self {
        Self::new(kind, StdRng::from_os_rng())
    }

    pub fn kind(&self) -> ZombieKind {
        self.inner.kind
    }

    /// The zombie's name. Empty until summoned.
    pub fn name(&self) -> &str {
        self.inner.name.get().map(String::as_str).unwrap_or_default()
    }

    // -- lifecycle -----------------------------------------------------------

    /// Names the zombie and attaches it to a room: moves go to `moves`,
    /// and `token` is the room's cancellation scope. Does not start moving;
    /// see [`run`](Self::run).
    ///
    /// # Errors
    /// [`ZombieError::AlreadySummoned`] if this zombie already has a room.
    pub fn summon(
        &self,
        token: CancelToken,
        moves: mpsc::Sender<Event>,
    ) -> Result<(), ZombieError> {
        self.inner
            .link
            .set(Link { token, moves })
            .map_err(|_| ZombieError::AlreadySummoned(self.name().to_string()))?;

        let name = {
            let mut rng = self.rng();
            self.inner
                .names
                .pick_prefixed(self.inner.kind.prefix(), &mut *rng)
        };
        let _ = self.inner.name.set(name);

        info!(zombie = %self.name(), "zombie has been summoned");
        Ok(())
    }

    /// Starts the movement task. Calling it again while the task exists
    /// does nothing.
    ///
    /// # Errors
    /// [`ZombieError::NotSummoned`] before [`summon`](Self::summon),
    /// [`ZombieError::Dead`] after [`kill`](Self::kill).
    pub fn run(&self) -> Result<(), ZombieError> {
        let link = self.inner.link.get().ok_or(ZombieError::NotSummoned)?;
        if !self.is_alive() {
            return Err(ZombieError::Dead(self.name().to_string()));
        }

        let mut task = lock(&self.inner.task);
        if task.is_some() {
            return Ok(());
        }

        let clock = MoveClock::new(self.inner.clock, &mut *self.rng());
        *task = Some(tokio::spawn(live(self.clone(), link.token.clone(), clock)));
        Ok(())
    }

    /// Stops this zombie for good. It keeps its position and name but no
    /// longer moves and is ignored by hit scans.
    pub fn kill(&self) {
        if self.inner.alive.swap(false, Ordering::AcqRel) {
            info!(zombie = %self.name(), "zombie killed");
        }
        if let Some(task) = lock(&self.inner.task).take() {
            task.abort();
        }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    // -- position ------------------------------------------------------------

    pub fn position(&self) -> Position {
        Position::from_bits(self.inner.position.load(Ordering::Acquire))
    }

    /// Teleports the zombie. Does not bring a dead zombie back.
    pub fn reset(&self, at: Position) {
        self.inner.position.store(at.to_bits(), Ordering::Release);
    }

    /// Moves once according to the zombie's [`Movement`] and returns the
    /// matching `WALK` event. Does not publish it.
    pub fn next_move(&self) -> Event {
        let at = match self.inner.kind.movement() {
            Movement::Crawl => {
                let step = |bits| {
                    let p = Position::from_bits(bits);
                    Some(Position::new(p.x.wrapping_sub(1), p.y).to_bits())
                };
                let before = self
                    .inner
                    .position
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, step)
                    .unwrap_or_else(|bits| bits);
                let p = Position::from_bits(before);
                Position::new(p.x.wrapping_sub(1), p.y)
            }
            Movement::Jump { min, max } => {
                let at = {
                    let mut rng = self.rng();
                    Position::new(rng.random_range(min..max), rng.random_range(min..max))
                };
                self.reset(at);
                at
            }
            Movement::Stand(at) => {
                self.reset(at);
                at
            }
        };
        Event::walk(self.name(), at)
    }

    /// Forces one move and publishes it to the room.
    ///
    /// # Errors
    /// [`ZombieError::NotSummoned`], [`ZombieError::Cancelled`] once the
    /// room's scope fired, [`ZombieError::Dead`] after `kill`, and
    /// [`ZombieError::Detached`] when the room stopped reading.
    pub async fn step(&self) -> Result<Event, ZombieError> {
        let link = self.inner.link.get().ok_or(ZombieError::NotSummoned)?;
        if link.token.is_cancelled() {
            return Err(ZombieError::Cancelled(self.name().to_string()));
        }
        if !self.is_alive() {
            return Err(ZombieError::Dead(self.name().to_string()));
        }

        let event = self.next_move();
        debug!(zombie = %self.name(), %event, "zombie moved");
        link.moves
            .send(event.clone())
            .await
            .map_err(|_| ZombieError::Detached(self.name().to_string()))?;
        Ok(event)
    }

    // -- combat --------------------------------------------------------------

    /// Records an arrow. Returns `true` if it downed the zombie; the room
    /// decides what a downed zombie means (respawn, score).
    pub fn hit(&self) -> bool {
        let hits = self.inner.hits.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(zombie = %self.name(), hits, "zombie got hit");
        self.inner.kind.is_downed_by_hit()
    }

    /// Arrows taken so far.
    pub fn hits_taken(&self) -> u32 {
        self.inner.hits.load(Ordering::Acquire)
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        lock(&self.inner.rng)
    }
}

impl fmt::Debug for Zombie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zombie")
            .field("kind", &self.inner.kind)
            .field("name", &self.name())
            .field("position", &self.position())
            .field("alive", &self.is_alive())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The movement task: one step per clock tick until the scope is
/// cancelled or the room goes away.
async fn live(zombie: Zombie, mut token: CancelToken, mut clock: MoveClock) {
    loop {
        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = async {
                clock.wait_for_move().await;
                zombie.step().await
            } => result,
        };

        if let Err(e) = result {
            debug!(zombie = %zombie.name(), error = %e, "zombie stops moving");
            break;
        }
    }
    debug!(zombie = %zombie.name(), "zombie task finished");
}
