//! The room engine: one processing task per arena.
//!
//! Everything that changes a room (score, membership, zombie positions
//! after a hit or a wall reach) happens inside [`RoomActor::run`], one
//! event at a time. The outside world talks to it through three queues:
//!
//! ```text
//! players ──forwarders──→ player events ─┐
//! zombies ──────────────→ zombie events ─┼─→ RoomActor ──→ PlayerHandles
//! Room / RoomHandle ────→ commands ──────┘
//! ```
//!
//! `tokio::select!` picks a ready queue at random, so neither source can
//! starve the other.

use std::sync::Arc;

use horde_protocol::{Event, Position};
use horde_session::PlayerHandle;
use horde_zombie::{CancelScope, CancelToken, Zombie};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    HitOutcome, MoveOutcome, RoomConfig, RoomError, RoomState, RoomStatus, Rules,
    Scoreboard, Verdict,
};

/// Spawn point draws before a respawn settles for the zombie's square.
const RESPAWN_DRAWS: usize = 32;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` is the reply channel: the caller sends a command
/// and waits for the outcome on it.
pub(crate) enum RoomCommand {
    AddPlayer {
        player: PlayerHandle,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    AddZombie {
        zombie: Zombie,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
}

// ---------------------------------------------------------------------------
// RoomHandle
// ---------------------------------------------------------------------------

/// Handle to a room. Used to add players and zombies and to watch the
/// room's status.
///
/// This is cheap to clone: an `mpsc::Sender` and a `watch::Receiver`.
#[derive(Clone)]
pub struct RoomHandle {
    commands: mpsc::Sender<RoomCommand>,
    status: watch::Receiver<RoomStatus>,
}

impl RoomHandle {
    pub fn name(&self) -> String {
        self.status.borrow().name.clone()
    }

    /// A copy of the current status.
    pub fn status(&self) -> RoomStatus {
        self.status.borrow().clone()
    }

    /// A receiver that sees every status change.
    pub fn subscribe(&self) -> watch::Receiver<RoomStatus> {
        self.status.clone()
    }

    pub fn players_won(&self) -> bool {
        self.status.borrow().verdict == Some(Verdict::PlayersWin)
    }

    pub fn zombies_won(&self) -> bool {
        self.status.borrow().verdict == Some(Verdict::ZombiesWin)
    }

    /// Adds a player. The room greets it and starts reading its commands.
    ///
    /// Before the room runs, the request waits in the command queue.
    ///
    /// # Errors
    /// [`RoomError::Ended`] if the room is over. The player has then
    /// already been told the outcome and disconnected.
    pub async fn add_player(&self, player: PlayerHandle) -> Result<(), RoomError> {
        let (reply, outcome) = oneshot::channel();
        if let Err(mpsc::error::SendError(cmd)) = self
            .commands
            .send(RoomCommand::AddPlayer { player, reply })
            .await
        {
            if let RoomCommand::AddPlayer { player, .. } = cmd {
                turn_away(&player, self.status.borrow().verdict);
            }
            return Err(RoomError::Ended(self.name()));
        }
        outcome.await.map_err(|_| RoomError::Ended(self.name()))?
    }

    /// Adds a zombie: it is sent to a spawn point, summoned and started.
    ///
    /// # Errors
    /// [`RoomError::Ended`] if the room is over,
    /// [`RoomError::Zombie`] if the zombie already belongs to a room.
    pub async fn add_zombie(&self, zombie: Zombie) -> Result<(), RoomError> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(RoomCommand::AddZombie { zombie, reply })
            .await
            .map_err(|_| RoomError::Ended(self.name()))?;
        outcome.await.map_err(|_| RoomError::Ended(self.name()))?
    }
}

/// Tells a player it came too late.
fn turn_away(player: &PlayerHandle, verdict: Option<Verdict>) {
    match verdict {
        Some(verdict) => player.notify(verdict.notice()),
        None => player.notify("# this room is closed\n"),
    };
    player.disconnect();
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// One arena.
///
/// ```ignore
/// let mut room = Room::new(TheWall::default()).zombie(Zombie::random(ZombieKind::Crawler));
/// room.start()?;                       // init + run
/// room.add_player(handle).await?;
/// ...
/// room.stop().await;
/// ```
///
/// `init` and `run` spawn tasks, so they must be called inside a Tokio
/// runtime. Dropping a `Room` cancels its scope: every zombie stops and
/// the processing task exits.
pub struct Room {
    rules: Arc<dyn Rules>,
    config: RoomConfig,
    pending: Vec<Zombie>,
    scope: CancelScope,
    status: Arc<watch::Sender<RoomStatus>>,
    commands: mpsc::Sender<RoomCommand>,
    command_rx: Option<mpsc::Receiver<RoomCommand>>,
    actor: Option<RoomActor>,
    task: Option<JoinHandle<()>>,
}

impl Room {
    pub fn new(rules: impl Rules) -> Self {
        Self::with_config(rules, RoomConfig::default())
    }

    pub fn with_config(rules: impl Rules, config: RoomConfig) -> Self {
        let rules: Arc<dyn Rules> = Arc::new(rules);
        let (commands, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (status, _) = watch::channel(RoomStatus::new(rules.default_name().to_string()));

        Self {
            rules,
            config,
            pending: Vec::new(),
            scope: CancelScope::new(),
            status: Arc::new(status),
            commands,
            command_rx: Some(command_rx),
            actor: None,
            task: None,
        }
    }

    /// Adds a zombie that is summoned when the room is initialized.
    pub fn zombie(mut self, zombie: Zombie) -> Self {
        self.pending.push(zombie);
        self
    }

    pub fn name(&self) -> String {
        self.status.borrow().name.clone()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.status.send_modify(|status| status.name = name);
    }

    pub fn state(&self) -> RoomState {
        self.status.borrow().state
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    // -- lifecycle -----------------------------------------------------------

    /// Allocates the event queues and summons every pre-configured zombie.
    ///
    /// # Errors
    /// [`RoomError::InvalidState`] unless the room is freshly created,
    /// [`RoomError::Zombie`] if a pre-configured zombie is already summoned
    /// elsewhere.
    pub fn init(&mut self) -> Result<(), RoomError> {
        self.expect_transition(RoomState::Initialized, "init")?;
        let commands = self
            .command_rx
            .take()
            .ok_or_else(|| RoomError::InvalidState("command queue already taken".into()))?;

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let buffer = self.config.event_buffer.max(1);
        let (player_tx, player_rx) = mpsc::channel(buffer);
        let (zombie_tx, zombie_rx) = mpsc::channel(buffer);

        let mut actor = RoomActor {
            rules: Arc::clone(&self.rules),
            config: self.config.clone(),
            rng,
            scope: self.scope.clone(),
            status: Arc::clone(&self.status),
            score: Scoreboard::default(),
            players: Vec::new(),
            zombies: Vec::new(),
            forwarders: Vec::new(),
            commands,
            player_tx,
            player_rx,
            zombie_tx,
            zombie_rx,
            verdict: None,
        };
        for zombie in self.pending.drain(..) {
            actor.attach_zombie(zombie)?;
        }

        self.actor = Some(actor);
        self.status
            .send_modify(|status| status.state = RoomState::Initialized);
        info!(room = %self.name(), rules = self.rules.default_name(), "room initialized");
        Ok(())
    }

    /// Starts the processing task.
    ///
    /// # Errors
    /// [`RoomError::InvalidState`] unless the room is initialized and not
    /// yet running.
    pub fn run(&mut self) -> Result<(), RoomError> {
        self.expect_transition(RoomState::Running, "run")?;
        let actor = self
            .actor
            .take()
            .ok_or_else(|| RoomError::InvalidState("room has no actor".into()))?;

        self.status.send_modify(|status| status.state = RoomState::Running);
        self.task = Some(tokio::spawn(actor.run()));
        info!(room = %self.name(), "room running");
        Ok(())
    }

    /// `init` followed by `run`.
    pub fn start(&mut self) -> Result<(), RoomError> {
        self.init()?;
        self.run()
    }

    /// Stops the room: cancels every zombie, closes the event queues and
    /// waits for the processing task to exit. Stopping an ended room does
    /// nothing.
    pub async fn stop(&mut self) {
        self.scope.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(room = %self.name(), error = %e, "room task failed");
            }
        }
        // Never ran: dropping the actor drops its queues and zombies' link.
        self.actor = None;
        self.command_rx = None;

        let ended = self.status.send_if_modified(|status| {
            if !status.state.can_transition_to(RoomState::Ended) {
                return false;
            }
            status.state = RoomState::Ended;
            true
        });
        if ended {
            info!(room = %self.name(), "room stopped");
        }
    }

    // -- membership ----------------------------------------------------------

    pub fn handle(&self) -> RoomHandle {
        RoomHandle {
            commands: self.commands.clone(),
            status: self.status.subscribe(),
        }
    }

    /// See [`RoomHandle::add_player`].
    pub async fn add_player(&self, player: PlayerHandle) -> Result<(), RoomError> {
        self.handle().add_player(player).await
    }

    /// See [`RoomHandle::add_zombie`].
    pub async fn add_zombie(&self, zombie: Zombie) -> Result<(), RoomError> {
        self.handle().add_zombie(zombie).await
    }

    // -- status --------------------------------------------------------------

    pub fn status(&self) -> RoomStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RoomStatus> {
        self.status.subscribe()
    }

    pub fn score(&self) -> Scoreboard {
        self.status.borrow().score
    }

    pub fn players_won(&self) -> bool {
        self.status.borrow().verdict == Some(Verdict::PlayersWin)
    }

    pub fn zombies_won(&self) -> bool {
        self.status.borrow().verdict == Some(Verdict::ZombiesWin)
    }

    fn expect_transition(&self, target: RoomState, op: &str) -> Result<(), RoomError> {
        let state = self.state();
        if state.can_transition_to(target) {
            Ok(())
        } else {
            warn!(room = %self.name(), %state, op, "room lifecycle misuse");
            Err(RoomError::InvalidState(format!(
                "cannot {op} a room that is {state}"
            )))
        }
    }
}

impl Drop for Room {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

// ---------------------------------------------------------------------------
// RoomActor
// ---------------------------------------------------------------------------

/// The processing task's state. Only [`RoomActor::run`] touches it.
struct RoomActor {
    rules: Arc<dyn Rules>,
    config: RoomConfig,
    rng: StdRng,
    scope: CancelScope,
    status: Arc<watch::Sender<RoomStatus>>,
    score: Scoreboard,
    players: Vec<PlayerHandle>,
    zombies: Vec<Zombie>,
    forwarders: Vec<JoinHandle<()>>,
    commands: mpsc::Receiver<RoomCommand>,
    player_tx: mpsc::Sender<Event>,
    player_rx: mpsc::Receiver<Event>,
    zombie_tx: mpsc::Sender<Event>,
    zombie_rx: mpsc::Receiver<Event>,
    verdict: Option<Verdict>,
}

impl RoomActor {
    /// Processes events until the room is decided or cancelled.
    async fn run(mut self) {
        let mut token = self.scope.token();
        info!(room = %self.name(), "room actor started");

        while self.verdict.is_none() {
            tokio::select! {
                _ = token.cancelled() => break,
                Some(cmd) = self.commands.recv() => self.handle_command(cmd),
                Some(event) = self.player_rx.recv() => self.handle_player_event(event),
                Some(event) = self.zombie_rx.recv() => self.handle_zombie_event(event),
                else => break,
            }
        }

        self.shutdown();
    }

    fn name(&self) -> String {
        self.status.borrow().name.clone()
    }

    // -- commands ------------------------------------------------------------

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::AddPlayer { player, reply } => {
                let _ = reply.send(self.add_player(player));
            }
            RoomCommand::AddZombie { zombie, reply } => {
                let _ = reply.send(self.attach_zombie(zombie));
            }
        }
    }

    fn add_player(&mut self, mut player: PlayerHandle) -> Result<(), RoomError> {
        let room = self.name();
        player.notify(&self.rules.greeting(&room));
        let inbox = player.take_inbox();
        info!(room = %room, player = %player.name(), players = self.players.len() + 1, "player joined");
        self.players.push(player);
        self.publish();

        // A decided room stays decided; the newcomer gets the outcome.
        self.check_verdict();
        if self.verdict.is_some() {
            return Err(RoomError::Ended(room));
        }

        if let Some(kind) = self.rules.reinforcement() {
            let rng = StdRng::seed_from_u64(self.rng.random());
            self.attach_zombie(Zombie::with_clock(kind, rng, self.config.clock()))?;
        }

        if let Some(inbox) = inbox {
            let task = tokio::spawn(forward(inbox, self.player_tx.clone(), self.scope.token()));
            self.forwarders.push(task);
        }
        Ok(())
    }

    fn attach_zombie(&mut self, zombie: Zombie) -> Result<(), RoomError> {
        // A zombie owned by another room must not move.
        zombie.summon(self.scope.token(), self.zombie_tx.clone())?;
        zombie.reset(self.rules.spawn_point(&mut self.rng));
        zombie.run()?;
        info!(room = %self.name(), zombie = %zombie.name(), at = %zombie.position(), "zombie joined");
        self.zombies.push(zombie);
        self.publish();
        Ok(())
    }

    // -- events --------------------------------------------------------------

    fn handle_player_event(&mut self, event: Event) {
        match event {
            Event::Shoot { actor, target } => self.resolve_shot(actor, target),
            other => debug!(room = %self.name(), event = %other, "ignoring player event"),
        }
    }

    /// Every live zombie standing on `target` is hit; the scan never stops
    /// at the first one.
    fn resolve_shot(&mut self, shooter: String, target: Position) {
        let mut hits = Vec::new();
        for zombie in &self.zombies {
            if !zombie.is_alive() || zombie.position() != target {
                continue;
            }
            hits.push(zombie.name().to_string());

            let downed = zombie.hit();
            if self.rules.resolve_hit(downed) == HitOutcome::Score {
                respawn(&*self.rules, &mut self.rng, zombie);
                self.score.players += 1;
            }
        }

        debug!(room = %self.name(), shooter = %shooter, %target, hits = hits.len(), "shot resolved");
        self.publish();
        self.broadcast(&Event::boom(shooter, hits));
        self.check_verdict();
    }

    fn handle_zombie_event(&mut self, event: Event) {
        if let Event::Walk { actor, at } = &event {
            if self.rules.resolve_movement(*at) == MoveOutcome::WallReached {
                self.score.zombies += 1;
                info!(room = %self.name(), zombie = %actor, zombies = self.score.zombies, "zombie reached the wall");
                if let Some(zombie) = self.zombies.iter().find(|z| z.name() == actor.as_str()) {
                    respawn(&*self.rules, &mut self.rng, zombie);
                }
                self.publish();
            }
        }

        self.broadcast(&event);
        self.check_verdict();
    }

    /// Sends `event` to every player. Players whose connection is gone are
    /// dropped from the room.
    fn broadcast(&mut self, event: &Event) {
        let before = self.players.len();
        self.players.retain(|player| player.process_event(event));
        if self.players.len() != before {
            debug!(room = %self.name(), gone = before - self.players.len(), "pruned players");
            self.publish();
        }
    }

    // -- ending --------------------------------------------------------------

    fn check_verdict(&mut self) {
        if self.verdict.is_some() {
            return;
        }
        debug!(
            room = %self.name(),
            players = self.score.players,
            zombies = self.score.zombies,
            "score check"
        );
        if let Some(verdict) = self.rules.verdict(&self.score) {
            self.end(verdict);
        }
    }

    fn end(&mut self, verdict: Verdict) {
        info!(room = %self.name(), %verdict, "room decided");
        for player in &self.players {
            player.notify(verdict.notice());
            player.disconnect();
        }
        self.verdict = Some(verdict);
        self.status.send_modify(|status| {
            status.verdict = Some(verdict);
            status.state = RoomState::Ended;
        });
    }

    /// Cancels every zombie and forwarder, then turns away anyone still
    /// queued to join.
    fn shutdown(mut self) {
        self.scope.cancel();
        for task in self.forwarders.drain(..) {
            task.abort();
        }
        self.player_rx.close();
        self.zombie_rx.close();

        self.commands.close();
        while let Ok(cmd) = self.commands.try_recv() {
            match cmd {
                RoomCommand::AddPlayer { player, reply } => {
                    turn_away(&player, self.verdict);
                    let _ = reply.send(Err(RoomError::Ended(self.name())));
                }
                RoomCommand::AddZombie { reply, .. } => {
                    let _ = reply.send(Err(RoomError::Ended(self.name())));
                }
            }
        }

        self.status
            .send_modify(|status| status.state = RoomState::Ended);
        info!(room = %self.name(), "room actor stopped");
    }

    fn publish(&self) {
        let (score, players, zombies) = (self.score, self.players.len(), self.zombies.len());
        self.status.send_modify(|status| {
            status.score = score;
            status.players = players;
            status.zombies = zombies;
        });
    }
}

/// Draws spawn points until one differs from where the zombie stands.
/// Gives up after [`RESPAWN_DRAWS`] tries in an arena with a single
/// spawn point.
fn respawn(rules: &dyn Rules, rng: &mut StdRng, zombie: &Zombie) {
    let before = zombie.position();
    let mut at = rules.spawn_point(&mut *rng);
    for _ in 1..RESPAWN_DRAWS {
        if at != before {
            break;
        }
        at = rules.spawn_point(&mut *rng);
    }
    if at == before {
        warn!(zombie = %zombie.name(), %at, "no other spawn point, respawning in place");
    }
    zombie.reset(at);
}

/// Pipes one player's commands into the room until the player stops
/// sending or the room is cancelled.
async fn forward(
    mut inbox: mpsc::Receiver<Event>,
    room: mpsc::Sender<Event>,
    mut token: CancelToken,
) {
    loop {
        let event = tokio::select! {
            _ = token.cancelled() => break,
            event = inbox.recv() => event,
        };
        let Some(event) = event else { break };
        if room.send(event).await.is_err() {
            break;
        }
    }
}
