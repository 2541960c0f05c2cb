//! The movement clock: when a zombie takes its next step.
//!
//! A fixed interval (3 s by default) with an optional random delay on the
//! first move, so zombies summoned together do not march in lockstep.
//!
//! # Manual mode
//!
//! A zero interval puts the clock in manual mode: [`MoveClock::wait_for_move`]
//! pends forever and the zombie only moves when something calls
//! [`Zombie::step`](crate::Zombie::step). Tests and turn-by-turn rooms use
//! this.
//!
//! # Overruns
//!
//! When a move fires late (the zombie was blocked on a full room queue),
//! the missed moves are skipped and the next one is scheduled from now.
//! Zombies never sprint to catch up.

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How often a zombie moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Time between moves. [`Duration::ZERO`] means manual mode.
    pub interval: Duration,
    /// Upper bound (exclusive) of the random delay added to the first move.
    pub initial_jitter: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            initial_jitter: Duration::ZERO,
        }
    }
}

impl ClockConfig {
    /// A clock that moves every `interval`.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// A clock that never fires on its own.
    pub fn manual() -> Self {
        Self::every(Duration::ZERO)
    }

    pub fn is_manual(&self) -> bool {
        self.interval.is_zero()
    }
}

// ---------------------------------------------------------------------------
// ClockTick
// ---------------------------------------------------------------------------

/// Returned by [`MoveClock::wait_for_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    /// Moves fired so far, starting at 1.
    pub count: u64,
    /// Moves skipped because this one fired late.
    pub skipped: u64,
}

// ---------------------------------------------------------------------------
// MoveClock
// ---------------------------------------------------------------------------

/// One zombie's movement schedule.
#[derive(Debug)]
pub struct MoveClock {
    interval: Option<Duration>,
    next: Option<Instant>,
    count: u64,
}

impl MoveClock {
    /// Creates a clock whose first move is one interval (plus jitter drawn
    /// from `rng`) from now.
    pub fn new<R: Rng + ?Sized>(config: ClockConfig, rng: &mut R) -> Self {
        let interval = (!config.is_manual()).then_some(config.interval);

        let next = interval.map(|interval| {
            let jitter_us = config.initial_jitter.as_micros() as u64;
            let jitter = if jitter_us > 0 {
                Duration::from_micros(rng.random_range(0..jitter_us))
            } else {
                Duration::ZERO
            };
            Instant::now() + interval + jitter
        });

        Self {
            interval,
            next,
            count: 0,
        }
    }

    /// Waits until the next move is due.
    ///
    /// In manual mode this future never resolves; inside `tokio::select!`
    /// the other branches keep running.
    pub async fn wait_for_move(&mut self) -> ClockTick {
        let (next, interval) = match (self.next, self.interval) {
            (Some(next), Some(interval)) => (next, interval),
            _ => std::future::pending().await,
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        self.count += 1;

        let late_by = now.saturating_duration_since(next);
        let mut skipped = 0;
        if late_by > interval / 10 {
            skipped = (late_by.as_nanos() / interval.as_nanos()) as u64;
            if skipped > 0 {
                warn!(
                    tick = self.count,
                    skipped,
                    late_ms = late_by.as_secs_f64() * 1000.0,
                    "zombie fell behind, skipping moves"
                );
            }
        }
        self.next = Some(now + interval);

        trace!(tick = self.count, "move due");
        ClockTick {
            count: self.count,
            skipped,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.interval.is_none()
    }

    /// Moves fired so far.
    pub fn move_count(&self) -> u64 {
        self.count
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}
