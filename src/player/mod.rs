//! Trace playback state machine
//!
//! The player holds the current [`Trace`](crate::trace::Trace) and a cursor
//! into it, and drives the four playback states:
//!
//! ```text
//! Idle ── play ──▶ Playing ── pause ──▶ Paused ── play ──▶ Playing
//!                     │
//!                     └─ tick reaches the last step ──▶ Finished
//! ```
//!
//! The repeating timer is not owned here: the player arms and cancels an
//! injected [`Scheduler`] capability, and the host environment calls
//! [`Player::tick`] whenever the timer fires. Tests drive `tick` directly
//! through a [`ManualScheduler`] without a real clock.
//!
//! Cursor moves past either end, and `play` on a single-step trace, are
//! routine UI edge conditions: they are absorbed as silent no-ops, never
//! errors.

use std::time::Duration;

use tracing::debug;

use crate::trace::{Step, Trace};

/// Playback state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Cursor at 0, no timer armed
    Idle,
    /// Timer armed, cursor auto-advances on each tick
    Playing,
    /// Timer cancelled, cursor holds its position
    Paused,
    /// Cursor at the last step, timer auto-cancelled
    Finished,
}

/// Repeating-timer capability the player arms and cancels
///
/// The host environment owns the actual clock; it must call
/// [`Player::tick`] on each fire while the scheduler is armed, and must stop
/// firing once `cancel` is called. Replacing a trace or dropping the player
/// cancels the scheduler, so a stale callback can never advance a cursor
/// that belongs to a different trace.
pub trait Scheduler {
    /// Arm the repeating timer at the given interval
    fn start(&mut self, interval: Duration);

    /// Cancel the timer; pending fires must be dropped
    fn cancel(&mut self);
}

/// Scheduler that only records its armed state
///
/// Used in tests and by hosts that poll elapsed time themselves (the CLI
/// drives ticks from an `Instant` loop).
#[derive(Debug, Default)]
pub struct ManualScheduler {
    armed: bool,
    interval: Option<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the timer is currently armed
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Interval of the most recent `start` call
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, interval: Duration) {
        self.armed = true;
        self.interval = Some(interval);
    }

    fn cancel(&mut self) {
        self.armed = false;
    }
}

/// Replay controller over the current trace
pub struct Player<S, T: Scheduler = ManualScheduler> {
    trace: Option<Trace<S>>,
    cursor: usize,
    state: PlayerState,
    interval: Duration,
    scheduler: T,
}

impl<S> Player<S, ManualScheduler> {
    /// Create a player with the default manual scheduler
    pub fn new(interval: Duration) -> Self {
        Self::with_scheduler(interval, ManualScheduler::new())
    }
}

impl<S, T: Scheduler> Player<S, T> {
    /// Create a player driving the given scheduler
    pub fn with_scheduler(interval: Duration, scheduler: T) -> Self {
        Player {
            trace: None,
            cursor: 0,
            state: PlayerState::Idle,
            interval,
            scheduler,
        }
    }

    /// Replace the current trace: cursor to 0, timer cancelled, back to idle
    pub fn load_trace(&mut self, trace: Trace<S>) {
        self.scheduler.cancel();
        debug!(steps = trace.len(), "trace loaded");
        self.trace = Some(trace);
        self.cursor = 0;
        self.state = PlayerState::Idle;
    }

    /// Start auto-play
    ///
    /// Valid from `Idle` and `Paused`, and only for traces with more than one
    /// step; anything else is a silent no-op.
    pub fn play(&mut self) {
        if self.state != PlayerState::Idle && self.state != PlayerState::Paused {
            return;
        }
        let len = self.len();
        if len <= 1 {
            return;
        }
        self.scheduler.start(self.interval);
        self.state = PlayerState::Playing;
        debug!(cursor = self.cursor, "playback started");
    }

    /// Stop auto-play, holding the cursor
    pub fn pause(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }
        self.scheduler.cancel();
        self.state = PlayerState::Paused;
        debug!(cursor = self.cursor, "playback paused");
    }

    /// Timer callback: advance the cursor by one step
    ///
    /// Returns whether the cursor advanced. On reaching the last step the
    /// timer self-cancels and the player enters `Finished`; later stale
    /// fires are absorbed.
    pub fn tick(&mut self) -> bool {
        if self.state != PlayerState::Playing {
            return false;
        }
        let len = self.len();
        if self.cursor + 1 >= len {
            // A trace this short never arms the timer, but absorb anyway.
            self.scheduler.cancel();
            self.state = PlayerState::Finished;
            return false;
        }
        self.cursor += 1;
        if self.cursor + 1 == len {
            self.scheduler.cancel();
            self.state = PlayerState::Finished;
            debug!(cursor = self.cursor, "playback finished");
        }
        true
    }

    /// Move the cursor forward by one, clamped at the last step
    ///
    /// No-op while `Playing` (manual stepping is disabled during playback).
    /// A successful step out of `Finished` demotes the player to `Paused` so
    /// that `play` becomes valid again.
    pub fn step_forward(&mut self) {
        if self.state == PlayerState::Playing {
            return;
        }
        if self.cursor + 1 < self.len() {
            self.cursor += 1;
            if self.state == PlayerState::Finished && self.cursor + 1 < self.len() {
                self.state = PlayerState::Paused;
            }
        }
    }

    /// Move the cursor backward by one, clamped at 0
    ///
    /// No-op while `Playing`; stepping back out of `Finished` demotes to
    /// `Paused`.
    pub fn step_backward(&mut self) {
        if self.state == PlayerState::Playing {
            return;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            if self.state == PlayerState::Finished {
                self.state = PlayerState::Paused;
            }
        }
    }

    /// Cursor back to 0 and any timer cancelled; the trace is retained
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.cursor = 0;
        self.state = PlayerState::Idle;
        debug!("player reset");
    }

    // ========== Accessors for the rendering layer ==========

    /// Current playback state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Current cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of steps in the loaded trace (0 when none is loaded)
    pub fn len(&self) -> usize {
        self.trace.as_ref().map(Trace::len).unwrap_or(0)
    }

    /// Whether a trace is loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The step under the cursor
    pub fn current(&self) -> Option<&Step<S>> {
        self.trace.as_ref().and_then(|t| t.get(self.cursor))
    }

    /// The loaded trace
    pub fn trace(&self) -> Option<&Trace<S>> {
        self.trace.as_ref()
    }

    /// Per-step auto-play interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The injected scheduler (tests inspect its armed state)
    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }
}

impl<S, T: Scheduler> Drop for Player<S, T> {
    fn drop(&mut self) {
        // The owning component is going away; no pending fire may outlive it.
        self.scheduler.cancel();
    }
}
