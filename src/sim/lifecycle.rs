//! Countdown-gated run lifecycle
//!
//! Idle -> Countdown(n) -> ... -> Running -> GameOver -> Countdown(n) -> ...
//!
//! The countdown is driven by a one-second timer that runs apart from the
//! frame tick. Only one timer is live at a time: starting a countdown hands
//! out a new `TimerHandle` and every older handle goes stale.

use serde::{Deserialize, Serialize};

use super::state::{FailReason, GameEvent};
use crate::consts::COUNTDOWN_PULSE_SECS;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Nothing started yet
    Idle,
    /// Counting down; `remaining` is the number currently displayed
    Countdown { remaining: u32 },
    /// Player moves and collides
    Running,
    /// Run just ended, reset pending
    GameOver,
}

/// Identifies one countdown sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    generation: u64,
}

#[derive(Debug, Clone)]
struct CountdownTimer {
    handle: TimerHandle,
    /// Wall time accumulated toward the next pulse
    elapsed: f32,
}

/// Run state machine with its countdown timer
#[derive(Debug, Clone)]
pub struct RunLifecycle {
    state: RunState,
    countdown_seconds: u32,
    timer: Option<CountdownTimer>,
    next_generation: u64,
}

impl RunLifecycle {
    pub fn new(countdown_seconds: u32) -> Self {
        Self {
            state: RunState::Idle,
            countdown_seconds: countdown_seconds.max(1),
            timer: None,
            next_generation: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Gameplay tick may move the player only while this is true
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == RunState::Running
    }

    /// Handle of the live countdown timer, if any
    pub fn active_timer(&self) -> Option<TimerHandle> {
        self.timer.as_ref().map(|t| t.handle)
    }

    /// Enter a fresh countdown, cancelling any timer already running
    pub fn start_countdown(&mut self) -> GameEvent {
        if let Some(old) = self.timer.take() {
            log::debug!("Cancelled countdown timer {}", old.handle.generation);
        }
        let handle = TimerHandle {
            generation: self.next_generation,
        };
        self.next_generation += 1;
        self.timer = Some(CountdownTimer { handle, elapsed: 0.0 });
        self.state = RunState::Countdown {
            remaining: self.countdown_seconds,
        };
        log::info!("Get ready! {}", self.countdown_seconds);
        GameEvent::CountdownStarted {
            seconds: self.countdown_seconds,
        }
    }

    /// One countdown timer pulse. Stale handles and pulses outside the
    /// countdown are ignored.
    pub fn pulse(&mut self, handle: TimerHandle) -> Option<GameEvent> {
        if self.active_timer() != Some(handle) {
            log::debug!("Ignoring pulse from stale timer {}", handle.generation);
            return None;
        }
        let RunState::Countdown { remaining } = self.state else {
            return None;
        };

        if remaining > 1 {
            let remaining = remaining - 1;
            self.state = RunState::Countdown { remaining };
            log::info!("{}", remaining);
            Some(GameEvent::CountdownTick { remaining })
        } else {
            self.timer = None;
            self.state = RunState::Running;
            log::info!("Go!");
            Some(GameEvent::Go)
        }
    }

    /// Feed wall-clock time to the live timer, firing one pulse per full period
    pub fn advance_timer(&mut self, elapsed: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(timer) = self.timer.as_mut() else {
            return events;
        };
        timer.elapsed += elapsed.max(0.0);

        while let Some(timer) = self.timer.as_mut() {
            if timer.elapsed < COUNTDOWN_PULSE_SECS {
                break;
            }
            timer.elapsed -= COUNTDOWN_PULSE_SECS;
            let handle = timer.handle;
            events.extend(self.pulse(handle));
        }
        events
    }

    /// End the current run. Returns false (and does nothing) unless Running.
    pub fn fail(&mut self, reason: FailReason) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        self.state = RunState::GameOver;
        self.timer = None;
        log::info!("Game Over! {}", reason.message());
        true
    }
}

impl Default for RunLifecycle {
    fn default() -> Self {
        Self::new(crate::consts::COUNTDOWN_SECONDS)
    }
}
