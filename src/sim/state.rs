//! Session state and core simulation types
//!
//! Everything a run mutates lives on `GameSession`; there is no global state.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::difficulty::DifficultyModel;
use super::lifecycle::{RunLifecycle, RunState};
use super::registry::{BlockRegistry, RegistryError};
use super::terrain::{ChunkBuffer, TerrainGenerator};
use crate::tuning::{Tuning, TuningError};
use crate::world::{ChunkStore, StreamStats};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    /// Feet voxel was not path
    Fell,
    /// Obstacle directly ahead
    HitObstacle,
}

impl FailReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailReason::Fell => "You fell.",
            FailReason::HitObstacle => "You hit an obstacle.",
        }
    }
}

/// Observable things that happened during a tick or timer pulse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CountdownStarted { seconds: u32 },
    CountdownTick { remaining: u32 },
    Go,
    GameOver { reason: FailReason, distance: f32 },
}

/// The player entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
}

impl PlayerState {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Startup failures building a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// One gameplay session: registry, terrain, difficulty, lifecycle and player
///
/// Only the player position is open to the host. The registry is fixed once
/// the session is built, and speed/difficulty change only through the tick
/// and the reset routine.
///
/// ```compile_fail
/// let mut session = voxel_runner::sim::GameSession::new(Default::default()).unwrap();
/// session.difficulty.reset();
/// ```
///
/// ```compile_fail
/// use voxel_runner::sim::{BlockCategory, VoxelId};
/// let mut session = voxel_runner::sim::GameSession::new(Default::default()).unwrap();
/// session.registry.register(VoxelId(3), BlockCategory::Path).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) tuning: Tuning,
    pub(crate) registry: BlockRegistry,
    pub(crate) terrain: TerrainGenerator,
    pub(crate) difficulty: DifficultyModel,
    pub(crate) lifecycle: RunLifecycle,
    pub player: PlayerState,
    /// Runs started, counting the current one
    pub(crate) run_index: u32,
    /// Forward distance covered this run
    pub(crate) distance: f32,
    /// Longest distance of any finished run
    pub(crate) best_distance: f32,
    /// Active ticks this run
    pub(crate) time_ticks: u64,
}

impl GameSession {
    /// Session with the stock block set
    pub fn new(tuning: Tuning) -> Result<Self, SessionError> {
        Self::with_registry(tuning, BlockRegistry::standard()?)
    }

    /// Session over a caller-built registry
    pub fn with_registry(tuning: Tuning, registry: BlockRegistry) -> Result<Self, SessionError> {
        tuning.validate()?;
        let terrain = TerrainGenerator::new(&registry, &tuning)?;
        Ok(Self {
            difficulty: DifficultyModel::new(&tuning),
            lifecycle: RunLifecycle::new(tuning.countdown_seconds),
            player: PlayerState::new(tuning.spawn_position),
            run_index: 0,
            distance: 0.0,
            best_distance: 0.0,
            time_ticks: 0,
            registry,
            terrain,
            tuning,
        })
    }

    pub fn state(&self) -> RunState {
        self.lifecycle.state()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn difficulty(&self) -> &DifficultyModel {
        &self.difficulty
    }

    pub fn lifecycle(&self) -> &RunLifecycle {
        &self.lifecycle
    }

    pub fn run_index(&self) -> u32 {
        self.run_index
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn best_distance(&self) -> f32 {
        self.best_distance
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Leave Idle and begin the first countdown
    pub fn start(&mut self) -> GameEvent {
        self.run_index += 1;
        self.lifecycle.start_countdown()
    }

    /// Forward wall-clock time to the countdown timer
    pub fn advance_timer(&mut self, elapsed: f32) -> Vec<GameEvent> {
        self.lifecycle.advance_timer(elapsed)
    }

    /// End the run and immediately begin the next countdown
    ///
    /// Does nothing unless Running.
    pub(crate) fn fail(&mut self, reason: FailReason) -> Vec<GameEvent> {
        if !self.lifecycle.fail(reason) {
            return Vec::new();
        }
        let distance = self.distance;
        if distance > self.best_distance {
            log::info!("Run {} set a new best: {:.1}", self.run_index, distance);
            self.best_distance = distance;
        }
        let game_over = GameEvent::GameOver { reason, distance };
        vec![game_over, self.reset()]
    }

    /// Restore difficulty and player, then start a fresh countdown
    fn reset(&mut self) -> GameEvent {
        self.difficulty.reset();
        self.player.position = self.tuning.spawn_position;
        self.distance = 0.0;
        self.time_ticks = 0;
        self.start()
    }

    /// Stream `world` around the player at the current difficulty
    pub fn stream_world(&mut self, world: &mut ChunkStore) -> StreamStats {
        let difficulty = self.difficulty.difficulty;
        world.stream_around(self.player.position, &mut self.terrain, difficulty)
    }

    /// Answer a chunk-fill request at the current difficulty
    pub fn fill_region(&mut self, buffer: ChunkBuffer) -> ChunkBuffer {
        let difficulty = self.difficulty.difficulty;
        self.terrain.fill_region(buffer, difficulty)
    }
}
