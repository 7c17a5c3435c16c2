//! Gameplay simulation
//!
//! All gameplay logic lives here:
//! - Block registry and terrain classification
//! - Difficulty growth
//! - Countdown-gated run lifecycle
//! - Per-frame movement and collision sampling
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod lifecycle;
pub mod registry;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{SamplePoints, sample_collision};
pub use difficulty::DifficultyModel;
pub use lifecycle::{RunLifecycle, RunState, TimerHandle};
pub use registry::{BlockCategory, BlockRegistry, RegistryError, VoxelId};
pub use state::{FailReason, GameEvent, GameSession, PlayerState, SessionError};
pub use terrain::{ChunkBuffer, Region, TerrainGenerator, TerrainLayout, classify};
pub use tick::{AUTOPILOT_LOOKAHEAD, TickInput, autopilot_input, tick};
