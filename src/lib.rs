//! Voxel Runner - gameplay core for an endless runner on a voxel corridor
//!
//! Core modules:
//! - `sim`: Block registry, terrain classification, difficulty, run lifecycle and the tick
//! - `world`: Block lookup trait plus a reference in-memory chunk store
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;
pub mod world;

pub use tuning::{Tuning, TuningError};

use glam::{IVec3, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed frame timestep used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Countdown timer pulse period (seconds)
    pub const COUNTDOWN_PULSE_SECS: f32 = 1.0;
    /// Countdown length in pulses ("3, 2, 1" then Go)
    pub const COUNTDOWN_SECONDS: u32 = 3;

    /// Forward speed at the start of every run (units/s)
    pub const INITIAL_SPEED: f32 = 5.0;
    /// Forward speed growth (units/s per second)
    pub const SPEED_GROWTH_RATE: f32 = 0.01;
    /// Obstacle probability at the start of every run
    pub const INITIAL_DIFFICULTY: f32 = 0.05;
    /// Obstacle probability ceiling
    pub const MAX_DIFFICULTY: f32 = 0.5;
    /// Obstacle probability growth per second
    pub const DIFFICULTY_GROWTH_RATE: f32 = 0.000_05;

    /// Lateral strafe speed (units/s)
    pub const LATERAL_SPEED: f32 = 5.0;

    /// Walkway extends |x| <= this at y = 0
    pub const PATH_HALF_WIDTH: i32 = 2;
    /// Widest walkway a tuning file may ask for
    pub const MAX_PATH_HALF_WIDTH: i32 = 64;
    /// Obstacles only spawn for z strictly beyond this
    pub const OBSTACLE_START_Z: i32 = 5;

    /// Where the player stands after a reset, feet on the walkway
    pub const SPAWN_POSITION: [f32; 3] = [0.0, 1.0, 0.0];

    /// Chunk edge length in voxels
    pub const CHUNK_SIZE: i32 = 32;
    /// Load chunks within this many chunks of the player
    pub const CHUNK_ADD_DISTANCE: f32 = 3.5;
    /// Evict chunks beyond this many chunks of the player
    pub const CHUNK_REMOVE_DISTANCE: f32 = 3.5;
}

/// Floor a continuous position to the voxel that contains it
#[inline]
pub fn voxel_at(pos: Vec3) -> IVec3 {
    pos.floor().as_ivec3()
}
