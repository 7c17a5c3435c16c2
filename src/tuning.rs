//! Data-driven game balance
//!
//! Every field falls back to the matching `consts` value, so a tuning file
//! only needs the keys it wants to change.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Difficulty ===
    pub initial_speed: f32,
    pub speed_growth_rate: f32,
    pub initial_difficulty: f32,
    pub max_difficulty: f32,
    pub difficulty_growth_rate: f32,

    // === Player ===
    pub lateral_speed: f32,
    pub spawn_position: Vec3,

    // === Run lifecycle ===
    /// Pulses between countdown start and Go
    pub countdown_seconds: u32,

    // === Terrain ===
    pub path_half_width: i32,
    pub obstacle_start_z: i32,
    /// Fixed terrain seed. None draws a fresh seed from OS entropy.
    pub terrain_seed: Option<u64>,

    // === Streaming ===
    pub chunk_size: i32,
    pub chunk_add_distance: f32,
    pub chunk_remove_distance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_speed: INITIAL_SPEED,
            speed_growth_rate: SPEED_GROWTH_RATE,
            initial_difficulty: INITIAL_DIFFICULTY,
            max_difficulty: MAX_DIFFICULTY,
            difficulty_growth_rate: DIFFICULTY_GROWTH_RATE,

            lateral_speed: LATERAL_SPEED,
            spawn_position: Vec3::from_array(SPAWN_POSITION),

            countdown_seconds: COUNTDOWN_SECONDS,

            path_half_width: PATH_HALF_WIDTH,
            obstacle_start_z: OBSTACLE_START_Z,
            terrain_seed: None,

            chunk_size: CHUNK_SIZE,
            chunk_add_distance: CHUNK_ADD_DISTANCE,
            chunk_remove_distance: CHUNK_REMOVE_DISTANCE,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        if !(self.initial_speed.is_finite() && self.initial_speed >= 0.0) {
            return invalid("initial_speed must be finite and non-negative");
        }
        if !(self.speed_growth_rate.is_finite() && self.speed_growth_rate >= 0.0) {
            return invalid("speed_growth_rate must be finite and non-negative");
        }
        if !(0.0..=1.0).contains(&self.initial_difficulty) {
            return invalid("initial_difficulty must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.max_difficulty) {
            return invalid("max_difficulty must be within [0, 1]");
        }
        if self.initial_difficulty > self.max_difficulty {
            return invalid("initial_difficulty exceeds max_difficulty");
        }
        if !(self.difficulty_growth_rate.is_finite() && self.difficulty_growth_rate >= 0.0) {
            return invalid("difficulty_growth_rate must be finite and non-negative");
        }
        if !(self.lateral_speed.is_finite() && self.lateral_speed >= 0.0) {
            return invalid("lateral_speed must be finite and non-negative");
        }
        if !self.spawn_position.is_finite() {
            return invalid("spawn_position must be finite");
        }
        if self.countdown_seconds == 0 {
            return invalid("countdown_seconds must be at least 1");
        }
        if !(0..=MAX_PATH_HALF_WIDTH).contains(&self.path_half_width) {
            return invalid("path_half_width must be between 0 and 64");
        }
        if self.chunk_size <= 0 {
            return invalid("chunk_size must be positive");
        }
        if self.chunk_add_distance < 0.0 || self.chunk_remove_distance < self.chunk_add_distance {
            return invalid("chunk_remove_distance must be >= chunk_add_distance >= 0");
        }
        Ok(())
    }
}
