//! Forward speed and obstacle density growth

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Speed and difficulty for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyModel {
    /// Forward speed (units/s)
    pub speed: f32,
    /// Obstacle probability per eligible voxel
    pub difficulty: f32,
    initial_speed: f32,
    initial_difficulty: f32,
    max_difficulty: f32,
    speed_growth_rate: f32,
    difficulty_growth_rate: f32,
}

impl Default for DifficultyModel {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl DifficultyModel {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.initial_speed,
            difficulty: tuning.initial_difficulty,
            initial_speed: tuning.initial_speed,
            initial_difficulty: tuning.initial_difficulty,
            max_difficulty: tuning.max_difficulty,
            speed_growth_rate: tuning.speed_growth_rate,
            difficulty_growth_rate: tuning.difficulty_growth_rate,
        }
    }

    /// Grow speed (unbounded) and difficulty (clamped) by elapsed time
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.speed += self.speed_growth_rate * dt;
        self.difficulty = (self.difficulty + self.difficulty_growth_rate * dt).min(self.max_difficulty);
    }

    /// Back to the start-of-run values
    pub fn reset(&mut self) {
        self.speed = self.initial_speed;
        self.difficulty = self.initial_difficulty;
    }

    pub fn max_difficulty(&self) -> f32 {
        self.max_difficulty
    }
}
