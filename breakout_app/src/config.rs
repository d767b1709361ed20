//! Demo configuration

use collision_engine::prelude::*;
use serde::{Deserialize, Serialize};

/// Demo configuration, loadable from TOML or RON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Collision world settings
    pub world: WorldConfig,
}

impl Config for GameConfig {}

impl GameConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.gameplay.validate()?;
        self.world.validate()
    }
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Ticks to simulate before stopping
    pub ticks: u32,

    /// Seed for the ball launch angles
    pub seed: u64,

    /// Balls launched at the start
    pub ball_count: u32,

    /// Ball speed in units per tick
    pub ball_speed: f32,

    /// Ball radius
    pub ball_radius: f32,

    /// Paddle speed in units per tick
    pub paddle_speed: f32,

    /// Rows of bricks
    pub brick_rows: u32,

    /// Columns of bricks
    pub brick_columns: u32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            ticks: 3600,
            seed: 7,
            ball_count: 3,
            ball_speed: 4.0,
            ball_radius: 3.0,
            paddle_speed: 5.0,
            brick_rows: 4,
            brick_columns: 10,
        }
    }
}

impl GameplayConfig {
    /// Validate the gameplay settings
    pub fn validate(&self) -> Result<(), String> {
        if self.ball_count == 0 {
            return Err("At least one ball is required".to_string());
        }
        if !(self.ball_speed > 0.0 && self.ball_speed.is_finite()) {
            return Err(format!("Ball speed must be positive, got {}", self.ball_speed));
        }
        if !(self.ball_radius > 0.0 && self.ball_radius.is_finite()) {
            return Err(format!("Ball radius must be positive, got {}", self.ball_radius));
        }
        if self.brick_columns > 12 {
            return Err(format!("At most 12 brick columns fit the field, got {}", self.brick_columns));
        }
        Ok(())
    }
}
