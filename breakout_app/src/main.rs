//! Headless breakout demo driving the collision engine
//!
//! Usage: `breakout_demo [config.toml | config.ron]`

mod components;
mod config;
mod game;

use collision_engine::config::ConfigError;
use collision_engine::foundation::logging;
use collision_engine::prelude::*;
use thiserror::Error;

use crate::config::GameConfig;
use crate::game::Breakout;

#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Collision(#[from] CollisionError),
}

fn main() -> Result<(), AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load_from_file(&path)?,
        None => GameConfig::default(),
    };
    logging::init_with_level(&config.world.engine.log_level);
    config.validate().map_err(AppError::Invalid)?;

    log::info!(
        "Starting breakout: {} balls, {}x{} bricks, {} ticks",
        config.gameplay.ball_count,
        config.gameplay.brick_columns,
        config.gameplay.brick_rows,
        config.gameplay.ticks
    );

    let mut game = Breakout::new(&config)?;
    let summary = game.run();

    log::info!(
        "Finished after {} ticks: score {}, {} bricks left, {} balls left, {} bounces",
        summary.ticks,
        summary.score,
        summary.bricks_left,
        summary.balls_left,
        summary.bounces
    );
    Ok(())
}
