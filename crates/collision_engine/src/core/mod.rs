//! # Core Engine Module
//!
//! Shared abstractions the collision subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the collision world, broad-phase and logging

pub mod config;

// Re-export commonly used config types
pub use config::{
    BroadPhaseConfig,
    CollisionConfig,
    EngineConfig,
    WorldConfig,
    Config,
    ConfigError,
};
