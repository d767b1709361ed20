//! # Unified Configuration System
//!
//! This module consolidates the configuration structures of the collision
//! engine. Every structure is serde-enabled so a whole [`WorldConfig`] can be
//! loaded from TOML or RON through the [`Config`] trait.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: Logging and debug features
//! - **Collision Config**: Sweep resolution limits and tolerances
//! - **Broad-Phase Config**: Live-set caching around the camera

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Hard ceiling on bullet sub-steps, whatever the configuration says
pub const BULLET_STEP_LIMIT: u32 = 100;

/// # Collision Configuration
///
/// Tuning for the sweep and minimum-movement resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Maximum number of sub-steps a bullet entity is split into per tick
    pub max_bullet_steps: u32,
    /// Tolerance used when deciding whether a contact lies behind the mover
    pub contact_epsilon: f32,
}

impl CollisionConfig {
    /// Create a collision configuration with default values
    pub fn new() -> Self {
        Self {
            max_bullet_steps: BULLET_STEP_LIMIT,
            contact_epsilon: 1e-4,
        }
    }
    
    /// Set the bullet sub-step cap
    pub fn with_max_bullet_steps(mut self, steps: u32) -> Self {
        self.max_bullet_steps = steps;
        self
    }

    /// Bullet sub-step cap clamped to `1..=BULLET_STEP_LIMIT`
    pub fn effective_bullet_steps(&self) -> u32 {
        self.max_bullet_steps.clamp(1, BULLET_STEP_LIMIT)
    }
    
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_bullet_steps == 0 {
            return Err("Max bullet steps must be at least 1".to_string());
        }
        if !self.contact_epsilon.is_finite() || self.contact_epsilon < 0.0 {
            return Err(format!("Contact epsilon must be a non-negative number, got {}", self.contact_epsilon));
        }
        Ok(())
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Broad-Phase Configuration
///
/// Controls how the live entity set is cached around the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadPhaseConfig {
    /// Extra margin added on every side of the buffered camera rectangle when
    /// caching the live set; the set is only rebuilt once the camera leaves it
    pub cache_margin: f32,
    /// Rebuild the live set after this many ticks even if the camera is still
    /// inside the cached region (0 disables expiry)
    pub max_cache_age_ticks: u32,
}

impl BroadPhaseConfig {
    /// Create a broad-phase configuration with default values
    pub fn new() -> Self {
        Self {
            cache_margin: 128.0,
            max_cache_age_ticks: 30,
        }
    }
    
    /// Set the cache margin
    pub fn with_cache_margin(mut self, margin: f32) -> Self {
        self.cache_margin = margin;
        self
    }
    
    /// Set the cache expiry in ticks
    pub fn with_max_cache_age(mut self, ticks: u32) -> Self {
        self.max_cache_age_ticks = ticks;
        self
    }
    
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.cache_margin.is_finite() || self.cache_margin < 0.0 {
            return Err(format!("Cache margin must be a non-negative number, got {}", self.cache_margin));
        }
        Ok(())
    }
}

impl Default for BroadPhaseConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Engine Configuration
///
/// Logging and debug behaviour shared by applications embedding the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }
    
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
    
    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete World Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Resolver configuration
    pub collision: CollisionConfig,
    /// Broad-phase configuration
    pub broad_phase: BroadPhaseConfig,
}

impl WorldConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.collision.validate()?;
        self.broad_phase.validate()?;
        Ok(())
    }

    /// Load and validate a configuration file
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

impl Config for WorldConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collision.max_bullet_steps, 100);
    }

    #[test]
    fn test_bullet_steps_are_capped() {
        let config = CollisionConfig::new().with_max_bullet_steps(500);
        assert_eq!(config.effective_bullet_steps(), BULLET_STEP_LIMIT);

        let config = CollisionConfig::new().with_max_bullet_steps(0);
        assert!(config.validate().is_err());
        assert_eq!(config.effective_bullet_steps(), 1);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.toml");

        let config = WorldConfig {
            broad_phase: BroadPhaseConfig::new().with_cache_margin(64.0),
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = WorldConfig::load_validated(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.ron");
        std::fs::write(&path, "(collision: (max_bullet_steps: 12))").unwrap();

        let loaded = WorldConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.collision.max_bullet_steps, 12);
        assert_eq!(loaded.broad_phase, BroadPhaseConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.toml");
        std::fs::write(&path, "[broad_phase]\ncache_margin = -4.0\n").unwrap();

        assert!(matches!(WorldConfig::load_validated(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            WorldConfig::load_from_file("world.yaml"),
            Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
