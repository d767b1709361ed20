//! Collision engine errors

use crate::config::ConfigError;
use crate::ecs::EntityId;
use thiserror::Error;

/// Errors reported by the collision engine
#[derive(Error, Debug)]
pub enum CollisionError {
    /// A shape declaration had unusable dimensions
    #[error("invalid shape in profile '{collision_type}': {reason}")]
    InvalidShape {
        /// Collision type of the profile declaring the shape
        collision_type: String,
        /// What was wrong with it
        reason: String,
    },

    /// The entity handle does not refer to a registered entity
    #[error("entity {0:?} is not registered")]
    UnknownEntity(EntityId),

    /// The group handle does not refer to an existing collision group
    #[error("collision group {0:?} does not exist")]
    UnknownGroup(crate::physics::GroupId),

    /// An entity position was NaN or infinite
    #[error("entity {entity:?} has a non-finite position ({x}, {y})")]
    NonFinitePosition {
        /// Offending entity
        entity: EntityId,
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}
