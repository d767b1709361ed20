//! Physics module for collision detection and resolution
//!
//! Provides shape tests, per-entity collision profiles, the sweep resolver
//! and the [`CollisionWorld`] that runs them once per logic tick.

pub mod collision;
pub mod collision_types;
pub mod collision_profile;
pub mod collision_data;
pub mod collision_group;
pub mod resolver;
pub mod collision_system;
pub mod error;

pub use collision::{
    Aabb,
    CollisionShape,
    ShapeDesc,
    ShapeKind,
};
pub use collision_types::{CollisionType, CollisionTypeRegistry, ReactionId};
pub use collision_profile::{CollisionProfile, ProfileDesc, SoftReaction};
pub use collision_data::{CollisionDataCollection, CollisionDataEntry};
pub use collision_group::{CollisionGroup, GroupId};
pub use collision_system::{CollisionWorld, TickStats};
pub use error::CollisionError;

#[cfg(test)]
mod tests;
