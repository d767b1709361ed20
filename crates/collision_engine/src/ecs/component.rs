//! Capability trait for collidable game entities

use crate::ecs::BodyFlags;
use crate::foundation::math::Vec2;
use crate::physics::ProfileDesc;

/// Implemented by game entities that take part in collision
///
/// The world reads these values once, in
/// [`CollisionWorld::add_collision_entity`](crate::physics::CollisionWorld::add_collision_entity);
/// afterwards positions are exchanged through the returned handle.
pub trait Collidable {
    /// Position at registration
    fn position(&self) -> Vec2;

    /// Profiles the entity registers; an empty list makes it a non-collider
    fn collision_profiles(&self) -> &[ProfileDesc];

    /// Behaviour flags
    fn body_flags(&self) -> BodyFlags {
        BodyFlags::empty()
    }
}
