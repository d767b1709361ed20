//! Game-side state attached to collision entities

use collision_engine::prelude::*;

/// Ball state
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    /// Collision handle
    pub id: EntityId,

    /// Velocity in units per tick
    pub velocity: Vec2,
}

impl Ball {
    /// Reflect the velocity away from a blocking contact
    pub fn bounce(&mut self, axis: Axis, direction: f32) {
        if direction == 0.0 {
            return;
        }
        let speed = axis.component(&self.velocity).abs();
        axis.set_component(&mut self.velocity, -direction * speed);
    }
}

/// Brick state
#[derive(Debug, Clone, Copy)]
pub struct Brick {
    /// Collision handle
    pub id: EntityId,

    /// Points awarded when destroyed
    pub points: u32,
}
