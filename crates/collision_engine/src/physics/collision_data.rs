//! Per-tick collision results
//!
//! [`CollisionDataEntry`] describes one accepted axis contact and
//! [`CollisionDataCollection`] keeps the best (smallest movement) entry per axis
//! for an entity during one tick. Both are plain values rebuilt every tick.

use crate::ecs::EntityId;
use crate::foundation::math::{Axis, Vec2};
use crate::physics::collision::CollisionShape;
use crate::physics::collision_types::CollisionType;

/// One successful axis resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionDataEntry {
    /// Axis the contact blocked
    pub axis: Axis,
    /// Direction of travel along the axis (-1.0 or 1.0)
    pub direction: f32,
    /// Resolved owner position along the axis
    pub position: f32,
    /// Distance travelled along the axis before the contact
    pub delta_movement: f32,
    /// Collision type of the moving profile
    pub this_type: CollisionType,
    /// Collision type of the blocking shape
    pub that_type: CollisionType,
    /// Index of the moving profile on its entity
    pub this_profile: usize,
    /// Index of the blocking profile on its entity
    pub that_profile: usize,
    /// Moving shape placed at the resolved contact
    pub this_shape: CollisionShape,
    /// Blocking shape
    pub that_shape: CollisionShape,
    /// Owner of the blocking shape; `None` for terrain
    pub that_entity: Option<EntityId>,
    /// Movement along the axis that the contact cancelled, up to the tick's goal
    pub contact_vector: Vec2,
}

/// Best X and Y contacts recorded for one entity during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionDataCollection {
    x: Option<CollisionDataEntry>,
    y: Option<CollisionDataEntry>,
}

impl CollisionDataCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `entry` if it moved less than the current entry on its axis
    ///
    /// Returns whether the entry was kept.
    pub fn try_record(&mut self, entry: CollisionDataEntry) -> bool {
        let slot = match entry.axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        };
        match slot {
            Some(existing) if existing.delta_movement <= entry.delta_movement => false,
            _ => {
                *slot = Some(entry);
                true
            }
        }
    }

    /// Best horizontal contact
    pub fn x(&self) -> Option<&CollisionDataEntry> {
        self.x.as_ref()
    }

    /// Best vertical contact
    pub fn y(&self) -> Option<&CollisionDataEntry> {
        self.y.as_ref()
    }

    /// Recorded entries, X first
    pub fn entries(&self) -> impl Iterator<Item = &CollisionDataEntry> {
        self.x.iter().chain(self.y.iter())
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }

    /// Forget all entries
    pub fn clear(&mut self) {
        self.x = None;
        self.y = None;
    }
}
