//! Collision groups
//!
//! A group is a cluster of entities (balls in a multi-ball, a chain of crates)
//! resolved against one another before any of them is resolved against the
//! rest of the world.

use crate::ecs::EntityId;

slotmap::new_key_type! {
    /// Handle of a collision group
    pub struct GroupId;
}

/// Members of one collision group, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionGroup {
    members: Vec<EntityId>,
}

impl CollisionGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member; returns `false` if it was already present
    pub fn insert(&mut self, entity: EntityId) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.members.push(entity);
        true
    }

    /// Remove a member; returns `false` if it was not present
    pub fn remove(&mut self, entity: EntityId) -> bool {
        let before = self.members.len();
        self.members.retain(|&member| member != entity);
        self.members.len() != before
    }

    /// Whether `entity` belongs to the group
    pub fn contains(&self, entity: EntityId) -> bool {
        self.members.contains(&entity)
    }

    /// Members in insertion order
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
