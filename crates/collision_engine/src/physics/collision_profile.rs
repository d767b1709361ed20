//! Collision profiles
//!
//! A profile registers one or more shapes of an entity under a single
//! collision type, together with the reactions the entity wants when those
//! shapes meet other collision types. An entity may carry several profiles.
//!
//! Each profile keeps two instances of every shape: the "current" one, placed
//! at the entity's candidate position for this tick, and the "previous" one,
//! left where the entity ended last tick. [`CollisionProfile::prepare_collision`]
//! swaps the two lists instead of reallocating them.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec2;
use crate::physics::collision::{Aabb, CollisionShape, ShapeDesc};
use crate::physics::collision_types::{CollisionType, CollisionTypeRegistry, ReactionId};
use crate::physics::CollisionError;

/// Serializable profile declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDesc {
    /// Collision type these shapes are registered under
    pub collision_type: String,
    /// Shapes, relative to the owner position
    pub shapes: Vec<ShapeDesc>,
    /// Blocking collisions: other type -> reactions emitted on this entity
    #[serde(default)]
    pub solid_collisions: BTreeMap<String, Vec<String>>,
    /// Overlap-only collisions: other type -> reactions emitted on this entity
    #[serde(default)]
    pub soft_collisions: BTreeMap<String, Vec<String>>,
    /// Overlap-only collisions: other type -> reactions emitted on the other entity
    #[serde(default)]
    pub mirrored_soft_collisions: BTreeMap<String, Vec<String>>,
}

impl ProfileDesc {
    /// Start a declaration for `collision_type`
    pub fn new(collision_type: impl Into<String>) -> Self {
        Self {
            collision_type: collision_type.into(),
            shapes: Vec::new(),
            solid_collisions: BTreeMap::new(),
            soft_collisions: BTreeMap::new(),
            mirrored_soft_collisions: BTreeMap::new(),
        }
    }

    /// Add a shape
    pub fn with_shape(mut self, shape: ShapeDesc) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Block against `other_type`, emitting `reactions` on contact
    pub fn with_solid<S: Into<String>>(mut self, other_type: impl Into<String>, reactions: impl IntoIterator<Item = S>) -> Self {
        self.solid_collisions
            .entry(other_type.into())
            .or_default()
            .extend(reactions.into_iter().map(Into::into));
        self
    }

    /// Detect overlaps with `other_type`, emitting `reactions` on this entity
    pub fn with_soft<S: Into<String>>(mut self, other_type: impl Into<String>, reactions: impl IntoIterator<Item = S>) -> Self {
        self.soft_collisions
            .entry(other_type.into())
            .or_default()
            .extend(reactions.into_iter().map(Into::into));
        self
    }

    /// Detect overlaps with `other_type`, emitting `reactions` on the other entity
    pub fn with_mirrored_soft<S: Into<String>>(mut self, other_type: impl Into<String>, reactions: impl IntoIterator<Item = S>) -> Self {
        self.mirrored_soft_collisions
            .entry(other_type.into())
            .or_default()
            .extend(reactions.into_iter().map(Into::into));
        self
    }
}

/// Reactions configured for one soft-collision target type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoftReaction {
    /// Emitted on the entity owning the profile
    pub reactions: Vec<ReactionId>,
    /// Emitted on the other participant
    pub mirrored: Vec<ReactionId>,
}

/// Shapes of an entity registered under one collision type
#[derive(Debug, Clone)]
pub struct CollisionProfile {
    collision_type: CollisionType,
    shapes: Vec<CollisionShape>,
    previous_shapes: Vec<CollisionShape>,
    aabb: Aabb,
    previous_aabb: Aabb,
    solid: BTreeMap<CollisionType, Vec<ReactionId>>,
    soft: BTreeMap<CollisionType, SoftReaction>,
}

impl CollisionProfile {
    /// Create a profile from already-built shapes, placed at `position`
    pub fn new(collision_type: CollisionType, shapes: Vec<CollisionShape>, position: Vec2) -> Self {
        let mut profile = Self {
            collision_type,
            previous_shapes: shapes.clone(),
            shapes,
            aabb: Aabb::empty(),
            previous_aabb: Aabb::empty(),
            solid: BTreeMap::new(),
            soft: BTreeMap::new(),
        };
        profile.reset_previous(position.x, position.y);
        profile
    }

    /// Resolve a declaration against the registry, validating every shape
    pub fn from_desc(desc: &ProfileDesc, registry: &mut CollisionTypeRegistry, position: Vec2) -> Result<Self, CollisionError> {
        let shapes = desc
            .shapes
            .iter()
            .map(|shape| CollisionShape::from_desc(shape, &desc.collision_type, position.x, position.y))
            .collect::<Result<Vec<_>, _>>()?;

        let mut profile = Self::new(registry.intern_type(&desc.collision_type), shapes, position);

        for (other, reactions) in &desc.solid_collisions {
            let other = registry.intern_type(other);
            let reactions = registry.intern_reactions(reactions);
            profile.add_solid(other, reactions);
        }
        for (other, reactions) in &desc.soft_collisions {
            let other = registry.intern_type(other);
            let reactions = registry.intern_reactions(reactions);
            profile.soft.entry(other).or_default().reactions.extend(reactions);
        }
        for (other, reactions) in &desc.mirrored_soft_collisions {
            let other = registry.intern_type(other);
            let reactions = registry.intern_reactions(reactions);
            profile.soft.entry(other).or_default().mirrored.extend(reactions);
        }

        Ok(profile)
    }

    /// Add blocking reactions against `other`
    pub fn add_solid(&mut self, other: CollisionType, reactions: Vec<ReactionId>) {
        self.solid.entry(other).or_default().extend(reactions);
    }

    /// Start a collision pass: the current shapes become the previous ones and
    /// the current set is recomputed at the candidate position `(x, y)`
    pub fn prepare_collision(&mut self, x: f32, y: f32) {
        std::mem::swap(&mut self.shapes, &mut self.previous_shapes);
        self.previous_aabb = self.aabb;
        self.relocate(x, y);
    }

    /// Move the current shapes to `(x, y)` without touching the previous ones
    pub fn relocate(&mut self, x: f32, y: f32) {
        self.aabb.reset();
        for shape in &mut self.shapes {
            shape.update(x, y);
            self.aabb.include(shape.aabb());
        }
    }

    /// Place both shape instances at `(x, y)`, forgetting any motion
    pub fn reset_previous(&mut self, x: f32, y: f32) {
        self.relocate(x, y);
        self.previous_shapes.clone_from(&self.shapes);
        self.previous_aabb = self.aabb;
    }

    /// Collision type of this profile
    pub fn collision_type(&self) -> CollisionType {
        self.collision_type
    }

    /// Shapes at the current position
    pub fn shapes(&self) -> &[CollisionShape] {
        &self.shapes
    }

    /// Shapes at the previous position
    pub fn previous_shapes(&self) -> &[CollisionShape] {
        &self.previous_shapes
    }

    /// Bounds of the current shapes
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Bounds of the previous shapes
    pub fn previous_aabb(&self) -> &Aabb {
        &self.previous_aabb
    }

    /// Reactions for a blocking contact with `other`, if it is declared
    pub fn solid_reactions(&self, other: CollisionType) -> Option<&[ReactionId]> {
        self.solid.get(&other).map(Vec::as_slice)
    }

    /// Reactions for an overlap with `other`, if it is declared
    pub fn soft_reaction(&self, other: CollisionType) -> Option<&SoftReaction> {
        self.soft.get(&other)
    }

    /// Types this profile is blocked by, in handle order
    pub fn solid_types(&self) -> impl Iterator<Item = CollisionType> + '_ {
        self.solid.keys().copied()
    }

    /// Soft targets and their reactions, in handle order
    pub fn soft_targets(&self) -> impl Iterator<Item = (CollisionType, &SoftReaction)> + '_ {
        self.soft.iter().map(|(ty, reaction)| (*ty, reaction))
    }

    /// Whether any blocking collision is declared
    pub fn has_solid(&self) -> bool {
        !self.solid.is_empty()
    }

    /// Whether any overlap collision is declared
    pub fn has_soft(&self) -> bool {
        !self.soft.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle_desc() -> ProfileDesc {
        ProfileDesc::new("paddle")
            .with_shape(ShapeDesc::rectangle_top_left(40.0, 8.0))
            .with_solid("wall", ["stop"])
            .with_soft("pickup", ["collect"])
            .with_mirrored_soft("pickup", ["consumed"])
    }

    #[test]
    fn test_from_desc_interns_everything() {
        let mut registry = CollisionTypeRegistry::new();
        let profile = CollisionProfile::from_desc(&paddle_desc(), &mut registry, Vec2::new(10.0, 100.0)).unwrap();

        let wall = registry.lookup_type("wall").unwrap();
        let pickup = registry.lookup_type("pickup").unwrap();
        let stop = registry.lookup_reaction("stop").unwrap();

        assert_eq!(registry.type_name(profile.collision_type()), "paddle");
        assert_eq!(profile.solid_reactions(wall), Some(&[stop][..]));
        assert_eq!(profile.solid_types().collect::<Vec<_>>(), vec![wall]);

        let soft = profile.soft_reaction(pickup).unwrap();
        assert_eq!(soft.reactions, vec![registry.lookup_reaction("collect").unwrap()]);
        assert_eq!(soft.mirrored, vec![registry.lookup_reaction("consumed").unwrap()]);
        assert_eq!(*profile.aabb(), Aabb::from_edges(10.0, 100.0, 50.0, 108.0));
    }

    #[test]
    fn test_prepare_swaps_current_into_previous() {
        let mut registry = CollisionTypeRegistry::new();
        let mut profile = CollisionProfile::from_desc(&paddle_desc(), &mut registry, Vec2::new(0.0, 0.0)).unwrap();

        profile.prepare_collision(5.0, 0.0);
        assert_eq!(profile.previous_aabb().left, 0.0);
        assert_eq!(profile.aabb().left, 5.0);
        assert_eq!(profile.previous_shapes()[0].aabb().left, 0.0);

        profile.prepare_collision(12.0, 0.0);
        assert_eq!(profile.previous_aabb().left, 5.0);
        assert_eq!(profile.shapes()[0].aabb().left, 12.0);
    }

    #[test]
    fn test_reset_previous_forgets_motion() {
        let mut registry = CollisionTypeRegistry::new();
        let mut profile = CollisionProfile::from_desc(&paddle_desc(), &mut registry, Vec2::new(0.0, 0.0)).unwrap();
        profile.prepare_collision(30.0, 30.0);
        profile.reset_previous(-4.0, 2.0);

        assert_eq!(profile.aabb(), profile.previous_aabb());
        assert_eq!(profile.shapes(), profile.previous_shapes());
    }

    #[test]
    fn test_invalid_shape_names_profile() {
        let mut registry = CollisionTypeRegistry::new();
        let desc = ProfileDesc::new("ghost").with_shape(ShapeDesc::circle(-2.0));
        match CollisionProfile::from_desc(&desc, &mut registry, Vec2::zeros()) {
            Err(CollisionError::InvalidShape { collision_type, .. }) => assert_eq!(collision_type, "ghost"),
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }
}
