//! Collision components
//!
//! [`EntityDesc`] is the serializable template games use to describe a
//! collidable entity. [`CollisionBody`] is the state the world keeps per
//! registered entity: its position pair, flags, profiles and bookkeeping for
//! the broad-phase and groups.

use serde::{Serialize, Deserialize};

use crate::ecs::{BodyFlags, Collidable};
use crate::foundation::math::Vec2;
use crate::physics::collision::Aabb;
use crate::physics::{CollisionProfile, GroupId, ProfileDesc};

/// Serializable description of a collidable entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDesc {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
    /// Collision profiles
    pub profiles: Vec<ProfileDesc>,
    /// Never moved by collision resolution
    pub immobile: bool,
    /// Sub-step motion to avoid tunneling
    pub bullet: bool,
    /// One-way platform
    pub jump_through: bool,
    /// Exempt from broad-phase culling
    pub always_on: bool,
}

impl EntityDesc {
    /// Describe an entity at `(x, y)` with no profiles
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, ..Default::default() }
    }

    /// Add a profile
    pub fn with_profile(mut self, profile: ProfileDesc) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Mark as immobile
    pub fn immobile(mut self) -> Self {
        self.immobile = true;
        self
    }

    /// Mark as a bullet
    pub fn bullet(mut self) -> Self {
        self.bullet = true;
        self
    }

    /// Mark as a jump-through platform
    pub fn jump_through(mut self) -> Self {
        self.jump_through = true;
        self
    }

    /// Exempt from culling
    pub fn always_on(mut self) -> Self {
        self.always_on = true;
        self
    }
}

impl Collidable for EntityDesc {
    fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn collision_profiles(&self) -> &[ProfileDesc] {
        &self.profiles
    }

    fn body_flags(&self) -> BodyFlags {
        BodyFlags::from_switches(self.immobile, self.bullet, self.jump_through, self.always_on)
    }
}

/// Per-entity state kept by the collision world
#[derive(Debug, Clone)]
pub struct CollisionBody {
    pub(crate) position: Vec2,
    pub(crate) previous: Vec2,
    pub(crate) flags: BodyFlags,
    pub(crate) profiles: Vec<CollisionProfile>,
    pub(crate) sequence: u64,
    pub(crate) group: Option<GroupId>,
    pub(crate) was_live: bool,
}

impl CollisionBody {
    pub(crate) fn new(position: Vec2, flags: BodyFlags, profiles: Vec<CollisionProfile>, sequence: u64) -> Self {
        Self {
            position,
            previous: position,
            flags,
            profiles,
            sequence,
            group: None,
            was_live: false,
        }
    }

    /// Position for this tick (corrected once the tick has run)
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position at the end of the previous tick
    pub fn previous_position(&self) -> Vec2 {
        self.previous
    }

    /// Behaviour flags
    pub fn flags(&self) -> BodyFlags {
        self.flags
    }

    /// Registered profiles
    pub fn profiles(&self) -> &[CollisionProfile] {
        &self.profiles
    }

    /// Registration order; lower values win ties during resolution
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Collision group this entity belongs to
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Whether the entity has any profile at all
    pub fn has_profiles(&self) -> bool {
        !self.profiles.is_empty()
    }

    /// Whether any profile declares a blocking collision
    pub fn has_solid(&self) -> bool {
        self.profiles.iter().any(CollisionProfile::has_solid)
    }

    /// Whether any profile declares an overlap collision
    pub fn has_soft(&self) -> bool {
        self.profiles.iter().any(CollisionProfile::has_soft)
    }

    /// Whether the resolver moves this entity
    pub fn is_solid_mover(&self) -> bool {
        !self.flags.contains(BodyFlags::IMMOBILE) && self.has_solid()
    }

    /// Bounds of all current shapes
    pub fn aabb(&self) -> Aabb {
        self.profiles.iter().fold(Aabb::empty(), |bounds, profile| bounds.union(profile.aabb()))
    }

    /// Place every profile's current shapes at the body position
    pub(crate) fn relocate(&mut self) {
        let (x, y) = (self.position.x, self.position.y);
        for profile in &mut self.profiles {
            profile.relocate(x, y);
        }
    }

    /// Forget motion: previous position and shapes snap to the current position
    pub(crate) fn snap_previous(&mut self) {
        self.previous = self.position;
        let (x, y) = (self.position.x, self.position.y);
        for profile in &mut self.profiles {
            profile.reset_previous(x, y);
        }
    }

    /// Begin a tick: swap shape instances and place the current ones at the
    /// candidate position
    pub(crate) fn prepare_collision(&mut self) {
        if !self.was_live {
            self.snap_previous();
            return;
        }
        let (x, y) = (self.position.x, self.position.y);
        for profile in &mut self.profiles {
            profile.prepare_collision(x, y);
        }
    }
}
