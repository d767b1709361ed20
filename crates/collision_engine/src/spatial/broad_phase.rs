//! Broad-phase culling around the camera
//!
//! The culler keeps the set of entities close enough to the camera to take
//! part in a tick. The live sets are rebuilt only when the registry changed,
//! the cache expired, or the buffered camera rectangle left the larger
//! containment rectangle cached at the last rebuild. Everything inside the
//! containment rectangle counts as live, so a camera drifting inside it does
//! not change membership.

use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};

use crate::core::config::BroadPhaseConfig;
use crate::ecs::{BodyFlags, CollisionBody, EntityId};
use crate::physics::collision::Aabb;
use crate::physics::collision_types::CollisionType;
use crate::spatial::camera::CameraRegion;

/// Live entity sets for the current camera region
#[derive(Debug)]
pub struct BroadPhaseCuller {
    config: BroadPhaseConfig,
    query: Aabb,
    containment: Aabb,
    dirty: bool,
    age: u32,
    recomputes: u64,
    live: SecondaryMap<EntityId, ()>,
    all_live: Vec<EntityId>,
    solid_live: Vec<EntityId>,
    soft_live: Vec<EntityId>,
    by_type: HashMap<CollisionType, Vec<(EntityId, usize)>>,
}

impl BroadPhaseCuller {
    /// Create a culler that recomputes on its first update
    pub fn new(config: BroadPhaseConfig) -> Self {
        Self {
            config,
            query: Aabb::empty(),
            containment: Aabb::empty(),
            dirty: true,
            age: 0,
            recomputes: 0,
            live: SecondaryMap::new(),
            all_live: Vec::new(),
            solid_live: Vec::new(),
            soft_live: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Force a recompute on the next update
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the next update will recompute
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Refresh the live sets for this tick's camera
    ///
    /// Returns whether the sets were recomputed.
    pub fn update(&mut self, camera: &CameraRegion, bodies: &SlotMap<EntityId, CollisionBody>) -> bool {
        let query = camera.query_aabb();
        if !self.needs_recompute(&query) {
            self.age = self.age.saturating_add(1);
            return false;
        }
        self.recompute(query, bodies);
        true
    }

    fn needs_recompute(&self, query: &Aabb) -> bool {
        if self.dirty {
            return true;
        }
        if self.config.max_cache_age_ticks > 0 && self.age >= self.config.max_cache_age_ticks {
            return true;
        }
        let unchanged = self.query.matches(query.center_x, query.center_y, query.half_width * 2.0, query.half_height * 2.0);
        !(unchanged || self.containment.contains(query))
    }

    fn recompute(&mut self, query: Aabb, bodies: &SlotMap<EntityId, CollisionBody>) {
        let margin = self.config.cache_margin;
        self.query = query;
        self.containment = query.expanded(margin, margin, margin, margin);
        self.dirty = false;
        self.age = 0;
        self.recomputes += 1;

        self.live.clear();
        self.all_live.clear();
        self.solid_live.clear();
        self.soft_live.clear();
        for entries in self.by_type.values_mut() {
            entries.clear();
        }

        let mut live: Vec<(u64, EntityId)> = bodies
            .iter()
            .filter(|(_, body)| body.flags().contains(BodyFlags::ALWAYS_ON) || self.containment.overlaps(&Self::bounds(body)))
            .map(|(id, body)| (body.sequence(), id))
            .collect();
        live.sort_unstable_by_key(|&(sequence, _)| sequence);

        for (_, id) in live {
            let Some(body) = bodies.get(id) else {
                continue;
            };
            self.live.insert(id, ());
            self.all_live.push(id);
            if body.is_solid_mover() {
                self.solid_live.push(id);
            }
            if body.has_soft() {
                self.soft_live.push(id);
            }
            for (index, profile) in body.profiles().iter().enumerate() {
                self.by_type.entry(profile.collision_type()).or_default().push((id, index));
            }
        }

        log::debug!(
            "Broad-phase recomputed: {} live, {} solid, {} soft",
            self.all_live.len(),
            self.solid_live.len(),
            self.soft_live.len()
        );
    }

    /// Bounds used for membership; shapeless bodies count as their position
    fn bounds(body: &CollisionBody) -> Aabb {
        let bounds = body.aabb();
        if bounds.is_empty() {
            let position = body.position();
            return Aabb::from_center(position.x, position.y, 0.0, 0.0);
        }
        bounds
    }

    /// Whether `entity` is in the live set
    pub fn is_live(&self, entity: EntityId) -> bool {
        self.live.contains_key(entity)
    }

    /// Every live entity, in registration order
    pub fn all_live(&self) -> &[EntityId] {
        &self.all_live
    }

    /// Live entities the resolver moves
    pub fn solid_live(&self) -> &[EntityId] {
        &self.solid_live
    }

    /// Live entities declaring overlap reactions
    pub fn soft_live(&self) -> &[EntityId] {
        &self.soft_live
    }

    /// Live `(entity, profile index)` pairs registered under `collision_type`
    pub fn live_of_type(&self, collision_type: CollisionType) -> &[(EntityId, usize)] {
        self.by_type.get(&collision_type).map_or(&[][..], Vec::as_slice)
    }

    /// Buffered camera rectangle of the last recompute
    pub fn query(&self) -> &Aabb {
        &self.query
    }

    /// Containment rectangle of the last recompute
    pub fn containment(&self) -> &Aabb {
        &self.containment
    }

    /// Number of recomputes so far
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::collision::{CollisionShape, ShapeKind};
    use crate::physics::collision_profile::CollisionProfile;
    use crate::physics::collision_types::CollisionTypeRegistry;

    struct Fixture {
        registry: CollisionTypeRegistry,
        bodies: SlotMap<EntityId, CollisionBody>,
        next: u64,
    }

    impl Fixture {
        fn new() -> Self {
            Self { registry: CollisionTypeRegistry::new(), bodies: SlotMap::with_key(), next: 0 }
        }

        fn add(&mut self, x: f32, y: f32, flags: BodyFlags, solid: bool) -> EntityId {
            let position = Vec2::new(x, y);
            let ty = self.registry.intern_type("box");
            let shape = CollisionShape::new(ShapeKind::Rectangle { width: 10.0, height: 10.0 }, Vec2::zeros(), x, y);
            let mut profile = CollisionProfile::new(ty, vec![shape], position);
            if solid {
                profile.add_solid(ty, Vec::new());
            }
            self.next += 1;
            self.bodies.insert(CollisionBody::new(position, flags, vec![profile], self.next))
        }
    }

    fn camera() -> CameraRegion {
        CameraRegion::new(0.0, 0.0, 100.0, 100.0).with_uniform_buffer(10.0)
    }

    #[test]
    fn test_partitions_live_entities() {
        let mut f = Fixture::new();
        let near = f.add(50.0, 50.0, BodyFlags::empty(), true);
        let far = f.add(5000.0, 50.0, BodyFlags::empty(), true);
        let pinned = f.add(9000.0, 9000.0, BodyFlags::ALWAYS_ON, false);
        let wall = f.add(60.0, 60.0, BodyFlags::IMMOBILE, true);

        let mut culler = BroadPhaseCuller::new(BroadPhaseConfig::default());
        assert!(culler.update(&camera(), &f.bodies));

        assert_eq!(culler.all_live(), &[near, pinned, wall]);
        assert_eq!(culler.solid_live(), &[near]);
        assert!(culler.soft_live().is_empty());
        assert!(!culler.is_live(far));

        let ty = f.registry.lookup_type("box").unwrap();
        assert_eq!(culler.live_of_type(ty), &[(near, 0), (pinned, 0), (wall, 0)]);
    }

    #[test]
    fn test_small_camera_moves_reuse_the_cache() {
        let mut f = Fixture::new();
        f.add(50.0, 50.0, BodyFlags::empty(), true);

        let mut culler = BroadPhaseCuller::new(BroadPhaseConfig::new().with_cache_margin(64.0).with_max_cache_age(0));
        let mut camera = camera();
        assert!(culler.update(&camera, &f.bodies));
        assert!(!culler.update(&camera, &f.bodies));

        camera.move_to(30.0, 0.0);
        assert!(!culler.update(&camera, &f.bodies));

        camera.move_to(500.0, 0.0);
        assert!(culler.update(&camera, &f.bodies));
        assert!(culler.all_live().is_empty());
        assert_eq!(culler.recompute_count(), 2);
    }

    #[test]
    fn test_unchanged_query_skips_recompute_without_margin() {
        let mut f = Fixture::new();
        f.add(50.0, 50.0, BodyFlags::empty(), true);

        let mut culler = BroadPhaseCuller::new(BroadPhaseConfig::new().with_cache_margin(0.0).with_max_cache_age(0));
        let mut camera = camera();
        assert!(culler.update(&camera, &f.bodies));
        assert!(!culler.update(&camera, &f.bodies));

        // No margin: any move leaves the containment rectangle
        camera.move_to(1.0, 0.0);
        assert!(culler.update(&camera, &f.bodies));
        assert_eq!(culler.recompute_count(), 2);
    }

    #[test]
    fn test_invalidation_and_expiry_force_recompute() {
        let mut f = Fixture::new();
        f.add(50.0, 50.0, BodyFlags::empty(), true);

        let mut culler = BroadPhaseCuller::new(BroadPhaseConfig::new().with_max_cache_age(2));
        assert!(culler.update(&camera(), &f.bodies));

        let late = f.add(20.0, 20.0, BodyFlags::empty(), true);
        culler.invalidate();
        assert!(culler.update(&camera(), &f.bodies));
        assert!(culler.is_live(late));

        assert!(!culler.update(&camera(), &f.bodies));
        assert!(!culler.update(&camera(), &f.bodies));
        assert!(culler.update(&camera(), &f.bodies));
    }
}
