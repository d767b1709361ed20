//! Collision world
//!
//! [`CollisionWorld`] owns every registered entity and runs the per-tick pass:
//!
//! 1. prepare: the broad-phase refreshes its live sets and every live entity
//!    places its current shapes at the position gameplay gave it
//! 2. group: members of each collision group are resolved against each other
//! 3. solid: every live mover is resolved against the live world and terrain
//! 4. non-colliders: everything else is settled where gameplay put it
//! 5. soft: overlaps are detected and reported without moving anyone
//! 6. finalize: the resolved positions become next tick's previous positions
//!
//! Nothing is delivered to game code during the pass. Reactions are queued as
//! [`CollisionEvent`]s and handed out once the tick is over.

use slotmap::{SecondaryMap, SlotMap};

use crate::config::ConfigError;
use crate::core::config::WorldConfig;
use crate::ecs::{BodyFlags, Collidable, CollisionBody, EntityId};
use crate::events::{CollisionEvent, CollisionMessage, HitType};
use crate::foundation::math::{is_finite, Vec2};
use crate::physics::collision::{shapes_collide, Aabb};
use crate::physics::collision_data::{CollisionDataCollection, CollisionDataEntry};
use crate::physics::collision_group::{CollisionGroup, GroupId};
use crate::physics::collision_profile::CollisionProfile;
use crate::physics::collision_types::CollisionTypeRegistry;
use crate::physics::resolver::{Candidate, CandidateSource, Mover, MoverProfile, Resolution, Resolver, TERRAIN_RANK};
use crate::physics::CollisionError;
use crate::spatial::{BroadPhaseCuller, CameraRegion, Terrain, TileShape};

/// Counters for the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Entities in the live set
    pub live: usize,
    /// Whether the broad-phase rebuilt its live sets
    pub broad_phase_recomputed: bool,
    /// Group members resolved against their group
    pub group_movers: usize,
    /// Movers resolved against the world
    pub solid_movers: usize,
    /// Live entities settled without resolution
    pub non_colliders: usize,
    /// Soft overlaps detected
    pub soft_overlaps: usize,
    /// Events queued
    pub events: usize,
    /// Entities whose resolution was aborted
    pub aborted: usize,
}

/// Which obstacles a mover is resolved against
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    /// Only the other members of a group
    Group(&'a [EntityId]),
    /// The live world and terrain, minus the mover's own group
    World { exclude: Option<GroupId> },
}

/// View of the world handed to the resolver
struct WorldCandidates<'a> {
    bodies: &'a SlotMap<EntityId, CollisionBody>,
    culler: &'a BroadPhaseCuller,
    terrain: Option<&'a dyn Terrain>,
    scope: Scope<'a>,
}

impl WorldCandidates<'_> {
    fn push_profile(
        entity: EntityId,
        body: &CollisionBody,
        index: usize,
        profile: &CollisionProfile,
        swept: &Aabb,
        out: &mut Vec<Candidate>,
    ) {
        if !profile.aabb().overlaps(swept) {
            return;
        }
        for shape in profile.shapes() {
            if shape.aabb().overlaps(swept) {
                out.push(Candidate {
                    owner: Some(entity),
                    rank: body.sequence(),
                    profile: index,
                    collision_type: profile.collision_type(),
                    shape: *shape,
                    jump_through: body.flags().contains(BodyFlags::JUMP_THROUGH),
                });
            }
        }
    }
}

impl CandidateSource for WorldCandidates<'_> {
    fn gather(&self, mover: EntityId, profile: &MoverProfile, swept: &Aabb, previous: &Aabb, out: &mut Vec<Candidate>) {
        for &collision_type in &profile.solid_types {
            match self.scope {
                Scope::Group(members) => {
                    for &member in members {
                        if member == mover || !self.culler.is_live(member) {
                            continue;
                        }
                        let Some(body) = self.bodies.get(member) else {
                            continue;
                        };
                        for (index, other) in body.profiles().iter().enumerate() {
                            if other.collision_type() == collision_type {
                                Self::push_profile(member, body, index, other, swept, out);
                            }
                        }
                    }
                }
                Scope::World { exclude } => {
                    for &(entity, index) in self.culler.live_of_type(collision_type) {
                        if entity == mover {
                            continue;
                        }
                        let Some(body) = self.bodies.get(entity) else {
                            continue;
                        };
                        if exclude.is_some() && body.group() == exclude {
                            continue;
                        }
                        if let Some(other) = body.profiles().get(index) {
                            Self::push_profile(entity, body, index, other, swept, out);
                        }
                    }

                    let Some(terrain) = self.terrain else {
                        continue;
                    };
                    if terrain.collision_type() != collision_type {
                        continue;
                    }
                    let mut tiles: Vec<TileShape> = Vec::new();
                    terrain.tile_shapes(swept, previous, &mut tiles);
                    out.extend(tiles.into_iter().map(|tile| Candidate {
                        owner: None,
                        rank: TERRAIN_RANK,
                        profile: 0,
                        collision_type,
                        shape: tile.shape,
                        jump_through: tile.jump_through,
                    }));
                }
            }
        }
    }
}

/// Registry of collidable entities and the per-tick collision pass
pub struct CollisionWorld {
    config: WorldConfig,
    types: CollisionTypeRegistry,
    bodies: SlotMap<EntityId, CollisionBody>,
    next_sequence: u64,
    groups: SlotMap<GroupId, CollisionGroup>,
    culler: BroadPhaseCuller,
    resolver: Resolver,
    terrain: Option<Box<dyn Terrain>>,
    events: Vec<CollisionEvent>,
    collisions: SecondaryMap<EntityId, CollisionDataCollection>,
    previous_live: Vec<EntityId>,
    scratch: Vec<EntityId>,
    stats: TickStats,
    tick: u64,
}

impl CollisionWorld {
    /// Create a world with default settings
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Create a world from a validated configuration
    pub fn with_config(config: WorldConfig) -> Result<Self, CollisionError> {
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        Self {
            types: CollisionTypeRegistry::new(),
            bodies: SlotMap::with_key(),
            next_sequence: 0,
            groups: SlotMap::with_key(),
            culler: BroadPhaseCuller::new(config.broad_phase.clone()),
            resolver: Resolver::new(&config.collision),
            terrain: None,
            events: Vec::new(),
            collisions: SecondaryMap::new(),
            previous_live: Vec::new(),
            scratch: Vec::new(),
            stats: TickStats::default(),
            tick: 0,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Collision type and reaction names
    pub fn types(&self) -> &CollisionTypeRegistry {
        &self.types
    }

    /// Mutable registry, for interning reaction names ahead of registration
    pub fn types_mut(&mut self) -> &mut CollisionTypeRegistry {
        &mut self.types
    }

    /// Register an entity
    ///
    /// Every shape is validated here; a bad declaration is rejected before
    /// anything is stored. Entities without profiles are accepted as
    /// non-colliders.
    pub fn add_collision_entity<C: Collidable + ?Sized>(&mut self, entity: &C) -> Result<EntityId, CollisionError> {
        let types = &mut self.types;
        let sequence = self.next_sequence;
        let id = self.bodies.try_insert_with_key(|id| {
            let position = entity.position();
            if !is_finite(&position) {
                return Err(CollisionError::NonFinitePosition { entity: id, x: position.x, y: position.y });
            }
            let profiles = entity
                .collision_profiles()
                .iter()
                .map(|desc| CollisionProfile::from_desc(desc, types, position))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CollisionBody::new(position, entity.body_flags(), profiles, sequence))
        })?;

        self.next_sequence += 1;
        self.culler.invalidate();
        log::debug!(
            "Registered collision entity {:?} with {} profile(s)",
            id,
            entity.collision_profiles().len()
        );
        Ok(id)
    }

    /// Unregister an entity; unknown handles are ignored and return `false`
    pub fn remove_collision_entity(&mut self, id: EntityId) -> bool {
        let Some(body) = self.bodies.remove(id) else {
            return false;
        };
        if let Some(group) = body.group().and_then(|group| self.groups.get_mut(group)) {
            group.remove(id);
        }
        self.collisions.remove(id);
        self.culler.invalidate();
        log::debug!("Removed collision entity {:?}", id);
        true
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains_key(id)
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no entity is registered
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Registered state of an entity
    pub fn body(&self, id: EntityId) -> Option<&CollisionBody> {
        self.bodies.get(id)
    }

    /// Current position of an entity
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.bodies.get(id).map(CollisionBody::position)
    }

    fn body_mut(&mut self, id: EntityId) -> Result<&mut CollisionBody, CollisionError> {
        self.bodies.get_mut(id).ok_or(CollisionError::UnknownEntity(id))
    }

    /// Request a new position; the next tick sweeps from the previous one
    pub fn set_position(&mut self, id: EntityId, x: f32, y: f32) -> Result<(), CollisionError> {
        self.body_mut(id)?.position = Vec2::new(x, y);
        Ok(())
    }

    /// Request a move relative to the current position
    pub fn translate(&mut self, id: EntityId, dx: f32, dy: f32) -> Result<(), CollisionError> {
        self.body_mut(id)?.position += Vec2::new(dx, dy);
        Ok(())
    }

    /// Move an entity without sweeping; nothing between the old and new
    /// positions is hit
    pub fn teleport(&mut self, id: EntityId, x: f32, y: f32) -> Result<(), CollisionError> {
        let position = Vec2::new(x, y);
        if !is_finite(&position) {
            return Err(CollisionError::NonFinitePosition { entity: id, x, y });
        }
        let body = self.body_mut(id)?;
        body.position = position;
        body.snap_previous();
        Ok(())
    }

    /// Create an empty collision group
    pub fn create_group(&mut self) -> GroupId {
        self.groups.insert(CollisionGroup::new())
    }

    /// Members of a group
    pub fn group(&self, group: GroupId) -> Option<&CollisionGroup> {
        self.groups.get(group)
    }

    /// Put an entity in a group, moving it out of any previous group
    ///
    /// Returns `false` if it was already a member.
    pub fn add_to_group(&mut self, group: GroupId, entity: EntityId) -> Result<bool, CollisionError> {
        if !self.groups.contains_key(group) {
            return Err(CollisionError::UnknownGroup(group));
        }
        let body = self.bodies.get_mut(entity).ok_or(CollisionError::UnknownEntity(entity))?;
        if let Some(previous) = body.group.replace(group) {
            if previous != group {
                if let Some(old) = self.groups.get_mut(previous) {
                    old.remove(entity);
                }
            }
        }
        let members = self.groups.get_mut(group).ok_or(CollisionError::UnknownGroup(group))?;
        Ok(members.insert(entity))
    }

    /// Take an entity out of a group; returns whether it was a member
    pub fn remove_from_group(&mut self, group: GroupId, entity: EntityId) -> Result<bool, CollisionError> {
        let members = self.groups.get_mut(group).ok_or(CollisionError::UnknownGroup(group))?;
        let removed = members.remove(entity);
        if let Some(body) = self.bodies.get_mut(entity) {
            if body.group == Some(group) {
                body.group = None;
            }
        }
        Ok(removed)
    }

    /// Dissolve a group; its members stay registered
    pub fn remove_group(&mut self, group: GroupId) -> bool {
        let Some(members) = self.groups.remove(group) else {
            return false;
        };
        for &member in members.members() {
            if let Some(body) = self.bodies.get_mut(member) {
                body.group = None;
            }
        }
        true
    }

    /// Install the terrain collaborator, returning the previous one
    pub fn set_terrain(&mut self, terrain: Box<dyn Terrain>) -> Option<Box<dyn Terrain>> {
        self.terrain.replace(terrain)
    }

    /// Remove the terrain collaborator
    pub fn clear_terrain(&mut self) -> Option<Box<dyn Terrain>> {
        self.terrain.take()
    }

    /// Live entities as of the last tick, in registration order
    pub fn live_entities(&self) -> &[EntityId] {
        self.culler.all_live()
    }

    /// The broad-phase culler
    pub fn culler(&self) -> &BroadPhaseCuller {
        &self.culler
    }

    /// Counters of the last tick
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Contacts recorded for an entity during the last tick
    pub fn last_collisions(&self, id: EntityId) -> Option<&CollisionDataCollection> {
        self.collisions.get(id)
    }

    /// Events queued by the last tick
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Take the events queued by the last tick
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one collision pass for the given camera region
    pub fn tick(&mut self, camera: &CameraRegion) -> &[CollisionEvent] {
        self.tick += 1;
        self.events.clear();
        self.collisions.clear();
        self.stats = TickStats { tick: self.tick, ..TickStats::default() };

        let recomputed = self.prepare(camera);
        self.stats.broad_phase_recomputed = recomputed;
        self.stats.live = self.culler.all_live().len();

        self.stats.group_movers = self.check_group_collisions();
        self.stats.solid_movers = self.check_solid_collisions();
        self.stats.non_colliders = self.resolve_non_collisions();
        self.stats.soft_overlaps = self.check_soft_collisions();
        self.finalize(recomputed);

        self.stats.events = self.events.len();
        log::trace!(
            "Tick {}: {} live, {} grouped, {} solid, {} settled, {} soft, {} events",
            self.stats.tick,
            self.stats.live,
            self.stats.group_movers,
            self.stats.solid_movers,
            self.stats.non_colliders,
            self.stats.soft_overlaps,
            self.stats.events
        );
        &self.events
    }

    fn prepare(&mut self, camera: &CameraRegion) -> bool {
        let recomputed = self.culler.update(camera, &self.bodies);
        for &id in self.culler.all_live() {
            if let Some(body) = self.bodies.get_mut(id) {
                body.prepare_collision();
            }
        }
        recomputed
    }

    fn check_group_collisions(&mut self) -> usize {
        let mut resolved = 0;
        let groups: Vec<GroupId> = self.groups.keys().collect();

        for group in groups {
            let members = match self.groups.get(group) {
                Some(members) if members.len() >= 2 => members.members().to_vec(),
                _ => continue,
            };
            let mut movers: Vec<EntityId> = members
                .iter()
                .copied()
                .filter(|&id| self.culler.is_live(id) && self.bodies.get(id).is_some_and(CollisionBody::is_solid_mover))
                .collect();
            movers.sort_by_key(|&id| self.bodies.get(id).map_or(u64::MAX, CollisionBody::sequence));

            for id in movers {
                if self.resolve_entity(id, Scope::Group(&members)) {
                    resolved += 1;
                }
            }
        }
        resolved
    }

    fn check_solid_collisions(&mut self) -> usize {
        let mut movers = std::mem::take(&mut self.scratch);
        movers.clear();
        movers.extend_from_slice(self.culler.solid_live());

        let mut resolved = 0;
        for &id in &movers {
            let exclude = self.bodies.get(id).and_then(CollisionBody::group);
            if self.resolve_entity(id, Scope::World { exclude }) {
                resolved += 1;
            }
        }

        self.scratch = movers;
        resolved
    }

    /// Resolve one mover; on failure it is put back where it started
    fn resolve_entity(&mut self, id: EntityId, scope: Scope<'_>) -> bool {
        let Some(body) = self.bodies.get(id) else {
            return false;
        };
        let mover = Mover::from_body(id, body);
        let source = WorldCandidates {
            bodies: &self.bodies,
            culler: &self.culler,
            terrain: self.terrain.as_deref(),
            scope,
        };

        match self.resolver.resolve(&mover, &source) {
            Ok(resolution) => {
                self.apply_resolution(id, &resolution);
                true
            }
            Err(error) => {
                log::warn!("Collision resolution aborted for {:?}: {}", id, error);
                self.revert(id);
                false
            }
        }
    }

    fn revert(&mut self, id: EntityId) {
        self.stats.aborted += 1;
        if let Some(body) = self.bodies.get_mut(id) {
            body.position = body.previous;
            body.relocate();
        }
    }

    fn apply_resolution(&mut self, id: EntityId, resolution: &Resolution) {
        let Some(body) = self.bodies.get_mut(id) else {
            return;
        };
        body.position = resolution.position;
        body.relocate();

        for entry in resolution.collisions.entries() {
            self.emit_solid(id, entry);
        }

        if resolution.collisions.is_empty() {
            return;
        }
        match self.collisions.get_mut(id) {
            Some(existing) => {
                for entry in resolution.collisions.entries() {
                    existing.try_record(*entry);
                }
            }
            None => {
                self.collisions.insert(id, resolution.collisions);
            }
        }
    }

    /// Queue the mover's reactions and the mirrored ones of the other side
    fn emit_solid(&mut self, mover: EntityId, entry: &CollisionDataEntry) {
        let Some(body) = self.bodies.get(mover) else {
            return;
        };
        let message = CollisionMessage {
            other: entry.that_entity,
            this_type: entry.this_type,
            that_type: entry.that_type,
            hit_type: HitType::Solid,
            axis: Some(entry.axis),
            direction: entry.direction,
            contact_vector: entry.contact_vector,
            this_shape: entry.this_shape,
            that_shape: entry.that_shape,
        };

        if let Some(reactions) = body
            .profiles()
            .get(entry.this_profile)
            .and_then(|profile| profile.solid_reactions(entry.that_type))
        {
            self.events.extend(reactions.iter().map(|&reaction| CollisionEvent { target: mover, reaction, message }));
        }

        // Terrain has no listeners
        let Some(other) = entry.that_entity else {
            return;
        };
        let Some(reactions) = self
            .bodies
            .get(other)
            .and_then(|body| body.profiles().get(entry.that_profile))
            .and_then(|profile| profile.solid_reactions(entry.this_type))
        else {
            return;
        };
        let mirrored = message.mirrored(Some(mover));
        self.events.extend(reactions.iter().map(|&reaction| CollisionEvent { target: other, reaction, message: mirrored }));
    }

    fn resolve_non_collisions(&mut self) -> usize {
        let mut settled = 0;
        for &id in self.culler.all_live() {
            let Some(body) = self.bodies.get_mut(id) else {
                continue;
            };
            if body.is_solid_mover() {
                continue;
            }
            if !is_finite(&body.position) {
                log::warn!(
                    "Entity {:?} has a non-finite position ({}, {}); keeping its previous one",
                    id,
                    body.position.x,
                    body.position.y
                );
                self.stats.aborted += 1;
                body.position = body.previous;
            }
            body.relocate();
            settled += 1;
        }
        settled
    }

    fn check_soft_collisions(&mut self) -> usize {
        let mut overlaps = 0;
        for &id in self.culler.soft_live() {
            let Some(body) = self.bodies.get(id) else {
                continue;
            };
            for profile in body.profiles() {
                for (target_type, reaction) in profile.soft_targets() {
                    for &(other, index) in self.culler.live_of_type(target_type) {
                        if other == id {
                            continue;
                        }
                        let Some(other_profile) = self.bodies.get(other).and_then(|body| body.profiles().get(index)) else {
                            continue;
                        };
                        if !profile.aabb().overlaps(other_profile.aabb()) {
                            continue;
                        }
                        let hit = profile.shapes().iter().find_map(|this_shape| {
                            other_profile
                                .shapes()
                                .iter()
                                .find(|that_shape| shapes_collide(this_shape, that_shape))
                                .map(|that_shape| (*this_shape, *that_shape))
                        });
                        let Some((this_shape, that_shape)) = hit else {
                            continue;
                        };

                        overlaps += 1;
                        let message = CollisionMessage {
                            other: Some(other),
                            this_type: profile.collision_type(),
                            that_type: target_type,
                            hit_type: HitType::Soft,
                            axis: None,
                            direction: 0.0,
                            contact_vector: Vec2::zeros(),
                            this_shape,
                            that_shape,
                        };
                        self.events.extend(reaction.reactions.iter().map(|&reaction| CollisionEvent { target: id, reaction, message }));
                        let mirrored = message.mirrored(Some(id));
                        self.events.extend(reaction.mirrored.iter().map(|&reaction| CollisionEvent { target: other, reaction, message: mirrored }));
                    }
                }
            }
        }
        overlaps
    }

    /// Resolved positions become the previous positions of the next tick
    fn finalize(&mut self, recomputed: bool) {
        if recomputed {
            for &id in &self.previous_live {
                if let Some(body) = self.bodies.get_mut(id) {
                    body.was_live = false;
                }
            }
            self.previous_live.clear();
            self.previous_live.extend_from_slice(self.culler.all_live());
        }
        for &id in self.culler.all_live() {
            if let Some(body) = self.bodies.get_mut(id) {
                body.previous = body.position;
                body.was_live = true;
            }
        }
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityDesc;
    use crate::physics::collision::ShapeDesc;
    use crate::physics::collision_profile::ProfileDesc;

    fn camera() -> CameraRegion {
        CameraRegion::new(-100.0, -100.0, 400.0, 400.0)
    }

    fn crate_desc(x: f32, y: f32) -> EntityDesc {
        EntityDesc::new(x, y).with_profile(
            ProfileDesc::new("crate")
                .with_shape(ShapeDesc::rectangle_top_left(10.0, 10.0))
                .with_solid("crate", ["bump"]),
        )
    }

    #[test]
    fn test_registration_and_removal() {
        let mut world = CollisionWorld::new();
        let id = world.add_collision_entity(&crate_desc(0.0, 0.0)).unwrap();
        assert!(world.contains(id));
        assert_eq!(world.len(), 1);
        assert_eq!(world.position(id), Some(Vec2::new(0.0, 0.0)));

        assert!(world.remove_collision_entity(id));
        assert!(!world.remove_collision_entity(id));
        assert!(world.is_empty());
        assert!(matches!(world.set_position(id, 1.0, 1.0), Err(CollisionError::UnknownEntity(_))));
    }

    #[test]
    fn test_invalid_entities_are_rejected() {
        let mut world = CollisionWorld::new();
        let bad_shape = EntityDesc::new(0.0, 0.0).with_profile(ProfileDesc::new("crate").with_shape(ShapeDesc::circle(-1.0)));
        assert!(matches!(world.add_collision_entity(&bad_shape), Err(CollisionError::InvalidShape { .. })));

        let bad_position = crate_desc(f32::NAN, 0.0);
        assert!(matches!(world.add_collision_entity(&bad_position), Err(CollisionError::NonFinitePosition { .. })));
        assert!(world.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = WorldConfig::default();
        config.broad_phase.cache_margin = -1.0;
        assert!(matches!(CollisionWorld::with_config(config), Err(CollisionError::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_entity_without_profiles_is_settled() {
        let mut world = CollisionWorld::new();
        let marker = world.add_collision_entity(&EntityDesc::new(5.0, 5.0)).unwrap();
        world.tick(&camera());
        world.set_position(marker, 40.0, 5.0).unwrap();
        world.tick(&camera());

        assert_eq!(world.position(marker), Some(Vec2::new(40.0, 5.0)));
        assert_eq!(world.stats().non_colliders, 1);
        assert!(world.events().is_empty());
    }

    #[test]
    fn test_teleport_skips_the_sweep() {
        let mut world = CollisionWorld::new();
        let mover = world.add_collision_entity(&crate_desc(0.0, 0.0)).unwrap();
        world.add_collision_entity(&crate_desc(20.0, 0.0).immobile()).unwrap();
        world.tick(&camera());

        world.teleport(mover, 50.0, 0.0).unwrap();
        world.tick(&camera());
        assert_eq!(world.position(mover), Some(Vec2::new(50.0, 0.0)));
        assert!(world.events().is_empty());
    }

    #[test]
    fn test_non_finite_move_reverts_only_that_entity() {
        let mut world = CollisionWorld::new();
        let broken = world.add_collision_entity(&crate_desc(0.0, 0.0)).unwrap();
        let healthy = world.add_collision_entity(&crate_desc(100.0, 0.0)).unwrap();
        world.tick(&camera());

        world.set_position(broken, f32::NAN, 0.0).unwrap();
        world.translate(healthy, 5.0, 0.0).unwrap();
        world.tick(&camera());

        assert_eq!(world.position(broken), Some(Vec2::new(0.0, 0.0)));
        assert_eq!(world.position(healthy), Some(Vec2::new(105.0, 0.0)));
        assert_eq!(world.stats().aborted, 1);
    }

    #[test]
    fn test_group_membership_moves_between_groups() {
        let mut world = CollisionWorld::new();
        let a = world.add_collision_entity(&crate_desc(0.0, 0.0)).unwrap();
        let first = world.create_group();
        let second = world.create_group();

        assert!(world.add_to_group(first, a).unwrap());
        assert!(!world.add_to_group(first, a).unwrap());
        assert!(world.add_to_group(second, a).unwrap());
        assert!(world.group(first).unwrap().is_empty());
        assert_eq!(world.body(a).unwrap().group(), Some(second));

        assert!(world.remove_group(second));
        assert_eq!(world.body(a).unwrap().group(), None);
        assert!(matches!(world.add_to_group(second, a), Err(CollisionError::UnknownGroup(_))));
    }

    #[test]
    fn test_removed_entity_leaves_its_group() {
        let mut world = CollisionWorld::new();
        let a = world.add_collision_entity(&crate_desc(0.0, 0.0)).unwrap();
        let group = world.create_group();
        world.add_to_group(group, a).unwrap();
        world.remove_collision_entity(a);
        assert!(world.group(group).unwrap().is_empty());
    }
}
