//! End-to-end behaviour of the collision world

use approx::{assert_abs_diff_eq, assert_relative_eq};

use crate::core::config::{BroadPhaseConfig, WorldConfig};
use crate::ecs::{EntityDesc, EntityId};
use crate::events::{CollisionEvent, HitType};
use crate::foundation::math::{Axis, Vec2};
use crate::physics::collision::ShapeDesc;
use crate::physics::{CollisionWorld, ProfileDesc};
use crate::spatial::{CameraRegion, Tile, TileGrid};

struct Scene {
    world: CollisionWorld,
    camera: CameraRegion,
}

impl Scene {
    fn new() -> Self {
        Self {
            world: CollisionWorld::new(),
            camera: CameraRegion::new(-500.0, -500.0, 1000.0, 1000.0),
        }
    }

    fn add(&mut self, desc: &EntityDesc) -> EntityId {
        self.world.add_collision_entity(desc).unwrap()
    }

    fn tick(&mut self) -> Vec<CollisionEvent> {
        self.world.tick(&self.camera);
        self.world.drain_events()
    }

    /// Place `id` without sweeping and let one tick settle it
    fn place(&mut self, id: EntityId, x: f32, y: f32) {
        self.world.teleport(id, x, y).unwrap();
        self.tick();
    }

    fn step(&mut self, id: EntityId, dx: f32, dy: f32) -> Vec<CollisionEvent> {
        self.world.translate(id, dx, dy).unwrap();
        self.tick()
    }

    fn position(&self, id: EntityId) -> Vec2 {
        self.world.position(id).unwrap()
    }

    fn events_named<'a>(&self, events: &'a [CollisionEvent], name: &str) -> Vec<&'a CollisionEvent> {
        let Some(reaction) = self.world.types().lookup_reaction(name) else {
            return Vec::new();
        };
        events.iter().filter(|event| event.reaction == reaction).collect()
    }
}

fn block(collision_type: &str, x: f32, y: f32, width: f32, height: f32) -> EntityDesc {
    EntityDesc::new(x, y)
        .immobile()
        .with_profile(ProfileDesc::new(collision_type).with_shape(ShapeDesc::rectangle_top_left(width, height)))
}

fn mover(x: f32, y: f32, width: f32, height: f32) -> EntityDesc {
    EntityDesc::new(x, y).with_profile(
        ProfileDesc::new("mover")
            .with_shape(ShapeDesc::rectangle_top_left(width, height))
            .with_solid("wall", ["hit-wall"])
            .with_solid("platform", ["land"]),
    )
}

#[test]
fn test_short_move_into_gap_is_not_blocked() {
    let mut scene = Scene::new();
    let a = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    scene.add(&block("wall", 12.0, 0.0, 10.0, 10.0));
    scene.tick();

    // Closes the gap of 2 exactly: touching is not a collision
    let events = scene.step(a, 2.0, 0.0);
    assert_eq!(scene.position(a), Vec2::new(2.0, 0.0));
    assert!(events.is_empty());
    assert!(scene.world.last_collisions(a).is_none());
}

#[test]
fn test_long_move_stops_at_contact() {
    let mut scene = Scene::new();
    let a = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    let wall = scene.add(&block("wall", 12.0, 0.0, 10.0, 10.0));
    scene.tick();

    let events = scene.step(a, 8.0, 0.0);
    assert_relative_eq!(scene.position(a).x, 2.0);

    let hits = scene.events_named(&events, "hit-wall");
    assert_eq!(hits.len(), 1);
    let message = hits[0].message;
    assert_eq!(hits[0].target, a);
    assert_eq!(message.other, Some(wall));
    assert_eq!(message.hit_type, HitType::Solid);
    assert_eq!(message.axis, Some(Axis::X));
    assert_eq!(message.direction, 1.0);

    let entry = scene.world.last_collisions(a).unwrap().x().unwrap();
    assert_relative_eq!(entry.position, 2.0);
    assert_relative_eq!(entry.delta_movement, 2.0);
}

#[test]
fn test_circle_meets_rectangle_face_and_corner() {
    let mut scene = Scene::new();
    let ball = scene.add(&EntityDesc::new(0.0, 0.0).with_profile(
        ProfileDesc::new("mover").with_shape(ShapeDesc::circle(5.0)).with_solid("wall", ["hit-wall"]),
    ));
    scene.add(
        &EntityDesc::new(18.0, 0.0)
            .immobile()
            .with_profile(ProfileDesc::new("wall").with_shape(ShapeDesc::rectangle(10.0, 10.0))),
    );
    scene.tick();

    // Face contact: center level with the rectangle
    scene.step(ball, 10.0, 0.0);
    assert_relative_eq!(scene.position(ball).x, 8.0, epsilon = 1e-4);

    // Corner contact: only the rounded edge reaches the rectangle
    scene.place(ball, 0.0, 8.0);
    scene.step(ball, 10.0, 0.0);
    assert_relative_eq!(scene.position(ball).x, 9.0, epsilon = 1e-4);
    assert_eq!(scene.position(ball).y, 8.0);
}

#[test]
fn test_bullet_stops_at_thin_wall() {
    let mut scene = Scene::new();
    let bullet = scene.add(&mover(0.0, 0.0, 4.0, 4.0).bullet());
    let plain = scene.add(&mover(0.0, 100.0, 4.0, 4.0));
    scene.add(&block("wall", 14.0, -10.0, 2.0, 200.0));
    scene.tick();

    let events = scene.step(bullet, 50.0, 0.0);
    assert_relative_eq!(scene.position(bullet).x, 10.0, epsilon = 1e-4);
    assert_eq!(scene.events_named(&events, "hit-wall").len(), 1);

    // Without sub-steps the same move jumps clean over the wall
    scene.step(plain, 50.0, 0.0);
    assert_eq!(scene.position(plain).x, 50.0);
}

#[test]
fn test_group_members_resolve_against_each_other_first() {
    let mut scene = Scene::new();
    let ball = |x: f32| {
        EntityDesc::new(x, 0.0).with_profile(
            ProfileDesc::new("ball")
                .with_shape(ShapeDesc::rectangle_top_left(10.0, 10.0))
                .with_solid("ball", ["clack"]),
        )
    };
    let a = scene.add(&ball(0.0));
    let b = scene.add(&ball(30.0));
    let group = scene.world.create_group();
    scene.world.add_to_group(group, a).unwrap();
    scene.world.add_to_group(group, b).unwrap();
    scene.tick();

    scene.world.translate(a, 12.0, 0.0).unwrap();
    scene.world.translate(b, -12.0, 0.0).unwrap();
    let events = scene.tick();

    assert_relative_eq!(scene.position(a).x, 8.0);
    assert_relative_eq!(scene.position(b).x, 18.0);

    let stats = scene.world.stats();
    assert_eq!(stats.group_movers, 2);
    assert_eq!(stats.solid_movers, 2);

    let clacks = scene.events_named(&events, "clack");
    assert_eq!(clacks.len(), 2);
    assert_eq!(clacks[0].target, a);
    assert_eq!(clacks[0].message.direction, 1.0);
    assert_eq!(clacks[1].target, b);
    assert_eq!(clacks[1].message.direction, -1.0);
}

#[test]
fn test_no_tunnel_for_moves_within_shape_size() {
    let mut scene = Scene::new();
    let a = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    let wall = scene.add(&block("wall", 20.0, 0.0, 10.0, 10.0));
    scene.tick();
    let wall_bounds = scene.world.body(wall).unwrap().aabb();

    for dx in [1.0, 3.0, 5.0, 7.0, 9.5, 10.0] {
        for dy in [-4.0, 0.0, 4.0] {
            scene.place(a, 8.0, 0.0);
            scene.step(a, dx, dy);
            let bounds = scene.world.body(a).unwrap().aabb();
            assert!(
                !bounds.overlaps(&wall_bounds),
                "moving by ({dx}, {dy}) ended inside the wall at {:?}",
                scene.position(a)
            );
        }
    }
}

#[test]
fn test_soft_overlap_never_moves_anyone() {
    let mut scene = Scene::new();
    let coin = scene.add(
        &EntityDesc::new(20.0, 0.0).with_profile(
            ProfileDesc::new("coin")
                .with_shape(ShapeDesc::circle(4.0))
                .with_soft("player", ["collected"])
                .with_mirrored_soft("player", ["picked-up"]),
        ),
    );
    let player = scene.add(
        &EntityDesc::new(0.0, 0.0).with_profile(ProfileDesc::new("player").with_shape(ShapeDesc::rectangle(10.0, 10.0))),
    );
    scene.tick();

    let events = scene.step(player, 20.0, 0.0);
    assert_eq!(scene.position(player), Vec2::new(20.0, 0.0));
    assert_eq!(scene.position(coin), Vec2::new(20.0, 0.0));
    assert_eq!(scene.world.stats().soft_overlaps, 1);

    let collected = scene.events_named(&events, "collected");
    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0].target, coin);
    assert_eq!(collected[0].message.hit_type, HitType::Soft);
    assert_eq!(collected[0].message.other, Some(player));

    let picked = scene.events_named(&events, "picked-up");
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].target, player);
    assert_eq!(picked[0].message.other, Some(coin));
}

#[test]
fn test_touching_coins_do_not_overlap_at_any_angle() {
    let mut scene = Scene::new();
    scene.add(
        &EntityDesc::new(0.0, 0.0)
            .with_profile(ProfileDesc::new("coin").with_shape(ShapeDesc::circle(5.0)).with_soft("coin", ["clink"])),
    );
    let other = scene.add(&EntityDesc::new(10.0, 0.0).with_profile(ProfileDesc::new("coin").with_shape(ShapeDesc::circle(5.0))));
    let events = scene.tick();
    assert!(scene.events_named(&events, "clink").is_empty());

    scene.world.teleport(other, 6.0, 8.0).unwrap();
    let events = scene.tick();
    assert!(scene.events_named(&events, "clink").is_empty());
    assert_eq!(scene.world.stats().soft_overlaps, 0);

    scene.world.teleport(other, 6.0, 7.5).unwrap();
    let events = scene.tick();
    assert_eq!(scene.events_named(&events, "clink").len(), 1);
}

#[test]
fn test_solid_notifications_are_mirrored() {
    let mut scene = Scene::new();
    let player = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    let wall = scene.add(
        &EntityDesc::new(0.0, 20.0).immobile().with_profile(
            ProfileDesc::new("wall")
                .with_shape(ShapeDesc::rectangle_top_left(50.0, 10.0))
                .with_solid("mover", ["hit-by-mover"]),
        ),
    );
    scene.tick();

    let events = scene.step(player, 0.0, 16.0);
    assert_relative_eq!(scene.position(player).y, 10.0);

    let on_player = scene.events_named(&events, "hit-wall");
    let on_wall = scene.events_named(&events, "hit-by-mover");
    assert_eq!(on_player.len(), 1);
    assert_eq!(on_wall.len(), 1);
    assert_eq!(on_wall[0].target, wall);
    assert_eq!(on_wall[0].message.other, Some(player));
    assert_eq!(on_wall[0].message.direction, -on_player[0].message.direction);
    assert_eq!(on_wall[0].message.contact_vector, -on_player[0].message.contact_vector);
    assert_abs_diff_eq!(on_player[0].message.contact_vector.y, 6.0);
}

#[test]
fn test_blocked_axis_slides_along_the_other() {
    let mut scene = Scene::new();
    let a = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    scene.add(&block("wall", 12.0, -50.0, 10.0, 100.0));
    scene.tick();
    scene.step(a, 5.0, 5.0);
    assert_relative_eq!(scene.position(a).x, 2.0);
    assert_relative_eq!(scene.position(a).y, 5.0);

    let mut scene = Scene::new();
    let a = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    scene.add(&block("wall", -50.0, 12.0, 100.0, 10.0));
    scene.tick();
    scene.step(a, 5.0, 5.0);
    assert_relative_eq!(scene.position(a).x, 5.0);
    assert_relative_eq!(scene.position(a).y, 2.0);
}

#[test]
fn test_jump_through_blocks_only_from_above() {
    let mut scene = Scene::new();
    let a = scene.add(&mover(0.0, 30.0, 10.0, 10.0));
    scene.add(&block("platform", -20.0, 20.0, 60.0, 4.0).jump_through());
    scene.tick();

    let events = scene.step(a, 0.0, -15.0);
    assert_eq!(scene.position(a).y, 15.0);
    assert!(events.is_empty());

    scene.place(a, 0.0, 5.0);
    let events = scene.step(a, 0.0, 10.0);
    assert_relative_eq!(scene.position(a).y, 10.0);
    assert_eq!(scene.events_named(&events, "land").len(), 1);

    // Sideways motion through a platform is never blocked
    scene.place(a, -40.0, 16.0);
    scene.step(a, 30.0, 0.0);
    assert_eq!(scene.position(a).x, -10.0);
}

#[test]
fn test_equal_contacts_go_to_earliest_registration() {
    let mut scene = Scene::new();
    let a = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    let first = scene.add(&block("wall", 12.0, 5.0, 10.0, 10.0));
    scene.add(&block("wall", 12.0, -5.0, 10.0, 10.0));
    scene.tick();

    let events = scene.step(a, 8.0, 0.0);
    let hits = scene.events_named(&events, "hit-wall");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].message.other, Some(first));
}

#[test]
fn test_terrain_tiles_block_movers() {
    let mut scene = Scene::new();
    let tiles = scene.world.types_mut().intern_type("wall");
    let mut grid = TileGrid::new(tiles, 10, 10, 16.0, 16.0);
    grid.fill_border(Tile::Solid);
    grid.set_tile(5, 8, Tile::JumpThrough);
    scene.world.set_terrain(Box::new(grid));

    let a = scene.add(&mover(20.0, 20.0, 8.0, 8.0));
    scene.tick();

    let events = scene.step(a, -10.0, 0.0);
    assert_relative_eq!(scene.position(a).x, 16.0);
    let hits = scene.events_named(&events, "hit-wall");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].message.other, None);

    // Lands on the one-way tile at row 8 (top edge y = 128)
    scene.place(a, 82.0, 110.0);
    scene.step(a, 0.0, 15.0);
    assert_relative_eq!(scene.position(a).y, 120.0);
}

#[test]
fn test_body_resting_on_one_way_tile_stays_put() {
    // Landing leaves the bottom edge within rounding of the tile top (y = 80)
    for i in 1..200u16 {
        let height = f32::from(i) * 0.137;
        let mut scene = Scene::new();
        let tiles = scene.world.types_mut().intern_type("wall");
        let mut grid = TileGrid::new(tiles, 10, 10, 16.0, 16.0);
        grid.set_tile(3, 5, Tile::JumpThrough);
        scene.world.set_terrain(Box::new(grid));

        let a = scene.add(&mover(52.0, 77.0 - height, 8.0, height));
        scene.tick();

        scene.step(a, 0.0, 5.0);
        assert_abs_diff_eq!(scene.position(a).y + height, 80.0, epsilon = 1e-3);
        scene.step(a, 0.0, 5.0);
        assert_abs_diff_eq!(scene.position(a).y + height, 80.0, epsilon = 1e-3);
    }
}

#[test]
fn test_culled_entities_are_left_alone() {
    let mut scene = Scene::new();
    let far = scene.add(&mover(5000.0, 0.0, 10.0, 10.0));
    scene.add(&block("wall", 5012.0, 0.0, 10.0, 10.0));
    let pinned = scene.add(&mover(9000.0, 0.0, 10.0, 10.0).always_on());
    scene.add(&block("wall", 9012.0, 0.0, 10.0, 10.0).always_on());
    scene.tick();

    assert!(!scene.world.live_entities().contains(&far));
    assert!(scene.world.live_entities().contains(&pinned));

    scene.world.translate(far, 8.0, 0.0).unwrap();
    scene.world.translate(pinned, 8.0, 0.0).unwrap();
    scene.tick();
    assert_eq!(scene.position(far).x, 5008.0);
    assert_relative_eq!(scene.position(pinned).x, 9002.0);
}

#[test]
fn test_entity_returning_from_culling_does_not_sweep() {
    let mut config = WorldConfig::default();
    config.broad_phase = BroadPhaseConfig::new().with_cache_margin(0.0).with_max_cache_age(0);
    let mut scene = Scene::new();
    scene.world = CollisionWorld::with_config(config).unwrap();
    scene.camera = CameraRegion::new(-100.0, -100.0, 200.0, 200.0);

    let a = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    scene.add(&block("wall", 12.0, 0.0, 10.0, 10.0));
    scene.tick();

    scene.camera.move_to(5000.0, 0.0);
    scene.tick();
    assert!(scene.world.live_entities().is_empty());

    scene.world.set_position(a, 15.0, 0.0).unwrap();
    scene.camera.move_to(-100.0, -100.0);
    let events = scene.tick();

    assert_eq!(scene.position(a), Vec2::new(15.0, 0.0));
    assert!(events.is_empty());
}

#[test]
fn test_removed_entities_stop_blocking() {
    let mut scene = Scene::new();
    let a = scene.add(&mover(0.0, 0.0, 10.0, 10.0));
    let wall = scene.add(&block("wall", 12.0, 0.0, 10.0, 10.0));
    scene.tick();

    assert!(scene.world.remove_collision_entity(wall));
    scene.step(a, 8.0, 0.0);
    assert_eq!(scene.position(a).x, 8.0);
    assert!(scene.world.stats().broad_phase_recomputed);
}
