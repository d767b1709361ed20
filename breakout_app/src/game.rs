//! Breakout simulation on top of the collision world
//!
//! The field is a tile grid with an open bottom row. Balls are bullets in one
//! collision group so they bounce off each other before the paddle, bricks and
//! walls get a say. Reactions come back through a [`ReactionRouter`] whose
//! handlers share the game state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use collision_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{Ball, Brick};
use crate::config::{GameConfig, GameplayConfig};

const TILE: f32 = 16.0;
const COLUMNS: usize = 20;
const ROWS: usize = 15;
const FIELD_WIDTH: f32 = TILE * COLUMNS as f32;
const FIELD_HEIGHT: f32 = TILE * ROWS as f32;

const PADDLE_WIDTH: f32 = 32.0;
const PADDLE_HEIGHT: f32 = 6.0;
const PADDLE_Y: f32 = 208.0;

const BRICK_WIDTH: f32 = 22.0;
const BRICK_HEIGHT: f32 = 8.0;
const BRICK_GAP: f32 = 2.0;
const BRICK_TOP: f32 = 32.0;

/// State the reaction handlers write to
#[derive(Debug, Default)]
struct Shared {
    balls: HashMap<EntityId, Ball>,
    broken: Vec<EntityId>,
    bounces: u64,
}

/// Outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Ticks simulated
    pub ticks: u32,
    /// Points scored
    pub score: u32,
    /// Bricks still standing
    pub bricks_left: usize,
    /// Balls still in play
    pub balls_left: usize,
    /// Bounces handled
    pub bounces: u64,
}

/// A running breakout game
pub struct Breakout {
    world: CollisionWorld,
    router: ReactionRouter,
    camera: CameraRegion,
    gameplay: GameplayConfig,
    debug: bool,
    shared: Rc<RefCell<Shared>>,
    paddle: EntityId,
    bricks: HashMap<EntityId, Brick>,
    score: u32,
}

impl Breakout {
    /// Build the field, paddle, bricks and balls
    pub fn new(config: &GameConfig) -> Result<Self, CollisionError> {
        let mut world = CollisionWorld::with_config(config.world.clone())?;
        let field = Self::field(&mut world);
        world.set_terrain(Box::new(field));

        let paddle = world.add_collision_entity(
            &EntityDesc::new((FIELD_WIDTH - PADDLE_WIDTH) * 0.5, PADDLE_Y).with_profile(
                ProfileDesc::new("paddle")
                    .with_shape(ShapeDesc::rectangle_top_left(PADDLE_WIDTH, PADDLE_HEIGHT))
                    .with_solid("wall", ["stop"]),
            ),
        )?;

        let bricks = Self::spawn_bricks(&mut world, &config.gameplay)?;
        let balls = Self::spawn_balls(&mut world, &config.gameplay)?;
        log::info!("Spawned {} bricks and {} balls", bricks.len(), balls.len());

        let shared = Rc::new(RefCell::new(Shared { balls, ..Shared::default() }));
        let router = Self::router(&mut world, &shared);

        Ok(Self {
            world,
            router,
            camera: CameraRegion::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT).with_uniform_buffer(TILE),
            gameplay: config.gameplay.clone(),
            debug: config.world.engine.debug_mode,
            shared,
            paddle,
            bricks,
            score: 0,
        })
    }

    /// Walls on three sides, open at the bottom
    fn field(world: &mut CollisionWorld) -> TileGrid {
        let walls = world.types_mut().intern_type("wall");
        let mut grid = TileGrid::new(walls, COLUMNS, ROWS, TILE, TILE);
        grid.fill_border(Tile::Solid);
        for column in 1..COLUMNS - 1 {
            grid.set_tile(column, ROWS - 1, Tile::Empty);
        }
        grid
    }

    #[allow(clippy::cast_precision_loss)]
    fn spawn_bricks(world: &mut CollisionWorld, gameplay: &GameplayConfig) -> Result<HashMap<EntityId, Brick>, CollisionError> {
        let pitch = BRICK_WIDTH + BRICK_GAP;
        let left = (FIELD_WIDTH - pitch * gameplay.brick_columns as f32) * 0.5 + BRICK_GAP * 0.5;

        let mut bricks = HashMap::new();
        for row in 0..gameplay.brick_rows {
            for column in 0..gameplay.brick_columns {
                let x = left + column as f32 * pitch;
                let y = BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP);
                let id = world.add_collision_entity(
                    &EntityDesc::new(x, y).immobile().with_profile(
                        ProfileDesc::new("brick")
                            .with_shape(ShapeDesc::rectangle_top_left(BRICK_WIDTH, BRICK_HEIGHT))
                            .with_solid("ball", ["break"]),
                    ),
                )?;
                // Top rows are worth more
                let points = (gameplay.brick_rows - row) * 10;
                bricks.insert(id, Brick { id, points });
            }
        }
        Ok(bricks)
    }

    #[allow(clippy::cast_precision_loss)]
    fn spawn_balls(world: &mut CollisionWorld, gameplay: &GameplayConfig) -> Result<HashMap<EntityId, Ball>, CollisionError> {
        let mut rng = StdRng::seed_from_u64(gameplay.seed);
        let group = world.create_group();
        let spread = (gameplay.ball_count as f32 - 1.0) * 0.5;

        let mut balls = HashMap::new();
        for index in 0..gameplay.ball_count {
            let x = FIELD_WIDTH * 0.5 + (index as f32 - spread) * gameplay.ball_radius * 4.0;
            let y = PADDLE_Y - gameplay.ball_radius * 4.0;
            let id = world.add_collision_entity(
                &EntityDesc::new(x, y).bullet().with_profile(
                    ProfileDesc::new("ball")
                        .with_shape(ShapeDesc::circle(gameplay.ball_radius))
                        .with_solid("wall", ["bounce"])
                        .with_solid("paddle", ["bounce"])
                        .with_solid("brick", ["bounce"])
                        .with_solid("ball", ["bounce"]),
                ),
            )?;
            world.add_to_group(group, id)?;

            let angle: f32 = rng.gen_range(-1.0..1.0);
            let velocity = Vec2::new(angle.sin(), -angle.cos()) * gameplay.ball_speed;
            balls.insert(id, Ball { id, velocity });
        }
        Ok(balls)
    }

    fn router(world: &mut CollisionWorld, shared: &Rc<RefCell<Shared>>) -> ReactionRouter {
        let bounce = world.types_mut().intern_reaction("bounce");
        let brick_hit = world.types_mut().intern_reaction("break");
        let mut router = ReactionRouter::new();

        let state = Rc::clone(shared);
        router.register_handler(bounce, Box::new(move |event: &CollisionEvent| {
            let Some(axis) = event.message.axis else {
                return false;
            };
            let mut state = state.borrow_mut();
            let Some(ball) = state.balls.get_mut(&event.target) else {
                return false;
            };
            ball.bounce(axis, event.message.direction);
            state.bounces += 1;
            true
        }));

        let state = Rc::clone(shared);
        router.register_handler(brick_hit, Box::new(move |event: &CollisionEvent| {
            state.borrow_mut().broken.push(event.target);
            true
        }));

        router
    }

    /// Advance one tick; returns `false` once the game is over
    pub fn step(&mut self) -> bool {
        self.move_paddle();
        self.move_balls();

        self.world.tick(&self.camera);
        self.router.send_all(self.world.drain_events());
        let handled = self.router.dispatch();
        if self.debug {
            log::debug!("{:?}, {} events handled", self.world.stats(), handled);
        }

        self.clear_broken();
        self.drop_lost_balls();
        !(self.bricks.is_empty() || self.shared.borrow().balls.is_empty())
    }

    /// Run until the tick budget is spent or the game ends
    pub fn run(&mut self) -> Summary {
        let mut ticks = 0;
        while ticks < self.gameplay.ticks {
            ticks += 1;
            if !self.step() {
                break;
            }
            if ticks % 600 == 0 {
                log::info!("Tick {}: score {}, {} bricks left", ticks, self.score, self.bricks.len());
            }
        }

        let shared = self.shared.borrow();
        Summary {
            ticks,
            score: self.score,
            bricks_left: self.bricks.len(),
            balls_left: shared.balls.len(),
            bounces: shared.bounces,
        }
    }

    /// Follow the lowest ball
    fn move_paddle(&mut self) {
        let target = {
            let shared = self.shared.borrow();
            shared
                .balls
                .values()
                .filter_map(|ball| self.world.position(ball.id))
                .max_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
        };
        let (Some(target), Some(paddle)) = (target, self.world.position(self.paddle)) else {
            return;
        };
        let center = paddle.x + PADDLE_WIDTH * 0.5;
        let speed = self.gameplay.paddle_speed;
        let dx = (target.x - center).clamp(-speed, speed);
        if let Err(error) = self.world.translate(self.paddle, dx, 0.0) {
            log::warn!("Paddle could not move: {}", error);
        }
    }

    fn move_balls(&mut self) {
        let shared = self.shared.borrow();
        for ball in shared.balls.values() {
            if let Err(error) = self.world.translate(ball.id, ball.velocity.x, ball.velocity.y) {
                log::warn!("Ball could not move: {}", error);
            }
        }
    }

    fn clear_broken(&mut self) {
        let broken = std::mem::take(&mut self.shared.borrow_mut().broken);
        for id in broken {
            let Some(brick) = self.bricks.remove(&id) else {
                continue;
            };
            self.world.remove_collision_entity(brick.id);
            self.score += brick.points;
            log::debug!("Brick {:?} destroyed, score {}", brick.id, self.score);
        }
    }

    fn drop_lost_balls(&mut self) {
        let mut shared = self.shared.borrow_mut();
        let lost: Vec<EntityId> = shared
            .balls
            .keys()
            .copied()
            .filter(|&id| self.world.position(id).map_or(true, |position| position.y > FIELD_HEIGHT + TILE))
            .collect();
        for id in lost {
            shared.balls.remove(&id);
            self.world.remove_collision_entity(id);
            log::info!("Ball {:?} lost, {} left", id, shared.balls.len());
        }
    }
}
