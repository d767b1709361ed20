//! # Collision Engine
//!
//! A 2D collision detection and resolution engine for fixed-tick games.
//!
//! ## Features
//!
//! - **Shapes**: Unrotated rectangles and circles with exact narrow-phase tests
//! - **Sweep Resolution**: Axis-separated minimum-movement correction with sliding
//! - **Bullets**: Sub-stepped motion for fast movers
//! - **One-Way Platforms**: Jump-through entities and terrain tiles
//! - **Broad-Phase Culling**: Only entities near the camera take part in a tick
//! - **Reactions**: Named notifications queued per tick and routed after the pass
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collision_engine::prelude::*;
//!
//! fn main() -> Result<(), CollisionError> {
//!     let mut world = CollisionWorld::new();
//!
//!     let wall = EntityDesc::new(100.0, 0.0)
//!         .immobile()
//!         .with_profile(ProfileDesc::new("wall").with_shape(ShapeDesc::rectangle_top_left(10.0, 100.0)));
//!     let ball = EntityDesc::new(0.0, 0.0).with_profile(
//!         ProfileDesc::new("ball")
//!             .with_shape(ShapeDesc::circle(4.0))
//!             .with_solid("wall", ["bounce"]),
//!     );
//!
//!     world.add_collision_entity(&wall)?;
//!     let ball = world.add_collision_entity(&ball)?;
//!
//!     let camera = CameraRegion::new(0.0, 0.0, 320.0, 240.0);
//!     world.tick(&camera);
//!
//!     world.translate(ball, 100.0, 0.0)?;
//!     world.tick(&camera);
//!     for event in world.events() {
//!         println!("{} on {:?}", world.types().reaction_name(event.reaction), event.target);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod events;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::math::{Axis, Vec2},
        ecs::{BodyFlags, Collidable, CollisionBody, EntityDesc, EntityId},
        events::{CollisionEvent, CollisionMessage, EventHandler, HitType, ReactionRouter},
        physics::{
            CollisionDataCollection, CollisionDataEntry, CollisionError, CollisionType, CollisionWorld, GroupId,
            ProfileDesc, ReactionId, ShapeDesc, TickStats,
        },
        spatial::{BufferMargins, CameraRegion, Terrain, Tile, TileGrid},
        core::config::{BroadPhaseConfig, CollisionConfig, Config, EngineConfig, WorldConfig},
    };
}
