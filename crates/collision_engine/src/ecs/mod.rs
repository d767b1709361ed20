//! Entity-side types for the collision engine
//!
//! Entities belong to the surrounding game; the engine stores what it needs
//! about each one in an arena and hands out [`EntityId`] handles.

pub mod entity;
pub mod component;
pub mod components;

pub use entity::{EntityId, BodyFlags};
pub use component::Collidable;
pub use components::{CollisionBody, EntityDesc};
