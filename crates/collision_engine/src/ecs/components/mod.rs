//! Component data stored for collidable entities

pub mod collision;

pub use collision::{CollisionBody, EntityDesc};
