//! Collision geometry
//!
//! # Module Organization
//!
//! - [`aabb`] - Axis-aligned bounding boxes
//! - [`shape`] - Rectangles and circles positioned relative to an owner
//! - [`narrow_phase`] - Exact shape tests and contact separation
//!
//! # Key Types
//!
//! - [`CollisionShape`] - World-space shape with derived bounds
//! - [`ShapeDesc`] - Serializable shape declaration validated at registration
//! - [`Aabb`] - Bounds used by the broad-phase, sweeps and overlap tests

pub mod aabb;
pub mod shape;
pub mod narrow_phase;

// Re-export commonly used types
pub use aabb::Aabb;
pub use shape::{CollisionShape, ShapeDesc, ShapeKind};
pub use narrow_phase::{contact_separation, shapes_collide};
