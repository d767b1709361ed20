//! Math utilities and types
//!
//! Provides the 2D math types used by the collision engine. Screen
//! coordinates are assumed: `x` grows to the right and `y` grows downward,
//! so an AABB's `top` is numerically smaller than its `bottom`.

use serde::{Serialize, Deserialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// One of the two world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
}

impl Axis {
    /// The perpendicular axis
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Component of `v` along this axis
    pub fn component(self, v: &Vec2) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    /// Overwrite the component of `v` along this axis
    pub fn set_component(self, v: &mut Vec2, value: f32) {
        match self {
            Self::X => v.x = value,
            Self::Y => v.y = value,
        }
    }

    /// Unit vector pointing along this axis
    pub fn unit(self) -> Vec2 {
        match self {
            Self::X => Vec2::new(1.0, 0.0),
            Self::Y => Vec2::new(0.0, 1.0),
        }
    }
}

/// Sign of a value as -1.0, 0.0 or 1.0 (unlike `f32::signum`, zero maps to zero)
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// True when both components are finite
pub fn is_finite(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
