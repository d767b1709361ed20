//! Collision shapes
//!
//! A shape is a rectangle or circle placed relative to its owning entity.
//! Declarations ([`ShapeDesc`]) are validated once at registration and turned
//! into [`CollisionShape`]s that carry their world position and derived AABB.

use serde::{Serialize, Deserialize};

use super::aabb::Aabb;
use crate::foundation::math::{Axis, Vec2};
use crate::physics::CollisionError;

/// Geometry of a collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle
    Rectangle {
        /// Full width
        width: f32,
        /// Full height
        height: f32,
    },
    /// Circle
    Circle {
        /// Radius
        radius: f32,
    },
}

/// Serializable shape declaration, as found in entity templates
///
/// The `kind` tag selects the variant, so an unknown kind fails to parse
/// instead of surfacing during collision resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDesc {
    /// Rectangle centered at the owner position plus offset
    Rectangle {
        /// Full width
        width: f32,
        /// Full height
        height: f32,
        /// Horizontal offset of the center from the owner position
        #[serde(default)]
        offset_x: f32,
        /// Vertical offset of the center from the owner position
        #[serde(default)]
        offset_y: f32,
    },
    /// Circle centered at the owner position plus offset
    Circle {
        /// Radius
        radius: f32,
        /// Horizontal offset of the center from the owner position
        #[serde(default)]
        offset_x: f32,
        /// Vertical offset of the center from the owner position
        #[serde(default)]
        offset_y: f32,
    },
}

impl ShapeDesc {
    /// Rectangle centered on the owner
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::Rectangle { width, height, offset_x: 0.0, offset_y: 0.0 }
    }

    /// Rectangle whose top-left corner sits on the owner position
    pub fn rectangle_top_left(width: f32, height: f32) -> Self {
        Self::Rectangle { width, height, offset_x: width * 0.5, offset_y: height * 0.5 }
    }

    /// Circle centered on the owner
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius, offset_x: 0.0, offset_y: 0.0 }
    }

    /// Replace the offset of this declaration
    pub fn with_offset(self, x: f32, y: f32) -> Self {
        match self {
            Self::Rectangle { width, height, .. } => Self::Rectangle { width, height, offset_x: x, offset_y: y },
            Self::Circle { radius, .. } => Self::Circle { radius, offset_x: x, offset_y: y },
        }
    }
}

/// A shape positioned in world space
///
/// Copyable so the resolver can move scratch instances freely without
/// touching the owner's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionShape {
    kind: ShapeKind,
    offset: Vec2,
    center: Vec2,
    aabb: Aabb,
}

impl CollisionShape {
    /// Create a shape owned by an entity at `(owner_x, owner_y)`
    pub fn new(kind: ShapeKind, offset: Vec2, owner_x: f32, owner_y: f32) -> Self {
        let mut shape = Self {
            kind,
            offset,
            center: Vec2::zeros(),
            aabb: Aabb::empty(),
        };
        shape.update(owner_x, owner_y);
        shape
    }

    /// Validate a declaration and place it at `(owner_x, owner_y)`
    pub fn from_desc(desc: &ShapeDesc, collision_type: &str, owner_x: f32, owner_y: f32) -> Result<Self, CollisionError> {
        let invalid = |reason: String| CollisionError::InvalidShape {
            collision_type: collision_type.to_string(),
            reason,
        };

        let (kind, offset_x, offset_y) = match *desc {
            ShapeDesc::Rectangle { width, height, offset_x, offset_y } => {
                if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
                    return Err(invalid(format!("rectangle size {width}x{height} must be finite and non-negative")));
                }
                (ShapeKind::Rectangle { width, height }, offset_x, offset_y)
            }
            ShapeDesc::Circle { radius, offset_x, offset_y } => {
                if !radius.is_finite() || radius < 0.0 {
                    return Err(invalid(format!("circle radius {radius} must be finite and non-negative")));
                }
                (ShapeKind::Circle { radius }, offset_x, offset_y)
            }
        };

        if !(offset_x.is_finite() && offset_y.is_finite()) {
            return Err(invalid(format!("offset ({offset_x}, {offset_y}) must be finite")));
        }

        Ok(Self::new(kind, Vec2::new(offset_x, offset_y), owner_x, owner_y))
    }

    /// Recompute world placement for an owner at `(x, y)`
    pub fn update(&mut self, x: f32, y: f32) {
        self.center = Vec2::new(x + self.offset.x, y + self.offset.y);
        let (width, height) = self.size();
        self.aabb = Aabb::from_center(self.center.x, self.center.y, width, height);
    }

    /// Retarget the horizontal owner position only
    pub fn move_x(&mut self, x: f32) {
        self.center.x = x + self.offset.x;
        let half = self.half_extent(Axis::X);
        self.aabb = Aabb::from_edges(self.center.x - half, self.aabb.top, self.center.x + half, self.aabb.bottom);
    }

    /// Retarget the vertical owner position only
    pub fn move_y(&mut self, y: f32) {
        self.center.y = y + self.offset.y;
        let half = self.half_extent(Axis::Y);
        self.aabb = Aabb::from_edges(self.aabb.left, self.center.y - half, self.aabb.right, self.center.y + half);
    }

    /// Retarget the owner position along one axis
    pub fn move_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.move_x(value),
            Axis::Y => self.move_y(value),
        }
    }

    /// Geometry of this shape
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Offset of the center from the owner position
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// World-space bounds
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Radius for circles, zero for rectangles
    pub fn radius(&self) -> f32 {
        match self.kind {
            ShapeKind::Circle { radius } => radius,
            ShapeKind::Rectangle { .. } => 0.0,
        }
    }

    /// Full width and height of the shape's bounds
    pub fn size(&self) -> (f32, f32) {
        match self.kind {
            ShapeKind::Rectangle { width, height } => (width, height),
            ShapeKind::Circle { radius } => (radius * 2.0, radius * 2.0),
        }
    }

    /// Half of the bounds along `axis`
    pub fn half_extent(&self, axis: Axis) -> f32 {
        let (width, height) = self.size();
        match axis {
            Axis::X => width * 0.5,
            Axis::Y => height * 0.5,
        }
    }

    /// Zero-area shapes never collide
    pub fn is_degenerate(&self) -> bool {
        let (width, height) = self.size();
        width <= 0.0 || height <= 0.0
    }
}
