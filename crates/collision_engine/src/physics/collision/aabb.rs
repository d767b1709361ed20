//! Axis-aligned bounding box
//!
//! Derived bounds for shapes, profiles and sweeps. Values are recomputed from
//! their source every tick and never edited independently.

/// Axis-Aligned Bounding Box in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Left edge
    pub left: f32,
    /// Right edge
    pub right: f32,
    /// Top edge
    pub top: f32,
    /// Bottom edge
    pub bottom: f32,
    /// Half of the width
    pub half_width: f32,
    /// Half of the height
    pub half_height: f32,
    /// Horizontal center
    pub center_x: f32,
    /// Vertical center
    pub center_y: f32,
    empty: bool,
}

impl Aabb {
    /// Create an empty AABB; it overlaps nothing until it is set or grown
    pub const fn empty() -> Self {
        Self {
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
            half_width: 0.0,
            half_height: 0.0,
            center_x: 0.0,
            center_y: 0.0,
            empty: true,
        }
    }

    /// Create an AABB from its center and full size
    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        let half_width = width * 0.5;
        let half_height = height * 0.5;
        Self {
            left: center_x - half_width,
            right: center_x + half_width,
            top: center_y - half_height,
            bottom: center_y + half_height,
            half_width,
            half_height,
            center_x,
            center_y,
            empty: false,
        }
    }

    /// Create an AABB from its four edges
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        let half_width = (right - left) * 0.5;
        let half_height = (bottom - top) * 0.5;
        Self {
            left,
            right,
            top,
            bottom,
            half_width,
            half_height,
            center_x: left + half_width,
            center_y: top + half_height,
            empty: false,
        }
    }

    /// Reset to the empty state
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Copy another AABB into this one
    pub fn set(&mut self, other: &Self) {
        *self = *other;
    }

    /// Grow this AABB to also cover `other`
    pub fn include(&mut self, other: &Self) {
        if other.empty {
            return;
        }
        if self.empty {
            self.set(other);
            return;
        }
        *self = Self::from_edges(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        );
    }

    /// Union of two AABBs
    pub fn union(&self, other: &Self) -> Self {
        let mut result = *self;
        result.include(other);
        result
    }

    /// Strict overlap test; touching edges do not overlap
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.empty
            && !other.empty
            && self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// True when `other` lies entirely inside this AABB (shared edges allowed)
    pub fn contains(&self, other: &Self) -> bool {
        !self.empty
            && !other.empty
            && self.left <= other.left
            && self.right >= other.right
            && self.top <= other.top
            && self.bottom >= other.bottom
    }

    /// Cheap change test against a center and full size
    pub fn matches(&self, center_x: f32, center_y: f32, width: f32, height: f32) -> bool {
        !self.empty
            && self.center_x == center_x
            && self.center_y == center_y
            && self.half_width * 2.0 == width
            && self.half_height * 2.0 == height
    }

    /// Copy of this AABB grown by per-side margins
    pub fn expanded(&self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        if self.empty {
            return *self;
        }
        Self::from_edges(self.left - left, self.top - top, self.right + right, self.bottom + bottom)
    }

    /// Full width
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Full height
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Whether this AABB has never been set
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
