//! Narrow-phase shape tests
//!
//! Exact intersection tests between unrotated rectangles and circles, plus the
//! closed-form contact separation used by the axis-separated resolver. Both use
//! the same slab/corner decomposition so a shape pair reported as colliding
//! always has a matching contact position.

use super::shape::{CollisionShape, ShapeKind};
use crate::foundation::math::Axis;

/// Exact intersection test between two shapes
///
/// Degenerate (zero-area) shapes never collide, and disjoint bounds are
/// rejected before any shape-specific math runs. Shapes that only touch do not
/// collide, whatever the direction of the contact.
pub fn shapes_collide(a: &CollisionShape, b: &CollisionShape) -> bool {
    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }
    if !a.aabb().overlaps(b.aabb()) {
        return false;
    }

    match (a.kind(), b.kind()) {
        // Unrotated rectangles are their own bounds
        (ShapeKind::Rectangle { .. }, ShapeKind::Rectangle { .. }) => true,
        (ShapeKind::Circle { radius: ra }, ShapeKind::Circle { radius: rb }) => {
            let distance_squared = (a.center() - b.center()).magnitude_squared();
            let reach = ra + rb;
            distance_squared < reach * reach
        }
        (ShapeKind::Circle { radius }, ShapeKind::Rectangle { .. }) => circle_intersects_rect(a, radius, b),
        (ShapeKind::Rectangle { .. }, ShapeKind::Circle { radius }) => circle_intersects_rect(b, radius, a),
    }
}

fn circle_intersects_rect(circle: &CollisionShape, radius: f32, rect: &CollisionShape) -> bool {
    let rect_bounds = rect.aabb();
    let dx = (circle.center().x - rect_bounds.center_x).abs();
    let dy = (circle.center().y - rect_bounds.center_y).abs();

    if dx >= rect_bounds.half_width + radius || dy >= rect_bounds.half_height + radius {
        return false;
    }
    // Center projects inside one of the rectangle's slabs
    if dx < rect_bounds.half_width || dy < rect_bounds.half_height {
        return true;
    }

    let corner_x = dx - rect_bounds.half_width;
    let corner_y = dy - rect_bounds.half_height;
    corner_x * corner_x + corner_y * corner_y < radius * radius
}

/// Center-to-center distance along `axis` at which `a` and `b` first touch
///
/// The offset along the perpendicular axis is held at its current value.
/// Returns `None` when that offset alone keeps the shapes apart, so they cannot
/// touch by moving along `axis`.
pub fn contact_separation(a: &CollisionShape, b: &CollisionShape, axis: Axis) -> Option<f32> {
    let cross_axis = axis.other();
    let cross = (cross_axis.component(&a.center()) - cross_axis.component(&b.center())).abs();

    match (a.kind(), b.kind()) {
        (ShapeKind::Rectangle { .. }, ShapeKind::Rectangle { .. }) => {
            let cross_reach = a.half_extent(cross_axis) + b.half_extent(cross_axis);
            if cross >= cross_reach {
                return None;
            }
            Some(a.half_extent(axis) + b.half_extent(axis))
        }
        (ShapeKind::Circle { radius: ra }, ShapeKind::Circle { radius: rb }) => {
            let reach = ra + rb;
            if cross >= reach {
                return None;
            }
            Some((reach * reach - cross * cross).sqrt())
        }
        (ShapeKind::Circle { radius }, ShapeKind::Rectangle { .. }) => circle_rect_separation(radius, b, cross, axis),
        (ShapeKind::Rectangle { .. }, ShapeKind::Circle { radius }) => circle_rect_separation(radius, a, cross, axis),
    }
}

fn circle_rect_separation(radius: f32, rect: &CollisionShape, cross: f32, axis: Axis) -> Option<f32> {
    let cross_half = rect.half_extent(axis.other());
    let axis_half = rect.half_extent(axis);

    if cross >= cross_half + radius {
        return None;
    }
    if cross < cross_half {
        // Slab contact: the circle meets a flat face
        return Some(axis_half + radius);
    }

    // Corner contact
    let corner = cross - cross_half;
    Some(axis_half + (radius * radius - corner * corner).sqrt())
}
