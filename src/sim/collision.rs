//! Collision detection and response for the ball
//!
//! The ball is a circle; it can hit infinite lines (walls) and axis-aligned
//! rectangles (paddle and blocks). Every test returns the separation vector
//! directly so the caller can hand it to the bounce response.

use glam::Vec2;

use super::line::Line2D;
use super::vector::VectorExt;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlap (touching counts)
    pub hit: bool,
    /// Vector from the closest surface point to the ball center.
    /// This is the bounce direction handed to [`bounce_velocity`].
    pub separation: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            separation: Vec2::ZERO,
        }
    }
}

/// Check a ball against an infinite line
pub fn ball_line_collision(center: Vec2, radius: f32, line: &Line2D) -> CollisionResult {
    let separation = line.perpendicular(center);
    if separation.magnitude() <= radius {
        CollisionResult {
            hit: true,
            separation,
        }
    } else {
        CollisionResult::miss()
    }
}

/// One-sided check against a boundary line
///
/// The outside of the line is the side `direction.normal()` points to. A
/// ball within `radius` of the line or anywhere beyond it is a hit, so a
/// ball too fast to land inside the contact band is still caught.
pub fn ball_boundary_collision(center: Vec2, radius: f32, line: &Line2D) -> CollisionResult {
    let depth = (center - line.anchor).dot(line.direction.normal());
    if depth >= -radius {
        CollisionResult {
            hit: true,
            separation: line.perpendicular(center),
        }
    } else {
        CollisionResult::miss()
    }
}

/// Check a ball against an axis-aligned rectangle
///
/// The closest point of the rectangle is found by clamping the ball's
/// rectangle-local offset to the half extents. When the ball center sits
/// exactly on that point (center inside the rectangle, or on its border)
/// the separation falls back to the reversed ball velocity.
pub fn ball_rect_collision(
    center: Vec2,
    velocity: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let offset = center - rect_center;
    let clamped = offset.clamp_symmetric(half_extents.x, half_extents.y);
    let closest = rect_center + clamped;
    let diff = center - closest;
    let distance = diff.magnitude();

    let separation = if distance == 0.0 { -velocity } else { diff };

    CollisionResult {
        hit: distance <= radius,
        separation,
    }
}

/// Elastic bounce of `velocity` off a surface.
///
/// `direction` must point from the surface toward the ball (the separation
/// vector of a collision test). The velocity component along `direction`
/// is `v1`: if it already points away from the surface it is added again,
/// pushing the ball out; otherwise it is reflected (`v - 2 v1`).
/// A zero `direction` leaves the velocity unchanged.
///
/// The "already points away" test is an exact comparison of normalized
/// vectors. For a diagonal separation (a corner hit) one ulp of rounding can
/// make an outgoing `v1` compare unequal, and the ball is reflected back
/// toward the surface instead.
pub fn bounce_velocity(velocity: Vec2, direction: Vec2) -> Vec2 {
    if direction.magnitude() == 0.0 {
        return velocity;
    }
    let v1 = velocity.project(direction);
    if v1.same_direction(direction) {
        velocity + v1
    } else {
        velocity - v1 * 2.0
    }
}
