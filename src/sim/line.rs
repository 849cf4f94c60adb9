//! Infinite lines used for the play-field walls
//!
//! A line is stored in vector form `anchor + t * direction`. The direction
//! is expected to be a unit vector; this is not checked.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vector::VectorExt;

/// An infinite line in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line2D {
    /// Any point on the line
    pub anchor: Vec2,
    /// Unit direction along the line
    pub direction: Vec2,
}

impl Line2D {
    pub fn new(anchor: Vec2, direction: Vec2) -> Self {
        Self { anchor, direction }
    }

    /// Distance from the line to `point`
    pub fn dist_to(&self, point: Vec2) -> f32 {
        self.perpendicular(point).magnitude()
    }

    /// Perpendicular offset between the line and `point`.
    ///
    /// Computed as `project(anchor - point, direction) - (anchor - point)`,
    /// which is the vector from the foot of the perpendicular to `point`.
    pub fn perpendicular(&self, point: Vec2) -> Vec2 {
        let point_to_anchor = self.anchor - point;
        point_to_anchor.project(self.direction) - point_to_anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist_to_horizontal_line() {
        let floor = Line2D::new(Vec2::new(0.0, 100.0), Vec2::X);
        assert_eq!(floor.dist_to(Vec2::new(40.0, 96.0)), 4.0);
        assert_eq!(floor.dist_to(Vec2::new(-500.0, 100.0)), 0.0);
    }

    #[test]
    fn test_perpendicular_points_from_line_to_point() {
        let left = Line2D::new(Vec2::ZERO, Vec2::Y);
        assert_eq!(left.perpendicular(Vec2::new(5.0, 30.0)), Vec2::new(5.0, 0.0));

        let right = Line2D::new(Vec2::new(200.0, 0.0), Vec2::Y);
        assert_eq!(right.perpendicular(Vec2::new(195.0, 7.0)), Vec2::new(-5.0, 0.0));
    }
}
