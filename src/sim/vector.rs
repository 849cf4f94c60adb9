//! Vector algebra on top of `glam::Vec2`
//!
//! glam already provides add/sub/scale/dot/negate and exact `==`. The
//! operations below cover what the collision code needs beyond that.

use glam::Vec2;

/// Extra 2D vector operations used by the physics code
pub trait VectorExt: Sized {
    /// Euclidean length
    fn magnitude(self) -> f32;

    /// Unit vector in the same direction, `None` for the zero vector
    fn normalized(self) -> Option<Self>;

    /// Projection of `self` onto `onto`
    ///
    /// # Panics
    /// Panics if `onto` is the zero vector. Callers must guard.
    fn project(self, onto: Self) -> Self;

    /// Perpendicular vector `(-y, x)`
    fn normal(self) -> Self;

    /// Clamp each component into `[-x_bound, x_bound] × [-y_bound, y_bound]`
    fn clamp_symmetric(self, x_bound: f32, y_bound: f32) -> Self;

    /// True if both vectors normalize to exactly the same unit vector.
    ///
    /// Exact float comparison. A zero vector has no direction, so any
    /// comparison involving one is false.
    fn same_direction(self, other: Self) -> bool;
}

impl VectorExt for Vec2 {
    #[inline]
    fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn normalized(self) -> Option<Vec2> {
        let length = self.magnitude();
        if length == 0.0 {
            return None;
        }
        Some(Vec2::new(self.x / length, self.y / length))
    }

    fn project(self, onto: Vec2) -> Vec2 {
        let Some(axis) = onto.normalized() else {
            panic!("cannot project {:?} onto a zero-length vector", self);
        };
        self.dot(axis) * axis
    }

    #[inline]
    fn normal(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    fn clamp_symmetric(self, x_bound: f32, y_bound: f32) -> Vec2 {
        Vec2::new(
            self.x.min(x_bound).max(-x_bound),
            self.y.min(y_bound).max(-y_bound),
        )
    }

    fn same_direction(self, other: Vec2) -> bool {
        match (self.normalized(), other.normalized()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
