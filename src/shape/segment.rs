//! Definition of the segment shape.

use crate::math::{Isometry, Point, Real, DEFAULT_EPSILON};

/// A segment shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Segment {
    /// The segment first point.
    pub a: Point<Real>,
    /// The segment second point.
    pub b: Point<Real>,
}

impl Segment {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>) -> Segment {
        Segment { a, b }
    }

    /// The point at parameter `t`, `0` being `self.a` and `1` being `self.b`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.a + (self.b - self.a) * t
    }

    /// The length of this segment.
    #[inline]
    pub fn length(&self) -> Real {
        (self.b - self.a).norm()
    }

    /// Applies the isometry `m` to the vertices of this segment.
    #[inline]
    pub fn transformed(&self, m: &Isometry<Real>) -> Self {
        Segment::new(m * self.a, m * self.b)
    }

    /// The sub-segment between the parameters `t0` and `t1`.
    #[inline]
    pub fn sub_segment(&self, t0: Real, t1: Real) -> Self {
        Segment::new(self.point_at(t0), self.point_at(t1))
    }

    /// The point of this segment closest to `point`.
    pub fn project_point(&self, point: &Point<Real>) -> Point<Real> {
        let ab = self.b - self.a;
        let sq_len = ab.norm_squared();

        if sq_len <= DEFAULT_EPSILON {
            return self.a;
        }

        let t = ((point - self.a).dot(&ab) / sq_len).clamp(0.0, 1.0);
        self.a + ab * t
    }
}
