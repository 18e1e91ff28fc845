//! Lines in Plücker coordinates.

use crate::math::{Isometry, Point, Real, Vector, DEFAULT_EPSILON};

/// An infinite line stored with Plücker coordinates.
///
/// `moment` is `p × direction` for any point `p` of the line.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Line {
    /// The direction of the line.
    pub direction: Vector<Real>,
    /// The moment of the line about the origin.
    pub moment: Vector<Real>,
}

impl Line {
    /// Creates a line from its Plücker coordinates.
    #[inline]
    pub fn new(direction: Vector<Real>, moment: Vector<Real>) -> Self {
        Line { direction, moment }
    }

    /// The line passing through `a` and `b`, directed from `a` to `b`.
    #[inline]
    pub fn from_points(a: &Point<Real>, b: &Point<Real>) -> Self {
        let direction = b - a;
        Line::new(direction, a.coords.cross(&direction))
    }

    /// The line passing through `point` with the given direction.
    #[inline]
    pub fn through_point(point: &Point<Real>, direction: &Vector<Real>) -> Self {
        Line::new(*direction, point.coords.cross(direction))
    }

    /// Rescales the coordinates so that the direction has unit length.
    ///
    /// Returns `false` and leaves the line unchanged if the direction is zero.
    pub fn standardize(&mut self) -> bool {
        let norm = self.direction.norm();

        if norm > DEFAULT_EPSILON {
            self.direction /= norm;
            self.moment /= norm;
            true
        } else {
            false
        }
    }

    /// Returns a standardized copy of this line.
    pub fn standardized(&self) -> Option<Self> {
        let mut res = *self;
        if res.standardize() {
            Some(res)
        } else {
            None
        }
    }

    /// The point of the line closest to the origin.
    #[inline]
    pub fn support_point(&self) -> Point<Real> {
        Point::from(self.direction.cross(&self.moment) / self.direction.norm_squared())
    }

    /// The point of the line closest to `point`.
    pub fn project_point(&self, point: &Point<Real>) -> Point<Real> {
        let origin = self.support_point();
        let t = (point - origin).dot(&self.direction) / self.direction.norm_squared();
        origin + self.direction * t
    }

    /// Transforms this line by `m`.
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        let origin = m * self.support_point();
        Line::through_point(&origin, &(m * self.direction))
    }
}

/// The squared distance between `point` and `line`.
#[inline]
pub fn squared_distance_point_to_line(point: &Point<Real>, line: &Line) -> Real {
    let v = point.coords.cross(&line.direction) - line.moment;
    v.norm_squared() / line.direction.norm_squared()
}
