//! Closest point to the origin on simplices of up to four vertices.

use crate::math::{Point, Real, DEFAULT_EPSILON};
use crate::query::gjk::CSOPoint;
use arrayvec::ArrayVec;

type SubSimplex = ArrayVec<usize, 4>;

/// Computes the point of the simplex spanned by `points` closest to the origin.
///
/// `points` must contain between one and four points. Returns the closest point
/// and the indices of the points of the smallest sub-simplex containing it. If the
/// origin lies inside of a tetrahedron, the origin itself is returned with all
/// four indices.
pub fn simplex_minimum(points: &[Point<Real>]) -> (Point<Real>, SubSimplex) {
    match points.len() {
        1 => (points[0], [0].into_iter().collect()),
        2 => segment_minimum(points, [0, 1]),
        3 => triangle_minimum(points, [0, 1, 2]),
        4 => tetrahedron_minimum(points),
        _ => (Point::origin(), SubSimplex::new()),
    }
}

fn segment_minimum(points: &[Point<Real>], ids: [usize; 2]) -> (Point<Real>, SubSimplex) {
    let a = points[ids[0]];
    let b = points[ids[1]];
    let ab = b - a;
    let sq_len = ab.norm_squared();
    let t = if sq_len > DEFAULT_EPSILON {
        -a.coords.dot(&ab) / sq_len
    } else {
        0.0
    };

    if t <= 0.0 {
        (a, [ids[0]].into_iter().collect())
    } else if t >= 1.0 {
        (b, [ids[1]].into_iter().collect())
    } else {
        (a + ab * t, ids.into_iter().collect())
    }
}

fn triangle_minimum(points: &[Point<Real>], ids: [usize; 3]) -> (Point<Real>, SubSimplex) {
    let a = points[ids[0]];
    let b = points[ids[1]];
    let c = points[ids[2]];
    let ab = b - a;
    let ac = c - a;

    let d1 = -ab.dot(&a.coords);
    let d2 = -ac.dot(&a.coords);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (a, [ids[0]].into_iter().collect());
    }

    let d3 = -ab.dot(&b.coords);
    let d4 = -ac.dot(&b.coords);
    if d3 >= 0.0 && d4 <= d3 {
        return (b, [ids[1]].into_iter().collect());
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (a + ab * v, [ids[0], ids[1]].into_iter().collect());
    }

    let d5 = -ab.dot(&c.coords);
    let d6 = -ac.dot(&c.coords);
    if d6 >= 0.0 && d5 <= d6 {
        return (c, [ids[2]].into_iter().collect());
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (a + ac * w, [ids[0], ids[2]].into_iter().collect());
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (b + (c - b) * w, [ids[1], ids[2]].into_iter().collect());
    }

    let sum = va + vb + vc;

    if sum <= DEFAULT_EPSILON {
        // Flat triangle: the answer lies on its longest side.
        let candidates = [
            segment_minimum(points, [ids[0], ids[1]]),
            segment_minimum(points, [ids[1], ids[2]]),
            segment_minimum(points, [ids[0], ids[2]]),
        ];
        return closest_candidate(candidates);
    }

    let v = vb / sum;
    let w = vc / sum;
    (a + ab * v + ac * w, ids.into_iter().collect())
}

fn tetrahedron_minimum(points: &[Point<Real>]) -> (Point<Real>, SubSimplex) {
    const FACES: [([usize; 3], usize); 4] = [
        ([0, 1, 2], 3),
        ([0, 1, 3], 2),
        ([0, 2, 3], 1),
        ([1, 2, 3], 0),
    ];

    let mut best: Option<(Point<Real>, SubSimplex)> = None;

    for (face, opposite) in FACES {
        let a = points[face[0]];
        let normal = (points[face[1]] - a).cross(&(points[face[2]] - a));
        let origin_side = -normal.dot(&a.coords);
        let opposite_side = normal.dot(&(points[opposite] - a));

        // The origin is on the same side of this face as the remaining vertex.
        if origin_side * opposite_side > 0.0 {
            continue;
        }

        let candidate = triangle_minimum(points, face);
        let closer = match &best {
            Some((pt, _)) => candidate.0.coords.norm_squared() < pt.coords.norm_squared(),
            None => true,
        };

        if closer {
            best = Some(candidate);
        }
    }

    best.unwrap_or_else(|| (Point::origin(), (0..4).collect()))
}

fn closest_candidate<const N: usize>(
    candidates: [(Point<Real>, SubSimplex); N],
) -> (Point<Real>, SubSimplex) {
    let mut res: Option<(Point<Real>, SubSimplex)> = None;

    for candidate in candidates {
        let closer = match &res {
            Some((pt, _)) => candidate.0.coords.norm_squared() < pt.coords.norm_squared(),
            None => true,
        };

        if closer {
            res = Some(candidate);
        }
    }

    res.unwrap_or_else(|| (Point::origin(), SubSimplex::new()))
}

/// A simplex of CSO points, reduced after each projection to the smallest
/// sub-simplex containing the point closest to the origin.
#[derive(Clone, Debug, Default)]
pub struct Simplex {
    points: ArrayVec<CSOPoint, 4>,
}

impl Simplex {
    /// Creates an empty simplex.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets this simplex to a single point.
    pub fn reset(&mut self, pt: CSOPoint) {
        self.points.clear();
        self.points.push(pt);
    }

    /// Adds a point to this simplex.
    ///
    /// Returns `false` if the point is already part of the simplex or if the
    /// simplex is full.
    pub fn add_point(&mut self, pt: CSOPoint) -> bool {
        let eps = crate::query::gjk::eps_tol();

        if self
            .points
            .iter()
            .any(|p| (p.point - pt.point).norm_squared() <= eps * eps)
        {
            return false;
        }

        self.points.try_push(pt).is_ok()
    }

    /// The number of points of this simplex.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Does this simplex have no point?
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points of this simplex.
    pub fn points(&self) -> &[CSOPoint] {
        &self.points
    }

    /// Projects the origin on this simplex and drops the points that do not
    /// contribute to the projection.
    pub fn project_origin_and_reduce(&mut self) -> Point<Real> {
        let pts: ArrayVec<Point<Real>, 4> = self.points.iter().map(|p| p.point).collect();
        let (proj, kept) = simplex_minimum(&pts);

        if kept.len() != self.points.len() {
            let old = self.points.clone();
            self.points.clear();
            self.points.extend(kept.iter().map(|i| old[*i]));
        }

        proj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_projection() {
        let pts = [Point::new(-1.0, 1.0, 0.0), Point::new(1.0, 1.0, 0.0)];
        let (proj, kept) = simplex_minimum(&pts);
        assert_relative_eq!(proj, Point::new(0.0, 1.0, 0.0));
        assert_eq!(kept.as_slice(), &[0, 1]);

        let pts = [Point::new(1.0, 1.0, 0.0), Point::new(2.0, 1.0, 0.0)];
        let (proj, kept) = simplex_minimum(&pts);
        assert_relative_eq!(proj, Point::new(1.0, 1.0, 0.0));
        assert_eq!(kept.as_slice(), &[0]);
    }

    #[test]
    fn triangle_projection() {
        let pts = [
            Point::new(-1.0, -1.0, 2.0),
            Point::new(3.0, -1.0, 2.0),
            Point::new(-1.0, 3.0, 2.0),
        ];
        let (proj, kept) = simplex_minimum(&pts);
        assert_relative_eq!(proj, Point::new(0.0, 0.0, 2.0), epsilon = 1.0e-6);
        assert_eq!(kept.len(), 3);

        let pts = [
            Point::new(1.0, 1.0, 0.0),
            Point::new(3.0, 1.0, 0.0),
            Point::new(1.0, 3.0, 0.0),
        ];
        let (proj, kept) = simplex_minimum(&pts);
        assert_relative_eq!(proj, Point::new(1.0, 1.0, 0.0));
        assert_eq!(kept.as_slice(), &[0]);
    }

    #[test]
    fn tetrahedron_containing_origin() {
        let pts = [
            Point::new(-1.0, -1.0, -1.0),
            Point::new(3.0, -1.0, -1.0),
            Point::new(-1.0, 3.0, -1.0),
            Point::new(-1.0, -1.0, 3.0),
        ];
        let (proj, kept) = simplex_minimum(&pts);
        assert_relative_eq!(proj, Point::origin());
        assert_eq!(kept.len(), 4);

        let shifted: ArrayVec<Point<Real>, 4> =
            pts.iter().map(|p| p + crate::math::Vector::new(0.0, 0.0, 3.0)).collect();
        let (proj, kept) = simplex_minimum(&shifted);
        assert_relative_eq!(proj, Point::new(0.0, 0.0, 2.0), epsilon = 1.0e-6);
        assert_eq!(kept.len(), 3);
    }
}
