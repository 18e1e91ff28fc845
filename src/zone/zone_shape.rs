use crate::math::{Point, Real, Vector};
use crate::shape::{Plane, Polyhedron, Segment};

/// Parameters closer than this to the ends of a segment are snapped to them.
const SEGMENT_PARAMETER_EPSILON: Real = 1.0e-5;

/// Membership queries shared by every zone shape, expressed in the local
/// space of the zone.
///
/// All the tests are conservative in the same direction: `interior_*` may
/// return `false` for shapes that are actually inside, and `exterior_*` may
/// return `false` for shapes that are actually outside, but never the other
/// way around.
pub trait ZoneShape {
    /// Is the sphere entirely inside of this zone?
    fn interior_sphere(&self, center: &Point<Real>, radius: Real) -> bool;

    /// Is the sphere entirely outside of this zone?
    fn exterior_sphere(&self, center: &Point<Real>, radius: Real) -> bool;

    /// The point of this zone farthest along `dir`, if any.
    fn zone_support_point(&self, dir: &Vector<Real>) -> Option<Point<Real>>;

    /// The parameters `(t0, t1)` of the part of `segment` lying inside of this zone.
    fn clip_segment(&self, segment: &Segment) -> Option<(Real, Real)>;

    /// A convex polyhedron containing this zone, or `None` if it is unbounded.
    fn local_polyhedron(&self) -> Option<Polyhedron>;

    /// Is `point` inside of this zone?
    fn interior_point(&self, point: &Point<Real>) -> bool {
        self.interior_sphere(point, 0.0)
    }

    /// Is the sphere swept from `p1` to `p2` entirely inside of this zone?
    fn interior_swept_sphere(&self, p1: &Point<Real>, p2: &Point<Real>, radius: Real) -> bool {
        self.interior_sphere(p1, radius) && self.interior_sphere(p2, radius)
    }

    /// Is the sphere swept from `p1` to `p2` entirely outside of this zone?
    fn exterior_swept_sphere(&self, p1: &Point<Real>, p2: &Point<Real>, radius: Real) -> bool {
        if self.exterior_sphere(p1, radius) && self.exterior_sphere(p2, radius) {
            if let Some(polyhedron) = self.local_polyhedron() {
                return polyhedron.planes().iter().any(|plane| {
                    plane.signed_distance(p1) < -radius && plane.signed_distance(p2) < -radius
                });
            }
        }

        false
    }

    /// Appends to `exterior` the parts of `edges` lying outside of this zone.
    fn clip_interior_edges(&self, edges: &[Segment], exterior: &mut Vec<Segment>) {
        for edge in edges {
            match self.clip_segment(edge) {
                None => exterior.push(*edge),
                Some((t0, t1)) => {
                    if t0 > SEGMENT_PARAMETER_EPSILON {
                        exterior.push(edge.sub_segment(0.0, t0));
                    }
                    if t1 < 1.0 - SEGMENT_PARAMETER_EPSILON {
                        exterior.push(edge.sub_segment(t1, 1.0));
                    }
                }
            }
        }
    }
}

pub(crate) fn planes_contain_sphere(planes: &[Plane], center: &Point<Real>, radius: Real) -> bool {
    planes
        .iter()
        .all(|plane| plane.signed_distance(center) >= radius)
}

pub(crate) fn planes_exclude_sphere(planes: &[Plane], center: &Point<Real>, radius: Real) -> bool {
    planes
        .iter()
        .any(|plane| plane.signed_distance(center) < -radius)
}

/// Clips a segment to the intersection of the positive half-spaces of `planes`.
pub(crate) fn clip_segment_to_planes(planes: &[Plane], segment: &Segment) -> Option<(Real, Real)> {
    let mut t0: Real = 0.0;
    let mut t1: Real = 1.0;

    for plane in planes {
        let da = plane.signed_distance(&segment.a);
        let db = plane.signed_distance(&segment.b);

        if da < 0.0 && db < 0.0 {
            return None;
        }

        if da >= 0.0 && db >= 0.0 {
            continue;
        }

        let t = da / (da - db);

        if da < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }

        if t0 > t1 {
            return None;
        }
    }

    Some((t0, t1))
}
