//! Zones shaped as right prisms over a convex polygon.

use crate::math::{Point, Point2, Real, Vector, Vector2, DEFAULT_EPSILON};
use crate::shape::{Plane, Polyhedron, Segment, SupportMap};
use crate::utils;
use crate::zone::zone_shape::{clip_segment_to_planes, planes_contain_sphere, planes_exclude_sphere};
use crate::zone::{ZoneError, ZoneShape};
use arrayvec::ArrayVec;

/// The maximum number of vertices of the base polygon of a [`PolygonZone`].
pub const MAX_ZONE_POLYGON_VERTEX_COUNT: usize = 8;

/// A zone bounded by a convex polygon in the local `xy` plane, spanning
/// `0..height` along `z`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct PolygonZone {
    vertices: ArrayVec<Point2<Real>, MAX_ZONE_POLYGON_VERTEX_COUNT>,
    height: Real,
}

impl PolygonZone {
    /// Creates a polygon zone.
    ///
    /// The vertices must describe a convex polygon in counterclockwise order.
    pub fn try_new(vertices: &[Point2<Real>], height: Real) -> Result<Self, ZoneError> {
        let n = vertices.len();

        if n < 3 {
            return Err(ZoneError::TooFewVertices(n));
        }

        if n > MAX_ZONE_POLYGON_VERTEX_COUNT {
            return Err(ZoneError::TooManyVertices {
                count: n,
                max: MAX_ZONE_POLYGON_VERTEX_COUNT,
            });
        }

        if height <= 0.0 {
            return Err(ZoneError::InvalidSize);
        }

        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            let ab = b - a;
            let bc = c - b;

            if ab.perp(&bc) <= DEFAULT_EPSILON {
                return Err(ZoneError::NotConvex);
            }
        }

        Ok(PolygonZone {
            vertices: vertices.iter().copied().collect(),
            height,
        })
    }

    /// The vertices of the base polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point2<Real>] {
        &self.vertices
    }

    /// The height of this zone.
    #[inline]
    pub fn height(&self) -> Real {
        self.height
    }

    /// The planes bounding this zone, facing inward.
    ///
    /// One plane per polygon edge, followed by the bottom and top planes.
    pub fn planes(&self) -> ArrayVec<Plane, { MAX_ZONE_POLYGON_VERTEX_COUNT + 2 }> {
        let n = self.vertices.len();
        let mut res = ArrayVec::new();

        for (i, a) in self.vertices.iter().enumerate() {
            let edge = self.vertices[(i + 1) % n] - a;
            let normal = Vector2::new(-edge.y, edge.x).normalize();
            res.push(Plane::new(
                Vector::new(normal.x, normal.y, 0.0),
                -normal.dot(&a.coords),
            ));
        }

        res.push(Plane::new(Vector::z(), 0.0));
        res.push(Plane::new(-Vector::z(), self.height));
        res
    }
}

impl ZoneShape for PolygonZone {
    fn interior_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        planes_contain_sphere(&self.planes(), center, radius)
    }

    fn exterior_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        planes_exclude_sphere(&self.planes(), center, radius)
    }

    fn zone_support_point(&self, dir: &Vector<Real>) -> Option<Point<Real>> {
        Some(self.local_support_point(dir))
    }

    fn clip_segment(&self, segment: &Segment) -> Option<(Real, Real)> {
        clip_segment_to_planes(&self.planes(), segment)
    }

    fn local_polyhedron(&self) -> Option<Polyhedron> {
        Polyhedron::prism(&self.vertices, 0.0, self.height)
    }
}

impl SupportMap for PolygonZone {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let id = utils::point_cloud_support_point_id2(&dir.xy(), &self.vertices);
        let base = self.vertices[id];
        let z = if dir.z > 0.0 { self.height } else { 0.0 };
        Point::new(base.x, base.y, z)
    }
}
