//! Box-shaped zones.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::{Plane, Polyhedron, Segment, SupportMap};
use crate::zone::zone_shape::{planes_contain_sphere, planes_exclude_sphere};
use crate::zone::{ZoneError, ZoneShape};

/// A zone spanning `0..size` along each local axis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct BoxZone {
    size: Vector<Real>,
}

impl BoxZone {
    /// Creates a box zone, failing if one of the components of `size` is not positive.
    pub fn try_new(size: Vector<Real>) -> Result<Self, ZoneError> {
        if size.iter().all(|s| *s > 0.0) {
            Ok(BoxZone { size })
        } else {
            Err(ZoneError::InvalidSize)
        }
    }

    /// The extents of this box.
    #[inline]
    pub fn size(&self) -> &Vector<Real> {
        &self.size
    }

    /// The local bounding box of this zone.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(Point::origin(), Point::from(self.size))
    }

    /// The six planes bounding this zone, facing inward.
    pub fn planes(&self) -> [Plane; 6] {
        [
            Plane::new(Vector::x(), 0.0),
            Plane::new(-Vector::x(), self.size.x),
            Plane::new(Vector::y(), 0.0),
            Plane::new(-Vector::y(), self.size.y),
            Plane::new(Vector::z(), 0.0),
            Plane::new(-Vector::z(), self.size.z),
        ]
    }
}

impl ZoneShape for BoxZone {
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
        self.aabb().clip_segment_parameters(&segment.a, &segment.b)
    }

    fn local_polyhedron(&self) -> Option<Polyhedron> {
        Polyhedron::from_aabb(&self.aabb())
    }
}

impl SupportMap for BoxZone {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        Point::from(self.size.zip_map(dir, |s, d| if d > 0.0 { s } else { 0.0 }))
    }
}
