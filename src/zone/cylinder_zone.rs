//! Zones with an elliptical cross-section.

use crate::math::{Point, Point2, Real, Vector, Vector2, DEFAULT_EPSILON};
use crate::shape::{Polyhedron, Segment, SupportMap};
use crate::utils::{COS_FRAC_PI_8, SIN_FRAC_PI_8};
use crate::zone::{ZoneError, ZoneShape};

/// A zone bounded by an elliptic cylinder.
///
/// The cross-section is centered on the local `z` axis, with semi-axes
/// `radius.x` and `radius.y`, and the zone spans `0..height` along `z`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct CylinderZone {
    radius: Vector2<Real>,
    height: Real,
}

impl CylinderZone {
    /// Creates a cylinder zone, failing if a semi-axis or the height is not positive.
    pub fn try_new(radius: Vector2<Real>, height: Real) -> Result<Self, ZoneError> {
        if radius.x > 0.0 && radius.y > 0.0 && height > 0.0 {
            Ok(CylinderZone { radius, height })
        } else {
            Err(ZoneError::InvalidSize)
        }
    }

    /// The semi-axes of the cross-section.
    #[inline]
    pub fn radius(&self) -> &Vector2<Real> {
        &self.radius
    }

    /// The height of this zone.
    #[inline]
    pub fn height(&self) -> Real {
        self.height
    }

    // The ratio scaling the y axis so that the cross-section becomes a circle of radius `radius.x`.
    #[inline]
    fn y_scale(&self) -> Real {
        self.radius.x / self.radius.y
    }

    #[inline]
    fn scaled_distance(&self, point: &Point<Real>) -> Real {
        Vector2::new(point.x, point.y * self.y_scale()).norm()
    }

    // A sphere of radius `r` spans at most this far once the y axis is scaled.
    #[inline]
    fn scaled_radius(&self, radius: Real) -> Real {
        radius * self.y_scale().max(1.0)
    }

    /// The octagon circumscribing the cross-section, counterclockwise.
    pub fn octagon(&self) -> [Point2<Real>; 8] {
        let t = SIN_FRAC_PI_8 / COS_FRAC_PI_8;
        let (rx, ry) = (self.radius.x, self.radius.y);

        [
            Point2::new(rx, ry * t),
            Point2::new(rx * t, ry),
            Point2::new(-rx * t, ry),
            Point2::new(-rx, ry * t),
            Point2::new(-rx, -ry * t),
            Point2::new(-rx * t, -ry),
            Point2::new(rx * t, -ry),
            Point2::new(rx, -ry * t),
        ]
    }
}

impl ZoneShape for CylinderZone {
    fn interior_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        center.z >= radius
            && center.z <= self.height - radius
            && self.scaled_distance(center) + self.scaled_radius(radius) <= self.radius.x
    }

    fn exterior_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        center.z < -radius
            || center.z > self.height + radius
            || self.scaled_distance(center) > self.radius.x + self.scaled_radius(radius)
    }

    fn zone_support_point(&self, dir: &Vector<Real>) -> Option<Point<Real>> {
        Some(self.local_support_point(dir))
    }

    fn clip_segment(&self, segment: &Segment) -> Option<(Real, Real)> {
        let m2 = self.y_scale() * self.y_scale();
        let a = segment.a;
        let d = segment.b - segment.a;
        let mut t0: Real = 0.0;
        let mut t1: Real = 1.0;

        // Slab along z.
        if d.z.abs() <= DEFAULT_EPSILON {
            if a.z < 0.0 || a.z > self.height {
                return None;
            }
        } else {
            let (mut near, mut far) = (-a.z / d.z, (self.height - a.z) / d.z);
            if near > far {
                core::mem::swap(&mut near, &mut far);
            }
            t0 = t0.max(near);
            t1 = t1.min(far);
        }

        // Elliptic cross-section.
        let qa = d.x * d.x + m2 * d.y * d.y;
        let qb = 2.0 * (a.x * d.x + m2 * a.y * d.y);
        let qc = a.x * a.x + m2 * a.y * a.y - self.radius.x * self.radius.x;

        if qa <= DEFAULT_EPSILON {
            if qc > 0.0 {
                return None;
            }
        } else {
            let disc = qb * qb - 4.0 * qa * qc;

            if disc < 0.0 {
                return None;
            }

            let sqrt_disc = disc.sqrt();
            t0 = t0.max((-qb - sqrt_disc) / (2.0 * qa));
            t1 = t1.min((-qb + sqrt_disc) / (2.0 * qa));
        }

        if t0 > t1 {
            None
        } else {
            Some((t0, t1))
        }
    }

    fn local_polyhedron(&self) -> Option<Polyhedron> {
        Polyhedron::prism(&self.octagon(), 0.0, self.height)
    }
}

impl SupportMap for CylinderZone {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let rx2 = self.radius.x * self.radius.x;
        let ry2 = self.radius.y * self.radius.y;
        let s = (rx2 * dir.x * dir.x + ry2 * dir.y * dir.y).sqrt();
        let z = if dir.z > 0.0 { self.height } else { 0.0 };

        if s <= DEFAULT_EPSILON {
            Point::new(0.0, 0.0, z)
        } else {
            Point::new(rx2 * dir.x / s, ry2 * dir.y / s, z)
        }
    }
}
