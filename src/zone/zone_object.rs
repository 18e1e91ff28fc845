use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::{Polyhedron, Segment, SupportMap};
use crate::zone::{BoxZone, CylinderZone, PolygonZone, ZoneShape};

/// Enum representing the type of a zone shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ZoneType {
    /// An unbounded zone.
    Infinite,
    /// A box zone.
    Box,
    /// An elliptic cylinder zone.
    Cylinder,
    /// A polygonal prism zone.
    Polygon,
}

/// The zone covering the whole space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone, Default)]
pub struct InfiniteZone;

impl ZoneShape for InfiniteZone {
    fn interior_sphere(&self, _: &Point<Real>, _: Real) -> bool {
        true
    }

    fn exterior_sphere(&self, _: &Point<Real>, _: Real) -> bool {
        false
    }

    fn zone_support_point(&self, _: &Vector<Real>) -> Option<Point<Real>> {
        None
    }

    fn clip_segment(&self, _: &Segment) -> Option<(Real, Real)> {
        Some((0.0, 1.0))
    }

    fn local_polyhedron(&self) -> Option<Polyhedron> {
        None
    }

    fn exterior_swept_sphere(&self, _: &Point<Real>, _: &Point<Real>, _: Real) -> bool {
        false
    }
}

/// The shape of a zone, shared between every zone built from it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub enum ZoneObject {
    /// The zone covers the whole space.
    Infinite,
    /// A box zone.
    Box(BoxZone),
    /// An elliptic cylinder zone.
    Cylinder(CylinderZone),
    /// A polygonal prism zone.
    Polygon(PolygonZone),
}

impl ZoneObject {
    /// The type of this zone shape.
    pub fn zone_type(&self) -> ZoneType {
        match self {
            ZoneObject::Infinite => ZoneType::Infinite,
            ZoneObject::Box(_) => ZoneType::Box,
            ZoneObject::Cylinder(_) => ZoneType::Cylinder,
            ZoneObject::Polygon(_) => ZoneType::Polygon,
        }
    }

    /// Converts this shape into a trait object.
    pub fn as_shape(&self) -> &dyn ZoneShape {
        match self {
            ZoneObject::Infinite => &InfiniteZone,
            ZoneObject::Box(s) => s,
            ZoneObject::Cylinder(s) => s,
            ZoneObject::Polygon(s) => s,
        }
    }

    /// The local bounding box of this shape, unless it is unbounded.
    pub fn local_aabb(&self) -> Option<Aabb> {
        match self {
            ZoneObject::Infinite => None,
            ZoneObject::Box(s) => Some(s.aabb()),
            ZoneObject::Cylinder(s) => {
                let r = s.radius();
                Some(Aabb::new(
                    Point::new(-r.x, -r.y, 0.0),
                    Point::new(r.x, r.y, s.height()),
                ))
            }
            ZoneObject::Polygon(s) => {
                let mut aabb = Aabb::new_invalid();

                for v in s.vertices() {
                    aabb.take_point(Point::new(v.x, v.y, 0.0));
                    aabb.take_point(Point::new(v.x, v.y, s.height()));
                }

                Some(aabb)
            }
        }
    }

    /// Converts this shape into its support map, unless it is unbounded.
    pub fn as_support_map(&self) -> Option<&dyn SupportMap> {
        match self {
            ZoneObject::Infinite => None,
            ZoneObject::Box(s) => Some(s as &dyn SupportMap),
            ZoneObject::Cylinder(s) => Some(s as &dyn SupportMap),
            ZoneObject::Polygon(s) => Some(s as &dyn SupportMap),
        }
    }
}

impl ZoneShape for ZoneObject {
    fn interior_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        self.as_shape().interior_sphere(center, radius)
    }

    fn exterior_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        self.as_shape().exterior_sphere(center, radius)
    }

    fn zone_support_point(&self, dir: &Vector<Real>) -> Option<Point<Real>> {
        self.as_shape().zone_support_point(dir)
    }

    fn clip_segment(&self, segment: &Segment) -> Option<(Real, Real)> {
        self.as_shape().clip_segment(segment)
    }

    fn local_polyhedron(&self) -> Option<Polyhedron> {
        self.as_shape().local_polyhedron()
    }

    fn interior_point(&self, point: &Point<Real>) -> bool {
        self.as_shape().interior_point(point)
    }

    fn interior_swept_sphere(&self, p1: &Point<Real>, p2: &Point<Real>, radius: Real) -> bool {
        self.as_shape().interior_swept_sphere(p1, p2, radius)
    }

    fn exterior_swept_sphere(&self, p1: &Point<Real>, p2: &Point<Real>, radius: Real) -> bool {
        self.as_shape().exterior_swept_sphere(p1, p2, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector2;

    #[test]
    fn infinite_zone_contains_everything() {
        let zone = ZoneObject::Infinite;
        let far = Point::new(1.0e6, -1.0e6, 3.0);

        assert_eq!(zone.zone_type(), ZoneType::Infinite);
        assert!(zone.interior_point(&far));
        assert!(!zone.exterior_sphere(&far, 0.0));
        assert!(zone.zone_support_point(&Vector::x()).is_none());
        assert!(zone.as_support_map().is_none());
        assert!(zone.local_polyhedron().is_none());
        assert!(zone.local_aabb().is_none());
    }

    #[test]
    fn containment_consistency() {
        let shapes = [
            ZoneObject::Box(BoxZone::try_new(Vector::new(4.0, 4.0, 4.0)).unwrap()),
            ZoneObject::Cylinder(CylinderZone::try_new(Vector2::new(2.0, 2.0), 4.0).unwrap()),
        ];
        let inside = [Point::new(2.0, 2.0, 2.0), Point::new(0.0, 0.0, 2.0)];

        for (shape, p) in shapes.iter().zip(inside.iter()) {
            assert!(shape.interior_point(p));
            assert!(shape.interior_sphere(p, 0.0));
            assert!(!shape.exterior_sphere(p, 0.5));
            assert!(shape.exterior_sphere(&Point::new(100.0, 0.0, 2.0), 0.0));
            assert!(shape.exterior_swept_sphere(
                &Point::new(100.0, 0.0, 2.0),
                &Point::new(100.0, 5.0, 2.0),
                1.0
            ));
            assert!(shape.as_support_map().is_some());
            assert!(shape.local_aabb().unwrap().contains_local_point(p));
        }
    }
}
