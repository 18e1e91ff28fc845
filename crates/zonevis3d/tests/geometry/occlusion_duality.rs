use zonevis3d::bounding_volume::Aabb;
use zonevis3d::math::{Point, Real, Vector};
use zonevis3d::region::{OcclusionMask, OcclusionRegion};
use zonevis3d::shape::Plane;

// A 2x2 square at z = 5, seen from the origin.
fn occluder() -> OcclusionRegion {
    let square = [
        Point::new(-1.0, -1.0, 5.0),
        Point::new(1.0, -1.0, 5.0),
        Point::new(1.0, 1.0, 5.0),
        Point::new(-1.0, 1.0, 5.0),
    ];
    OcclusionRegion::new(
        &Point::origin(),
        &square,
        &[],
        &[Plane::new(Vector::z(), -5.0)],
        OcclusionMask::GEOMETRY,
    )
    .unwrap()
}

#[test]
fn shapes_straddling_a_plane_are_not_occluded() {
    let region = occluder();

    for plane in region.planes() {
        // A point of the plane well inside of every other plane.
        let on_plane = plane.project_point(&Point::new(0.0, 0.0, 8.0));
        let radius: Real = 0.25;

        assert!(!region.sphere_occluded(&on_plane, radius));
        assert!(!region.point_occluded(&(on_plane - plane.normal * 0.01)));
        assert!(!region.aabb_occluded(&Aabb::from_half_extents(
            on_plane,
            Vector::repeat(radius)
        )));
        assert!(!region.box_occluded(
            &on_plane,
            &[Vector::x() * radius, Vector::y() * radius, Vector::z() * radius]
        ));
        assert!(!region.ellipsoid_occluded(
            &on_plane,
            &[Vector::x() * radius, Vector::y() * radius, Vector::z() * radius]
        ));
        assert!(!region.cylinder_occluded(
            &on_plane,
            &(on_plane + Vector::new(0.0, 0.0, 0.5)),
            radius
        ));
    }
}

#[test]
fn shapes_hidden_behind_the_occluder() {
    let region = occluder();
    let behind = Point::new(0.0, 0.0, 10.0);
    let axes = [Vector::x() * 0.5, Vector::y() * 0.5, Vector::z() * 0.5];

    assert!(region.point_occluded(&behind));
    assert!(region.sphere_occluded(&behind, 0.5));
    assert!(region.box_occluded(&behind, &axes));
    assert!(region.ellipsoid_occluded(&behind, &axes));
    assert!(region.aabb_occluded(&Aabb::from_half_extents(behind, Vector::repeat(0.5))));
    assert!(region.cylinder_occluded(&behind, &Point::new(0.0, 0.0, 12.0), 0.5));
    assert!(region.quad_occluded(&[
        Point::new(-0.5, -0.5, 10.0),
        Point::new(0.5, -0.5, 10.0),
        Point::new(0.5, 0.5, 10.0),
        Point::new(-0.5, 0.5, 10.0),
    ]));

    // In front of the occluder, or too large to fit in its shadow.
    assert!(!region.sphere_occluded(&Point::new(0.0, 0.0, 4.0), 0.1));
    assert!(!region.sphere_occluded(&behind, 3.0));
    assert!(!region.polygon_occluded(&[
        Point::new(-5.0, -0.5, 10.0),
        Point::new(0.5, -0.5, 10.0),
        Point::new(0.5, 0.5, 10.0),
    ]));
}
