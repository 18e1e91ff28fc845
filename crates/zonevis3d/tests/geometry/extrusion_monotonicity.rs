use zonevis3d::math::{Point, Real, Vector};
use zonevis3d::region::{point_polygon_extrusion, polygon_extrusion, VisibilityRegion};
use zonevis3d::shape::Plane;

fn square(x: Real, min: Real, max: Real) -> [Point<Real>; 4] {
    [
        Point::new(x, min, min),
        Point::new(x, max, min),
        Point::new(x, max, max),
        Point::new(x, min, max),
    ]
}

fn assert_inside(inner: &VisibilityRegion, outer: &VisibilityRegion) {
    for vertex in inner.polyhedron().unwrap().vertices() {
        for plane in outer.planes() {
            assert!(
                plane.signed_distance(vertex) > -1.0e-3,
                "{:?} is outside of {:?}",
                vertex,
                plane
            );
        }
    }
}

#[test]
fn camera_regions_shrink_with_their_portal() {
    let eye = Point::new(0.0, 5.0, 5.0);
    let outer = polygon_extrusion(
        &square(10.0, 0.0, 10.0),
        &eye,
        &Vector::x(),
        30.0,
        &Plane::new(Vector::x(), -10.0),
        |_| None,
    )
    .unwrap();

    // A portal further away, seen through the first one.
    let inner = polygon_extrusion(
        &square(20.0, 2.0, 8.0),
        &eye,
        &Vector::x(),
        30.0,
        &Plane::new(Vector::x(), -20.0),
        |_| None,
    )
    .unwrap();

    assert_inside(&inner, &outer);
    assert!(outer.point_visible(&Point::new(25.0, 13.0, 5.0)));
    assert!(!inner.point_visible(&Point::new(25.0, 13.0, 5.0)));
}

#[test]
fn light_regions_shrink_with_their_range() {
    let light = Point::new(5.0, 5.0, 5.0);
    let portal = square(10.0, 0.0, 10.0);
    let front = Plane::new(Vector::x(), -10.0);

    let long = point_polygon_extrusion(&portal, &light, 30.0, 0.0, &front, |_| None).unwrap();
    let short = point_polygon_extrusion(&portal, &light, 15.0, 0.0, &front, |_| None).unwrap();
    assert_inside(&short, &long);

    // The zone bounds the region before the range does.
    let bounded = point_polygon_extrusion(&portal, &light, 30.0, 0.0, &front, |_| {
        Some(Point::new(14.0, 0.0, 0.0))
    })
    .unwrap();
    assert_inside(&bounded, &short);
}

#[test]
fn confinement_only_widens() {
    let light = Point::new(5.0, 5.0, 5.0);
    let portal = square(10.0, 0.0, 10.0);
    let front = Plane::new(Vector::x(), -10.0);

    let point = point_polygon_extrusion(&portal, &light, 20.0, 0.0, &front, |_| None).unwrap();

    for radius in [0.5, 1.0, 2.0] {
        let sphere = point_polygon_extrusion(&portal, &light, 20.0, radius, &front, |_| None).unwrap();

        for vertex in point.polyhedron().unwrap().vertices() {
            assert!(sphere.point_visible(vertex));
        }
    }
}
