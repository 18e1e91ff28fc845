use na::{Point2, Vector2};
use oorandom::Rand32;
use zonevis3d::math::{Point, Real, Vector};
use zonevis3d::shape::Segment;
use zonevis3d::zone::{BoxZone, CylinderZone, PolygonZone, ZoneObject, ZoneShape};

fn zones() -> Vec<ZoneObject> {
    vec![
        ZoneObject::Box(BoxZone::try_new(Vector::new(6.0, 4.0, 3.0)).unwrap()),
        ZoneObject::Cylinder(CylinderZone::try_new(Vector2::new(3.0, 1.5), 4.0).unwrap()),
        ZoneObject::Polygon(
            PolygonZone::try_new(
                &[
                    Point2::new(-2.0, -2.0),
                    Point2::new(3.0, -1.0),
                    Point2::new(2.0, 3.0),
                    Point2::new(-1.0, 2.0),
                ],
                3.0,
            )
            .unwrap(),
        ),
    ]
}

fn random_point(rng: &mut Rand32) -> Point<Real> {
    Point::new(
        rng.rand_float() as Real * 16.0 - 8.0,
        rng.rand_float() as Real * 16.0 - 8.0,
        rng.rand_float() as Real * 10.0 - 3.0,
    )
}

#[test]
fn sphere_tests_are_consistent() {
    let mut rng = Rand32::new(7);

    for zone in zones() {
        for _ in 0..2000 {
            let p = random_point(&mut rng);
            let radius = rng.rand_float() as Real * 2.0;

            if zone.interior_sphere(&p, radius) {
                assert!(zone.interior_point(&p));
                assert!(zone.interior_sphere(&p, radius * 0.5));
                assert!(!zone.exterior_sphere(&p, 0.0));
            }

            if zone.exterior_sphere(&p, radius) {
                assert!(!zone.interior_point(&p));
                assert!(zone.exterior_sphere(&p, radius * 0.5));
                assert!(!zone.interior_sphere(&p, 0.0));
            }

            if zone.interior_point(&p) {
                assert!(!zone.exterior_sphere(&p, radius));
            }
        }
    }
}

#[test]
fn far_points_are_exterior() {
    for zone in zones() {
        for dir in [Vector::x(), -Vector::x(), Vector::y(), -Vector::y(), Vector::z(), -Vector::z()] {
            let far = Point::origin() + dir * 100.0;
            assert!(zone.exterior_sphere(&far, 1.0));
            assert!(!zone.interior_point(&far));
            assert!(zone.exterior_swept_sphere(&far, &(far + dir * 10.0), 1.0));
        }
    }
}

#[test]
fn clipped_segments_stay_inside() {
    let mut rng = Rand32::new(99);

    for zone in zones() {
        for _ in 0..500 {
            let segment = Segment::new(random_point(&mut rng), random_point(&mut rng));

            if let Some((t0, t1)) = zone.clip_segment(&segment) {
                assert!(0.0 <= t0 && t0 <= t1 && t1 <= 1.0);
                let mid = segment.a + (segment.b - segment.a) * ((t0 + t1) * 0.5);
                assert!(!zone.exterior_sphere(&mid, 1.0e-3));
            } else {
                // Both endpoints can't be inside of a convex zone the segment misses.
                assert!(!zone.interior_point(&segment.a) || !zone.interior_point(&segment.b));
            }
        }
    }
}

#[test]
fn support_points_bound_the_zone() {
    let mut rng = Rand32::new(3);

    for zone in zones() {
        let polyhedron = zone.local_polyhedron().unwrap();

        for _ in 0..100 {
            let dir = random_point(&mut rng).coords;
            if dir.norm_squared() < 1.0e-3 {
                continue;
            }

            let support = zone.zone_support_point(&dir).unwrap();
            assert!(!zone.exterior_sphere(&support, 1.0e-3));

            // The polyhedron is conservative: it reaches at least as far as the zone.
            let max_vertex = polyhedron
                .vertices()
                .iter()
                .map(|v| v.coords.dot(&dir))
                .fold(Real::MIN, Real::max);
            assert!(max_vertex >= support.coords.dot(&dir) - 1.0e-3);
        }
    }
}
