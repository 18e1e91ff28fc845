use oorandom::Rand32;
use zonevis3d::bounding_volume::Aabb;
use zonevis3d::math::{Point, Real, Vector, BOUNDARY_EPSILON};
use zonevis3d::query::{clip_polyhedron, ClipStatus};
use zonevis3d::shape::{Plane, Polyhedron};

fn cube() -> Polyhedron {
    Polyhedron::from_aabb(&Aabb::new(
        Point::new(-1.0, -1.0, -1.0),
        Point::new(1.0, 1.0, 1.0),
    ))
    .unwrap()
}

fn random_unit(rng: &mut Rand32) -> Vector<Real> {
    loop {
        let v = Vector::new(
            rng.rand_float() as Real * 2.0 - 1.0,
            rng.rand_float() as Real * 2.0 - 1.0,
            rng.rand_float() as Real * 2.0 - 1.0,
        );
        if let Some(v) = v.try_normalize(1.0e-3) {
            return v;
        }
    }
}

#[test]
fn planes_missing_the_polyhedron() {
    let cube = cube();
    let mut result = Polyhedron::new();

    let keep_all = Plane::new(Vector::x(), 2.0);
    assert_eq!(
        clip_polyhedron(&cube, &keep_all, &mut result),
        ClipStatus::Unclipped
    );
    assert_eq!(result.vertices().len(), 8);
    assert_eq!(result.planes().len(), 6);

    let keep_none = Plane::new(Vector::x(), -2.0);
    let status = clip_polyhedron(&cube, &keep_none, &mut result);
    assert!(status.is_empty());
}

#[test]
fn cube_cut_in_half() {
    let cube = cube();
    let mut result = Polyhedron::new();

    let status = clip_polyhedron(&cube, &Plane::new(Vector::x(), 0.0), &mut result);
    assert_eq!(status, ClipStatus::Clipped);
    assert_eq!(result.vertices().len(), 8);
    assert_eq!(result.planes().len(), 6);
    assert!(result.validate().is_ok());

    let aabb = result.aabb();
    assert!((aabb.mins.x - 0.0).abs() < 1.0e-5);
    assert!((aabb.maxs.x - 1.0).abs() < 1.0e-5);
}

#[test]
fn cube_corner_cut() {
    let cube = cube();
    let mut result = Polyhedron::new();

    // Removes the corner (1, 1, 1).
    let normal = -Vector::repeat(1.0).normalize();
    let plane = Plane::from_point_and_normal(&Point::new(0.5, 1.0, 1.0), &normal);
    let status = clip_polyhedron(&cube, &plane, &mut result);

    assert_eq!(status, ClipStatus::Clipped);
    assert_eq!(result.vertices().len(), 10);
    assert_eq!(result.planes().len(), 7);
    assert!(result.validate().is_ok());
}

#[test]
fn random_cuts_stay_inside() {
    let mut rng = Rand32::new(1234);

    for _ in 0..200 {
        let mut poly = cube();

        for _ in 0..4 {
            let normal = random_unit(&mut rng);
            let offset = rng.rand_float() as Real * 1.2 - 0.6;
            let plane = Plane::new(normal, offset);
            let mut result = Polyhedron::new();

            match clip_polyhedron(&poly, &plane, &mut result) {
                ClipStatus::Empty => break,
                ClipStatus::Clipped => {
                    assert!(result.validate().is_ok());

                    for vertex in result.vertices() {
                        assert!(plane.signed_distance(vertex) > -BOUNDARY_EPSILON * 2.0);
                        assert!(poly.contains_point(vertex, BOUNDARY_EPSILON * 2.0));
                    }

                    poly = result;
                }
                ClipStatus::Unclipped | ClipStatus::Degenerate => {
                    assert_eq!(result.vertices().len(), poly.vertices().len());
                }
            }
        }
    }
}
