use oorandom::Rand32;
use zonevis3d::bounding_volume::Aabb;
use zonevis3d::math::{Point, Real, Vector};
use zonevis3d::query::{clip_polyhedron, ClipStatus};
use zonevis3d::region::VisibilityRegion;
use zonevis3d::shape::{Plane, Polyhedron};

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

fn random_region(rng: &mut Rand32) -> VisibilityRegion {
    let cube = Polyhedron::from_aabb(&Aabb::new(
        Point::new(-5.0, -5.0, -5.0),
        Point::new(5.0, 5.0, 5.0),
    ))
    .unwrap();
    let normal = random_unit(rng);
    let offset = rng.rand_float() as Real * 2.0 - 1.0;
    let mut clipped = Polyhedron::new();

    match clip_polyhedron(&cube, &Plane::new(normal, offset), &mut clipped) {
        ClipStatus::Clipped => VisibilityRegion::from_polyhedron(clipped, 0),
        _ => VisibilityRegion::from_polyhedron(cube, 0),
    }
}

#[test]
fn shapes_touching_the_region_are_visible() {
    let mut rng = Rand32::new(42);

    for _ in 0..100 {
        let region = random_region(&mut rng);
        let polyhedron = region.polyhedron().unwrap().clone();

        for vertex in polyhedron.vertices() {
            assert!(region.point_visible(vertex));
            assert!(region.sphere_visible(vertex, 0.0));

            let dir = random_unit(&mut rng);
            let radius = rng.rand_float() as Real * 3.0;
            // The sphere touches the region at `vertex`.
            let center = vertex + dir * radius;
            assert!(region.sphere_visible(&center, radius));

            let half = Vector::repeat(radius);
            let aabb = Aabb::new(*vertex, vertex + half);
            assert!(region.aabb_visible(&aabb));
            assert!(region.box_visible(
                &(vertex + half),
                &[Vector::x() * radius, Vector::y() * radius, Vector::z() * radius]
            ));
            assert!(region.ellipsoid_visible(
                &(vertex + dir * radius * 0.5),
                &[Vector::x() * radius, Vector::y() * radius, Vector::z() * radius]
            ));
            // The axis of the cylinder goes through `vertex`.
            assert!(region.cylinder_visible(
                &(vertex - dir * 5.0),
                &(vertex + dir * 5.0),
                radius
            ));
        }
    }
}

#[test]
fn spheres_tangent_to_a_plane_are_visible() {
    let mut rng = Rand32::new(7);

    for _ in 0..50 {
        let region = random_region(&mut rng);

        let polyhedron = region.polyhedron().unwrap();

        for (i, plane) in region.planes().iter().enumerate() {
            let radius = rng.rand_float() as Real * 2.0 + 0.1;
            let face = polyhedron.face_vertices(i).unwrap();
            let on_plane = polyhedron.vertices()[face[0]];
            let center = on_plane - plane.normal * radius;

            assert!(region.sphere_visible(&center, radius));
            assert!(!region.sphere_visible(&(center - plane.normal * 0.1), radius));
        }
    }
}

#[test]
fn polygons_crossing_the_region_are_visible() {
    let mut rng = Rand32::new(3);

    for _ in 0..50 {
        let region = random_region(&mut rng);
        let polyhedron = region.polyhedron().unwrap();
        let inside = polyhedron.vertices()[0];
        let quad = [
            inside,
            inside + Vector::new(20.0, 0.0, 0.0),
            inside + Vector::new(20.0, 20.0, 0.0),
            inside + Vector::new(0.0, 20.0, 0.0),
        ];

        assert!(region.quad_visible(&quad));
        assert!(region.polygon_visible(&quad[..3]));
        assert!(region.pyramid_visible(
            &inside,
            &(inside + Vector::new(0.0, 0.0, 30.0)),
            &[Vector::x(), Vector::y()]
        ));
    }
}

#[test]
fn direction_visibility_ignores_auxiliary_planes() {
    let cube = Polyhedron::from_aabb(&Aabb::new(
        Point::new(-1.0, -1.0, 0.0),
        Point::new(1.0, 1.0, 10.0),
    ))
    .unwrap();
    // The top of the box is the last plane.
    let capped = VisibilityRegion::from_polyhedron(cube.clone(), 1);
    let uncapped = VisibilityRegion::from_polyhedron(cube, 0);

    assert!(capped.direction_visible(&Vector::z(), 0.0));
    assert!(!uncapped.direction_visible(&Vector::z(), 0.0));
    assert!(!capped.direction_visible(&-Vector::z(), 0.0));
}
