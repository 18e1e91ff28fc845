use std::sync::Arc;

use zonevis3d::math::{Isometry, Point, Real, Rotation, Translation, Vector};
use zonevis3d::region::OcclusionMask;
use zonevis3d::world::{Camera, Light, RegionOwner, Source, TraversalFlags, World};
use zonevis3d::zone::{BoxZone, PortalKind, ZoneId, ZoneObject};

// Portal vertices in the wall x = 10, facing -x.
fn window(x: Real, min: Real, max: Real) -> [Point<Real>; 4] {
    [
        Point::new(x, min, min),
        Point::new(x, min, max),
        Point::new(x, max, max),
        Point::new(x, max, min),
    ]
}

fn cube() -> Arc<ZoneObject> {
    Arc::new(ZoneObject::Box(
        BoxZone::try_new(Vector::repeat(10.0)).unwrap(),
    ))
}

// Two 10x10x10 rooms side by side, A from x = 0 to 10 and B from x = 10 to 20,
// with a window from A to B and, if `back` is set, one from B to A.
fn two_rooms(min: Real, max: Real, back: bool) -> (World, ZoneId, ZoneId) {
    let mut world = World::new();
    let a = world.add_zone(cube(), Isometry::identity(), None).unwrap();
    let b = world
        .add_zone(cube(), Isometry::translation(10.0, 0.0, 0.0), None)
        .unwrap();

    let forward = world
        .add_portal(a, &window(10.0, min, max), PortalKind::Direct)
        .unwrap();
    world.connect_portal(forward, Some(b)).unwrap();
    world.preprocess_portal(forward).unwrap();

    if back {
        // Same window in the local space of B, wound the other way.
        let mut vertices = window(0.0, min, max);
        vertices.reverse();
        let backward = world.add_portal(b, &vertices, PortalKind::Direct).unwrap();
        world.connect_portal(backward, Some(a)).unwrap();
        world.preprocess_portal(backward).unwrap();
    }

    (world, a, b)
}

#[test]
fn point_light_through_a_window() {
    let (mut world, a, b) = two_rooms(4.0, 6.0, false);
    let light = world.add_light(Light::point(Point::new(5.0, 5.0, 5.0), 20.0, 0.0));
    let traversal = world.update_light(light).unwrap();

    let roots = world.root_regions(RegionOwner::Light(light));
    assert_eq!(roots.len(), 1);
    let root = world.region(roots[0]).unwrap();
    assert_eq!(root.zone(), a);
    assert_eq!(root.region().planes().len(), 6);
    assert_eq!(root.children().len(), 1);

    let child = world.region(root.children()[0]).unwrap();
    assert_eq!(child.zone(), b);
    assert_eq!(child.parent(), Some(roots[0]));
    assert!(child.portal().is_some());
    assert!(child.children().is_empty());
    // Four sides, the window, and the far wall of B.
    assert_eq!(child.region().planes().len(), 6);
    assert!(child.region().polyhedron().unwrap().validate().is_ok());

    assert!(world.light_sphere_visible(light, b, &Point::new(15.0, 5.0, 5.0), 0.1));
    assert!(!world.light_sphere_visible(light, b, &Point::new(15.0, 9.0, 5.0), 0.1));
    assert!(!world.light_sphere_visible(light, b, &Point::new(21.0, 5.0, 5.0), 0.1));
    assert!(world.light_sphere_visible(light, a, &Point::new(2.0, 8.0, 1.0), 0.1));

    // Only the root zone is marked for the whole pass.
    assert!(traversal.contains(a, TraversalFlags::GLOBAL));
    assert!(!traversal.contains(b, TraversalFlags::GLOBAL));
    for zone in [a, b] {
        assert!(!traversal.contains(zone, TraversalFlags::LOCAL));
    }

    // Rebuilding replaces the previous regions.
    let _ = world.update_light(light).unwrap();
    assert_eq!(world.owner_regions(RegionOwner::Light(light), b).count(), 1);
}

#[test]
fn light_through_a_full_wall() {
    let (mut world, a, b) = two_rooms(0.0, 10.0, false);
    let light = world.add_light(Light::point(Point::new(5.0, 5.0, 5.0), 20.0, 0.0));
    let _ = world.update_light(light).unwrap();

    let roots = world.root_regions(RegionOwner::Light(light));
    assert_eq!(roots.len(), 1);
    let root = world.region(roots[0]).unwrap();
    assert_eq!(root.zone(), a);
    assert_eq!(root.region().planes().len(), 6);
    assert_eq!(root.children().len(), 1);

    let child = world.region(root.children()[0]).unwrap();
    assert_eq!(child.zone(), b);
    // Four sides, the wall, and a cap at the far wall of B rather than at
    // the end of the range.
    let planes = child.region().planes();
    assert_eq!(planes.len(), 6);
    let cap = planes[5];
    assert!((cap.normal + Vector::x()).norm() < 1.0e-4);
    assert!((cap.w - 20.0).abs() < 1.0e-3);

    assert_eq!(world.owner_regions(RegionOwner::Light(light), a).count(), 1);
    assert_eq!(world.owner_regions(RegionOwner::Light(light), b).count(), 1);
    assert!(world.light_sphere_visible(light, b, &Point::new(19.9, 5.0, 5.0), 0.01));
    assert!(world.light_sphere_visible(light, b, &Point::new(11.0, 0.5, 9.5), 0.01));
    assert!(!world.light_sphere_visible(light, b, &Point::new(20.5, 5.0, 5.0), 0.01));
}

#[test]
fn out_of_range_lights_stay_in_their_zone() {
    let (mut world, a, b) = two_rooms(4.0, 6.0, false);
    let light = world.add_light(Light::point(Point::new(1.0, 5.0, 5.0), 5.0, 0.0));
    let _ = world.update_light(light).unwrap();

    assert_eq!(world.owner_regions(RegionOwner::Light(light), a).count(), 1);
    assert_eq!(world.owner_regions(RegionOwner::Light(light), b).count(), 0);
}

#[test]
fn cycles_terminate() {
    let (mut world, a, b) = two_rooms(4.0, 6.0, true);
    let light = world.add_light(Light::point(Point::new(5.0, 5.0, 5.0), 50.0, 0.0));
    let _ = world.update_light(light).unwrap();

    assert_eq!(world.owner_regions(RegionOwner::Light(light), a).count(), 1);
    assert_eq!(world.owner_regions(RegionOwner::Light(light), b).count(), 1);
}

#[test]
fn confinement_spheres_start_in_every_touched_zone() {
    let (mut world, a, b) = two_rooms(4.0, 6.0, true);
    let light = world.add_light(
        Light::point(Point::new(9.5, 5.0, 5.0), 20.0, 0.0).with_confinement_radius(1.0),
    );
    let traversal = world.update_light(light).unwrap();

    // B is reached through the window and still gets a root of its own.
    let roots = world.root_regions(RegionOwner::Light(light));
    assert_eq!(roots.len(), 2);
    let mut root_zones: Vec<_> = roots
        .iter()
        .map(|id| world.region(*id).unwrap().zone())
        .collect();
    root_zones.sort();
    assert_eq!(root_zones, vec![a, b]);
    assert_eq!(world.owner_regions(RegionOwner::Light(light), a).count(), 1);
    assert_eq!(world.owner_regions(RegionOwner::Light(light), b).count(), 2);
    assert!(traversal.contains(a, TraversalFlags::GLOBAL));
    assert!(traversal.contains(b, TraversalFlags::GLOBAL));

    // Without the window, the sphere still lights B.
    let (mut closed, _, b) = two_rooms(4.0, 6.0, false);
    let portal = closed.zone(closed.zones().next().unwrap().0).unwrap().portals()[0];
    closed.neutralize_portal(portal).unwrap();
    let light = closed.add_light(
        Light::point(Point::new(9.5, 5.0, 5.0), 20.0, 0.0).with_confinement_radius(1.0),
    );
    let _ = closed.update_light(light).unwrap();
    assert_eq!(closed.root_regions(RegionOwner::Light(light)).len(), 2);
    assert!(closed.light_sphere_visible(light, b, &Point::new(10.5, 5.0, 5.0), 0.1));
}

#[test]
fn small_windows_do_not_hide_the_emitter_sphere() {
    // The window sits in the far corner of the wall, away from the light.
    let (mut world, _, b) = two_rooms(8.0, 10.0, false);
    let light = world.add_light(
        Light::point(Point::new(9.5, 1.0, 1.0), 50.0, 0.0).with_confinement_radius(1.0),
    );
    let _ = world.update_light(light).unwrap();

    assert_eq!(world.root_regions(RegionOwner::Light(light)).len(), 2);
    assert_eq!(world.owner_regions(RegionOwner::Light(light), b).count(), 2);
    assert!(world.light_sphere_visible(light, b, &Point::new(10.3, 1.0, 1.0), 0.05));
}

fn camera_along_x(position: Point<Real>) -> Camera {
    let rotation =
        Rotation::<Real>::from_axis_angle(&Vector::y_axis(), core::f64::consts::FRAC_PI_2 as Real);
    Camera::new(
        Isometry::from_parts(Translation::from(position.coords), rotation),
        1.0,
        1.0,
        50.0,
    )
}

#[test]
fn occlusion_portals_hide_what_is_behind_them() {
    let (mut world, a, b) = two_rooms(0.0, 10.0, false);
    let occluder = world
        .add_portal(
            a,
            &window(8.0, 4.0, 6.0),
            PortalKind::Occlusion {
                mask: OcclusionMask::GEOMETRY,
            },
        )
        .unwrap();
    world.preprocess_portal(occluder).unwrap();

    let camera = world.add_camera(camera_along_x(Point::new(1.0, 5.0, 5.0)));
    let _ = world.update_camera(camera).unwrap();

    let roots = world.root_regions(RegionOwner::Camera(camera));
    assert_eq!(roots.len(), 1);
    let root = world.region(roots[0]).unwrap();
    assert_eq!(root.occluders().len(), 1);

    assert!(!world.camera_sphere_visible(camera, a, &Point::new(9.5, 5.0, 5.0), 0.2));
    assert!(world.camera_sphere_visible(camera, a, &Point::new(9.5, 8.0, 5.0), 0.2));
    assert!(world.camera_sphere_visible(camera, b, &Point::new(15.0, 5.0, 5.0), 0.2));
    assert!(!world.camera_sphere_visible(camera, a, &Point::new(-5.0, 5.0, 5.0), 0.2));

    // Disabled occlusion categories hide nothing.
    world.camera_mut(camera).unwrap().occlusion_mask = OcclusionMask::PORTAL;
    let _ = world.update_camera(camera).unwrap();
    assert!(world.camera_sphere_visible(camera, a, &Point::new(9.5, 5.0, 5.0), 0.2));
}

#[test]
fn sources_are_heard_through_windows() {
    let (mut world, _, b) = two_rooms(4.0, 6.0, false);
    let source = world.add_source(Source::new(Point::new(5.0, 5.0, 5.0), 20.0));
    world.update();

    assert!(world.source_sphere_audible(source, b, &Point::new(15.0, 5.0, 5.0), 0.1));
    assert!(!world.source_sphere_audible(source, b, &Point::new(15.0, 9.0, 9.0), 0.1));

    let _ = world.remove_source(source).unwrap();
    assert!(world.update_source(source).is_err());
}
