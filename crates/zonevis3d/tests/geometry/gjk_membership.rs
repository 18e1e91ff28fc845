use std::sync::Arc;

use na::Vector2;
use oorandom::Rand32;
use zonevis3d::bounding_volume::Aabb;
use zonevis3d::math::{Isometry, Point, Real, Vector};
use zonevis3d::query::gjk;
use zonevis3d::world::World;
use zonevis3d::zone::{BoxZone, CylinderZone, ZoneObject};

fn random_box(rng: &mut Rand32) -> Aabb {
    let center = Point::new(
        rng.rand_float() as Real * 20.0 - 5.0,
        rng.rand_float() as Real * 20.0 - 5.0,
        rng.rand_float() as Real * 20.0 - 5.0,
    );
    let half_extents = Vector::new(
        rng.rand_float() as Real * 3.0 + 0.1,
        rng.rand_float() as Real * 3.0 + 0.1,
        rng.rand_float() as Real * 3.0 + 0.1,
    );
    Aabb::from_half_extents(center, half_extents)
}

// The largest gap between the boxes along an axis, negative if they overlap.
fn separation(a: &Aabb, b: &Aabb) -> Real {
    (0..3)
        .map(|i| (a.mins[i] - b.maxs[i]).max(b.mins[i] - a.maxs[i]))
        .fold(Real::MIN, Real::max)
}

#[test]
fn gjk_agrees_with_box_overlap() {
    let mut rng = Rand32::new(2024);

    for _ in 0..1000 {
        let a = random_box(&mut rng);
        let b = random_box(&mut rng);
        let gap = separation(&a, &b);

        if gap.abs() < 0.05 {
            continue;
        }

        assert_eq!(
            gjk::intersection_test(&Isometry::identity(), &a, &b),
            gap < 0.0,
            "{:?} {:?}",
            a,
            b
        );
    }
}

#[test]
fn box_zone_membership() {
    let mut world = World::new();
    let id = world
        .add_zone(
            Arc::new(ZoneObject::Box(
                BoxZone::try_new(Vector::repeat(10.0)).unwrap(),
            )),
            Isometry::translation(2.0, 0.0, 0.0),
            None,
        )
        .unwrap();
    let zone = world.zone(id).unwrap();
    let zone_box = Aabb::new(Point::new(2.0, 0.0, 0.0), Point::new(12.0, 10.0, 10.0));
    let mut rng = Rand32::new(77);

    for _ in 0..500 {
        let local = random_box(&mut rng);
        let offset = Vector::new(
            rng.rand_float() as Real * 4.0 - 2.0,
            rng.rand_float() as Real * 4.0 - 2.0,
            rng.rand_float() as Real * 4.0 - 2.0,
        );
        let transform = Isometry::translation(offset.x, offset.y, offset.z);
        let world_box = Aabb::new(local.mins + offset, local.maxs + offset);
        let gap = separation(&zone_box, &world_box);

        if gap.abs() < 0.05 {
            continue;
        }

        assert_eq!(zone.intersects_bounding_box(&local, &transform), gap < 0.0);
    }
}

#[test]
fn cylinder_zone_membership() {
    let mut world = World::new();
    let id = world
        .add_zone(
            Arc::new(ZoneObject::Cylinder(
                CylinderZone::try_new(Vector2::new(4.0, 4.0), 10.0).unwrap(),
            )),
            Isometry::identity(),
            None,
        )
        .unwrap();
    let zone = world.zone(id).unwrap();
    let unit = Aabb::new(Point::new(-0.5, -0.5, -0.5), Point::new(0.5, 0.5, 0.5));

    // Along the diagonal, the cube reaches sqrt(2) / 2 beyond its center.
    let reach = 4.0 + core::f64::consts::FRAC_1_SQRT_2 as Real;
    let diagonal = |d: Real| Isometry::translation(d / 2.0_f64.sqrt() as Real, d / 2.0_f64.sqrt() as Real, 5.0);
    assert!(zone.intersects_bounding_box(&unit, &diagonal(reach - 0.1)));
    assert!(!zone.intersects_bounding_box(&unit, &diagonal(reach + 0.1)));

    // Above the cap.
    assert!(!zone.intersects_bounding_box(&unit, &Isometry::translation(0.0, 0.0, 10.6)));
    assert!(zone.intersects_bounding_box(&unit, &Isometry::translation(0.0, 0.0, 10.4)));
}
