//! The Gilbert-Johnson-Keerthi algorithm, restricted to boolean overlap tests.

use crate::math::{Isometry, Real, Vector, DEFAULT_EPSILON};
use crate::query::gjk::{CSOPoint, Simplex};
use crate::shape::SupportMap;

const MAX_ITERATIONS: usize = 64;

/// The absolute tolerance used by the GJK algorithm.
pub fn eps_tol() -> Real {
    DEFAULT_EPSILON * 10.0
}

/// Tests if two support-mapped shapes overlap.
///
/// `pos12` is the position of `g2` relative to `g1`. Touching shapes are
/// reported as overlapping, and so are configurations for which the algorithm
/// fails to converge, so that callers relying on this test for culling never
/// drop something they should have kept.
pub fn intersection_test<G1, G2>(pos12: &Isometry<Real>, g1: &G1, g2: &G2) -> bool
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let eps_tol = eps_tol();
    let eps_rel = eps_tol.sqrt();

    let mut dir = pos12.translation.vector;
    if dir.norm_squared() <= eps_tol {
        dir = Vector::x();
    }

    let mut simplex = Simplex::new();
    simplex.reset(CSOPoint::from_shapes(pos12, g1, g2, &dir));
    let mut proj = simplex.project_origin_and_reduce();

    for _ in 0..MAX_ITERATIONS {
        let sq_dist = proj.coords.norm_squared();

        if sq_dist <= eps_tol * eps_tol {
            // The origin is on the simplex.
            return true;
        }

        let cso_point = CSOPoint::from_shapes(pos12, g1, g2, &-proj.coords);
        let min_bound = proj.coords.dot(&cso_point.point.coords);

        if min_bound > 0.0 {
            // `-proj` is a separating axis.
            return false;
        }

        if sq_dist - min_bound <= eps_rel * sq_dist || !simplex.add_point(cso_point) {
            // No progress can be made anymore: the distance found is exact.
            return sq_dist <= eps_tol;
        }

        proj = simplex.project_origin_and_reduce();
    }

    log::debug!("GJK overlap test did not converge, assuming an intersection.");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Translation};
    use na::UnitQuaternion;

    #[test]
    fn boxes_overlap() {
        let a = Aabb::new(Point::origin(), Point::new(2.0, 2.0, 2.0));
        let b = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));

        assert!(intersection_test(&Isometry::identity(), &a, &b));
        assert!(intersection_test(
            &Isometry::translation(2.5, 0.5, 0.5),
            &a,
            &b
        ));
        assert!(!intersection_test(
            &Isometry::translation(3.5, 0.5, 0.5),
            &a,
            &b
        ));
    }

    #[test]
    fn rotated_box_near_corner() {
        let a = Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point::new(-0.5, -0.5, -0.5), Point::new(0.5, 0.5, 0.5));
        let rot = UnitQuaternion::from_euler_angles(0.0, 0.0, core::f64::consts::FRAC_PI_4 as Real);

        // The rotated cube reaches `sqrt(2) / 2` away from its center along the diagonal.
        let near = Isometry::from_parts(Translation::new(1.3, 1.3, 0.5), rot);
        let far = Isometry::from_parts(Translation::new(1.5, 1.5, 0.5), rot);
        assert!(intersection_test(&near, &a, &b));
        assert!(!intersection_test(&far, &a, &b));
    }
}
