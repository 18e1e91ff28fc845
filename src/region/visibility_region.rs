use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Isometry, Point, Real, Vector, BOUNDARY_EPSILON};
use crate::query::{clip_polyhedron, ClipStatus};
use crate::shape::{Convexity, Plane, Polyhedron};

/// The geometric description of a visibility region.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum RegionBounds {
    /// The region is only known through its bounding planes.
    Planes(Convexity),
    /// The region is a closed polyhedron.
    Polyhedron(Polyhedron),
}

/// A convex region answering conservative visibility queries.
///
/// Every query rejects an object as soon as it lies entirely on the negative
/// side of one of the bounding planes, with a tolerance of
/// [`BOUNDARY_EPSILON`]. Otherwise the object is reported as visible, even if
/// it actually lies outside of the region near one of its edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityRegion {
    bounds: RegionBounds,
    auxiliary_plane_count: usize,
}

impl Default for VisibilityRegion {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl VisibilityRegion {
    /// A region covering the whole space.
    pub fn unbounded() -> Self {
        Self::from_convexity(Convexity::new(), 0)
    }

    /// A region bounded by the planes of `convexity`.
    ///
    /// The last `auxiliary_plane_count` planes are ignored by
    /// [`Self::direction_visible`].
    pub fn from_convexity(convexity: Convexity, auxiliary_plane_count: usize) -> Self {
        debug_assert!(auxiliary_plane_count <= convexity.plane_count());
        VisibilityRegion {
            bounds: RegionBounds::Planes(convexity),
            auxiliary_plane_count,
        }
    }

    /// A region bounded by a closed polyhedron.
    pub fn from_polyhedron(polyhedron: Polyhedron, auxiliary_plane_count: usize) -> Self {
        debug_assert!(auxiliary_plane_count <= polyhedron.planes().len());
        VisibilityRegion {
            bounds: RegionBounds::Polyhedron(polyhedron),
            auxiliary_plane_count,
        }
    }

    /// The geometric description of this region.
    #[inline]
    pub fn bounds(&self) -> &RegionBounds {
        &self.bounds
    }

    /// The planes bounding this region.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        match &self.bounds {
            RegionBounds::Planes(convexity) => convexity.planes(),
            RegionBounds::Polyhedron(polyhedron) => polyhedron.planes(),
        }
    }

    /// The polyhedron bounding this region, if it is closed.
    #[inline]
    pub fn polyhedron(&self) -> Option<&Polyhedron> {
        match &self.bounds {
            RegionBounds::Planes(_) => None,
            RegionBounds::Polyhedron(polyhedron) => Some(polyhedron),
        }
    }

    /// The number of trailing planes ignored by [`Self::direction_visible`].
    #[inline]
    pub fn auxiliary_plane_count(&self) -> usize {
        self.auxiliary_plane_count
    }

    /// Sets the number of trailing planes ignored by [`Self::direction_visible`].
    pub fn set_auxiliary_plane_count(&mut self, count: usize) {
        debug_assert!(count <= self.planes().len());
        self.auxiliary_plane_count = count;
    }

    /// Transforms this region by `m`.
    pub fn transform_by(&mut self, m: &Isometry<Real>) {
        match &mut self.bounds {
            RegionBounds::Planes(convexity) => convexity.transform_by(m),
            RegionBounds::Polyhedron(polyhedron) => polyhedron.transform_by(m),
        }
    }

    /// Intersects this region with the positive half-space of `plane`.
    ///
    /// Returns `None` if nothing is left. A closed region stays closed and its
    /// cap face, added last, joins the auxiliary planes. For a plane-only
    /// region, the plane is inserted before the auxiliary planes, or dropped
    /// if there is no room left for it.
    pub fn clip_by_plane(&self, plane: &Plane) -> Option<Self> {
        match &self.bounds {
            RegionBounds::Polyhedron(polyhedron) => {
                let mut result = Polyhedron::new();

                match clip_polyhedron(polyhedron, plane, &mut result) {
                    ClipStatus::Empty => None,
                    ClipStatus::Unclipped | ClipStatus::Degenerate => Some(self.clone()),
                    ClipStatus::Clipped => {
                        let count = clipped_auxiliary_plane_count(
                            polyhedron.planes(),
                            self.auxiliary_plane_count,
                            result.planes(),
                        );
                        Some(Self::from_polyhedron(result, count))
                    }
                }
            }
            RegionBounds::Planes(convexity) => {
                if convexity.is_full() {
                    return Some(self.clone());
                }

                let planes = convexity.planes();
                let split = planes.len() - self.auxiliary_plane_count;
                let mut clipped = Convexity::from_planes(&planes[..split]);
                clipped.push_plane(*plane);
                for aux in &planes[split..] {
                    clipped.push_plane(*aux);
                }

                Some(Self::from_convexity(clipped, self.auxiliary_plane_count))
            }
        }
    }

    /// Is `point` inside of this region?
    pub fn point_visible(&self, point: &Point<Real>) -> bool {
        self.sphere_visible(point, 0.0)
    }

    /// Can the sphere with the given center and radius intersect this region?
    pub fn sphere_visible(&self, center: &Point<Real>, radius: Real) -> bool {
        !self
            .planes()
            .iter()
            .any(|plane| rejects(plane.signed_distance(center), radius))
    }

    /// Can the given bounding sphere intersect this region?
    #[inline]
    pub fn bounding_sphere_visible(&self, sphere: &BoundingSphere) -> bool {
        self.sphere_visible(sphere.center(), sphere.radius())
    }

    /// Can the oriented box with the given center and half-axes intersect this region?
    pub fn box_visible(&self, center: &Point<Real>, half_axes: &[Vector<Real>; 3]) -> bool {
        !self.planes().iter().any(|plane| {
            let radius: Real = half_axes.iter().map(|a| plane.normal.dot(a).abs()).sum();
            rejects(plane.signed_distance(center), radius)
        })
    }

    /// Can the axis-aligned box `aabb` intersect this region?
    pub fn aabb_visible(&self, aabb: &Aabb) -> bool {
        let center = aabb.center();
        let half_extents = aabb.half_extents();

        !self.planes().iter().any(|plane| {
            let radius = plane.normal.abs().dot(&half_extents);
            rejects(plane.signed_distance(&center), radius)
        })
    }

    /// Can the ellipsoid with the given center and semi-axes intersect this region?
    pub fn ellipsoid_visible(&self, center: &Point<Real>, axes: &[Vector<Real>; 3]) -> bool {
        !self.planes().iter().any(|plane| {
            let radius = axes
                .iter()
                .map(|a| {
                    let d = plane.normal.dot(a);
                    d * d
                })
                .sum::<Real>()
                .sqrt();
            rejects(plane.signed_distance(center), radius)
        })
    }

    /// Can the cylinder with axis `[p1, p2]` and the given radius intersect this region?
    ///
    /// The axis is shortened plane after plane to the part that can still be
    /// visible.
    pub fn cylinder_visible(&self, p1: &Point<Real>, p2: &Point<Real>, radius: Real) -> bool {
        let axis = p2 - p1;
        let sq_len = axis.norm_squared();

        if sq_len <= BOUNDARY_EPSILON * BOUNDARY_EPSILON {
            return self.sphere_visible(p1, radius);
        }

        let mut a = *p1;
        let mut b = *p2;

        for plane in self.planes() {
            let na = plane.normal.dot(&axis);
            let effective_radius = radius * (1.0 - na * na / sq_len).max(0.0).sqrt();
            let da = plane.signed_distance(&a);
            let db = plane.signed_distance(&b);
            let a_out = rejects(da, effective_radius);
            let b_out = rejects(db, effective_radius);

            if a_out && b_out {
                return false;
            }

            // Move the rejected endpoint to where the cylinder starts touching the plane.
            if a_out {
                let t = (-effective_radius - da) / (db - da);
                a += (b - a) * t;
            } else if b_out {
                let t = (-effective_radius - db) / (da - db);
                b += (a - b) * t;
            }
        }

        true
    }

    /// Can the quad with the given vertices intersect this region?
    #[inline]
    pub fn quad_visible(&self, vertices: &[Point<Real>; 4]) -> bool {
        self.polygon_visible(vertices)
    }

    /// Can the convex polygon with the given vertices intersect this region?
    pub fn polygon_visible(&self, vertices: &[Point<Real>]) -> bool {
        !self.planes().iter().any(|plane| {
            vertices
                .iter()
                .all(|v| rejects(plane.signed_distance(v), 0.0))
        })
    }

    /// Can the pyramid with the given apex and rectangular base intersect this region?
    ///
    /// The base is centered at `base_center` and spanned by the two half-axes.
    pub fn pyramid_visible(
        &self,
        apex: &Point<Real>,
        base_center: &Point<Real>,
        base_half_axes: &[Vector<Real>; 2],
    ) -> bool {
        !self.planes().iter().any(|plane| {
            let radius: Real = base_half_axes
                .iter()
                .map(|a| plane.normal.dot(a).abs())
                .sum();
            rejects(plane.signed_distance(apex), 0.0)
                && rejects(plane.signed_distance(base_center), radius)
        })
    }

    /// Can something infinitely far away in the unit direction `direction`
    /// be seen in this region?
    ///
    /// `radius` is the sine of the angular radius of the object. The trailing
    /// auxiliary planes are not tested.
    pub fn direction_visible(&self, direction: &Vector<Real>, radius: Real) -> bool {
        let planes = self.planes();
        let count = planes.len() - self.auxiliary_plane_count.min(planes.len());

        !planes[..count]
            .iter()
            .any(|plane| plane.normal.dot(direction) < -radius)
    }
}

/// The auxiliary plane count of a clipped polyhedron.
///
/// Surviving faces keep their order and the cap comes last, so the result ends
/// with the surviving auxiliary planes followed by the cap.
fn clipped_auxiliary_plane_count(input: &[Plane], aux: usize, clipped: &[Plane]) -> usize {
    let aux_planes = &input[input.len() - aux.min(input.len())..];
    let kept = clipped.len().saturating_sub(1);

    clipped[..kept]
        .iter()
        .rev()
        .take_while(|plane| aux_planes.contains(*plane))
        .count()
        + 1
}

#[inline]
fn rejects(distance: Real, radius: Real) -> bool {
    distance < -(radius + BOUNDARY_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube_region() -> VisibilityRegion {
        let poly =
            Polyhedron::from_aabb(&Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0))).unwrap();
        VisibilityRegion::from_polyhedron(poly, 0)
    }

    #[test]
    fn tangent_shapes_are_visible() {
        let region = unit_cube_region();

        assert!(region.sphere_visible(&Point::new(1.5, 0.5, 0.5), 0.5));
        assert!(!region.sphere_visible(&Point::new(1.6, 0.5, 0.5), 0.5));
        assert!(region.aabb_visible(&Aabb::new(
            Point::new(1.0, 0.0, 0.0),
            Point::new(2.0, 1.0, 1.0)
        )));
        assert!(!region.aabb_visible(&Aabb::new(
            Point::new(1.1, 0.0, 0.0),
            Point::new(2.0, 1.0, 1.0)
        )));
    }

    #[test]
    fn oriented_box_and_ellipsoid() {
        let region = unit_cube_region();
        let s = (0.5 as Real).sqrt();
        let axes = [
            Vector::new(s, s, 0.0),
            Vector::new(-s, s, 0.0),
            Vector::new(0.0, 0.0, 0.5),
        ];

        // Diagonal box whose corner reaches x = 2 - sqrt(2).
        assert!(region.box_visible(&Point::new(2.0, 0.5, 0.5), &axes));
        assert!(!region.box_visible(&Point::new(2.5, 0.5, 0.5), &axes));
        // The ellipsoid is thinner than the box along x.
        assert!(region.ellipsoid_visible(&Point::new(1.9, 0.5, 0.5), &axes));
        assert!(!region.ellipsoid_visible(&Point::new(2.1, 0.5, 0.5), &axes));
    }

    #[test]
    fn cylinder_narrowing() {
        let region = unit_cube_region();

        // Crosses the cube.
        assert!(region.cylinder_visible(
            &Point::new(-5.0, 0.5, 0.5),
            &Point::new(5.0, 0.5, 0.5),
            0.1
        ));
        // Runs alongside the cube without reaching it.
        assert!(!region.cylinder_visible(
            &Point::new(-5.0, 1.5, 0.5),
            &Point::new(5.0, 1.5, 0.5),
            0.2
        ));
        // Diagonal segment passing above the corner (1, 1, z).
        assert!(!region.cylinder_visible(
            &Point::new(0.0, 2.5, 0.5),
            &Point::new(2.5, 0.0, 0.5),
            0.1
        ));
        assert!(region.cylinder_visible(
            &Point::new(0.0, 1.5, 0.5),
            &Point::new(1.5, 0.0, 0.5),
            0.1
        ));
    }

    #[test]
    fn polygons_and_pyramids() {
        let region = unit_cube_region();
        let quad = [
            Point::new(2.0, 0.0, 0.0),
            Point::new(3.0, 0.0, 0.0),
            Point::new(3.0, 1.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
        ];
        assert!(!region.quad_visible(&quad));

        let straddling = [
            Point::new(0.5, 0.5, 0.5),
            Point::new(3.0, 0.0, 0.0),
            Point::new(3.0, 1.0, 0.0),
        ];
        assert!(region.polygon_visible(&straddling));

        let half_axes = [Vector::new(0.0, 0.5, 0.0), Vector::new(0.0, 0.0, 0.5)];
        assert!(region.pyramid_visible(
            &Point::new(0.9, 0.5, 0.5),
            &Point::new(3.0, 0.5, 0.5),
            &half_axes
        ));
        assert!(!region.pyramid_visible(
            &Point::new(1.5, 0.5, 0.5),
            &Point::new(3.0, 0.5, 0.5),
            &half_axes
        ));
    }

    #[test]
    fn direction_ignores_auxiliary_planes() {
        let planes = [
            Plane::new(Vector::x(), 0.0),
            Plane::new(Vector::y(), 0.0),
            Plane::new(-Vector::x(), 10.0),
        ];
        let mut region = VisibilityRegion::from_convexity(Convexity::from_planes(&planes), 0);
        assert!(!region.direction_visible(&Vector::x(), 0.0));

        region.set_auxiliary_plane_count(1);
        assert!(region.direction_visible(&Vector::x(), 0.0));
        assert!(!region.direction_visible(&-Vector::y(), 0.0));
        assert!(region.direction_visible(&-Vector::y(), 1.0));
    }

    #[test]
    fn clipping_keeps_auxiliary_planes() {
        // The last face of the cube, z <= 1, is auxiliary.
        let mut region = unit_cube_region();
        region.set_auxiliary_plane_count(1);
        assert!(region.direction_visible(&Vector::z(), 0.0));

        let half = region
            .clip_by_plane(&Plane::new(-Vector::x(), 0.5))
            .unwrap();
        assert_eq!(half.auxiliary_plane_count(), 2);
        assert!(half.direction_visible(&Vector::z(), 0.0));
        assert!(!half.direction_visible(&-Vector::z(), 0.0));
        assert!(!half.direction_visible(&-Vector::x(), 0.0));

        // Nothing to cut: the count is unchanged.
        let same = region
            .clip_by_plane(&Plane::new(Vector::x(), 1.0))
            .unwrap();
        assert_eq!(same.auxiliary_plane_count(), 1);
    }

    #[test]
    fn clipping_a_region() {
        let region = unit_cube_region();
        let half = region
            .clip_by_plane(&Plane::new(-Vector::x(), 0.5))
            .unwrap();
        assert!(half.polyhedron().is_some());
        assert!(!half.point_visible(&Point::new(0.75, 0.5, 0.5)));
        assert!(half.point_visible(&Point::new(0.25, 0.5, 0.5)));
        assert!(region.clip_by_plane(&Plane::new(Vector::x(), -2.0)).is_none());

        let open = VisibilityRegion::from_convexity(
            Convexity::from_planes(&[Plane::new(Vector::x(), 0.0), Plane::new(-Vector::x(), 5.0)]),
            1,
        );
        let clipped = open.clip_by_plane(&Plane::new(Vector::y(), 0.0)).unwrap();
        assert_eq!(clipped.planes().len(), 3);
        assert_eq!(clipped.planes()[1], Plane::new(Vector::y(), 0.0));
        assert_eq!(clipped.auxiliary_plane_count(), 1);
    }
}
