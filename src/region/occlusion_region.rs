use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, BOUNDARY_EPSILON};
use crate::shape::Plane;
use crate::utils;
use arrayvec::ArrayVec;

/// The maximum number of planes bounding an occlusion region.
pub const MAX_OCCLUSION_PLANE_COUNT: usize = 32;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
/// The categories of objects an occlusion region is allowed to hide.
pub struct OcclusionMask(u32);

bitflags::bitflags! {
    impl OcclusionMask: u32 {
        /// Regular scene geometry.
        const GEOMETRY = 1;
        /// Portals leading to other zones.
        const PORTAL = 1 << 1;
        /// Fog volumes.
        const FOG = 1 << 2;
        /// Shadow cascades.
        const CASCADE = 1 << 3;
    }
}

/// A convex region hidden behind an occluder, as seen from a camera.
///
/// An object is occluded only if it lies entirely on the positive side of
/// every plane of the region. An empty region occludes nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct OcclusionRegion {
    planes: ArrayVec<Plane, MAX_OCCLUSION_PLANE_COUNT>,
    occlusion_mask: OcclusionMask,
}

impl OcclusionRegion {
    /// Builds the region hidden by the convex polygon `vertices` as seen from `camera_position`.
    ///
    /// One plane is created through the camera position and each edge of the
    /// polygon. An edge is skipped when both its endpoints lie behind, or
    /// within `2 * BOUNDARY_EPSILON` of, one of the `frustum_planes` passing
    /// through the camera position: the part of the region it would bound is
    /// not visible anyway. The `front_planes` are appended as-is, and are
    /// usually the plane of the occluder oriented away from the camera.
    ///
    /// Returns `None` if the polygon is degenerate as seen from the camera or
    /// if there are too many planes.
    pub fn new(
        camera_position: &Point<Real>,
        vertices: &[Point<Real>],
        frustum_planes: &[Plane],
        front_planes: &[Plane],
        occlusion_mask: OcclusionMask,
    ) -> Option<Self> {
        let n = vertices.len();

        if n < 3 {
            return None;
        }

        let centroid = utils::polygon_centroid(vertices);
        let mut planes = ArrayVec::new();
        let eye_planes: ArrayVec<&Plane, MAX_OCCLUSION_PLANE_COUNT> = frustum_planes
            .iter()
            .filter(|plane| plane.signed_distance(camera_position).abs() <= BOUNDARY_EPSILON)
            .take(MAX_OCCLUSION_PLANE_COUNT)
            .collect();

        for (i, a) in vertices.iter().enumerate() {
            let b = &vertices[(i + 1) % n];
            let culled = eye_planes.iter().any(|plane| {
                plane.signed_distance(a) <= BOUNDARY_EPSILON * 2.0
                    && plane.signed_distance(b) <= BOUNDARY_EPSILON * 2.0
            });

            if culled {
                continue;
            }

            let normal = (a - camera_position).cross(&(b - camera_position));
            let plane = Plane::oriented_toward(&normal, camera_position, &centroid)?;

            if plane.signed_distance(&centroid) <= BOUNDARY_EPSILON {
                return None;
            }

            planes.try_push(plane).ok()?;
        }

        for plane in front_planes {
            planes.try_push(*plane).ok()?;
        }

        Some(OcclusionRegion {
            planes,
            occlusion_mask,
        })
    }

    /// The planes bounding this region.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// The categories of objects this region hides.
    #[inline]
    pub fn occlusion_mask(&self) -> OcclusionMask {
        self.occlusion_mask
    }

    /// Does this region hide objects of any of the given categories?
    #[inline]
    pub fn occludes(&self, mask: OcclusionMask) -> bool {
        self.occlusion_mask.intersects(mask)
    }

    fn all_planes(&self, mut inside: impl FnMut(&Plane) -> bool) -> bool {
        !self.planes.is_empty() && self.planes.iter().all(|plane| inside(plane))
    }

    /// Is `point` hidden?
    pub fn point_occluded(&self, point: &Point<Real>) -> bool {
        self.sphere_occluded(point, 0.0)
    }

    /// Is the sphere with the given center and radius entirely hidden?
    pub fn sphere_occluded(&self, center: &Point<Real>, radius: Real) -> bool {
        self.all_planes(|plane| plane.signed_distance(center) > radius)
    }

    /// Is the oriented box with the given center and half-axes entirely hidden?
    pub fn box_occluded(&self, center: &Point<Real>, half_axes: &[Vector<Real>; 3]) -> bool {
        self.all_planes(|plane| {
            let radius: Real = half_axes.iter().map(|a| plane.normal.dot(a).abs()).sum();
            plane.signed_distance(center) > radius
        })
    }

    /// Is the axis-aligned box `aabb` entirely hidden?
    pub fn aabb_occluded(&self, aabb: &Aabb) -> bool {
        let center = aabb.center();
        let half_extents = aabb.half_extents();

        self.all_planes(|plane| {
            plane.signed_distance(&center) > plane.normal.abs().dot(&half_extents)
        })
    }

    /// Is the ellipsoid with the given center and semi-axes entirely hidden?
    pub fn ellipsoid_occluded(&self, center: &Point<Real>, axes: &[Vector<Real>; 3]) -> bool {
        self.all_planes(|plane| {
            let radius = axes
                .iter()
                .map(|a| {
                    let d = plane.normal.dot(a);
                    d * d
                })
                .sum::<Real>()
                .sqrt();
            plane.signed_distance(center) > radius
        })
    }

    /// Is the cylinder with axis `[p1, p2]` and the given radius entirely hidden?
    pub fn cylinder_occluded(&self, p1: &Point<Real>, p2: &Point<Real>, radius: Real) -> bool {
        let axis = p2 - p1;
        let sq_len = axis.norm_squared();

        self.all_planes(|plane| {
            let effective_radius = if sq_len > 0.0 {
                let na = plane.normal.dot(&axis);
                radius * (1.0 - na * na / sq_len).max(0.0).sqrt()
            } else {
                radius
            };

            plane.signed_distance(p1) > effective_radius
                && plane.signed_distance(p2) > effective_radius
        })
    }

    /// Is the quad with the given vertices entirely hidden?
    #[inline]
    pub fn quad_occluded(&self, vertices: &[Point<Real>; 4]) -> bool {
        self.polygon_occluded(vertices)
    }

    /// Is the polygon with the given vertices entirely hidden?
    pub fn polygon_occluded(&self, vertices: &[Point<Real>]) -> bool {
        !vertices.is_empty()
            && self.all_planes(|plane| vertices.iter().all(|v| plane.signed_distance(v) > 0.0))
    }
}
