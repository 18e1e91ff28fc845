use crate::math::{Isometry, Point, Real, Vector};
use crate::region::OcclusionMask;
use crate::shape::Plane;

/// Handle of a camera stored in a [`World`](crate::world::World).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub(crate) usize);

/// A perspective camera looking along its local `+z` axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// The world transform of the camera.
    pub transform: Isometry<Real>,
    /// The tangent of half the horizontal field of view.
    pub projection_tangent: Real,
    /// The ratio between the vertical and horizontal extents of the view.
    pub aspect_ratio: Real,
    /// The distance along the view direction beyond which nothing is seen.
    pub far_depth: Real,
    /// The occlusion portal categories this camera takes into account.
    pub occlusion_mask: OcclusionMask,
}

impl Camera {
    /// Creates a camera.
    pub fn new(
        transform: Isometry<Real>,
        projection_tangent: Real,
        aspect_ratio: Real,
        far_depth: Real,
    ) -> Self {
        Camera {
            transform,
            projection_tangent,
            aspect_ratio,
            far_depth,
            occlusion_mask: OcclusionMask::all(),
        }
    }

    /// The world-space position of the camera.
    #[inline]
    pub fn position(&self) -> Point<Real> {
        Point::from(self.transform.translation.vector)
    }

    /// The world-space direction the camera looks at.
    #[inline]
    pub fn view_direction(&self) -> Vector<Real> {
        self.transform * Vector::z()
    }

    /// The five world-space planes of the view frustum.
    ///
    /// The four side planes pass through the camera position and come first,
    /// the far plane comes last.
    pub fn frustum_planes(&self) -> [Plane; 5] {
        pyramid_planes(
            &self.transform,
            self.projection_tangent,
            self.projection_tangent * self.aspect_ratio,
            self.far_depth,
        )
    }
}

/// The planes of the pyramid with its apex at the origin of `transform`,
/// opening along the local `+z` axis and capped at `depth`.
pub(crate) fn pyramid_planes(
    transform: &Isometry<Real>,
    tan_x: Real,
    tan_y: Real,
    depth: Real,
) -> [Plane; 5] {
    [
        Plane::new(Vector::new(-1.0, 0.0, tan_x).normalize(), 0.0),
        Plane::new(Vector::new(1.0, 0.0, tan_x).normalize(), 0.0),
        Plane::new(Vector::new(0.0, -1.0, tan_y).normalize(), 0.0),
        Plane::new(Vector::new(0.0, 1.0, tan_y).normalize(), 0.0),
        Plane::new(-Vector::z(), depth),
    ]
    .map(|plane| plane.transform_by(transform))
}
