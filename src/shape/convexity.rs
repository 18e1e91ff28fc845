use crate::math::{Isometry, Point, Real};
use crate::shape::{Plane, MAX_POLYHEDRON_FACE_COUNT};
use arrayvec::ArrayVec;

/// A convex region described only by its bounding planes.
///
/// A point belongs to the region if it lies on the positive side of every
/// plane. The number of planes never exceeds [`MAX_POLYHEDRON_FACE_COUNT`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Convexity {
    planes: ArrayVec<Plane, MAX_POLYHEDRON_FACE_COUNT>,
}

impl Convexity {
    /// An empty plane set, i.e., the whole space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a convexity from a list of planes.
    ///
    /// Panics if more than [`MAX_POLYHEDRON_FACE_COUNT`] planes are given.
    pub fn from_planes(planes: &[Plane]) -> Self {
        assert!(
            planes.len() <= MAX_POLYHEDRON_FACE_COUNT,
            "a convexity holds at most {} planes",
            MAX_POLYHEDRON_FACE_COUNT
        );
        let mut res = Self::new();
        res.planes.extend(planes.iter().copied());
        res
    }

    /// The planes bounding this region.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// The number of planes bounding this region.
    #[inline]
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Is there no room left for another plane?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.planes.is_full()
    }

    /// Appends a plane.
    ///
    /// Panics if the plane set is already full.
    #[inline]
    pub fn push_plane(&mut self, plane: Plane) {
        debug_assert!(!self.planes.is_full(), "too many planes in a convexity");
        self.planes.push(plane);
    }

    /// Appends a plane, returning `false` if the plane set is full.
    #[inline]
    pub fn try_push_plane(&mut self, plane: Plane) -> bool {
        self.planes.try_push(plane).is_ok()
    }

    /// Tests if `point` is on the non-negative side of every plane, up to `epsilon`.
    pub fn contains_point(&self, point: &Point<Real>, epsilon: Real) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(point) >= -epsilon)
    }

    /// Transforms every plane by `m`.
    pub fn transform_by(&mut self, m: &Isometry<Real>) {
        for plane in &mut self.planes {
            *plane = plane.transform_by(m);
        }
    }
}
