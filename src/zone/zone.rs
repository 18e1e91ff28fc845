use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Isometry, Point, Real, Vector, BOUNDARY_EPSILON};
use crate::query::gjk;
use crate::shape::{Plane, Polyhedron, Segment};
use crate::world::RegionId;
use crate::zone::{PortalId, ZoneId, ZoneObject, ZoneShape};
use alloc::sync::Arc;

/// Errors raised when building a zone shape.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZoneError {
    /// One of the dimensions of the zone is not positive.
    #[error("the dimensions of a zone must be positive")]
    InvalidSize,
    /// The base polygon has less than 3 vertices.
    #[error("a zone polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// The base polygon has too many vertices.
    #[error("a zone polygon has at most {max} vertices, got {count}")]
    TooManyVertices {
        /// The number of vertices provided.
        count: usize,
        /// The maximum number of vertices allowed.
        max: usize,
    },
    /// The base polygon is not convex or not counterclockwise.
    #[error("the zone polygon is not convex or not counterclockwise")]
    NotConvex,
}

/// A box inside of a zone outside of which lights cast no shadows.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct ShadowSpace {
    /// The box, in the local space of the zone.
    pub aabb: Aabb,
}

impl ShadowSpace {
    /// Creates a shadow space from a box in the local space of its zone.
    pub fn new(aabb: Aabb) -> Self {
        ShadowSpace { aabb }
    }

    /// The six inward planes of this shadow space, in world space.
    pub fn world_planes(&self, zone_transform: &Isometry<Real>) -> [Plane; 6] {
        let (mins, maxs) = (self.aabb.mins, self.aabb.maxs);
        [
            Plane::new(Vector::x(), -mins.x),
            Plane::new(-Vector::x(), maxs.x),
            Plane::new(Vector::y(), -mins.y),
            Plane::new(-Vector::y(), maxs.y),
            Plane::new(Vector::z(), -mins.z),
            Plane::new(-Vector::z(), maxs.z),
        ]
        .map(|plane| plane.transform_by(zone_transform))
    }
}

/// A node of the zone hierarchy.
///
/// Zones own their subzones and the portals leading out of them, but never
/// the zones those portals connect to. The region lists are rebuilt by every
/// [`World::update`](crate::world::World::update).
#[derive(Clone, Debug)]
pub struct Zone {
    pub(crate) parent: Option<ZoneId>,
    pub(crate) subzones: Vec<ZoneId>,
    pub(crate) transform: Isometry<Real>,
    pub(crate) object: Arc<ZoneObject>,
    pub(crate) portals: Vec<PortalId>,
    pub(crate) occlusion_portals: Vec<PortalId>,
    pub(crate) shadow_space: Option<ShadowSpace>,
    pub(crate) camera_regions: Vec<RegionId>,
    pub(crate) light_regions: Vec<RegionId>,
    pub(crate) source_regions: Vec<RegionId>,
}

impl Zone {
    /// Creates a zone with the given shape placed at `transform`.
    pub fn new(object: Arc<ZoneObject>, transform: Isometry<Real>) -> Self {
        Zone {
            parent: None,
            subzones: Vec::new(),
            transform,
            object,
            portals: Vec::new(),
            occlusion_portals: Vec::new(),
            shadow_space: None,
            camera_regions: Vec::new(),
            light_regions: Vec::new(),
            source_regions: Vec::new(),
        }
    }

    /// The zone containing this one.
    #[inline]
    pub fn parent(&self) -> Option<ZoneId> {
        self.parent
    }

    /// The zones directly contained by this one.
    #[inline]
    pub fn subzones(&self) -> &[ZoneId] {
        &self.subzones
    }

    /// The world transform of this zone.
    #[inline]
    pub fn transform(&self) -> &Isometry<Real> {
        &self.transform
    }

    /// The shape of this zone.
    #[inline]
    pub fn object(&self) -> &Arc<ZoneObject> {
        &self.object
    }

    /// The registered direct and remote portals leading out of this zone.
    #[inline]
    pub fn portals(&self) -> &[PortalId] {
        &self.portals
    }

    /// The registered occlusion portals of this zone.
    #[inline]
    pub fn occlusion_portals(&self) -> &[PortalId] {
        &self.occlusion_portals
    }

    /// The shadow space of this zone.
    #[inline]
    pub fn shadow_space(&self) -> Option<&ShadowSpace> {
        self.shadow_space.as_ref()
    }

    /// The camera regions built inside of this zone.
    #[inline]
    pub fn camera_regions(&self) -> &[RegionId] {
        &self.camera_regions
    }

    /// The light regions built inside of this zone.
    #[inline]
    pub fn light_regions(&self) -> &[RegionId] {
        &self.light_regions
    }

    /// The sound source regions built inside of this zone.
    #[inline]
    pub fn source_regions(&self) -> &[RegionId] {
        &self.source_regions
    }

    /// Is the world-space `point` inside of this zone?
    pub fn interior_point(&self, point: &Point<Real>) -> bool {
        self.object
            .interior_point(&self.transform.inverse_transform_point(point))
    }

    /// Is the world-space sphere entirely inside of this zone?
    pub fn interior_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        self.object
            .interior_sphere(&self.transform.inverse_transform_point(center), radius)
    }

    /// Is the world-space sphere entirely outside of this zone?
    pub fn exterior_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        self.object
            .exterior_sphere(&self.transform.inverse_transform_point(center), radius)
    }

    /// Is the world-space swept sphere entirely inside of this zone?
    pub fn interior_swept_sphere(&self, p1: &Point<Real>, p2: &Point<Real>, radius: Real) -> bool {
        self.object.interior_swept_sphere(
            &self.transform.inverse_transform_point(p1),
            &self.transform.inverse_transform_point(p2),
            radius,
        )
    }

    /// Is the world-space swept sphere entirely outside of this zone?
    pub fn exterior_swept_sphere(&self, p1: &Point<Real>, p2: &Point<Real>, radius: Real) -> bool {
        self.object.exterior_swept_sphere(
            &self.transform.inverse_transform_point(p1),
            &self.transform.inverse_transform_point(p2),
            radius,
        )
    }

    /// The world-space point of this zone farthest along the world-space `dir`.
    pub fn support_point(&self, dir: &Vector<Real>) -> Option<Point<Real>> {
        let local_dir = self.transform.inverse_transform_vector(dir);
        self.object
            .zone_support_point(&local_dir)
            .map(|pt| self.transform * pt)
    }

    /// The world-space polyhedron containing this zone.
    pub fn world_polyhedron(&self) -> Option<Polyhedron> {
        self.object
            .local_polyhedron()
            .map(|polyhedron| polyhedron.transformed(&self.transform))
    }

    /// Appends to `exterior` the parts of the world-space `edges` lying outside of this zone.
    pub fn clip_interior_edges(&self, edges: &[Segment], exterior: &mut Vec<Segment>) {
        let inv = self.transform.inverse();
        let local: Vec<_> = edges.iter().map(|e| e.transformed(&inv)).collect();
        let first = exterior.len();
        self.object.clip_interior_edges(&local, exterior);

        for edge in &mut exterior[first..] {
            *edge = edge.transformed(&self.transform);
        }
    }

    /// Does the box `aabb`, placed at `box_transform` in world space, overlap this zone?
    pub fn intersects_bounding_box(&self, aabb: &Aabb, box_transform: &Isometry<Real>) -> bool {
        match self.object.as_support_map() {
            None => true,
            Some(shape) => {
                let pos12 = self.transform.inv_mul(box_transform);

                if let Some(local_aabb) = self.object.local_aabb() {
                    if !local_aabb
                        .loosened(BOUNDARY_EPSILON)
                        .intersects(&aabb.transform_by(&pos12))
                    {
                        return false;
                    }
                }

                gjk::intersection_test(&pos12, shape, aabb)
            }
        }
    }
}
