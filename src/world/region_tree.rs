use crate::math::{Point, Real, Vector};
use crate::region::{OcclusionMask, OcclusionRegion, VisibilityRegion};
use crate::world::{CameraId, LightId, SourceId};
use crate::zone::{PortalId, ZoneId};
use smallvec::SmallVec;

/// Handle of a region node stored in a [`World`](crate::world::World).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub(crate) usize);

/// The viewpoint a region was built for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionOwner {
    /// The region is seen by a camera.
    Camera(CameraId),
    /// The region is reached by a light.
    Light(LightId),
    /// The region is reached by a sound source.
    Source(SourceId),
}

/// A node of the region tree of a camera, light or source.
///
/// Root nodes are built in the zones containing the viewpoint, and every
/// child node is extruded through one portal of the zone of its parent.
#[derive(Clone, Debug)]
pub struct RegionNode {
    pub(crate) owner: RegionOwner,
    pub(crate) zone: ZoneId,
    pub(crate) portal: Option<PortalId>,
    pub(crate) parent: Option<RegionId>,
    pub(crate) children: SmallVec<[RegionId; 4]>,
    pub(crate) region: VisibilityRegion,
    pub(crate) shadow_region: Option<VisibilityRegion>,
    pub(crate) occluders: Vec<OcclusionRegion>,
}

impl RegionNode {
    pub(crate) fn new(
        owner: RegionOwner,
        zone: ZoneId,
        portal: Option<PortalId>,
        parent: Option<RegionId>,
        region: VisibilityRegion,
    ) -> Self {
        RegionNode {
            owner,
            zone,
            portal,
            parent,
            children: SmallVec::new(),
            region,
            shadow_region: None,
            occluders: Vec::new(),
        }
    }

    /// The camera, light or source this region belongs to.
    #[inline]
    pub fn owner(&self) -> RegionOwner {
        self.owner
    }

    /// The zone this region lies in.
    #[inline]
    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    /// The portal this region was extruded through, `None` for root regions.
    #[inline]
    pub fn portal(&self) -> Option<PortalId> {
        self.portal
    }

    /// The region this one was extruded from.
    #[inline]
    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    /// The regions extruded from this one.
    #[inline]
    pub fn children(&self) -> &[RegionId] {
        &self.children
    }

    /// The visibility region of this node.
    #[inline]
    pub fn region(&self) -> &VisibilityRegion {
        &self.region
    }

    /// The part of the region lying inside of the shadow space of its zone.
    #[inline]
    pub fn shadow_region(&self) -> Option<&VisibilityRegion> {
        self.shadow_region.as_ref()
    }

    /// The occlusion regions of the occlusion portals seen from this region.
    #[inline]
    pub fn occluders(&self) -> &[OcclusionRegion] {
        &self.occluders
    }

    /// Is the sphere visible in this region and hidden by no occluder of the given categories?
    pub fn sphere_visible(&self, center: &Point<Real>, radius: Real, mask: OcclusionMask) -> bool {
        self.region.sphere_visible(center, radius)
            && !self
                .occluders
                .iter()
                .any(|occluder| occluder.occludes(mask) && occluder.sphere_occluded(center, radius))
    }

    /// Is the box visible in this region and hidden by no occluder of the given categories?
    pub fn box_visible(
        &self,
        center: &Point<Real>,
        half_axes: &[Vector<Real>; 3],
        mask: OcclusionMask,
    ) -> bool {
        self.region.box_visible(center, half_axes)
            && !self
                .occluders
                .iter()
                .any(|occluder| occluder.occludes(mask) && occluder.box_occluded(center, half_axes))
    }
}
