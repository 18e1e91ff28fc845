use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Vector};
use crate::region::OcclusionMask;
use crate::shape::Segment;
use crate::world::{
    Camera, CameraId, Light, LightId, RegionId, RegionNode, RegionOwner, Source, SourceId,
};
use crate::zone::{
    Portal, PortalError, PortalFlags, PortalId, PortalKind, ShadowSpace, Zone, ZoneId, ZoneObject,
};
use alloc::sync::Arc;
use slab::Slab;

/// Errors raised when editing a [`World`].
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WorldError {
    /// No zone has the given handle.
    #[error("unknown zone {0:?}")]
    UnknownZone(ZoneId),
    /// No portal has the given handle.
    #[error("unknown portal {0:?}")]
    UnknownPortal(PortalId),
    /// No camera has the given handle.
    #[error("unknown camera {0:?}")]
    UnknownCamera(CameraId),
    /// No light has the given handle.
    #[error("unknown light {0:?}")]
    UnknownLight(LightId),
    /// No sound source has the given handle.
    #[error("unknown sound source {0:?}")]
    UnknownSource(SourceId),
    /// The portal could not be built.
    #[error(transparent)]
    Portal(#[from] PortalError),
}

/// Zones, portals, viewpoints, and the region trees built for them.
///
/// Scene edits go through the methods of the world, and the region trees
/// are rebuilt by [`World::update`]. Queries read the regions built by the
/// last update.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub(crate) zones: Slab<Zone>,
    pub(crate) portals: Slab<Portal>,
    pub(crate) regions: Slab<RegionNode>,
    pub(crate) cameras: Slab<Camera>,
    pub(crate) lights: Slab<Light>,
    pub(crate) sources: Slab<Source>,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /*
     * Zones.
     */
    /// Adds a zone with the given shape and world transform.
    ///
    /// If `parent` is given, the new zone is one of its subzones.
    pub fn add_zone(
        &mut self,
        object: Arc<ZoneObject>,
        transform: Isometry<Real>,
        parent: Option<ZoneId>,
    ) -> Result<ZoneId, WorldError> {
        if let Some(parent) = parent {
            if !self.zones.contains(parent.0) {
                return Err(WorldError::UnknownZone(parent));
            }
        }

        let mut zone = Zone::new(object, transform);
        zone.parent = parent;
        let id = ZoneId(self.zones.insert(zone));

        if let Some(parent) = parent {
            self.zones[parent.0].subzones.push(id);
        }

        Ok(id)
    }

    /// The zone with the given handle.
    #[inline]
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.0)
    }

    /// Iterates through every zone.
    pub fn zones(&self) -> impl Iterator<Item = (ZoneId, &Zone)> {
        self.zones.iter().map(|(key, zone)| (ZoneId(key), zone))
    }

    /// Moves a zone, and updates the world-space data of its portals.
    pub fn set_zone_transform(
        &mut self,
        id: ZoneId,
        transform: Isometry<Real>,
    ) -> Result<(), WorldError> {
        let zone = self.zones.get_mut(id.0).ok_or(WorldError::UnknownZone(id))?;
        zone.transform = transform;

        for (_, portal) in self.portals.iter_mut() {
            if portal.zone == id {
                portal.handle_transform_update(&transform);
            }
        }

        Ok(())
    }

    /// Sets the shadow space of a zone.
    pub fn set_shadow_space(
        &mut self,
        id: ZoneId,
        shadow_space: Option<ShadowSpace>,
    ) -> Result<(), WorldError> {
        let zone = self.zones.get_mut(id.0).ok_or(WorldError::UnknownZone(id))?;
        zone.shadow_space = shadow_space;
        Ok(())
    }

    /// The deepest zone containing `point`.
    pub fn find_zone(&self, point: &Point<Real>) -> Option<ZoneId> {
        let mut found = self
            .zones()
            .find(|(_, zone)| zone.parent.is_none() && zone.interior_point(point))?
            .0;

        while let Some(sub) = self.zones[found.0]
            .subzones
            .iter()
            .copied()
            .find(|sub| self.zones[sub.0].interior_point(point))
        {
            found = sub;
        }

        Some(found)
    }

    /// The deepest zones overlapping the box `aabb` placed at `transform`.
    ///
    /// A zone is reported if the box overlaps it, unless the subzones
    /// overlapping the box cover every edge of the box.
    pub fn find_zone_memberships(&self, aabb: &Aabb, transform: &Isometry<Real>) -> Vec<ZoneId> {
        let vertices = aabb.vertices().map(|v| transform * v);
        let edges: Vec<_> = Aabb::EDGES_VERTEX_IDS
            .iter()
            .map(|(a, b)| Segment::new(vertices[*a], vertices[*b]))
            .collect();
        let mut res = Vec::new();

        for (id, zone) in self.zones() {
            if zone.parent.is_none() {
                self.collect_memberships(id, aabb, transform, &edges, &mut res);
            }
        }

        res
    }

    fn collect_memberships(
        &self,
        id: ZoneId,
        aabb: &Aabb,
        transform: &Isometry<Real>,
        edges: &[Segment],
        out: &mut Vec<ZoneId>,
    ) {
        let zone = &self.zones[id.0];

        if !zone.intersects_bounding_box(aabb, transform) {
            return;
        }

        let mut remaining = edges.to_vec();
        let mut overlapping = false;

        for sub in &zone.subzones {
            let subzone = &self.zones[sub.0];

            if subzone.intersects_bounding_box(aabb, transform) {
                overlapping = true;
                self.collect_memberships(*sub, aabb, transform, edges, out);

                let mut exterior = Vec::new();
                subzone.clip_interior_edges(&remaining, &mut exterior);
                remaining = exterior;
            }
        }

        if !overlapping || !remaining.is_empty() {
            out.push(id);
        }
    }

    /*
     * Portals.
     */
    /// Creates a portal of `zone`, with its vertices given in the local space of the zone.
    ///
    /// The portal does not take part in the propagation until it is
    /// registered by [`Self::preprocess_portal`].
    pub fn add_portal(
        &mut self,
        zone: ZoneId,
        vertices: &[Point<Real>],
        kind: PortalKind,
    ) -> Result<PortalId, WorldError> {
        let transform = self
            .zones
            .get(zone.0)
            .ok_or(WorldError::UnknownZone(zone))?
            .transform;
        let mut portal = Portal::new(zone, vertices, kind)?;
        portal.handle_transform_update(&transform);
        Ok(PortalId(self.portals.insert(portal)))
    }

    /// The portal with the given handle.
    #[inline]
    pub fn portal(&self, id: PortalId) -> Option<&Portal> {
        self.portals.get(id.0)
    }

    /// Registers a portal in the portal lists of its zone.
    pub fn preprocess_portal(&mut self, id: PortalId) -> Result<(), WorldError> {
        let portal = self.portals.get(id.0).ok_or(WorldError::UnknownPortal(id))?;
        let zone = &mut self.zones[portal.zone.0];
        let list = match portal.kind() {
            PortalKind::Occlusion { .. } => &mut zone.occlusion_portals,
            PortalKind::Direct | PortalKind::Remote { .. } => &mut zone.portals,
        };

        if !list.contains(&id) {
            list.push(id);
        }

        Ok(())
    }

    /// Removes a portal from the portal lists of its zone.
    pub fn neutralize_portal(&mut self, id: PortalId) -> Result<(), WorldError> {
        let portal = self.portals.get(id.0).ok_or(WorldError::UnknownPortal(id))?;
        let zone = &mut self.zones[portal.zone.0];
        zone.portals.retain(|p| *p != id);
        zone.occlusion_portals.retain(|p| *p != id);
        Ok(())
    }

    /// Sets the zone a portal leads to.
    pub fn connect_portal(
        &mut self,
        id: PortalId,
        connected_zone: Option<ZoneId>,
    ) -> Result<(), WorldError> {
        if let Some(zone) = connected_zone {
            if !self.zones.contains(zone.0) {
                return Err(WorldError::UnknownZone(zone));
            }
        }

        let portal = self
            .portals
            .get_mut(id.0)
            .ok_or(WorldError::UnknownPortal(id))?;
        portal.connected_zone = connected_zone;
        Ok(())
    }

    /// Sets the flags of a portal.
    pub fn set_portal_flags(&mut self, id: PortalId, flags: PortalFlags) -> Result<(), WorldError> {
        let portal = self
            .portals
            .get_mut(id.0)
            .ok_or(WorldError::UnknownPortal(id))?;
        portal.flags = flags;
        Ok(())
    }

    /*
     * Viewpoints.
     */
    /// Adds a camera.
    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        CameraId(self.cameras.insert(camera))
    }

    /// The camera with the given handle.
    #[inline]
    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id.0)
    }

    /// The camera with the given handle.
    #[inline]
    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(id.0)
    }

    /// Removes a camera and its regions.
    pub fn remove_camera(&mut self, id: CameraId) -> Result<Camera, WorldError> {
        let camera = self.cameras.try_remove(id.0).ok_or(WorldError::UnknownCamera(id))?;
        self.purge_regions(RegionOwner::Camera(id));
        Ok(camera)
    }

    /// Adds a light.
    pub fn add_light(&mut self, light: Light) -> LightId {
        LightId(self.lights.insert(light))
    }

    /// The light with the given handle.
    #[inline]
    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id.0)
    }

    /// The light with the given handle.
    #[inline]
    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id.0)
    }

    /// Removes a light and its regions.
    pub fn remove_light(&mut self, id: LightId) -> Result<Light, WorldError> {
        let light = self.lights.try_remove(id.0).ok_or(WorldError::UnknownLight(id))?;
        self.purge_regions(RegionOwner::Light(id));
        Ok(light)
    }

    /// Adds a sound source.
    pub fn add_source(&mut self, source: Source) -> SourceId {
        SourceId(self.sources.insert(source))
    }

    /// The sound source with the given handle.
    #[inline]
    pub fn source(&self, id: SourceId) -> Option<&Source> {
        self.sources.get(id.0)
    }

    /// Removes a sound source and its regions.
    pub fn remove_source(&mut self, id: SourceId) -> Result<Source, WorldError> {
        let source = self.sources.try_remove(id.0).ok_or(WorldError::UnknownSource(id))?;
        self.purge_regions(RegionOwner::Source(id));
        Ok(source)
    }

    /*
     * Regions.
     */
    /// The region node with the given handle.
    #[inline]
    pub fn region(&self, id: RegionId) -> Option<&RegionNode> {
        self.regions.get(id.0)
    }

    /// The root region nodes of a camera, light or source.
    pub fn root_regions(&self, owner: RegionOwner) -> Vec<RegionId> {
        self.regions
            .iter()
            .filter(|(_, node)| node.owner == owner && node.parent.is_none())
            .map(|(key, _)| RegionId(key))
            .collect()
    }

    /// Removes every region of a camera, light or source.
    pub fn purge_regions(&mut self, owner: RegionOwner) {
        let purged: Vec<_> = self
            .regions
            .iter()
            .filter(|(_, node)| node.owner == owner)
            .map(|(key, _)| key)
            .collect();

        for key in &purged {
            let node = self.regions.remove(*key);

            if let Some(zone) = self.zones.get_mut(node.zone.0) {
                let list = match owner {
                    RegionOwner::Camera(_) => &mut zone.camera_regions,
                    RegionOwner::Light(_) => &mut zone.light_regions,
                    RegionOwner::Source(_) => &mut zone.source_regions,
                };
                list.retain(|id| id.0 != *key);
            }
        }

        if !purged.is_empty() {
            log::trace!("purged {} regions of {:?}", purged.len(), owner);
        }
    }

    pub(crate) fn insert_region(&mut self, node: RegionNode) -> RegionId {
        let owner = node.owner;
        let zone = node.zone;
        let parent = node.parent;
        let id = RegionId(self.regions.insert(node));

        if let Some(parent) = parent {
            self.regions[parent.0].children.push(id);
        }

        let zone = &mut self.zones[zone.0];
        match owner {
            RegionOwner::Camera(_) => zone.camera_regions.push(id),
            RegionOwner::Light(_) => zone.light_regions.push(id),
            RegionOwner::Source(_) => zone.source_regions.push(id),
        }

        id
    }

    /*
     * Queries.
     */
    /// Is the sphere seen by the camera from inside of `zone`?
    ///
    /// The sphere is visible if one of the camera regions of the zone sees
    /// it and no occluder of that region hides it.
    pub fn camera_sphere_visible(
        &self,
        camera: CameraId,
        zone: ZoneId,
        center: &Point<Real>,
        radius: Real,
    ) -> bool {
        self.owner_regions(RegionOwner::Camera(camera), zone)
            .any(|node| node.sphere_visible(center, radius, OcclusionMask::GEOMETRY))
    }

    /// Is the box seen by the camera from inside of `zone`?
    pub fn camera_box_visible(
        &self,
        camera: CameraId,
        zone: ZoneId,
        center: &Point<Real>,
        half_axes: &[Vector<Real>; 3],
    ) -> bool {
        self.owner_regions(RegionOwner::Camera(camera), zone)
            .any(|node| node.box_visible(center, half_axes, OcclusionMask::GEOMETRY))
    }

    /// Is the sphere reached by the light inside of `zone`?
    pub fn light_sphere_visible(
        &self,
        light: LightId,
        zone: ZoneId,
        center: &Point<Real>,
        radius: Real,
    ) -> bool {
        self.owner_regions(RegionOwner::Light(light), zone)
            .any(|node| node.region.sphere_visible(center, radius))
    }

    /// Is the sphere reached by the sound source inside of `zone`?
    pub fn source_sphere_audible(
        &self,
        source: SourceId,
        zone: ZoneId,
        center: &Point<Real>,
        radius: Real,
    ) -> bool {
        self.owner_regions(RegionOwner::Source(source), zone)
            .any(|node| node.region.sphere_visible(center, radius))
    }

    /// The regions built by `owner` inside of `zone`.
    pub fn owner_regions(
        &self,
        owner: RegionOwner,
        zone: ZoneId,
    ) -> impl Iterator<Item = &RegionNode> + '_ {
        let list: &[RegionId] = match self.zones.get(zone.0) {
            None => &[],
            Some(zone) => match owner {
                RegionOwner::Camera(_) => &zone.camera_regions,
                RegionOwner::Light(_) => &zone.light_regions,
                RegionOwner::Source(_) => &zone.source_regions,
            },
        };

        list.iter()
            .filter_map(move |id| self.regions.get(id.0))
            .filter(move |node| node.owner == owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector;
    use crate::zone::BoxZone;

    fn cube(size: Real) -> Arc<ZoneObject> {
        Arc::new(ZoneObject::Box(
            BoxZone::try_new(Vector::repeat(size)).unwrap(),
        ))
    }

    #[test]
    fn nested_zone_lookup() {
        let mut world = World::new();
        let outer = world.add_zone(cube(100.0), Isometry::identity(), None).unwrap();
        let inner = world
            .add_zone(cube(10.0), Isometry::translation(20.0, 20.0, 20.0), Some(outer))
            .unwrap();

        assert_eq!(world.find_zone(&Point::new(25.0, 25.0, 25.0)), Some(inner));
        assert_eq!(world.find_zone(&Point::new(5.0, 5.0, 5.0)), Some(outer));
        assert_eq!(world.find_zone(&Point::new(-5.0, 5.0, 5.0)), None);
        assert_eq!(world.zone(inner).unwrap().parent(), Some(outer));
    }

    #[test]
    fn memberships_skip_covered_parents() {
        let mut world = World::new();
        let outer = world.add_zone(cube(100.0), Isometry::identity(), None).unwrap();
        let inner = world
            .add_zone(cube(10.0), Isometry::translation(20.0, 20.0, 20.0), Some(outer))
            .unwrap();
        let aabb = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));

        let inside = world.find_zone_memberships(&aabb, &Isometry::translation(25.0, 25.0, 25.0));
        assert_eq!(inside, vec![inner]);

        let straddling = world.find_zone_memberships(&aabb, &Isometry::translation(30.0, 25.0, 25.0));
        assert_eq!(straddling, vec![inner, outer]);

        let outside = world.find_zone_memberships(&aabb, &Isometry::translation(50.0, 50.0, 50.0));
        assert_eq!(outside, vec![outer]);
    }

    #[test]
    fn portal_registration() {
        let mut world = World::new();
        let zone = world.add_zone(cube(10.0), Isometry::identity(), None).unwrap();
        let vertices = [
            Point::new(10.0, 0.0, 0.0),
            Point::new(10.0, 0.0, 10.0),
            Point::new(10.0, 10.0, 10.0),
            Point::new(10.0, 10.0, 0.0),
        ];
        let portal = world.add_portal(zone, &vertices, PortalKind::Direct).unwrap();
        assert!(world.zone(zone).unwrap().portals().is_empty());

        world.preprocess_portal(portal).unwrap();
        world.preprocess_portal(portal).unwrap();
        assert_eq!(world.zone(zone).unwrap().portals(), &[portal]);

        world.set_zone_transform(zone, Isometry::translation(1.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(
            world.portal(portal).unwrap().world_vertices()[0],
            Point::new(11.0, 0.0, 0.0)
        );

        world.neutralize_portal(portal).unwrap();
        assert!(world.zone(zone).unwrap().portals().is_empty());

        assert_eq!(
            world.connect_portal(portal, Some(ZoneId(42))),
            Err(WorldError::UnknownZone(ZoneId(42)))
        );
        assert_eq!(
            world.add_portal(zone, &vertices[..2], PortalKind::Direct),
            Err(WorldError::Portal(PortalError::VertexCount { count: 2, max: 8 }))
        );
    }
}
