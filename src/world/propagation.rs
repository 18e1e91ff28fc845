//! Construction of the region trees of cameras, lights and sources.

use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Vector, BOUNDARY_EPSILON};
use crate::query::{clip_polygon_to_planes, PolygonBuffer};
use crate::region::{
    infinite_polygon_extrusion, point_polygon_extrusion, polygon_extrusion, OcclusionRegion,
    VisibilityRegion,
};
use crate::shape::{
    Convexity, Plane, Polyhedron, MAX_EXTRUSION_VERTEX_COUNT, MAX_POLYHEDRON_FACE_COUNT,
};
use crate::world::camera::pyramid_planes;
use crate::world::{
    CameraId, LightId, LightKind, RegionId, RegionNode, RegionOwner, SourceId, Traversal,
    TraversalFlags, World, WorldError,
};
use crate::zone::{PortalFlags, PortalId, PortalKind, ZoneId};
use arrayvec::ArrayVec;

/// The viewpoint a region tree is built from, in the space of the zone being visited.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Emitter {
    Camera {
        position: Point<Real>,
        view_direction: Vector<Real>,
        far_depth: Real,
        frustum: [Plane; 5],
    },
    Infinite {
        direction: Vector<Real>,
    },
    Point {
        position: Point<Real>,
        range: Real,
        confinement_radius: Real,
    },
}

impl Emitter {
    /// Moves the emitter to the other side of a remote portal.
    fn transformed(&self, m: &Isometry<Real>) -> Self {
        match *self {
            Emitter::Camera {
                position,
                view_direction,
                far_depth,
                frustum,
            } => Emitter::Camera {
                position: m * position,
                view_direction: m * view_direction,
                far_depth,
                frustum: frustum.map(|plane| plane.transform_by(m)),
            },
            Emitter::Infinite { direction } => Emitter::Infinite {
                direction: m * direction,
            },
            Emitter::Point {
                position,
                range,
                confinement_radius,
            } => Emitter::Point {
                position: m * position,
                range,
                confinement_radius,
            },
        }
    }

    /// Does the emitter see the front side of a portal with the given world plane?
    fn faces(&self, plane: &Plane) -> bool {
        match self {
            Emitter::Camera { position, .. } | Emitter::Point { position, .. } => {
                plane.signed_distance(position) > BOUNDARY_EPSILON
            }
            Emitter::Infinite { direction } => plane.normal_dot(direction) < -BOUNDARY_EPSILON,
        }
    }

    /// The distance beyond which nothing is reached, if any.
    fn reach(&self) -> Option<Real> {
        match self {
            Emitter::Camera { far_depth, .. } => Some(*far_depth),
            Emitter::Infinite { .. } => None,
            Emitter::Point {
                range,
                confinement_radius,
                ..
            } => Some(range + confinement_radius),
        }
    }

    fn position(&self) -> Option<Point<Real>> {
        match self {
            Emitter::Camera { position, .. } | Emitter::Point { position, .. } => Some(*position),
            Emitter::Infinite { .. } => None,
        }
    }

    fn extrude(
        &self,
        vertices: &[Point<Real>],
        front: &Plane,
        zone_support: impl Fn(&Vector<Real>) -> Option<Point<Real>>,
    ) -> Option<VisibilityRegion> {
        match self {
            Emitter::Camera {
                position,
                view_direction,
                far_depth,
                ..
            } => polygon_extrusion(
                vertices,
                position,
                view_direction,
                *far_depth,
                front,
                zone_support,
            ),
            Emitter::Infinite { direction } => {
                infinite_polygon_extrusion(vertices, direction, front, zone_support)
            }
            Emitter::Point {
                position,
                range,
                confinement_radius,
            } => point_polygon_extrusion(
                vertices,
                position,
                *range,
                *confinement_radius,
                front,
                zone_support,
            ),
        }
    }
}

/// A region extruded through a portal, ready to be attached to the tree.
struct Extrusion {
    zone: ZoneId,
    region: VisibilityRegion,
    emitter: Emitter,
}

impl World {
    /// Rebuilds the region trees of every camera, light and sound source.
    pub fn update(&mut self) {
        let cameras: Vec<_> = self.cameras.iter().map(|(key, _)| CameraId(key)).collect();
        let lights: Vec<_> = self.lights.iter().map(|(key, _)| LightId(key)).collect();
        let sources: Vec<_> = self.sources.iter().map(|(key, _)| SourceId(key)).collect();

        for id in cameras {
            let _ = self.update_camera(id);
        }

        for id in lights {
            let _ = self.update_light(id);
        }

        for id in sources {
            let _ = self.update_source(id);
        }
    }

    /// Rebuilds the region tree of a camera.
    ///
    /// The root region is the view frustum, in the deepest zone containing
    /// the camera.
    pub fn update_camera(&mut self, id: CameraId) -> Result<Traversal, WorldError> {
        let owner = RegionOwner::Camera(id);
        self.purge_regions(owner);

        let camera = self
            .cameras
            .get(id.0)
            .ok_or(WorldError::UnknownCamera(id))?;
        let position = camera.position();
        let frustum = camera.frustum_planes();
        let emitter = Emitter::Camera {
            position,
            view_direction: camera.view_direction(),
            far_depth: camera.far_depth,
            frustum,
        };

        let mut traversal = Traversal::new();

        if let Some(zone) = self.find_zone(&position) {
            let root = VisibilityRegion::from_convexity(Convexity::from_planes(&frustum), 1);
            self.propagate_from_root(&mut traversal, owner, &emitter, zone, root);
        }

        Ok(traversal)
    }

    /// Rebuilds the region tree of a light.
    pub fn update_light(&mut self, id: LightId) -> Result<Traversal, WorldError> {
        let owner = RegionOwner::Light(id);
        self.purge_regions(owner);

        let light = self
            .lights
            .get(id.0)
            .ok_or(WorldError::UnknownLight(id))?
            .clone();
        let mut traversal = Traversal::new();

        match light.kind {
            LightKind::Infinite { direction } => {
                if let Some(zone) = light.zone.filter(|zone| self.zones.contains(zone.0)) {
                    let root = self.zones[zone.0]
                        .world_polyhedron()
                        .map(|polyhedron| VisibilityRegion::from_polyhedron(polyhedron, 0))
                        .unwrap_or_default();
                    let emitter = Emitter::Infinite { direction };
                    self.propagate_from_root(&mut traversal, owner, &emitter, zone, root);
                }
            }
            LightKind::Point {
                position,
                range,
                confinement_radius,
            } => {
                let emitter = Emitter::Point {
                    position,
                    range,
                    confinement_radius,
                };

                for zone in self.root_zones(light.zone, &position, confinement_radius) {
                    if traversal.contains(zone, TraversalFlags::GLOBAL) {
                        continue;
                    }

                    let root = self.zone_region(zone, &position, range + confinement_radius);
                    self.propagate_from_root(&mut traversal, owner, &emitter, zone, root);
                }
            }
            LightKind::Spot {
                transform,
                range,
                apex_tangent,
                aspect_ratio,
                confinement_radius,
            } => {
                let position = Point::from(transform.translation.vector);
                let emitter = Emitter::Point {
                    position,
                    range,
                    confinement_radius,
                };
                let pyramid = pyramid_planes(
                    &transform,
                    apex_tangent,
                    apex_tangent * aspect_ratio,
                    range + confinement_radius,
                );

                for zone in self.root_zones(light.zone, &position, confinement_radius) {
                    if traversal.contains(zone, TraversalFlags::GLOBAL) {
                        continue;
                    }

                    let root = self.spot_region(zone, &pyramid);
                    self.propagate_from_root(&mut traversal, owner, &emitter, zone, root);
                }
            }
        }

        Ok(traversal)
    }

    /// Rebuilds the region tree of a sound source.
    pub fn update_source(&mut self, id: SourceId) -> Result<Traversal, WorldError> {
        let owner = RegionOwner::Source(id);
        self.purge_regions(owner);

        let source = self
            .sources
            .get(id.0)
            .ok_or(WorldError::UnknownSource(id))?
            .clone();
        let emitter = Emitter::Point {
            position: source.position,
            range: source.range,
            confinement_radius: 0.0,
        };
        let mut traversal = Traversal::new();

        if let Some(zone) = self.find_zone(&source.position) {
            let root = self.zone_region(zone, &source.position, source.range);
            self.propagate_from_root(&mut traversal, owner, &emitter, zone, root);
        }

        Ok(traversal)
    }

    /// The zones a light at `position` starts from.
    ///
    /// The zone containing the light comes first, followed by the other
    /// deepest zones its confinement sphere is not exterior to.
    fn root_zones(
        &self,
        attached: Option<ZoneId>,
        position: &Point<Real>,
        confinement_radius: Real,
    ) -> Vec<ZoneId> {
        let mut res: Vec<ZoneId> = attached
            .filter(|zone| self.zones.contains(zone.0))
            .or_else(|| self.find_zone(position))
            .into_iter()
            .collect();

        if confinement_radius > 0.0 {
            let mut touched = Vec::new();

            for (id, zone) in self.zones() {
                if zone.parent.is_none() {
                    self.collect_touched_zones(id, position, confinement_radius, &mut touched);
                }
            }

            for zone in touched {
                if !res.contains(&zone) {
                    res.push(zone);
                }
            }
        }

        res
    }

    fn collect_touched_zones(
        &self,
        id: ZoneId,
        center: &Point<Real>,
        radius: Real,
        out: &mut Vec<ZoneId>,
    ) {
        let zone = &self.zones[id.0];

        if zone.exterior_sphere(center, radius) {
            return;
        }

        let first = out.len();

        for sub in &zone.subzones {
            self.collect_touched_zones(*sub, center, radius, out);
        }

        if out.len() == first {
            out.push(id);
        }
    }

    /// The polyhedron of a zone, or a cube of half-size `reach` around
    /// `position` if the zone is unbounded.
    fn zone_region(&self, zone: ZoneId, position: &Point<Real>, reach: Real) -> VisibilityRegion {
        self.zones[zone.0]
            .world_polyhedron()
            .or_else(|| {
                Polyhedron::from_aabb(&Aabb::from_half_extents(
                    *position,
                    Vector::repeat(reach.max(BOUNDARY_EPSILON)),
                ))
            })
            .map(|polyhedron| VisibilityRegion::from_polyhedron(polyhedron, 0))
            .unwrap_or_default()
    }

    /// The pyramid of a spot light, bounded by the planes of its zone.
    ///
    /// The range cap stays last so that it is the only auxiliary plane.
    fn spot_region(&self, zone: ZoneId, pyramid: &[Plane; 5]) -> VisibilityRegion {
        let mut convexity = Convexity::from_planes(&pyramid[..4]);

        if let Some(polyhedron) = self.zones[zone.0].world_polyhedron() {
            for plane in polyhedron.planes() {
                if convexity.plane_count() + 1 < MAX_POLYHEDRON_FACE_COUNT {
                    convexity.push_plane(*plane);
                }
            }
        }

        convexity.push_plane(pyramid[4]);
        VisibilityRegion::from_convexity(convexity, 1)
    }

    fn propagate_from_root(
        &mut self,
        traversal: &mut Traversal,
        owner: RegionOwner,
        emitter: &Emitter,
        zone: ZoneId,
        region: VisibilityRegion,
    ) {
        let mut node = RegionNode::new(owner, zone, None, None, region);
        node.shadow_region = self.shadow_region(owner, zone, &node.region);
        let root = self.insert_region(node);
        traversal.insert(zone, TraversalFlags::GLOBAL);
        self.propagate(traversal, owner, emitter, root, zone);
    }

    /// Recursively extrudes the region `parent` of `zone` through the portals of the zone.
    fn propagate(
        &mut self,
        traversal: &mut Traversal,
        owner: RegionOwner,
        emitter: &Emitter,
        parent: RegionId,
        zone: ZoneId,
    ) {
        traversal.insert(zone, TraversalFlags::LOCAL);

        if let Emitter::Camera { .. } = emitter {
            let occluders = self.build_occluders(emitter, parent, zone);
            self.regions[parent.0].occluders = occluders;
        }

        let inhibit = self.inhibit_flags(owner);
        let portals = self.zones[zone.0].portals.clone();

        for portal in portals {
            let Some(extrusion) = self.extrude_through(traversal, emitter, inhibit, parent, portal)
            else {
                continue;
            };

            log::trace!(
                "{:?} propagates from {:?} to {:?} through {:?}",
                owner,
                zone,
                extrusion.zone,
                portal
            );

            let mut node = RegionNode::new(
                owner,
                extrusion.zone,
                Some(portal),
                Some(parent),
                extrusion.region,
            );
            node.shadow_region = self.shadow_region(owner, extrusion.zone, &node.region);
            let child = self.insert_region(node);
            self.propagate(traversal, owner, &extrusion.emitter, child, extrusion.zone);
        }

        traversal.remove(zone, TraversalFlags::LOCAL);
    }

    fn inhibit_flags(&self, owner: RegionOwner) -> PortalFlags {
        match owner {
            RegionOwner::Camera(_) => PortalFlags::CAMERA_INHIBIT,
            RegionOwner::Light(id) => self
                .lights
                .get(id.0)
                .map(|light| light.inhibit_flags())
                .unwrap_or(PortalFlags::LIGHT_INHIBIT),
            RegionOwner::Source(_) => PortalFlags::SOURCE_INHIBIT,
        }
    }

    fn extrude_through(
        &self,
        traversal: &Traversal,
        emitter: &Emitter,
        inhibit: PortalFlags,
        parent: RegionId,
        id: PortalId,
    ) -> Option<Extrusion> {
        let portal = self.portals.get(id.0)?;

        if !portal.is_enabled() || portal.flags().intersects(inhibit) {
            return None;
        }

        let remote = match portal.kind() {
            PortalKind::Direct => None,
            PortalKind::Remote { transform } => {
                if !portal.flags().contains(PortalFlags::REMOTE_PROPAGATION) {
                    return None;
                }
                Some(*transform)
            }
            PortalKind::Occlusion { .. } => return None,
        };

        let connected = portal.connected_zone()?;
        let connected_zone = self.zones.get(connected.0)?;

        if traversal.contains(connected, TraversalFlags::LOCAL) {
            return None;
        }

        let plane = portal.world_plane();
        let parent_region = &self.regions.get(parent.0)?.region;

        if !emitter.faces(plane) || !parent_region.bounding_sphere_visible(portal.bounding_sphere())
        {
            return None;
        }

        if let (Some(position), Some(reach)) = (emitter.position(), emitter.reach()) {
            if na::distance(&position, &portal.closest_boundary_point(&position)) > reach {
                return None;
            }
        }

        let mut clipped = PolygonBuffer::new();
        clip_polygon_to_planes(parent_region.planes(), portal.world_vertices(), &mut clipped);

        if clipped.len() < 3 {
            return None;
        }

        let vertices: &[Point<Real>] = if clipped.len() > MAX_EXTRUSION_VERTEX_COUNT {
            portal.world_vertices()
        } else {
            &clipped
        };

        let support = |dir: &Vector<Real>| connected_zone.support_point(dir);
        let front = -*plane;

        let (region, emitter) = match remote {
            None => (emitter.extrude(vertices, &front, support)?, *emitter),
            Some(m) => {
                let moved: ArrayVec<Point<Real>, MAX_EXTRUSION_VERTEX_COUNT> =
                    vertices.iter().map(|v| m * v).collect();
                let emitter = emitter.transformed(&m);
                (
                    emitter.extrude(&moved, &front.transform_by(&m), support)?,
                    emitter,
                )
            }
        };

        Some(Extrusion {
            zone: connected,
            region,
            emitter,
        })
    }

    /// The occlusion regions of the occlusion portals of `zone` seen by a camera.
    fn build_occluders(
        &self,
        emitter: &Emitter,
        node: RegionId,
        zone: ZoneId,
    ) -> Vec<OcclusionRegion> {
        let Emitter::Camera {
            position, frustum, ..
        } = emitter
        else {
            return Vec::new();
        };
        let mask = match self.regions[node.0].owner {
            RegionOwner::Camera(id) => self
                .cameras
                .get(id.0)
                .map(|camera| camera.occlusion_mask)
                .unwrap_or_default(),
            _ => return Vec::new(),
        };
        let region = &self.regions[node.0].region;
        let mut res = Vec::new();

        for id in &self.zones[zone.0].occlusion_portals {
            let Some(portal) = self.portals.get(id.0) else {
                continue;
            };
            let PortalKind::Occlusion { mask: portal_mask } = portal.kind() else {
                continue;
            };

            if !portal.is_enabled()
                || !portal_mask.intersects(mask)
                || portal.world_plane().signed_distance(position) <= BOUNDARY_EPSILON
            {
                continue;
            }

            let mut clipped = PolygonBuffer::new();
            clip_polygon_to_planes(region.planes(), portal.world_vertices(), &mut clipped);

            if clipped.len() < 3 {
                continue;
            }

            let front = [-*portal.world_plane()];

            if let Some(occluder) =
                OcclusionRegion::new(position, &clipped, frustum, &front, *portal_mask & mask)
            {
                res.push(occluder);
            } else {
                log::debug!("skipped degenerate occluder {:?}", id);
            }
        }

        res
    }

    /// A copy of a light region clipped to the shadow space of its zone.
    fn shadow_region(
        &self,
        owner: RegionOwner,
        zone: ZoneId,
        region: &VisibilityRegion,
    ) -> Option<VisibilityRegion> {
        if !matches!(owner, RegionOwner::Light(_)) {
            return None;
        }

        let zone = &self.zones[zone.0];
        let shadow_space = zone.shadow_space()?;
        let mut res = region.clone();

        for plane in shadow_space.world_planes(zone.transform()) {
            res = res.clip_by_plane(&plane)?;
        }

        Some(res)
    }
}
