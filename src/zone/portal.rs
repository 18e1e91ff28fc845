//! Portals connecting zones.

use crate::bounding_volume::BoundingSphere;
use crate::math::{Isometry, Point, Real, Vector, DEFAULT_EPSILON};
use crate::region::OcclusionMask;
use crate::shape::{squared_distance_point_to_line, Line, Plane, Segment};
use crate::utils;
use crate::zone::ZoneId;
use arrayvec::ArrayVec;

/// The maximum number of vertices of a portal.
pub const MAX_PORTAL_VERTEX_COUNT: usize = 8;

/// Inline storage for the vertices of a portal.
pub type PortalVertices = ArrayVec<Point<Real>, MAX_PORTAL_VERTEX_COUNT>;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
/// Flags controlling what a portal lets through.
pub struct PortalFlags(u32);

bitflags::bitflags! {
    impl PortalFlags: u32 {
        /// The portal lets nothing through.
        const DISABLED = 1;
        /// Lights do not propagate through the portal.
        const LIGHT_INHIBIT = 1 << 1;
        /// Static lights do not propagate through the portal.
        const STATIC_LIGHT_INHIBIT = 1 << 2;
        /// Shadow-casting lights do not propagate through the portal.
        const SHADOW_INHIBIT = 1 << 3;
        /// Cameras do not see through the portal.
        const CAMERA_INHIBIT = 1 << 4;
        /// Sound sources do not propagate through the portal.
        const SOURCE_INHIBIT = 1 << 5;
        /// Lights, cameras and sources propagate through this remote portal.
        const REMOTE_PROPAGATION = 1 << 6;
    }
}

/// What a portal does with what goes through it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PortalKind {
    /// The portal opens on the connected zone, at the same place.
    Direct,
    /// The portal opens on another place of the world.
    Remote {
        /// Maps world-space points on this side of the portal to the other side.
        transform: Isometry<Real>,
    },
    /// The portal hides what is behind it instead of connecting anything.
    Occlusion {
        /// The categories of objects the portal hides.
        mask: OcclusionMask,
    },
}

/// Errors raised when building a portal.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PortalError {
    /// The portal has less than 3 or more than [`MAX_PORTAL_VERTEX_COUNT`] vertices.
    #[error("a portal needs between 3 and {max} vertices, got {count}")]
    VertexCount {
        /// The number of vertices provided.
        count: usize,
        /// The maximum number of vertices allowed.
        max: usize,
    },
    /// The portal polygon has no area.
    #[error("the portal polygon is degenerate")]
    Degenerate,
}

/// A planar convex polygon on the boundary of a zone.
///
/// The vertices are expressed in the local space of the owning zone, and
/// appear counterclockwise when seen from inside of it: the world plane of
/// the portal faces the owning zone.
#[derive(Clone, Debug)]
pub struct Portal {
    vertices: PortalVertices,
    kind: PortalKind,
    pub(crate) flags: PortalFlags,
    pub(crate) zone: ZoneId,
    pub(crate) connected_zone: Option<ZoneId>,
    world_plane: Plane,
    world_vertices: PortalVertices,
    edge_lines: ArrayVec<Line, MAX_PORTAL_VERTEX_COUNT>,
    edge_normals: ArrayVec<Vector<Real>, MAX_PORTAL_VERTEX_COUNT>,
    bounding_sphere: BoundingSphere,
}

impl Portal {
    /// Creates a portal of `zone`, with its vertices given in the local space of the zone.
    pub fn new(
        zone: ZoneId,
        vertices: &[Point<Real>],
        kind: PortalKind,
    ) -> Result<Self, PortalError> {
        if vertices.len() < 3 || vertices.len() > MAX_PORTAL_VERTEX_COUNT {
            return Err(PortalError::VertexCount {
                count: vertices.len(),
                max: MAX_PORTAL_VERTEX_COUNT,
            });
        }

        if utils::polygon_normal(vertices).norm_squared() <= DEFAULT_EPSILON {
            return Err(PortalError::Degenerate);
        }

        let mut res = Portal {
            vertices: vertices.iter().copied().collect(),
            kind,
            flags: PortalFlags::empty(),
            zone,
            connected_zone: None,
            world_plane: Plane::new(Vector::z(), 0.0),
            world_vertices: PortalVertices::new(),
            edge_lines: ArrayVec::new(),
            edge_normals: ArrayVec::new(),
            bounding_sphere: BoundingSphere::new(Point::origin(), 0.0),
        };
        res.handle_transform_update(&Isometry::identity());
        Ok(res)
    }

    /// The vertices of this portal, in the local space of its zone.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The kind of this portal.
    #[inline]
    pub fn kind(&self) -> &PortalKind {
        &self.kind
    }

    /// The flags of this portal.
    #[inline]
    pub fn flags(&self) -> PortalFlags {
        self.flags
    }

    /// The zone this portal belongs to.
    #[inline]
    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    /// The zone this portal leads to.
    #[inline]
    pub fn connected_zone(&self) -> Option<ZoneId> {
        self.connected_zone
    }

    /// Is this portal enabled?
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.flags.contains(PortalFlags::DISABLED)
    }

    /// The plane of this portal in world space, with its positive side inside of the owning zone.
    #[inline]
    pub fn world_plane(&self) -> &Plane {
        &self.world_plane
    }

    /// The vertices of this portal in world space.
    #[inline]
    pub fn world_vertices(&self) -> &[Point<Real>] {
        &self.world_vertices
    }

    /// The standardized lines supporting each edge, in world space.
    #[inline]
    pub fn edge_lines(&self) -> &[Line] {
        &self.edge_lines
    }

    /// The world-space sphere bounding this portal.
    #[inline]
    pub fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    /// Recomputes the world-space data of this portal from the world transform of its zone.
    pub fn handle_transform_update(&mut self, zone_transform: &Isometry<Real>) {
        self.world_vertices.clear();
        self.world_vertices
            .extend(self.vertices.iter().map(|v| zone_transform * v));

        let normal = utils::polygon_normal(&self.world_vertices).normalize();
        let centroid = utils::polygon_centroid(&self.world_vertices);
        self.world_plane = Plane::from_point_and_normal(&centroid, &normal);

        let n = self.world_vertices.len();
        self.edge_lines.clear();
        self.edge_normals.clear();

        for (i, a) in self.world_vertices.iter().enumerate() {
            let b = &self.world_vertices[(i + 1) % n];
            let line = Line::from_points(a, b);
            self.edge_lines.push(line.standardized().unwrap_or(line));
            let inward = normal.cross(&(b - a));
            self.edge_normals.push(
                inward
                    .try_normalize(DEFAULT_EPSILON)
                    .unwrap_or_else(Vector::zeros),
            );
        }

        self.bounding_sphere = BoundingSphere::from_points(&self.world_vertices);
    }

    fn contains_projected_point(&self, projected: &Point<Real>) -> bool {
        self.world_vertices
            .iter()
            .zip(self.edge_normals.iter())
            .all(|(v, normal)| normal.dot(&(projected - v)) >= 0.0)
    }

    /// The point of this portal closest to the world-space `point`.
    ///
    /// If the projection of `point` on the portal plane lies inside of the
    /// polygon, it is returned as-is. Otherwise the closest point of the
    /// polygon boundary is returned.
    pub fn closest_boundary_point(&self, point: &Point<Real>) -> Point<Real> {
        let projected = self.world_plane.project_point(point);

        if self.contains_projected_point(&projected) {
            return projected;
        }

        let n = self.world_vertices.len();
        let mut best = projected;
        let mut best_dist = Real::MAX;

        for (i, a) in self.world_vertices.iter().enumerate() {
            let b = self.world_vertices[(i + 1) % n];
            let candidate = Segment::new(*a, b).project_point(&projected);
            let dist = na::distance_squared(&candidate, &projected);

            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }

        best
    }

    /// The point of this portal closest to `line`.
    ///
    /// If the line pierces the polygon, the piercing point is returned.
    /// Otherwise this is the boundary point at the smallest distance from the
    /// line. Returns `None` if the line direction is zero.
    pub fn closest_boundary_point_to_line(&self, line: &Line) -> Option<Point<Real>> {
        let dir_norm2 = line.direction.norm_squared();

        if dir_norm2 <= DEFAULT_EPSILON {
            return None;
        }

        let origin = line.support_point();
        let denom = self.world_plane.normal_dot(&line.direction);

        if denom.abs() > DEFAULT_EPSILON {
            let t = -self.world_plane.signed_distance(&origin) / denom;
            let pierce = origin + line.direction * t;

            if self.contains_projected_point(&pierce) {
                return Some(pierce);
            }
        }

        let n = self.world_vertices.len();
        let mut best = None;
        let mut best_dist = Real::MAX;

        for (i, a) in self.world_vertices.iter().enumerate() {
            let b = self.world_vertices[(i + 1) % n];
            let candidate = closest_segment_point_to_line(a, &b, &origin, &line.direction);
            let dist = squared_distance_point_to_line(&candidate, line);

            if dist < best_dist {
                best_dist = dist;
                best = Some(candidate);
            }
        }

        best
    }
}

/// The point of the segment `[a, b]` closest to the line through `origin`
/// with the direction `dir`.
fn closest_segment_point_to_line(
    a: &Point<Real>,
    b: &Point<Real>,
    origin: &Point<Real>,
    dir: &Vector<Real>,
) -> Point<Real> {
    let edge = b - a;
    let w = origin - a;
    let dd = dir.norm_squared();
    let de = dir.dot(&edge);
    let ee = edge.norm_squared();
    let denom = dd * ee - de * de;

    // Parallel edges are equally far from the line everywhere.
    let t = if denom > DEFAULT_EPSILON * dd * ee {
        ((dd * edge.dot(&w) - de * dir.dot(&w)) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };

    a + edge * t
}
