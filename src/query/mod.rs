//! Non-persistent geometric queries.
//!
//! * [`clip_polygon`] and [`clip_polyhedron`] cut convex polygons and
//!   polyhedra by planes.
//! * [`gjk::intersection_test`] tests support-mapped shapes for overlap.

pub use self::clip::{
    clip_polygon, clip_polygon_to_planes, clip_polyhedron, ClipStatus, PolygonBuffer,
    MAX_CLIPPED_POLYGON_VERTEX_COUNT,
};

mod clip;
pub mod gjk;
