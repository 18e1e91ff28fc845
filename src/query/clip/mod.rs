pub use self::clip_polygon::{
    clip_polygon, clip_polygon_to_planes, PolygonBuffer, MAX_CLIPPED_POLYGON_VERTEX_COUNT,
};
pub use self::clip_polyhedron::{clip_polyhedron, ClipStatus};

mod clip_polygon;
mod clip_polyhedron;
