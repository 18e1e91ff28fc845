//! Shapes supported by zonevis3d.

pub use self::convexity::Convexity;
pub use self::line::{squared_distance_point_to_line, Line};
pub use self::plane::Plane;
pub use self::polyhedron::{
    Edge, Face, Polyhedron, TopologyError, MAX_EXTRUSION_VERTEX_COUNT, MAX_POLYHEDRON_EDGE_COUNT,
    MAX_POLYHEDRON_FACE_COUNT, MAX_POLYHEDRON_FACE_EDGE_COUNT, MAX_POLYHEDRON_VERTEX_COUNT,
};
pub use self::segment::Segment;
pub use self::support_map::SupportMap;

mod convexity;
mod line;
mod plane;
mod polyhedron;
mod segment;
mod support_map;
