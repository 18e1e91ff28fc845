//! The world: zones, portals, cameras, lights and sound sources, and the
//! region trees propagated from every viewpoint through the portals.

pub use self::camera::{Camera, CameraId};
pub use self::light::{Light, LightFlags, LightId, LightKind};
pub use self::region_tree::{RegionId, RegionNode, RegionOwner};
pub use self::source::{Source, SourceId};
pub use self::traversal::{Traversal, TraversalFlags};
pub use self::world::{World, WorldError};

mod camera;
mod light;
mod propagation;
mod region_tree;
mod source;
mod traversal;
mod world;
