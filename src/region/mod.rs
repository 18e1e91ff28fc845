//! Convex regions used for culling.
//!
//! A [`VisibilityRegion`] bounds what a camera sees or what a light reaches
//! inside of a zone. An [`OcclusionRegion`] bounds what an occluder hides.
//! Both are built from extrusions of portal polygons.

pub use self::extrusion::{infinite_polygon_extrusion, point_polygon_extrusion, polygon_extrusion};
pub use self::occlusion_region::{OcclusionMask, OcclusionRegion, MAX_OCCLUSION_PLANE_COUNT};
pub use self::visibility_region::{RegionBounds, VisibilityRegion};

mod extrusion;
mod occlusion_region;
mod visibility_region;
