//! Zones partitioning the world and the portals connecting them.

pub use self::box_zone::BoxZone;
pub use self::cylinder_zone::CylinderZone;
pub use self::polygon_zone::{PolygonZone, MAX_ZONE_POLYGON_VERTEX_COUNT};
pub use self::portal::{
    Portal, PortalError, PortalFlags, PortalKind, PortalVertices, MAX_PORTAL_VERTEX_COUNT,
};
pub use self::zone::{ShadowSpace, Zone, ZoneError};
pub use self::zone_object::{InfiniteZone, ZoneObject, ZoneType};
pub use self::zone_shape::ZoneShape;

mod box_zone;
mod cylinder_zone;
mod polygon_zone;
mod portal;
mod zone;
mod zone_object;
mod zone_shape;

/// Handle of a zone stored in a [`World`](crate::world::World).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub(crate) usize);

/// Handle of a portal stored in a [`World`](crate::world::World).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalId(pub(crate) usize);
