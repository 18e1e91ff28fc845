//! Various unsorted geometrical operators.

pub(crate) use self::consts::*;
pub(crate) use self::point_cloud_support_point::point_cloud_support_point_id2;
pub use self::point_cloud_support_point::{
    point_cloud_support_point, point_cloud_support_point_id,
};
pub use self::polygon::{polygon_centroid, polygon_normal};

mod consts;
mod point_cloud_support_point;
mod polygon;
