use crate::math::{Point, Real, BOUNDARY_EPSILON};
use crate::shape::Plane;
use arrayvec::ArrayVec;

/// The maximum number of vertices of a clipped polygon.
pub const MAX_CLIPPED_POLYGON_VERTEX_COUNT: usize = 32;

/// Inline storage for the vertices of a clipped polygon.
pub type PolygonBuffer = ArrayVec<Point<Real>, MAX_CLIPPED_POLYGON_VERTEX_COUNT>;

/// Cuts a convex polygon with the given plane.
///
/// The part of the polygon lying on the positive side of `plane` is written to
/// `result`. Vertices closer to the plane than [`BOUNDARY_EPSILON`] are kept
/// as-is, and an edge is only split when its endpoints are strictly on
/// opposite sides of the plane.
pub fn clip_polygon(plane: &Plane, polygon: &[Point<Real>], result: &mut PolygonBuffer) {
    result.clear();

    let Some(last) = polygon.last() else {
        return;
    };

    let mut prev_pt = *last;
    let mut prev_dist = plane.signed_distance(&prev_pt);

    for pt in polygon {
        let dist = plane.signed_distance(pt);

        if (prev_dist > BOUNDARY_EPSILON && dist < -BOUNDARY_EPSILON)
            || (prev_dist < -BOUNDARY_EPSILON && dist > BOUNDARY_EPSILON)
        {
            // We crossed the plane, so we need
            // to cut the edge.
            let t = prev_dist / (prev_dist - dist);
            let _ = result.try_push(prev_pt + (pt - prev_pt) * t);
        }

        if dist >= -BOUNDARY_EPSILON {
            let _ = result.try_push(*pt);
        }

        prev_pt = *pt;
        prev_dist = dist;
    }
}

/// Cuts a convex polygon with every plane of `planes`.
///
/// Stops early and leaves `result` empty if the polygon is entirely clipped
/// away.
pub fn clip_polygon_to_planes(
    planes: &[Plane],
    polygon: &[Point<Real>],
    result: &mut PolygonBuffer,
) {
    result.clear();
    result.extend(polygon.iter().copied().take(MAX_CLIPPED_POLYGON_VERTEX_COUNT));

    let mut workspace = PolygonBuffer::new();

    for plane in planes {
        clip_polygon(plane, &result[..], &mut workspace);
        core::mem::swap(result, &mut workspace);

        if result.is_empty() {
            return;
        }
    }
}
