use crate::math::{Point, Real, Vector};

/// The average of the vertices of a polygon.
///
/// For convex polygons this point lies strictly inside the polygon, which is
/// all the plane orientation code needs.
pub fn polygon_centroid(vertices: &[Point<Real>]) -> Point<Real> {
    let sum = vertices
        .iter()
        .fold(Vector::zeros(), |acc, v| acc + v.coords);
    Point::from(sum / (vertices.len().max(1) as Real))
}

/// Newell's normal of a polygon, not normalized.
///
/// The result points toward the side from which the vertices appear
/// counterclockwise.
pub fn polygon_normal(vertices: &[Point<Real>]) -> Vector<Real> {
    let mut normal = Vector::zeros();
    let mut prev = match vertices.last() {
        Some(v) => v,
        None => return normal,
    };

    for curr in vertices {
        normal.x += (prev.y - curr.y) * (prev.z + curr.z);
        normal.y += (prev.z - curr.z) * (prev.x + curr.x);
        normal.z += (prev.x - curr.x) * (prev.y + curr.y);
        prev = curr;
    }

    normal
}
