//! Extrusion of portal polygons away from a viewpoint.
//!
//! Every extrusion builds a drum whose near ring is the portal polygon and
//! whose far ring lies in a cap plane. The planes are laid out as the side
//! planes first, then the portal plane, then the cap plane, which is the
//! only auxiliary plane of the resulting region. The cap is placed at the
//! smaller of the explicit depth and the farthest point of the zone the
//! region extends into, as given by the `zone_support` function.

use crate::math::{Point, Real, Vector, BOUNDARY_EPSILON, DEFAULT_EPSILON};
use crate::region::VisibilityRegion;
use crate::shape::{
    squared_distance_point_to_line, Convexity, Line, Plane, Polyhedron,
    MAX_EXTRUSION_VERTEX_COUNT,
};
use crate::utils;
use arrayvec::ArrayVec;

type ExtrusionBuffer<T> = ArrayVec<T, MAX_EXTRUSION_VERTEX_COUNT>;

#[derive(Copy, Clone)]
enum Apex {
    Point(Point<Real>),
    Direction(Vector<Real>),
}

/// Extrudes a portal polygon away from a camera.
///
/// Each vertex is pushed along the ray from `position` through it, up to a cap
/// plane orthogonal to `view_direction` located `far_depth` away from the
/// camera, or at the farthest point of the zone along `view_direction` if it
/// is closer. `front_plane` is the plane of the portal, with its positive side
/// pointing away from the camera.
///
/// Returns `None` if the polygon has fewer than 3 or more than
/// [`MAX_EXTRUSION_VERTEX_COUNT`] distinct vertices, if the camera is not in
/// front of the portal, or if the whole portal lies beyond the cap.
pub fn polygon_extrusion(
    vertices: &[Point<Real>],
    position: &Point<Real>,
    view_direction: &Vector<Real>,
    far_depth: Real,
    front_plane: &Plane,
    zone_support: impl Fn(&Vector<Real>) -> Option<Point<Real>>,
) -> Option<VisibilityRegion> {
    let polygon = prepare_polygon(vertices)?;
    let front = front_plane.normalized()?;
    let axis = view_direction.try_normalize(DEFAULT_EPSILON)?;

    if front.signed_distance(position) > -BOUNDARY_EPSILON {
        return None;
    }

    let mut cap = axis.dot(&position.coords) + far_depth;
    if let Some(support) = zone_support(&axis) {
        cap = cap.min(axis.dot(&support.coords));
    }

    let cap = fit_cap(&polygon, &axis, cap)?;
    let sides = side_planes(&polygon, Apex::Point(*position))?;
    let far = project_on_cap(&polygon, Apex::Point(*position), &axis, cap)?;
    let back = Plane::new(-axis, cap);

    Some(VisibilityRegion::from_polyhedron(
        Polyhedron::from_drum(&polygon, &far, &sides, front, back),
        1,
    ))
}

/// Extrudes a portal polygon along the constant direction of an infinite light.
///
/// `direction` is the direction the light travels in. If `zone_support` has
/// no finite support point along `direction`, the region is only bounded by
/// the side planes and the portal plane, and has no auxiliary plane.
///
/// Returns `None` if the polygon is degenerate or if the portal does not face
/// the light.
pub fn infinite_polygon_extrusion(
    vertices: &[Point<Real>],
    direction: &Vector<Real>,
    front_plane: &Plane,
    zone_support: impl Fn(&Vector<Real>) -> Option<Point<Real>>,
) -> Option<VisibilityRegion> {
    let polygon = prepare_polygon(vertices)?;
    let front = front_plane.normalized()?;
    let axis = direction.try_normalize(DEFAULT_EPSILON)?;

    if front.normal.dot(&axis) <= DEFAULT_EPSILON {
        return None;
    }

    let sides = side_planes(&polygon, Apex::Direction(axis))?;

    match zone_support(&axis) {
        None => {
            let mut convexity = Convexity::from_planes(&sides);
            convexity.push_plane(front);
            Some(VisibilityRegion::from_convexity(convexity, 0))
        }
        Some(support) => {
            let cap = fit_cap(&polygon, &axis, axis.dot(&support.coords))?;
            let far = project_on_cap(&polygon, Apex::Direction(axis), &axis, cap)?;
            let back = Plane::new(-axis, cap);

            Some(VisibilityRegion::from_polyhedron(
                Polyhedron::from_drum(&polygon, &far, &sides, front, back),
                1,
            ))
        }
    }
}

/// Extrudes a portal polygon away from a point light or a sound source.
///
/// The cap plane is parallel to the portal, `range` away from `position`, or
/// at the farthest point of the zone along the portal normal if it is closer.
///
/// A nonzero `confinement_radius` means that the emitter is a sphere rather
/// than a point. Each side plane is then tilted about its portal edge until it
/// is tangent to that sphere, by the angle whose sine is `r / d` where `d` is
/// the distance from `position` to the edge line, so that the region covers
/// every ray leaving the sphere through the portal. Edges closer to the
/// emitter than its radius do not bound the region at all, and the region is
/// then only described by its planes.
pub fn point_polygon_extrusion(
    vertices: &[Point<Real>],
    position: &Point<Real>,
    range: Real,
    confinement_radius: Real,
    front_plane: &Plane,
    zone_support: impl Fn(&Vector<Real>) -> Option<Point<Real>>,
) -> Option<VisibilityRegion> {
    let polygon = prepare_polygon(vertices)?;
    let front = front_plane.normalized()?;
    let axis = front.normal;

    if front.signed_distance(position) > -BOUNDARY_EPSILON {
        return None;
    }

    let mut cap = axis.dot(&position.coords) + range + confinement_radius.max(0.0);
    if let Some(support) = zone_support(&axis) {
        cap = cap.min(axis.dot(&support.coords));
    }

    let cap = fit_cap(&polygon, &axis, cap)?;
    let sides = side_planes(&polygon, Apex::Point(*position))?;
    let back = Plane::new(-axis, cap);

    if confinement_radius <= 0.0 {
        let far = project_on_cap(&polygon, Apex::Point(*position), &axis, cap)?;
        return Some(VisibilityRegion::from_polyhedron(
            Polyhedron::from_drum(&polygon, &far, &sides, front, back),
            1,
        ));
    }

    let n = polygon.len();
    let r2 = confinement_radius * confinement_radius;
    let mut tilted = ExtrusionBuffer::<Plane>::new();
    let mut closed = true;

    for (i, plane) in sides.iter().enumerate() {
        let line = Line::from_points(&polygon[i], &polygon[(i + 1) % n]);
        let d2 = squared_distance_point_to_line(position, &line);

        if d2 <= r2 {
            closed = false;
            continue;
        }

        let d = d2.sqrt();
        let foot = line.project_point(position);
        let u = (foot - position) / d;
        let normal = plane.normal * (1.0 - r2 / d2).sqrt() + u * (confinement_radius / d);
        tilted.push(Plane::from_point_and_normal(&foot, &normal));
    }

    if closed {
        if let Some(far) = tilted_far_ring(&tilted, &back) {
            return Some(VisibilityRegion::from_polyhedron(
                Polyhedron::from_drum(&polygon, &far, &tilted, front, back),
                1,
            ));
        }
    }

    let mut convexity = Convexity::from_planes(&tilted);
    convexity.push_plane(front);
    convexity.push_plane(back);
    Some(VisibilityRegion::from_convexity(convexity, 1))
}

/// Removes repeated consecutive vertices.
fn prepare_polygon(vertices: &[Point<Real>]) -> Option<ExtrusionBuffer<Point<Real>>> {
    let mut res = ExtrusionBuffer::new();

    for vertex in vertices {
        let repeated = res
            .last()
            .is_some_and(|last| na::distance_squared(last, vertex) <= BOUNDARY_EPSILON * BOUNDARY_EPSILON);

        if !repeated {
            res.try_push(*vertex).ok()?;
        }
    }

    while res.len() > 1
        && na::distance_squared(&res[0], &res[res.len() - 1])
            <= BOUNDARY_EPSILON * BOUNDARY_EPSILON
    {
        let _ = res.pop();
    }

    if res.len() < 3 {
        None
    } else {
        Some(res)
    }
}

/// Pushes the cap beyond the farthest vertex, or fails if every vertex is beyond it.
fn fit_cap(polygon: &[Point<Real>], axis: &Vector<Real>, cap: Real) -> Option<Real> {
    let (min_depth, max_depth) = polygon.iter().fold(
        (Real::MAX, -Real::MAX),
        |(min, max), v| {
            let depth = axis.dot(&v.coords);
            (min.min(depth), max.max(depth))
        },
    );

    if cap <= min_depth + BOUNDARY_EPSILON {
        None
    } else {
        Some(cap.max(max_depth + BOUNDARY_EPSILON))
    }
}

fn side_planes(polygon: &[Point<Real>], apex: Apex) -> Option<ExtrusionBuffer<Plane>> {
    let centroid = utils::polygon_centroid(polygon);
    let n = polygon.len();
    let mut res = ExtrusionBuffer::new();

    for (i, a) in polygon.iter().enumerate() {
        let b = &polygon[(i + 1) % n];
        let normal = match apex {
            Apex::Point(origin) => (a - origin).cross(&(b - origin)),
            Apex::Direction(dir) => (b - a).cross(&dir),
        };
        let plane = Plane::oriented_toward(&normal, a, &centroid)?;

        if plane.signed_distance(&centroid) <= DEFAULT_EPSILON {
            return None;
        }

        res.push(plane);
    }

    Some(res)
}

fn project_on_cap(
    polygon: &[Point<Real>],
    apex: Apex,
    axis: &Vector<Real>,
    cap: Real,
) -> Option<ExtrusionBuffer<Point<Real>>> {
    let mut res = ExtrusionBuffer::new();

    for vertex in polygon {
        let dir = match apex {
            Apex::Point(origin) => vertex - origin,
            Apex::Direction(dir) => dir,
        };
        let speed = axis.dot(&dir);

        if speed <= DEFAULT_EPSILON {
            return None;
        }

        res.push(vertex + dir * ((cap - axis.dot(&vertex.coords)) / speed));
    }

    Some(res)
}

fn tilted_far_ring(sides: &[Plane], back: &Plane) -> Option<ExtrusionBuffer<Point<Real>>> {
    let n = sides.len();
    let mut res = ExtrusionBuffer::new();

    for i in 0..n {
        let far = Plane::intersect_three(&sides[(i + n - 1) % n], &sides[i], back)?;
        let tolerance = BOUNDARY_EPSILON * (1.0 + far.coords.norm());

        if sides.iter().any(|plane| plane.signed_distance(&far) < -tolerance) {
            return None;
        }

        res.push(far);
    }

    Some(res)
}
