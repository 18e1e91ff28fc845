use crate::math::{Real, BOUNDARY_EPSILON};
use crate::shape::{
    Edge, Face, Plane, Polyhedron, MAX_POLYHEDRON_EDGE_COUNT, MAX_POLYHEDRON_FACE_COUNT,
    MAX_POLYHEDRON_FACE_EDGE_COUNT, MAX_POLYHEDRON_VERTEX_COUNT,
};
use arrayvec::ArrayVec;

const UNMAPPED: u8 = 0xFF;

const NEGATIVE: u8 = 0;
const BOUNDARY: u8 = 1;
const POSITIVE: u8 = 2;

/// The outcome of [`clip_polyhedron`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipStatus {
    /// No vertex lies on the negative side of the plane: the result is an unchanged copy.
    Unclipped,
    /// The polyhedron was cut and a cap face lying in the plane was added.
    Clipped,
    /// No vertex lies on the positive side of the plane: nothing is left.
    Empty,
    /// The cut could not be computed reliably: the result is an unchanged copy.
    Degenerate,
}

impl ClipStatus {
    /// Is the clipped polyhedron empty?
    #[inline]
    pub fn is_empty(self) -> bool {
        self == ClipStatus::Empty
    }
}

/// Keeps the part of `polyhedron` lying on the positive side of `plane`.
///
/// Vertices closer to the plane than [`BOUNDARY_EPSILON`] are considered to be
/// on the plane. When the cut is ambiguous (cap edges that cannot be chained
/// into a loop, too few cap edges, or exhausted capacities), the input is
/// copied unchanged into `result` and [`ClipStatus::Degenerate`] is returned,
/// so that the result over-estimates the clipped volume.
pub fn clip_polyhedron(polyhedron: &Polyhedron, plane: &Plane, result: &mut Polyhedron) -> ClipStatus {
    let mut location = [NEGATIVE; MAX_POLYHEDRON_VERTEX_COUNT];
    let mut distance: [Real; MAX_POLYHEDRON_VERTEX_COUNT] = [0.0; MAX_POLYHEDRON_VERTEX_COUNT];
    let mut min_location = POSITIVE;
    let mut max_location = NEGATIVE;

    for (i, vertex) in polyhedron.vertices().iter().enumerate() {
        let d = plane.signed_distance(vertex);
        distance[i] = d;
        location[i] = if d < -BOUNDARY_EPSILON {
            NEGATIVE
        } else if d > BOUNDARY_EPSILON {
            POSITIVE
        } else {
            BOUNDARY
        };

        min_location = min_location.min(location[i]);
        max_location = max_location.max(location[i]);
    }

    if polyhedron.is_empty() {
        *result = Polyhedron::new();
        return ClipStatus::Empty;
    }

    // A polyhedron lying entirely in the plane is kept.
    if min_location != NEGATIVE {
        result.clone_from(polyhedron);
        return ClipStatus::Unclipped;
    }

    if max_location <= BOUNDARY {
        *result = Polyhedron::new();
        return ClipStatus::Empty;
    }

    let builder = ClipBuilder {
        input: polyhedron,
        plane,
        location: &location,
        distance: &distance,
    };

    match builder.build() {
        Some(clipped) => {
            *result = clipped;
            ClipStatus::Clipped
        }
        None => {
            log::debug!(
                "Degenerate polyhedron clip ({} vertices, {} faces): keeping the unclipped polyhedron.",
                polyhedron.vertices().len(),
                polyhedron.faces().len()
            );
            result.clone_from(polyhedron);
            ClipStatus::Degenerate
        }
    }
}

struct ClipBuilder<'a> {
    input: &'a Polyhedron,
    plane: &'a Plane,
    location: &'a [u8; MAX_POLYHEDRON_VERTEX_COUNT],
    distance: &'a [Real; MAX_POLYHEDRON_VERTEX_COUNT],
}

impl ClipBuilder<'_> {
    fn build(&self) -> Option<Polyhedron> {
        let input = self.input;
        let mut res = Polyhedron::new();

        // Faces touching the positive side survive, in their original order.
        let mut face_map = [UNMAPPED; MAX_POLYHEDRON_FACE_COUNT];

        for (face_id, face) in input.faces().iter().enumerate() {
            let survives = face.edges().any(|e| {
                input.edges()[e]
                    .vertices()
                    .iter()
                    .any(|v| self.location[*v] == POSITIVE)
            });

            if survives {
                face_map[face_id] = res.convexity.plane_count() as u8;
                if !res.convexity.try_push_plane(*input.planes().get(face_id)?) {
                    return None;
                }
            }
        }

        let cap_face = res.convexity.plane_count();
        if !res.convexity.try_push_plane(*self.plane) {
            return None;
        }

        let mut vertex_map = [UNMAPPED; MAX_POLYHEDRON_VERTEX_COUNT];
        let mut edge_map = [UNMAPPED; MAX_POLYHEDRON_EDGE_COUNT];
        let mut crossing_vertex = [UNMAPPED; MAX_POLYHEDRON_EDGE_COUNT];
        let mut cap_edges = ArrayVec::<usize, MAX_POLYHEDRON_EDGE_COUNT>::new();

        for (edge_id, edge) in input.edges().iter().enumerate() {
            let [a, b] = edge.vertices();
            let (la, lb) = (self.location[a], self.location[b]);
            let faces = edge.faces();
            let mapped_faces = [face_map[faces[0]], face_map[faces[1]]];

            if la + lb <= BOUNDARY {
                continue;
            }

            if la == BOUNDARY && lb == BOUNDARY {
                // Edge lying in the clipping plane.
                let new_faces = match mapped_faces {
                    [UNMAPPED, UNMAPPED] => continue,
                    [f, UNMAPPED] | [UNMAPPED, f] => [f as usize, cap_face],
                    [f0, f1] => [f0 as usize, f1 as usize],
                };

                let new_edge = Edge::new(
                    [
                        self.map_vertex(&mut res, &mut vertex_map, a)?,
                        self.map_vertex(&mut res, &mut vertex_map, b)?,
                    ],
                    new_faces,
                );

                edge_map[edge_id] = res.edges.len() as u8;
                if new_faces[1] == cap_face {
                    cap_edges.try_push(res.edges.len()).ok()?;
                }
                res.edges.try_push(new_edge).ok()?;
                continue;
            }

            if mapped_faces.contains(&UNMAPPED) {
                // Both faces of an edge with a positive vertex always survive.
                return None;
            }

            let new_faces = [mapped_faces[0] as usize, mapped_faces[1] as usize];

            let new_vertices = if la == NEGATIVE || lb == NEGATIVE {
                let (neg, pos) = if la == NEGATIVE { (a, b) } else { (b, a) };
                let (dn, dp) = (self.distance[neg], self.distance[pos]);
                let t = dn / (dn - dp);
                let vn = input.vertices()[neg];
                let vp = input.vertices()[pos];
                let new_vertex = res.vertices.len();
                res.vertices.try_push(vn + (vp - vn) * t).ok()?;
                crossing_vertex[edge_id] = new_vertex as u8;

                let pos_vertex = self.map_vertex(&mut res, &mut vertex_map, pos)?;
                if neg == a {
                    [new_vertex, pos_vertex]
                } else {
                    [pos_vertex, new_vertex]
                }
            } else {
                [
                    self.map_vertex(&mut res, &mut vertex_map, a)?,
                    self.map_vertex(&mut res, &mut vertex_map, b)?,
                ]
            };

            edge_map[edge_id] = res.edges.len() as u8;
            res.edges.try_push(Edge::new(new_vertices, new_faces)).ok()?;
        }

        // Rebuild the surviving faces, closing each one with a new edge lying in the cap.
        let mut new_faces = ArrayVec::<Face, MAX_POLYHEDRON_FACE_COUNT>::new();

        for (face_id, face) in input.faces().iter().enumerate() {
            let new_face_id = face_map[face_id];

            if new_face_id == UNMAPPED {
                continue;
            }

            let old_edges: ArrayVec<usize, MAX_POLYHEDRON_FACE_EDGE_COUNT> = face.edges().collect();
            let m = old_edges.len();
            let kept = |k: usize| edge_map[old_edges[k % m]] != UNMAPPED;

            let mut new_face = Face::default();

            if (0..m).all(kept) {
                for e in &old_edges {
                    new_face.edge_index.try_push(edge_map[*e]).ok()?;
                }
                new_faces.try_push(new_face).ok()?;
                continue;
            }

            // Start right after the dropped run so that it ends the loop.
            let run_end = (0..m).find(|k| !kept(*k) && kept(k + 1))?;
            let start = (run_end + 1) % m;
            let mut in_run = false;
            let mut run_count = 0;

            for step in 0..m {
                let k = (start + step) % m;

                if kept(k) {
                    if in_run {
                        // A second dropped run: the face is not convex anymore.
                        return None;
                    }
                    new_face.edge_index.try_push(edge_map[old_edges[k]]).ok()?;
                } else {
                    in_run = true;
                    run_count += 1;
                }
            }

            debug_assert!(run_count > 0);

            // The run lies between `start - run_count - 1` and `start`.
            let run_first = (start + m - run_count) % m;
            let before = old_edges[(run_first + m - 1) % m];
            let after = old_edges[start];
            let p = self.run_endpoint(&vertex_map, &crossing_vertex, before, old_edges[run_first])?;
            let q = self.run_endpoint(&vertex_map, &crossing_vertex, after, old_edges[run_end])?;

            if p == q {
                return None;
            }

            let new_edge = res.edges.len();
            res.edges
                .try_push(Edge::new([p, q], [new_face_id as usize, cap_face]))
                .ok()?;
            cap_edges.try_push(new_edge).ok()?;
            new_face.edge_index.try_push(new_edge as u8).ok()?;
            new_faces.try_push(new_face).ok()?;
        }

        let cap = Self::chain_cap_edges(&res.edges, &cap_edges)?;
        new_faces.try_push(cap).ok()?;
        res.faces = new_faces;

        res.validate().ok()?;
        Some(res)
    }

    fn map_vertex(
        &self,
        res: &mut Polyhedron,
        vertex_map: &mut [u8; MAX_POLYHEDRON_VERTEX_COUNT],
        vertex: usize,
    ) -> Option<usize> {
        if vertex_map[vertex] == UNMAPPED {
            vertex_map[vertex] = res.vertices.len() as u8;
            res.vertices.try_push(self.input.vertices()[vertex]).ok()?;
        }

        Some(vertex_map[vertex] as usize)
    }

    /// The new vertex where the kept edge `kept` meets the dropped edge `dropped`.
    fn run_endpoint(
        &self,
        vertex_map: &[u8; MAX_POLYHEDRON_VERTEX_COUNT],
        crossing_vertex: &[u8; MAX_POLYHEDRON_EDGE_COUNT],
        kept: usize,
        dropped: usize,
    ) -> Option<usize> {
        let edges = self.input.edges();
        let shared = edges[kept].shared_vertex(&edges[dropped])?;

        let mapped = if crossing_vertex[kept] != UNMAPPED {
            crossing_vertex[kept]
        } else {
            vertex_map[shared]
        };

        if mapped == UNMAPPED {
            None
        } else {
            Some(mapped as usize)
        }
    }

    /// Orders the cap edges into a closed loop.
    fn chain_cap_edges(edges: &[Edge], cap_edges: &[usize]) -> Option<Face> {
        if cap_edges.len() < 3 || cap_edges.len() > MAX_POLYHEDRON_FACE_EDGE_COUNT {
            return None;
        }

        let mut used = [false; MAX_POLYHEDRON_EDGE_COUNT];
        let mut face = Face::default();
        let first = cap_edges[0];
        let start_vertex = edges[first].vertices()[0];
        let mut current_vertex = edges[first].vertices()[1];
        used[0] = true;
        face.edge_index.push(first as u8);

        for _ in 1..cap_edges.len() {
            let (slot, next) = cap_edges
                .iter()
                .enumerate()
                .find(|(slot, e)| !used[*slot] && edges[**e].vertices().contains(&current_vertex))?;

            used[slot] = true;
            let [a, b] = edges[*next].vertices();
            current_vertex = if a == current_vertex { b } else { a };
            face.edge_index.push(*next as u8);
        }

        if current_vertex == start_vertex {
            Some(face)
        } else {
            None
        }
    }
}
