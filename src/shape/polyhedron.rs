//! Fixed-capacity convex polyhedra.

use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Point2, Real, Vector, DEFAULT_EPSILON};
use crate::shape::{Convexity, Plane, SupportMap};
use crate::utils;
use alloc::vec::Vec;
use arrayvec::ArrayVec;

/// The maximum number of vertices of a polyhedron.
pub const MAX_POLYHEDRON_VERTEX_COUNT: usize = 28;
/// The maximum number of edges of a polyhedron.
pub const MAX_POLYHEDRON_EDGE_COUNT: usize = 42;
/// The maximum number of faces (and planes) of a polyhedron.
pub const MAX_POLYHEDRON_FACE_COUNT: usize = 16;
/// The maximum number of edges bounding a single face of a polyhedron.
pub const MAX_POLYHEDRON_FACE_EDGE_COUNT: usize = 15;
/// The maximum number of polygon vertices that can be extruded into a polyhedron.
pub const MAX_EXTRUSION_VERTEX_COUNT: usize = 14;

static_assertions::const_assert_eq!(
    MAX_POLYHEDRON_VERTEX_COUNT as isize - MAX_POLYHEDRON_EDGE_COUNT as isize
        + MAX_POLYHEDRON_FACE_COUNT as isize,
    2
);
static_assertions::const_assert!(MAX_POLYHEDRON_EDGE_COUNT < u8::MAX as usize);
static_assertions::const_assert!(MAX_EXTRUSION_VERTEX_COUNT * 2 <= MAX_POLYHEDRON_VERTEX_COUNT);
static_assertions::const_assert!(MAX_EXTRUSION_VERTEX_COUNT * 3 <= MAX_POLYHEDRON_EDGE_COUNT);
static_assertions::const_assert!(MAX_EXTRUSION_VERTEX_COUNT + 2 <= MAX_POLYHEDRON_FACE_COUNT);
static_assertions::const_assert!(MAX_EXTRUSION_VERTEX_COUNT <= MAX_POLYHEDRON_FACE_EDGE_COUNT);

/// Errors detected by [`Polyhedron::validate`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// The polyhedron does not have one plane per face.
    #[error("the polyhedron has {planes} planes but {faces} faces.")]
    PlaneFaceCountMismatch {
        /// The number of planes.
        planes: usize,
        /// The number of faces.
        faces: usize,
    },
    /// An edge references a vertex that does not exist.
    #[error("the edge {edge} references the missing vertex {vertex}.")]
    VertexIndexOutOfBounds {
        /// The faulty edge.
        edge: usize,
        /// The missing vertex.
        vertex: usize,
    },
    /// An edge references a face that does not exist.
    #[error("the edge {edge} references the missing face {face}.")]
    FaceIndexOutOfBounds {
        /// The faulty edge.
        edge: usize,
        /// The missing face.
        face: usize,
    },
    /// A face references an edge that does not exist.
    #[error("the face {face} references the missing edge {edge}.")]
    EdgeIndexOutOfBounds {
        /// The faulty face.
        face: usize,
        /// The missing edge.
        edge: usize,
    },
    /// An edge connects a vertex to itself.
    #[error("the edge {0} has two identical vertices.")]
    DegenerateEdge(usize),
    /// A face has fewer than three edges.
    #[error("the face {0} has fewer than three edges.")]
    DegenerateFace(usize),
    /// The edges of a face do not form a closed loop.
    #[error("the edges of the face {0} do not form a closed loop.")]
    OpenFace(usize),
    /// A face lists an edge that does not list the face back.
    #[error("the face {face} lists the edge {edge} which is not adjacent to it.")]
    EdgeFaceMismatch {
        /// The faulty face.
        face: usize,
        /// The faulty edge.
        edge: usize,
    },
    /// An edge is not shared by exactly two faces.
    #[error("the edge {edge} is used by {count} faces instead of two.")]
    EdgeUseCount {
        /// The faulty edge.
        edge: usize,
        /// The number of faces using it.
        count: usize,
    },
    /// The vertex, edge and face counts violate Euler's formula.
    #[error("V - E + F = {vertices} - {edges} + {faces} is not equal to 2.")]
    EulerCharacteristic {
        /// The number of vertices.
        vertices: usize,
        /// The number of edges.
        edges: usize,
        /// The number of faces.
        faces: usize,
    },
}

/// An edge of a polyhedron.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub struct Edge {
    /// The indices of the two vertices of this edge.
    pub vertex_index: [u8; 2],
    /// The indices of the two faces sharing this edge.
    pub face_index: [u8; 2],
}

impl Edge {
    /// Creates an edge from its vertex and face indices.
    #[inline]
    pub fn new(vertex_index: [usize; 2], face_index: [usize; 2]) -> Self {
        debug_assert!(vertex_index.iter().all(|v| *v < MAX_POLYHEDRON_VERTEX_COUNT));
        debug_assert!(face_index.iter().all(|f| *f < MAX_POLYHEDRON_FACE_COUNT));
        Edge {
            vertex_index: [vertex_index[0] as u8, vertex_index[1] as u8],
            face_index: [face_index[0] as u8, face_index[1] as u8],
        }
    }

    /// The vertex indices of this edge.
    #[inline]
    pub fn vertices(&self) -> [usize; 2] {
        [self.vertex_index[0] as usize, self.vertex_index[1] as usize]
    }

    /// The face indices of this edge.
    #[inline]
    pub fn faces(&self) -> [usize; 2] {
        [self.face_index[0] as usize, self.face_index[1] as usize]
    }

    /// The vertex shared by `self` and `other`, if any.
    #[inline]
    pub fn shared_vertex(&self, other: &Edge) -> Option<usize> {
        self.vertex_index
            .iter()
            .find(|v| other.vertex_index.contains(v))
            .map(|v| *v as usize)
    }
}

/// A face of a polyhedron, given by the ordered loop of its edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Face {
    /// The indices of the edges bounding this face, in loop order.
    pub edge_index: ArrayVec<u8, MAX_POLYHEDRON_FACE_EDGE_COUNT>,
}

impl Face {
    /// Creates a face from the ordered indices of its edges.
    pub fn new(edges: &[usize]) -> Self {
        let mut edge_index = ArrayVec::new();
        edge_index.extend(edges.iter().map(|e| *e as u8));
        Face { edge_index }
    }

    /// The number of edges of this face.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Iterates through the edge indices of this face.
    #[inline]
    pub fn edges(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.edge_index.iter().map(|e| *e as usize)
    }
}

/// A convex polyhedron with explicit vertices, edges and faces.
///
/// The face `i` lies in the plane `i` of the underlying [`Convexity`], and the
/// interior is on the positive side of every plane. All the storage is
/// inline with the capacities given by the `MAX_POLYHEDRON_*` constants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Polyhedron {
    pub(crate) convexity: Convexity,
    pub(crate) vertices: ArrayVec<Point<Real>, MAX_POLYHEDRON_VERTEX_COUNT>,
    pub(crate) edges: ArrayVec<Edge, MAX_POLYHEDRON_EDGE_COUNT>,
    pub(crate) faces: ArrayVec<Face, MAX_POLYHEDRON_FACE_COUNT>,
}

impl Polyhedron {
    /// An empty polyhedron.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a closed drum from two rings of `n` vertices.
    ///
    /// The planes are laid out as `n` side planes, then the `front` plane
    /// containing the `near` ring, then the `back` plane containing the `far`
    /// ring. Side plane `i` must contain `near[i]`, `near[i + 1]`, `far[i]`
    /// and `far[i + 1]`. Vertices `0..n` are the near ring and `n..2n` the far
    /// ring. Edges `0..n` run along the near ring, `n..2n` along the far ring,
    /// and `2n..3n` join `near[i]` to `far[i]`.
    ///
    /// Panics if `n < 3`, if `n` exceeds [`MAX_EXTRUSION_VERTEX_COUNT`], or if
    /// the slices do not have the same length.
    pub fn from_drum(
        near: &[Point<Real>],
        far: &[Point<Real>],
        side_planes: &[Plane],
        front: Plane,
        back: Plane,
    ) -> Self {
        let n = near.len();
        assert!(
            n >= 3 && n <= MAX_EXTRUSION_VERTEX_COUNT,
            "a drum needs between 3 and {} sides",
            MAX_EXTRUSION_VERTEX_COUNT
        );
        assert_eq!(far.len(), n);
        assert_eq!(side_planes.len(), n);

        let mut res = Polyhedron::new();

        for plane in side_planes {
            res.convexity.push_plane(*plane);
        }
        res.convexity.push_plane(front);
        res.convexity.push_plane(back);

        res.vertices.extend(near.iter().copied());
        res.vertices.extend(far.iter().copied());

        for i in 0..n {
            let j = (i + 1) % n;
            res.edges.push(Edge::new([i, j], [i, n]));
        }

        for i in 0..n {
            let j = (i + 1) % n;
            res.edges.push(Edge::new([n + i, n + j], [i, n + 1]));
        }

        for i in 0..n {
            res.edges.push(Edge::new([i, n + i], [(i + n - 1) % n, i]));
        }

        for i in 0..n {
            let j = (i + 1) % n;
            res.faces.push(Face::new(&[i, 2 * n + j, n + i, 2 * n + i]));
        }

        let front_edges: ArrayVec<usize, MAX_EXTRUSION_VERTEX_COUNT> = (0..n).collect();
        let back_edges: ArrayVec<usize, MAX_EXTRUSION_VERTEX_COUNT> =
            (0..n).rev().map(|i| n + i).collect();
        res.faces.push(Face::new(&front_edges));
        res.faces.push(Face::new(&back_edges));

        res
    }

    /// Builds the right prism with the given counterclockwise base polygon,
    /// spanning `z0..z1` along the `z` axis.
    ///
    /// Returns `None` if the polygon has fewer than 3 or more than
    /// [`MAX_EXTRUSION_VERTEX_COUNT`] vertices, has a zero-length edge, or if
    /// `z1 <= z0`.
    pub fn prism(polygon: &[Point2<Real>], z0: Real, z1: Real) -> Option<Self> {
        let n = polygon.len();

        if n < 3 || n > MAX_EXTRUSION_VERTEX_COUNT || z1 <= z0 {
            return None;
        }

        let mut near = ArrayVec::<Point<Real>, MAX_EXTRUSION_VERTEX_COUNT>::new();
        let mut far = ArrayVec::<Point<Real>, MAX_EXTRUSION_VERTEX_COUNT>::new();
        let mut sides = ArrayVec::<Plane, MAX_EXTRUSION_VERTEX_COUNT>::new();

        for (i, p) in polygon.iter().enumerate() {
            let q = polygon[(i + 1) % n];
            let dir = q - p;
            let normal = Vector::new(-dir.y, dir.x, 0.0).try_normalize(DEFAULT_EPSILON)?;
            let base = Point::new(p.x, p.y, z0);
            near.push(base);
            far.push(Point::new(p.x, p.y, z1));
            sides.push(Plane::from_point_and_normal(&base, &normal));
        }

        Some(Self::from_drum(
            &near,
            &far,
            &sides,
            Plane::new(Vector::z(), -z0),
            Plane::new(-Vector::z(), z1),
        ))
    }

    /// Builds the polyhedron of an axis-aligned box.
    pub fn from_aabb(aabb: &Aabb) -> Option<Self> {
        let base = [
            Point2::new(aabb.mins.x, aabb.mins.y),
            Point2::new(aabb.maxs.x, aabb.mins.y),
            Point2::new(aabb.maxs.x, aabb.maxs.y),
            Point2::new(aabb.mins.x, aabb.maxs.y),
        ];
        Self::prism(&base, aabb.mins.z, aabb.maxs.z)
    }

    /// The planes of this polyhedron as a [`Convexity`].
    #[inline]
    pub fn convexity(&self) -> &Convexity {
        &self.convexity
    }

    /// The planes of this polyhedron.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        self.convexity.planes()
    }

    /// The vertices of this polyhedron.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The edges of this polyhedron.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The faces of this polyhedron.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Does this polyhedron have no vertex at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex indices of the face `face`, in loop order.
    ///
    /// Returns `None` if the edges of the face do not form a closed loop.
    pub fn face_vertices(
        &self,
        face: usize,
    ) -> Option<ArrayVec<usize, MAX_POLYHEDRON_FACE_EDGE_COUNT>> {
        let edge_ids = &self.faces.get(face)?.edge_index;
        let m = edge_ids.len();

        if m < 3 {
            return None;
        }

        let mut res = ArrayVec::new();

        for k in 0..m {
            let e1 = self.edges.get(edge_ids[k] as usize)?;
            let e2 = self.edges.get(edge_ids[(k + 1) % m] as usize)?;
            res.push(e1.shared_vertex(e2)?);
        }

        Some(res)
    }

    /// Fan-triangulates every face, starting from its first vertex.
    ///
    /// Triangles are wound counterclockwise when seen from outside of the
    /// polyhedron. Faces that do not form a closed loop are skipped.
    pub fn triangles(&self) -> Vec<[Point<Real>; 3]> {
        let mut res = Vec::new();

        for (face_id, plane) in self.planes().iter().enumerate().take(self.faces.len()) {
            let Some(face) = self.face_vertices(face_id) else {
                continue;
            };

            let a = self.vertices[face[0]];

            for k in 1..face.len() - 1 {
                let mut b = self.vertices[face[k]];
                let mut c = self.vertices[face[k + 1]];

                if (b - a).cross(&(c - a)).dot(&plane.normal) > 0.0 {
                    core::mem::swap(&mut b, &mut c);
                }

                res.push([a, b, c]);
            }
        }

        res
    }

    /// Checks the topology of this polyhedron.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let nvertices = self.vertices.len();
        let nedges = self.edges.len();
        let nfaces = self.faces.len();

        if self.convexity.plane_count() != nfaces {
            return Err(TopologyError::PlaneFaceCountMismatch {
                planes: self.convexity.plane_count(),
                faces: nfaces,
            });
        }

        for (edge_id, edge) in self.edges.iter().enumerate() {
            for vertex in edge.vertices() {
                if vertex >= nvertices {
                    return Err(TopologyError::VertexIndexOutOfBounds {
                        edge: edge_id,
                        vertex,
                    });
                }
            }

            for face in edge.faces() {
                if face >= nfaces {
                    return Err(TopologyError::FaceIndexOutOfBounds {
                        edge: edge_id,
                        face,
                    });
                }
            }

            if edge.vertex_index[0] == edge.vertex_index[1] {
                return Err(TopologyError::DegenerateEdge(edge_id));
            }
        }

        let mut edge_uses = [0usize; MAX_POLYHEDRON_EDGE_COUNT];

        for (face_id, face) in self.faces.iter().enumerate() {
            if face.edge_count() < 3 {
                return Err(TopologyError::DegenerateFace(face_id));
            }

            for edge in face.edges() {
                if edge >= nedges {
                    return Err(TopologyError::EdgeIndexOutOfBounds {
                        face: face_id,
                        edge,
                    });
                }

                if !self.edges[edge].faces().contains(&face_id) {
                    return Err(TopologyError::EdgeFaceMismatch {
                        face: face_id,
                        edge,
                    });
                }

                edge_uses[edge] += 1;
            }

            if self.face_vertices(face_id).is_none() {
                return Err(TopologyError::OpenFace(face_id));
            }
        }

        for (edge, count) in edge_uses.iter().enumerate().take(nedges) {
            if *count != 2 {
                return Err(TopologyError::EdgeUseCount {
                    edge,
                    count: *count,
                });
            }
        }

        if nvertices as isize - nedges as isize + nfaces as isize != 2 {
            return Err(TopologyError::EulerCharacteristic {
                vertices: nvertices,
                edges: nedges,
                faces: nfaces,
            });
        }

        Ok(())
    }

    /// Tests if `point` is inside of this polyhedron, up to `epsilon`.
    #[inline]
    pub fn contains_point(&self, point: &Point<Real>, epsilon: Real) -> bool {
        self.convexity.contains_point(point, epsilon)
    }

    /// Transforms every plane and vertex of this polyhedron by `m`.
    pub fn transform_by(&mut self, m: &Isometry<Real>) {
        self.convexity.transform_by(m);

        for vertex in &mut self.vertices {
            *vertex = m * *vertex;
        }
    }

    /// Returns a copy of this polyhedron transformed by `m`.
    pub fn transformed(&self, m: &Isometry<Real>) -> Self {
        let mut res = self.clone();
        res.transform_by(m);
        res
    }

    /// The axis-aligned bounding box of the vertices of this polyhedron.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }
}

impl SupportMap for Polyhedron {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        if self.vertices.is_empty() {
            return Point::origin();
        }

        utils::point_cloud_support_point(dir, &self.vertices)
    }
}
