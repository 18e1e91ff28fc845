//! Oriented planes.

use crate::math::{Isometry, Matrix, Point, Real, Vector, DEFAULT_EPSILON};
use core::ops::Neg;

/// A plane splitting the space into two half-spaces.
///
/// The plane is stored as the four coefficients of `normal · p + w = 0`. The
/// value `normal · p + w` is the signed distance of `p` to the plane when the
/// normal has unit length, which is the case for every plane built by this
/// crate. Regions keep the space lying on the positive side of their planes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Plane {
    /// The normal of the plane, pointing toward its positive side.
    pub normal: Vector<Real>,
    /// The constant term of the plane equation.
    pub w: Real,
}

impl Plane {
    /// Creates a plane from its normal and constant term.
    #[inline]
    pub fn new(normal: Vector<Real>, w: Real) -> Self {
        Plane { normal, w }
    }

    /// Creates the plane with the given normal passing through `point`.
    #[inline]
    pub fn from_point_and_normal(point: &Point<Real>, normal: &Vector<Real>) -> Self {
        Plane::new(*normal, -normal.dot(&point.coords))
    }

    /// Creates the plane passing through three points.
    ///
    /// The normal is `(b - a) × (c - a)`, normalized. Returns `None` if the points
    /// are collinear.
    pub fn from_points(a: &Point<Real>, b: &Point<Real>, c: &Point<Real>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a)).try_normalize(DEFAULT_EPSILON)?;
        Some(Self::from_point_and_normal(a, &normal))
    }

    /// Creates the plane with the direction `normal` passing through `point`,
    /// flipped if needed so that `interior` lies on its positive side.
    ///
    /// Returns `None` if `normal` is too small to be normalized.
    pub fn oriented_toward(
        normal: &Vector<Real>,
        point: &Point<Real>,
        interior: &Point<Real>,
    ) -> Option<Self> {
        let normal = normal.try_normalize(DEFAULT_EPSILON)?;
        let plane = Self::from_point_and_normal(point, &normal);

        if plane.signed_distance(interior) < 0.0 {
            Some(-plane)
        } else {
            Some(plane)
        }
    }

    /// The signed distance from `point` to this plane.
    ///
    /// This is the wedge product of the plane with the homogeneous point.
    #[inline]
    pub fn signed_distance(&self, point: &Point<Real>) -> Real {
        self.normal.dot(&point.coords) + self.w
    }

    /// The dot product of the normal of this plane with `dir`.
    #[inline]
    pub fn normal_dot(&self, dir: &Vector<Real>) -> Real {
        self.normal.dot(dir)
    }

    /// Returns a copy of this plane with a unit normal.
    pub fn normalized(&self) -> Option<Self> {
        let norm = self.normal.norm();

        if norm > DEFAULT_EPSILON {
            Some(Plane::new(self.normal / norm, self.w / norm))
        } else {
            None
        }
    }

    /// Orthogonal projection of `point` on this plane.
    ///
    /// The normal is assumed to have unit length.
    #[inline]
    pub fn project_point(&self, point: &Point<Real>) -> Point<Real> {
        point - self.normal * self.signed_distance(point)
    }

    /// Transforms this plane by `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        let normal = m.rotation * self.normal;
        Plane::new(normal, self.w - normal.dot(&m.translation.vector))
    }

    /// The point shared by three planes, if they are not parallel.
    pub fn intersect_three(a: &Plane, b: &Plane, c: &Plane) -> Option<Point<Real>> {
        let m = Matrix::from_rows(&[
            a.normal.transpose(),
            b.normal.transpose(),
            c.normal.transpose(),
        ]);

        if m.determinant().abs() <= DEFAULT_EPSILON {
            return None;
        }

        let inv = m.try_inverse()?;
        Some(Point::from(inv * Vector::new(-a.w, -b.w, -c.w)))
    }
}

impl Neg for Plane {
    type Output = Plane;

    #[inline]
    fn neg(self) -> Plane {
        Plane::new(-self.normal, -self.w)
    }
}
