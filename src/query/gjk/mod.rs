//! The GJK algorithm for overlap tests between support-mapped shapes.

pub use self::cso_point::CSOPoint;
pub use self::gjk::{eps_tol, intersection_test};
pub use self::simplex::{simplex_minimum, Simplex};

mod cso_point;
mod gjk;
mod simplex;
