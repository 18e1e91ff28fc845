use crate::math::{Point, Real};

/// Handle of a sound source stored in a [`World`](crate::world::World).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub(crate) usize);

/// A sound source propagating through the portals of the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    /// The position of the source.
    pub position: Point<Real>,
    /// The distance beyond which the source cannot be heard.
    pub range: Real,
}

impl Source {
    /// Creates a sound source.
    pub fn new(position: Point<Real>, range: Real) -> Self {
        Source { position, range }
    }
}
