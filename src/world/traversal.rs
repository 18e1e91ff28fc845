use crate::zone::ZoneId;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
/// The marks left on a zone by a propagation pass.
pub struct TraversalFlags(u8);

bitflags::bitflags! {
    impl TraversalFlags: u8 {
        /// The zone is on the current propagation path.
        const LOCAL = 1;
        /// The zone already holds a root region of this pass.
        const GLOBAL = 1 << 1;
    }
}

/// The transient state of one propagation pass.
///
/// A pass builds every region of a single camera, light or source.
#[derive(Clone, Debug, Default)]
pub struct Traversal {
    flags: Vec<TraversalFlags>,
}

impl Traversal {
    /// A pass that has not visited any zone yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The marks of `zone`.
    #[inline]
    pub fn flags(&self, zone: ZoneId) -> TraversalFlags {
        self.flags.get(zone.0).copied().unwrap_or_default()
    }

    /// Does `zone` carry all of `flags`?
    #[inline]
    pub fn contains(&self, zone: ZoneId, flags: TraversalFlags) -> bool {
        self.flags(zone).contains(flags)
    }

    pub(crate) fn insert(&mut self, zone: ZoneId, flags: TraversalFlags) {
        if self.flags.len() <= zone.0 {
            self.flags.resize(zone.0 + 1, TraversalFlags::empty());
        }

        self.flags[zone.0] |= flags;
    }

    pub(crate) fn remove(&mut self, zone: ZoneId, flags: TraversalFlags) {
        if let Some(f) = self.flags.get_mut(zone.0) {
            f.remove(flags);
        }
    }
}
