use crate::math::{Isometry, Point, Real, Vector};
use crate::zone::{PortalFlags, ZoneId};

/// Handle of a light stored in a [`World`](crate::world::World).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub(crate) usize);

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
/// Properties of a light affecting which portals it goes through.
pub struct LightFlags(u32);

bitflags::bitflags! {
    impl LightFlags: u32 {
        /// The light never moves, and is blocked by `STATIC_LIGHT_INHIBIT` portals.
        const STATIC = 1;
        /// The light casts shadows, and is blocked by `SHADOW_INHIBIT` portals.
        const SHADOW = 1 << 1;
    }
}

/// The geometry of a light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// A light infinitely far away, shining along `direction`.
    Infinite {
        /// The direction the light travels in.
        direction: Vector<Real>,
    },
    /// A light shining in every direction from a point.
    Point {
        /// The position of the light.
        position: Point<Real>,
        /// The distance beyond which the light has no effect.
        range: Real,
        /// The radius of the sphere the light is emitted from.
        confinement_radius: Real,
    },
    /// A light shining from a point through a rectangular pyramid.
    Spot {
        /// The world transform of the light, which shines along its local `+z` axis.
        transform: Isometry<Real>,
        /// The distance beyond which the light has no effect.
        range: Real,
        /// The tangent of half the horizontal opening angle.
        apex_tangent: Real,
        /// The ratio between the vertical and horizontal openings.
        aspect_ratio: Real,
        /// The radius of the sphere the light is emitted from.
        confinement_radius: Real,
    },
}

/// A light propagating through the portals of the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    /// The geometry of the light.
    pub kind: LightKind,
    /// The properties of the light.
    pub flags: LightFlags,
    /// The zone the light is attached to.
    ///
    /// Infinite lights only illuminate from this zone. Other lights look
    /// for the zones containing them when this is `None`.
    pub zone: Option<ZoneId>,
}

impl Light {
    /// An infinite light attached to `zone`.
    pub fn infinite(direction: Vector<Real>, zone: ZoneId) -> Self {
        Light {
            kind: LightKind::Infinite { direction },
            flags: LightFlags::empty(),
            zone: Some(zone),
        }
    }

    /// A point light.
    pub fn point(position: Point<Real>, range: Real, confinement_radius: Real) -> Self {
        Light {
            kind: LightKind::Point {
                position,
                range,
                confinement_radius,
            },
            flags: LightFlags::empty(),
            zone: None,
        }
    }

    /// A spot light.
    pub fn spot(
        transform: Isometry<Real>,
        range: Real,
        apex_tangent: Real,
        aspect_ratio: Real,
    ) -> Self {
        Light {
            kind: LightKind::Spot {
                transform,
                range,
                apex_tangent,
                aspect_ratio,
                confinement_radius: 0.0,
            },
            flags: LightFlags::empty(),
            zone: None,
        }
    }

    /// Sets the flags of this light.
    pub fn with_flags(mut self, flags: LightFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the radius of the sphere a point or spot light is emitted from.
    pub fn with_confinement_radius(mut self, radius: Real) -> Self {
        match &mut self.kind {
            LightKind::Infinite { .. } => {}
            LightKind::Point {
                confinement_radius, ..
            }
            | LightKind::Spot {
                confinement_radius, ..
            } => *confinement_radius = radius,
        }
        self
    }

    /// The position of the light, unless it is infinite.
    pub fn position(&self) -> Option<Point<Real>> {
        match &self.kind {
            LightKind::Infinite { .. } => None,
            LightKind::Point { position, .. } => Some(*position),
            LightKind::Spot { transform, .. } => Some(Point::from(transform.translation.vector)),
        }
    }

    /// The portal flags preventing this light from going through a portal.
    pub fn inhibit_flags(&self) -> PortalFlags {
        let mut res = PortalFlags::LIGHT_INHIBIT;

        if self.flags.contains(LightFlags::STATIC) {
            res |= PortalFlags::STATIC_LIGHT_INHIBIT;
        }

        if self.flags.contains(LightFlags::SHADOW) {
            res |= PortalFlags::SHADOW_INHIBIT;
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_inhibit_flags() {
        let light = Light::point(Point::origin(), 10.0, 0.0);
        assert_eq!(light.inhibit_flags(), PortalFlags::LIGHT_INHIBIT);

        let light = light.with_flags(LightFlags::STATIC | LightFlags::SHADOW);
        assert!(light.inhibit_flags().contains(PortalFlags::STATIC_LIGHT_INHIBIT));
        assert!(light.inhibit_flags().contains(PortalFlags::SHADOW_INHIBIT));
        assert!(!light.inhibit_flags().contains(PortalFlags::CAMERA_INHIBIT));
    }
}
