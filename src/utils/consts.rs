use crate::math::Real;

/// Cosine of 22.5 degrees: apothem-to-radius ratio of a regular octagon.
pub(crate) const COS_FRAC_PI_8: Real = 0.92387953251;
/// Sine of 22.5 degrees.
pub(crate) const SIN_FRAC_PI_8: Real = 0.38268343236;
