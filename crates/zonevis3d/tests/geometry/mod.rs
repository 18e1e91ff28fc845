mod extrusion_monotonicity;
mod gjk_membership;
mod occlusion_duality;
mod polyhedron_clip;
mod propagation;
mod visibility_conservativeness;
mod zone_containment;
