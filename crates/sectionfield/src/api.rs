//! Curated API surface for the CLI and downstream readers/exporters.
//!
//! Prefer these re-exports over deep module paths; module internals may
//! move between releases.

// Geometry primitives and the polygon integrator
pub use crate::geom::{
    clip_above_line, inertia_about_origin, self_intersects, signed_area_and_centroid,
    statical_moment, statical_moment_above, weighted_area_and_centroid, Point, Polygon, Section,
    SecondMoments,
};
// Random polygons (tests, benches)
pub use crate::geom::rand::{
    draw_polygon_radial, rectangle, regular_polygon, RadialCfg, ReplayToken, VertexCount,
};
// Section digestor and torsion estimators
pub use crate::section::{
    derived_properties, empirical_torsion_constant, evaluate_torsional_fidelity, full_analysis,
    full_analysis_with_diagnostics, partial_statical_moment, saint_venant_roark,
    saint_venant_thickness, section_moduli, section_properties, statical_moment_at_neutral_axis,
    torsion_constant, DerivedProperties, PropertyRecord, RoarkTorsion, SectionProperties,
    TorsionFidelity, TorsionMethod, TorsionTarget,
};
// Weight laws
pub use crate::formula::{EvalContext, LookupCache, LookupTable, WeightLaw};
// Continuous field
pub use crate::field::{base_name, ContinuousSectionField, FieldCfg, LawTarget, WeightLawSet};
// Stiffness, volume, quadrature
pub use crate::stiffness::{
    assemble_element_stiffness, gauss_legendre, gauss_lobatto, section_stiffness_at,
    section_stiffness_matrix, total_volume, ElementMatrix,
};
// Errors and diagnostics
pub use crate::diagnostics::Diagnostic;
pub use crate::error::{FieldError, FormulaError, GeometryError, SectionError, StiffnessError};
