//! Continuous section fields for tapered, non-prismatic members.
//!
//! A solid is modelled as a ruled sweep between two polygonal boundary
//! sections. This crate interpolates sections along the sweep axis, digests
//! them into sectional properties (area, centroid, inertia, torsion
//! constants, moduli) and integrates those along the length into volumes and
//! beam-element stiffness matrices.
//!
//! Layout
//! - `geom`: points, polygons, sections and the shoelace integrator.
//! - `section`: composite section digestor and torsion estimators.
//! - `formula`: sandboxed evaluator for weight-law formulas.
//! - `field`: the continuous section field and weight-law configuration.
//! - `stiffness`: quadrature, section/element stiffness and volume.
//!
//! API Policy
//! - The crate is consumed by the workspace CLI and by external readers and
//!   exporters. Prefer the curated re-exports in [`api`].

pub mod api;
pub mod cfg;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod formula;
pub mod geom;
pub mod section;
pub mod stiffness;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::diagnostics::Diagnostic;
    pub use crate::error::{FieldError, FormulaError, GeometryError, SectionError, StiffnessError};
    pub use crate::field::{ContinuousSectionField, FieldCfg, LawTarget, WeightLawSet};
    pub use crate::geom::{Point, Polygon, Section};
    pub use crate::section::{full_analysis, section_properties, PropertyRecord, TorsionMethod};
    pub use crate::stiffness::{
        assemble_element_stiffness, section_stiffness_matrix, total_volume, ElementMatrix,
    };
}
