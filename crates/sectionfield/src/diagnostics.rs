//! Recoverable geometric findings.
//!
//! Computation proceeds when one of these is raised; callers decide whether
//! to render, log or ignore them. Every diagnostic is also emitted as a
//! `tracing` warning at the point it is detected.

use serde::Serialize;

/// A recoverable finding attached to a query result.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Non-adjacent edges of an interpolated polygon cross.
    SelfIntersection { polygon: usize, name: String, z: f64 },
    /// A weight law produced a negative weight (possibly an unintended void).
    NegativeWeight {
        polygon: usize,
        name: String,
        z: f64,
        weight: f64,
    },
    /// Thin-wall torsion theory is unreliable for this section.
    LowTorsionFidelity {
        z: f64,
        confidence: f64,
        aspect_ratio: f64,
    },
}

impl Diagnostic {
    /// Emit the diagnostic as a structured `tracing` warning.
    pub fn emit(&self) {
        match self {
            Diagnostic::SelfIntersection { polygon, name, z } => {
                tracing::warn!(polygon, name = %name, z, "interpolated polygon self-intersects");
            }
            Diagnostic::NegativeWeight {
                polygon,
                name,
                z,
                weight,
            } => {
                tracing::warn!(polygon, name = %name, z, weight, "weight law produced a negative weight");
            }
            Diagnostic::LowTorsionFidelity {
                z,
                confidence,
                aspect_ratio,
            } => {
                tracing::warn!(z, confidence, aspect_ratio, "low thin-wall torsion fidelity");
            }
        }
    }

    /// Longitudinal coordinate the diagnostic refers to.
    pub fn z(&self) -> f64 {
        match self {
            Diagnostic::SelfIntersection { z, .. }
            | Diagnostic::NegativeWeight { z, .. }
            | Diagnostic::LowTorsionFidelity { z, .. } => *z,
        }
    }
}
