//! Continuous section field between two homologous boundary sections.
//!
//! Purpose
//! - Represent a ruled solid: polygon `i` / vertex `j` of the start section
//!   sweeps linearly to polygon `i` / vertex `j` of the end section.
//! - `section(z)` interpolates vertices with `lerp(t)`, `t = (z−z0)/(z1−z0)`,
//!   and assigns weights either linearly or through a registered weight law.
//!
//! Lifecycle
//! - Constructed (geometry immutable) → optionally configured with weight
//!   laws (validated as a whole, then swapped in) → queried repeatedly.
//!
//! Conventions
//! - Interpolated polygons take their names from the start section.
//! - `L` is the unsigned span `|z1 − z0|`; either boundary may come first.
//!
//! Code cross-refs: `crate::formula` (laws), `crate::stiffness` (integration).

mod laws;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cfg::DOMAIN_TOL;
use crate::diagnostics::Diagnostic;
use crate::error::{FieldError, StiffnessError};
use crate::formula::{EvalContext, LookupCache, WeightLaw};
use crate::geom::{self_intersects, Point, Polygon, Section};
use crate::section::{full_analysis_with_diagnostics, PropertyRecord, TorsionMethod};
use crate::stiffness::quadrature::gauss_lobatto;

pub use laws::{base_name, LawTarget, WeightLawSet};

/// Field-level knobs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldCfg {
    /// Base directory for relative `E_lookup` file names.
    pub lookup_dir: Option<PathBuf>,
    /// Torsion constant used by element stiffness assembly.
    pub torsion_method: TorsionMethod,
}

/// Ruled sweep between two sections with per-polygon weight laws.
#[derive(Clone, Debug)]
pub struct ContinuousSectionField {
    s0: Section,
    s1: Section,
    cfg: FieldCfg,
    laws: BTreeMap<usize, WeightLaw>,
    lookups: Arc<LookupCache>,
}

impl ContinuousSectionField {
    /// Validate homology (polygon and vertex counts) and distinct boundary z.
    pub fn new(s0: Section, s1: Section) -> Result<Self, FieldError> {
        if s0.len() != s1.len() {
            return Err(FieldError::PolygonCountMismatch {
                s0: s0.len(),
                s1: s1.len(),
            });
        }
        for (index, (p0, p1)) in s0.polygons().iter().zip(s1.polygons()).enumerate() {
            if p0.len() != p1.len() {
                return Err(FieldError::VertexCountMismatch {
                    index,
                    s0: p0.len(),
                    s1: p1.len(),
                });
            }
        }
        if s0.z() == s1.z() {
            return Err(FieldError::EqualBoundaryZ { z: s0.z() });
        }
        tracing::debug!(z0 = s0.z(), z1 = s1.z(), polygons = s0.len(), "section field created");
        Ok(Self {
            s0,
            s1,
            cfg: FieldCfg::default(),
            laws: BTreeMap::new(),
            lookups: Arc::new(LookupCache::new()),
        })
    }

    pub fn with_cfg(mut self, cfg: FieldCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn cfg(&self) -> &FieldCfg {
        &self.cfg
    }

    pub fn s0(&self) -> &Section {
        &self.s0
    }

    pub fn s1(&self) -> &Section {
        &self.s1
    }

    /// Unsigned span length `|z1 − z0|`.
    pub fn length(&self) -> f64 {
        (self.s1.z() - self.s0.z()).abs()
    }

    /// `(min(z0, z1), max(z0, z1))`.
    pub fn z_bounds(&self) -> (f64, f64) {
        let (a, b) = (self.s0.z(), self.s1.z());
        (a.min(b), a.max(b))
    }

    fn midpoint(&self) -> f64 {
        0.5 * (self.s0.z() + self.s1.z())
    }

    /// Registered law for polygon `index`, if any.
    pub fn weight_law(&self, index: usize) -> Option<&WeightLaw> {
        self.laws.get(&index)
    }

    /// Normalized position of `z`; fails outside the domain.
    pub fn t_at(&self, z: f64) -> Result<f64, FieldError> {
        let (lo, hi) = self.z_bounds();
        let slack = DOMAIN_TOL * (1.0 + lo.abs().max(hi.abs()));
        if !z.is_finite() || z < lo - slack || z > hi + slack {
            return Err(FieldError::OutOfDomain { z, min: lo, max: hi });
        }
        let (z0, z1) = (self.s0.z(), self.s1.z());
        Ok(((z - z0) / (z1 - z0)).clamp(0.0, 1.0))
    }

    /// Resolve, compile and trial-evaluate a weight-law set at the midpoint,
    /// then replace the current laws. On error the field is unchanged.
    pub fn set_weight_laws(&mut self, set: &WeightLawSet) -> Result<(), FieldError> {
        let z_mid = self.midpoint();
        let laws = set.resolve(&self.s0, &self.s1, z_mid)?;
        let t_mid = self.t_at(z_mid)?;
        for (&index, law) in &laws {
            let vertices = self.vertices_at(index, t_mid);
            let weight = self.evaluate_law(index, law, t_mid, z_mid, &vertices)?;
            if weight < 0.0 {
                self.negative_weight(index, z_mid, weight).emit();
            }
        }
        tracing::debug!(count = laws.len(), "weight laws attached");
        self.laws = laws;
        Ok(())
    }

    /// Builder form of [`set_weight_laws`](Self::set_weight_laws).
    pub fn with_weight_laws(mut self, set: &WeightLawSet) -> Result<Self, FieldError> {
        self.set_weight_laws(set)?;
        Ok(self)
    }

    pub fn clear_weight_laws(&mut self) {
        self.laws.clear();
    }

    /// Interpolated section at `z`.
    pub fn section(&self, z: f64) -> Result<Section, FieldError> {
        self.section_with_diagnostics(z).map(|(s, _)| s)
    }

    /// Interpolated section at `z` plus self-intersection and negative-weight
    /// diagnostics.
    pub fn section_with_diagnostics(&self, z: f64) -> Result<(Section, Vec<Diagnostic>), FieldError> {
        let t = self.t_at(z)?;
        let mut diagnostics = Vec::new();
        let mut polygons = Vec::with_capacity(self.s0.len());
        for (index, (p0, p1)) in self.s0.polygons().iter().zip(self.s1.polygons()).enumerate() {
            let vertices = self.vertices_at(index, t);
            let weight = match self.laws.get(&index) {
                Some(law) => {
                    let w = self.evaluate_law(index, law, t, z, &vertices)?;
                    if w < 0.0 {
                        diagnostics.push(self.negative_weight(index, z, w));
                    }
                    w
                }
                None => p0.weight() * (1.0 - t) + p1.weight() * t,
            };
            if self_intersects(&vertices) {
                diagnostics.push(Diagnostic::SelfIntersection {
                    polygon: index,
                    name: p0.name().to_string(),
                    z,
                });
            }
            polygons.push(Polygon::new(p0.name(), vertices, weight)?);
        }
        for d in &diagnostics {
            d.emit();
        }
        Ok((Section::new(z, polygons)?, diagnostics))
    }

    /// Full property record at `z`.
    pub fn properties_at(&self, z: f64) -> Result<PropertyRecord, FieldError> {
        self.properties_at_with_diagnostics(z).map(|(r, _)| r)
    }

    pub fn properties_at_with_diagnostics(
        &self,
        z: f64,
    ) -> Result<(PropertyRecord, Vec<Diagnostic>), FieldError> {
        let (section, mut diagnostics) = self.section_with_diagnostics(z)?;
        let (record, more) = full_analysis_with_diagnostics(&section)?;
        diagnostics.extend(more);
        Ok((record, diagnostics))
    }

    /// Records at `n` equally spaced stations from `z0` to `z1` inclusive.
    pub fn sample_properties(&self, n: usize) -> Result<Vec<(f64, PropertyRecord)>, FieldError> {
        self.stations(n)
            .into_iter()
            .map(|z| self.properties_at(z).map(|r| (z, r)))
            .collect()
    }

    /// `n` equally spaced coordinates from `z0` to `z1`; `n == 1` gives `[z0]`.
    pub fn stations(&self, n: usize) -> Vec<f64> {
        let (z0, z1) = (self.s0.z(), self.s1.z());
        match n {
            0 => Vec::new(),
            1 => vec![z0],
            _ => (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    z0 * (1.0 - t) + z1 * t
                })
                .collect(),
        }
    }

    /// Gauss-Lobatto points (both ends included) mapped to physical z.
    pub fn integration_points(&self, n: usize) -> Result<Vec<f64>, StiffnessError> {
        let (nodes, _) = gauss_lobatto(n)?;
        let (z0, z1) = (self.s0.z(), self.s1.z());
        Ok(nodes
            .into_iter()
            .map(|x| {
                let t = 0.5 * (x + 1.0);
                z0 * (1.0 - t) + z1 * t
            })
            .collect())
    }

    fn vertices_at(&self, index: usize, t: f64) -> Vec<Point> {
        let p0 = &self.s0.polygons()[index];
        let p1 = &self.s1.polygons()[index];
        p0.vertices()
            .iter()
            .zip(p1.vertices())
            .map(|(a, b)| a.lerp(b, t))
            .collect()
    }

    fn evaluate_law(
        &self,
        index: usize,
        law: &WeightLaw,
        t: f64,
        z: f64,
        vertices: &[Point],
    ) -> Result<f64, FieldError> {
        let p0 = &self.s0.polygons()[index];
        let p1 = &self.s1.polygons()[index];
        let ctx = EvalContext {
            w0: p0.weight(),
            w1: p1.weight(),
            t,
            length: self.length(),
            z,
            current: vertices,
            start: p0.vertices(),
            end: p1.vertices(),
            lookup_dir: self.cfg.lookup_dir.as_deref(),
            lookups: &self.lookups,
        };
        law.evaluate(&ctx).map_err(|source| FieldError::WeightLaw {
            polygon: index,
            formula: law.source().to_string(),
            z,
            source,
        })
    }

    fn negative_weight(&self, index: usize, z: f64, weight: f64) -> Diagnostic {
        Diagnostic::NegativeWeight {
            polygon: index,
            name: self.s0.polygons()[index].name().to_string(),
            z,
            weight,
        }
    }
}

#[cfg(test)]
mod tests;
