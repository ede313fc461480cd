//! Stiffness and volume integration along a section field.
//!
//! Purpose
//! - `section_stiffness_matrix`: 3×3 constitutive matrix of one section,
//!   relating `[N, Mx, My]` to `[ε0, κx, κy]` for the fiber strain
//!   `ε(x, y) = ε0 + κx·y + κy·x`, built from weighted moments about the
//!   section origin (no centroid shift, so eccentric and asymmetric sections
//!   couple axial and bending terms).
//! - `assemble_element_stiffness`: 12×12 beam element along z by
//!   Gauss-Legendre quadrature of `Bᵀ·D(z)·B` plus St-Venant torsion.
//! - `total_volume`: weighted area integrated along the length.
//!
//! Element conventions
//! - Node DOFs `[ux, uy, uz, θx, θy, θz]`, node 1 at `z0`, node 2 at `z1`.
//! - Small rotations about the right-handed axes: `uy' = −θx`, `ux' = θy`.
//! - Bending uses cubic Hermite shape functions; axial and torsion are linear.

pub mod quadrature;

use nalgebra::{Matrix3, SMatrix};

use crate::cfg::{SYMMETRY_TOL, VOLUME_GAUSS_POINTS};
use crate::error::{FieldError, StiffnessError};
use crate::field::ContinuousSectionField;
use crate::geom::{inertia_about_origin, weighted_area_and_centroid, Section};
use crate::section::{section_properties, torsion_constant};

pub use quadrature::{gauss_legendre, gauss_lobatto};

/// 12×12 element stiffness matrix.
pub type ElementMatrix = SMatrix<f64, 12, 12>;

type StrainMatrix = SMatrix<f64, 3, 12>;

/// `E_ref · [[A, Sx, Sy], [Sx, Ix, Ixy], [Sy, Ixy, Iy]]` about the origin.
///
/// `Sx = Σ w·A·cy` and `Sy = Σ w·A·cx` are the weighted first moments.
pub fn section_stiffness_matrix(section: &Section, e_ref: f64) -> Matrix3<f64> {
    let (mut a, mut sx, mut sy) = (0.0, 0.0, 0.0);
    let (mut ix, mut iy, mut ixy) = (0.0, 0.0, 0.0);
    for p in section.polygons() {
        let (ai, c) = weighted_area_and_centroid(p);
        a += ai;
        sx += ai * c.y();
        sy += ai * c.x();
        let m = inertia_about_origin(p);
        ix += m.ix;
        iy += m.iy;
        ixy += m.ixy;
    }
    Matrix3::new(a, sx, sy, sx, ix, ixy, sy, ixy, iy) * e_ref
}

/// Section stiffness of the interpolated section at `z`.
pub fn section_stiffness_at(
    field: &ContinuousSectionField,
    z: f64,
    e_ref: f64,
) -> Result<Matrix3<f64>, FieldError> {
    Ok(section_stiffness_matrix(&field.section(z)?, e_ref))
}

/// Strain-displacement matrix at `ξ = s/L`.
fn strain_matrix(xi: f64, l: f64) -> StrainMatrix {
    let l2 = l * l;
    let n1 = (-6.0 + 12.0 * xi) / l2;
    let n2 = (-4.0 + 6.0 * xi) / l;
    let n3 = (6.0 - 12.0 * xi) / l2;
    let n4 = (-2.0 + 6.0 * xi) / l;
    let mut b = StrainMatrix::zeros();
    // ε0 = uz'
    b[(0, 2)] = -1.0 / l;
    b[(0, 8)] = 1.0 / l;
    // κx = −uy''
    b[(1, 1)] = -n1;
    b[(1, 3)] = n2;
    b[(1, 7)] = -n3;
    b[(1, 9)] = n4;
    // κy = −ux''
    b[(2, 0)] = -n1;
    b[(2, 4)] = -n2;
    b[(2, 6)] = -n3;
    b[(2, 10)] = -n4;
    b
}

/// 12×12 stiffness of the field as one beam element.
///
/// Samples the section matrix and the torsion constant (per
/// `FieldCfg::torsion_method`) at `n_gauss ≥ 2` Gauss-Legendre points. The
/// result is symmetrized when round-off asymmetry exceeds the tolerance; a
/// negative diagonal entry is an error.
pub fn assemble_element_stiffness(
    field: &ContinuousSectionField,
    e_ref: f64,
    poisson_ratio: f64,
    n_gauss: usize,
) -> Result<ElementMatrix, StiffnessError> {
    if n_gauss < 2 {
        return Err(StiffnessError::QuadratureOrder {
            requested: n_gauss,
            minimum: 2,
        });
    }
    let (nodes, weights) = gauss_legendre(n_gauss)?;
    let l = field.length();
    let z0 = field.s0().z();
    let dir = (field.s1().z() - z0).signum();
    let g = e_ref / (2.0 * (1.0 + poisson_ratio));
    let method = field.cfg().torsion_method;

    let mut k = ElementMatrix::zeros();
    let mut gj_integral = 0.0;
    for (x, w) in nodes.iter().zip(&weights) {
        let xi = 0.5 * (x + 1.0);
        let jac = 0.5 * l * w;
        let section = field.section(z0 + dir * xi * l)?;
        let d = section_stiffness_matrix(&section, e_ref);
        let b = strain_matrix(xi, l);
        k += b.transpose() * d * b * jac;

        let props = section_properties(&section)?;
        gj_integral += g * torsion_constant(&section, &props, method) * jac;
    }
    let kt = gj_integral / (l * l);
    k[(5, 5)] += kt;
    k[(11, 11)] += kt;
    k[(5, 11)] -= kt;
    k[(11, 5)] -= kt;

    let scale = k.amax();
    let asymmetry = (k - k.transpose()).amax();
    if asymmetry > SYMMETRY_TOL * scale {
        tracing::debug!(asymmetry, scale, "symmetrizing element stiffness");
        k = (k + k.transpose()) * 0.5;
    }
    for i in 0..12 {
        if k[(i, i)] < 0.0 {
            return Err(StiffnessError::NegativeDiagonal {
                index: i,
                value: k[(i, i)],
            });
        }
    }
    tracing::debug!(e_ref, poisson_ratio, n_gauss, length = l, "element stiffness assembled");
    Ok(k)
}

/// Volume `∫ A(z) dz` with a 5-point Gauss-Legendre rule; `A` is the
/// weighted area, so voids subtract.
pub fn total_volume(field: &ContinuousSectionField) -> Result<f64, StiffnessError> {
    let (nodes, weights) = gauss_legendre(VOLUME_GAUSS_POINTS)?;
    let (z0, z1) = (field.s0().z(), field.s1().z());
    let l = field.length();
    let mut volume = 0.0;
    for (x, w) in nodes.iter().zip(&weights) {
        let t = 0.5 * (x + 1.0);
        let section = field.section(z0 * (1.0 - t) + z1 * t)?;
        let area: f64 = section
            .polygons()
            .iter()
            .map(|p| weighted_area_and_centroid(p).0)
            .sum();
        volume += 0.5 * l * w * area;
    }
    Ok(volume)
}

#[cfg(test)]
mod tests;
