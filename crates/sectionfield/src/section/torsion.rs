//! Saint-Venant torsion estimators.
//!
//! Three independent methods are kept side by side; they serve different
//! accuracy regimes and are cross-checked against each other:
//! - `saint_venant_thickness` (`J_sv`): Bredt for one solid + one void,
//!   otherwise open thin-wall with a deduced wall thickness.
//! - `evaluate_torsional_fidelity`: equivalent rectangle from the central
//!   inertia tensor and a thin-wall confidence index.
//! - `saint_venant_roark` (`J_s_vroark`): Roark-Young rectangle formula on the
//!   equivalent rectangle, aggregated over composite sections.

use serde::Serialize;

use super::{empirical_torsion_constant, section_properties};
use crate::cfg::{
    AREA_EPS, FULL_CONFIDENCE_ASPECT, POLAR_EPS, RECT_EPS, STOUT_ASPECT, THICKNESS_FLOOR,
};
use crate::geom::{
    inertia_about_origin, raw_second_moments, signed_area_and_centroid,
    weighted_area_and_centroid, Polygon, Section,
};

/// A torsion estimator input: one polygon or a composite section.
#[derive(Clone, Copy, Debug)]
pub enum TorsionTarget<'a> {
    Polygon(&'a Polygon),
    Section(&'a Section),
}

impl<'a> From<&'a Polygon> for TorsionTarget<'a> {
    fn from(p: &'a Polygon) -> Self {
        TorsionTarget::Polygon(p)
    }
}

impl<'a> From<&'a Section> for TorsionTarget<'a> {
    fn from(s: &'a Section) -> Self {
        TorsionTarget::Section(s)
    }
}

/// Equivalent-rectangle summary of a polygon's central inertia tensor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TorsionFidelity {
    /// Long side of the equivalent rectangle.
    pub width: f64,
    /// Short side of the equivalent rectangle.
    pub thickness: f64,
    pub aspect_ratio: f64,
    /// `min(1, aspect_ratio / 10)`.
    pub confidence: f64,
    /// Aspect ratio below 1.5: thin-wall theory is unreliable.
    pub stout: bool,
}

impl TorsionFidelity {
    fn degenerate() -> Self {
        Self {
            width: 0.0,
            thickness: 0.0,
            aspect_ratio: 0.0,
            confidence: 0.0,
            stout: true,
        }
    }
}

/// Roark-Young torsion constant with the fidelity it was computed at.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoarkTorsion {
    pub j: f64,
    pub fidelity: TorsionFidelity,
}

/// Central (centroidal) unweighted second moments and |area| of one loop.
fn central_moments(polygon: &Polygon) -> (f64, f64, f64, f64) {
    let (a, c) = signed_area_and_centroid(polygon.vertices());
    let a = a.abs();
    let m = raw_second_moments(polygon.vertices());
    let ix = m.ix - a * c.y() * c.y();
    let iy = m.iy - a * c.x() * c.x();
    let ixy = m.ixy - a * c.x() * c.y();
    (a, ix, iy, ixy)
}

fn polygon_fidelity(polygon: &Polygon) -> TorsionFidelity {
    let (a, ix, iy, ixy) = central_moments(polygon);
    if a < AREA_EPS {
        return TorsionFidelity::degenerate();
    }
    let avg = 0.5 * (ix + iy);
    let half_diff = 0.5 * (ix - iy);
    let r = (half_diff * half_diff + ixy * ixy).sqrt();
    let i_max = avg + r;
    let i_min = (avg - r).max(0.0);
    // Rectangle w×t: I_max = t·w³/12, I_min = w·t³/12, A = w·t.
    let width = (12.0 * i_max / a).max(0.0).sqrt();
    let thickness = (12.0 * i_min / a).sqrt();
    if width < RECT_EPS {
        return TorsionFidelity::degenerate();
    }
    let aspect_ratio = if thickness < RECT_EPS {
        f64::INFINITY
    } else {
        width / thickness
    };
    TorsionFidelity {
        width,
        thickness,
        aspect_ratio,
        confidence: (aspect_ratio / FULL_CONFIDENCE_ASPECT).min(1.0),
        stout: aspect_ratio < STOUT_ASPECT,
    }
}

/// Equivalent-rectangle fidelity; composite sections are area-weighted.
///
/// For sections, `width`/`thickness` are those of the polygon with the
/// largest area, while `aspect_ratio` and `confidence` are area-weighted.
pub fn evaluate_torsional_fidelity<'a>(target: impl Into<TorsionTarget<'a>>) -> TorsionFidelity {
    match target.into() {
        TorsionTarget::Polygon(p) => polygon_fidelity(p),
        TorsionTarget::Section(s) => {
            let parts: Vec<(f64, TorsionFidelity)> = s
                .polygons()
                .iter()
                .map(|p| (signed_area_and_centroid(p.vertices()).0.abs(), polygon_fidelity(p)))
                .collect();
            aggregate_fidelity(&parts)
        }
    }
}

fn aggregate_fidelity(parts: &[(f64, TorsionFidelity)]) -> TorsionFidelity {
    let total: f64 = parts.iter().map(|(a, _)| a).sum();
    if total < AREA_EPS {
        return TorsionFidelity::degenerate();
    }
    let confidence = parts.iter().map(|(a, f)| a * f.confidence).sum::<f64>() / total;
    let aspect_ratio = parts.iter().map(|(a, f)| a * f.aspect_ratio).sum::<f64>() / total;
    let dominant = parts
        .iter()
        .max_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, f)| *f)
        .unwrap_or_else(TorsionFidelity::degenerate);
    TorsionFidelity {
        width: dominant.width,
        thickness: dominant.thickness,
        aspect_ratio,
        confidence,
        stout: aspect_ratio < STOUT_ASPECT,
    }
}

/// Roark-Young: `J = [1/3 − 0.21·β·(1 − β⁴/12)]·a·b³·w`, β = b/a.
///
/// Composite sections sum per-polygon constants (signed by weight) and
/// report area-weighted fidelity.
pub fn saint_venant_roark<'a>(target: impl Into<TorsionTarget<'a>>) -> RoarkTorsion {
    match target.into() {
        TorsionTarget::Polygon(p) => {
            let fidelity = polygon_fidelity(p);
            let (a, b) = (fidelity.width, fidelity.thickness);
            if a < RECT_EPS {
                return RoarkTorsion { j: 0.0, fidelity };
            }
            let beta = b / a;
            let coeff = 1.0 / 3.0 - 0.21 * beta * (1.0 - beta.powi(4) / 12.0);
            RoarkTorsion {
                j: coeff * a * b.powi(3) * p.weight(),
                fidelity,
            }
        }
        TorsionTarget::Section(s) => {
            let mut j = 0.0;
            let mut parts = Vec::with_capacity(s.len());
            for p in s.polygons() {
                let sub = saint_venant_roark(TorsionTarget::Polygon(p));
                j += sub.j;
                parts.push((signed_area_and_centroid(p.vertices()).0.abs(), sub.fidelity));
            }
            RoarkTorsion {
                j,
                fidelity: aggregate_fidelity(&parts),
            }
        }
    }
}

/// Geometry-thickness torsion constant (`J_sv`).
///
/// - One positive + one negative polygon: Bredt, `J = 4·Aₘ²·t / Pₘ · w`,
///   with midline area `Aₘ` and perimeter `Pₘ` (means of outer and inner
///   loops) and thickness `t = |A_out − A_in| / Pₘ`.
/// - Otherwise: open thin wall per polygon, `|w|·Σ Lₑ·t³/3` over every
///   edge of the loop, with `t = max(2|A|/P, 1e-6)`. Both faces of a wall
///   are counted, so a long strip gives about `2·a·b³/3`.
/// - A result of (near) zero falls back to `A⁴ / (40·Ip)`.
pub fn saint_venant_thickness<'a>(target: impl Into<TorsionTarget<'a>>) -> f64 {
    match target.into() {
        TorsionTarget::Polygon(p) => {
            let j = open_thin_wall(p);
            if j.abs() > POLAR_EPS {
                return j;
            }
            let (a, _) = weighted_area_and_centroid(p);
            empirical_torsion_constant(a, weighted_polar_moment(p))
        }
        TorsionTarget::Section(s) => {
            let j = match hollow_pair(s) {
                Some((outer, inner)) => bredt(outer, inner),
                None => s.polygons().iter().map(open_thin_wall).sum(),
            };
            if j.abs() > POLAR_EPS {
                return j;
            }
            match section_properties(s) {
                Ok(props) => empirical_torsion_constant(props.a, props.j),
                Err(_) => 0.0,
            }
        }
    }
}

fn hollow_pair(section: &Section) -> Option<(&Polygon, &Polygon)> {
    match section.polygons() {
        [a, b] if a.weight() > 0.0 && b.weight() < 0.0 => Some((a, b)),
        [a, b] if b.weight() > 0.0 && a.weight() < 0.0 => Some((b, a)),
        _ => None,
    }
}

fn bredt(outer: &Polygon, inner: &Polygon) -> f64 {
    let a_out = signed_area_and_centroid(outer.vertices()).0.abs();
    let a_in = signed_area_and_centroid(inner.vertices()).0.abs();
    let p_mid = 0.5 * (outer.perimeter() + inner.perimeter());
    if p_mid <= 0.0 {
        return 0.0;
    }
    let t = (a_out - a_in).abs() / p_mid;
    let a_mid = 0.5 * (a_out + a_in);
    4.0 * a_mid * a_mid * t / p_mid * outer.weight()
}

fn open_thin_wall(polygon: &Polygon) -> f64 {
    let perimeter = polygon.perimeter();
    if perimeter <= 0.0 {
        return 0.0;
    }
    let area = signed_area_and_centroid(polygon.vertices()).0.abs();
    let t = (2.0 * area / perimeter).max(THICKNESS_FLOOR);
    let t3 = t.powi(3);
    polygon.weight().abs() * polygon.edge_lengths().iter().map(|l| l * t3 / 3.0).sum::<f64>()
}

/// Weighted polar moment of one polygon about its own centroid.
fn weighted_polar_moment(polygon: &Polygon) -> f64 {
    let (a, c) = weighted_area_and_centroid(polygon);
    let m = inertia_about_origin(polygon);
    m.ix + m.iy - a * (c.x() * c.x() + c.y() * c.y())
}
