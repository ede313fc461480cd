//! Section digestor: composite properties of weighted polygon sets.
//!
//! Purpose
//! - Aggregate weighted polygons into net area, centroid and centroidal
//!   second moments (parallel-axis shift), then derive principal axes, radii
//!   of gyration, elastic moduli, statical moment at the neutral axis and the
//!   three torsion estimates (see `torsion`).
//!
//! Conventions
//! - Weights multiply areas and moments; negative weights subtract voids.
//! - Principal angle θ = ½·atan2(−2Ixy, Ix−Iy) (radians).
//! - Near-zero denominators are neutralized to zero results; only a zero net
//!   area is an error (the centroid is undefined).
//!
//! Code cross-refs: `crate::geom` (integrator), `crate::stiffness`.

pub mod torsion;

use serde::Serialize;

use crate::cfg::{AREA_EPS, FIBER_EPS, ISOTROPY_RATIO, POLAR_EPS};
use crate::diagnostics::Diagnostic;
use crate::error::SectionError;
use crate::geom::{
    inertia_about_origin, statical_moment_above, weighted_area_and_centroid, Section,
};

pub use torsion::{
    evaluate_torsional_fidelity, saint_venant_roark, saint_venant_thickness, RoarkTorsion,
    TorsionFidelity, TorsionTarget,
};

/// Net area, centroid and centroidal second moments of a section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SectionProperties {
    pub a: f64,
    pub cx: f64,
    pub cy: f64,
    pub ix: f64,
    pub iy: f64,
    pub ixy: f64,
    /// Polar moment `Ix + Iy` about the centroid.
    pub j: f64,
}

/// Principal moments, principal angle and radii of gyration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DerivedProperties {
    pub i1: f64,
    pub i2: f64,
    pub theta: f64,
    pub rx: f64,
    pub ry: f64,
}

/// Which torsion constant a consumer (e.g. element stiffness) should use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TorsionMethod {
    /// Geometry-thickness method (`J_sv`).
    #[default]
    SaintVenant,
    /// `A⁴ / (40·Ip)` (`K_torsion`).
    Empirical,
    /// Equivalent-rectangle Roark-Young formula (`J_s_vroark`).
    RoarkYoung,
}

/// Two-pass aggregation: centroid from first moments, then parallel-axis shift.
pub fn section_properties(section: &Section) -> Result<SectionProperties, SectionError> {
    let mut a = 0.0;
    let mut qx = 0.0;
    let mut qy = 0.0;
    for p in section.polygons() {
        let (ai, ci) = weighted_area_and_centroid(p);
        a += ai;
        qx += ai * ci.y();
        qy += ai * ci.x();
    }
    if a.abs() < AREA_EPS {
        return Err(SectionError::ZeroNetArea {
            z: section.z(),
            area: a,
        });
    }
    let cx = qy / a;
    let cy = qx / a;

    let (mut ix, mut iy, mut ixy) = (0.0, 0.0, 0.0);
    for p in section.polygons() {
        let m = inertia_about_origin(p);
        ix += m.ix;
        iy += m.iy;
        ixy += m.ixy;
    }
    let ix = ix - a * cy * cy;
    let iy = iy - a * cx * cx;
    let ixy = ixy - a * cx * cy;
    Ok(SectionProperties {
        a,
        cx,
        cy,
        ix,
        iy,
        ixy,
        j: ix + iy,
    })
}

/// Principal moments via Mohr's circle, with an isotropy guard on θ.
pub fn derived_properties(props: &SectionProperties) -> DerivedProperties {
    let avg = 0.5 * (props.ix + props.iy);
    let half_diff = 0.5 * (props.ix - props.iy);
    let r = (half_diff * half_diff + props.ixy * props.ixy).sqrt();
    let theta = if r < avg.abs() * ISOTROPY_RATIO {
        0.0
    } else {
        0.5 * (-2.0 * props.ixy).atan2(props.ix - props.iy)
    };
    DerivedProperties {
        i1: avg + r,
        i2: avg - r,
        theta,
        rx: radius_of_gyration(props.ix, props.a),
        ry: radius_of_gyration(props.iy, props.a),
    }
}

fn radius_of_gyration(i: f64, a: f64) -> f64 {
    if a <= 0.0 {
        return 0.0;
    }
    let r2 = i / a;
    if r2 > 0.0 {
        r2.sqrt()
    } else {
        0.0
    }
}

/// Elastic section moduli `(Wx, Wy)` from extreme-fiber distances.
pub fn section_moduli(section: &Section, props: &SectionProperties) -> (f64, f64) {
    let (mut dy, mut dx) = (0.0_f64, 0.0_f64);
    for v in section.vertices() {
        dy = dy.max((v.y() - props.cy).abs());
        dx = dx.max((v.x() - props.cx).abs());
    }
    let wx = if dy > FIBER_EPS { props.ix / dy } else { 0.0 };
    let wy = if dx > FIBER_EPS { props.iy / dx } else { 0.0 };
    (wx, wy)
}

/// Empirical torsion constant `A⁴ / (40·Ip)`; zero when `Ip ≤ POLAR_EPS`.
pub fn empirical_torsion_constant(a: f64, ip: f64) -> f64 {
    if ip <= POLAR_EPS {
        0.0
    } else {
        a.powi(4) / (40.0 * ip)
    }
}

/// Statical moment of everything above `y_cut`, about `y_ref`.
///
/// `y_ref` defaults to the neutral axis (centroid height).
pub fn partial_statical_moment(
    section: &Section,
    y_cut: f64,
    y_ref: Option<f64>,
) -> Result<f64, SectionError> {
    let y_ref = match y_ref {
        Some(y) => y,
        None => section_properties(section)?.cy,
    };
    Ok(section
        .polygons()
        .iter()
        .map(|p| statical_moment_above(p, y_cut, y_ref))
        .sum())
}

/// Statical moment of the part above the neutral axis, about that axis.
pub fn statical_moment_at_neutral_axis(section: &Section, props: &SectionProperties) -> f64 {
    section
        .polygons()
        .iter()
        .map(|p| statical_moment_above(p, props.cy, props.cy))
        .sum()
}

/// Torsion constant selected by `method`.
pub fn torsion_constant(
    section: &Section,
    props: &SectionProperties,
    method: TorsionMethod,
) -> f64 {
    match method {
        TorsionMethod::SaintVenant => saint_venant_thickness(TorsionTarget::Section(section)),
        TorsionMethod::Empirical => empirical_torsion_constant(props.a, props.j),
        TorsionMethod::RoarkYoung => saint_venant_roark(TorsionTarget::Section(section)).j,
    }
}

/// Flat property record with a fixed key set (see [`PropertyRecord::KEYS`]).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PropertyRecord {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "Cx")]
    pub cx: f64,
    #[serde(rename = "Cy")]
    pub cy: f64,
    #[serde(rename = "Ix")]
    pub ix: f64,
    #[serde(rename = "Iy")]
    pub iy: f64,
    #[serde(rename = "Ixy")]
    pub ixy: f64,
    #[serde(rename = "J")]
    pub j: f64,
    #[serde(rename = "I1")]
    pub i1: f64,
    #[serde(rename = "I2")]
    pub i2: f64,
    #[serde(rename = "theta")]
    pub theta: f64,
    #[serde(rename = "rx")]
    pub rx: f64,
    #[serde(rename = "ry")]
    pub ry: f64,
    #[serde(rename = "Wx")]
    pub wx: f64,
    #[serde(rename = "Wy")]
    pub wy: f64,
    #[serde(rename = "K_torsion")]
    pub k_torsion: f64,
    #[serde(rename = "Q_na")]
    pub q_na: f64,
    #[serde(rename = "J_sv")]
    pub j_sv: f64,
    #[serde(rename = "J_s_vroark")]
    pub j_s_vroark: f64,
    #[serde(rename = "J_s_vroark_fidelity")]
    pub j_s_vroark_fidelity: f64,
}

impl PropertyRecord {
    pub const KEYS: [&'static str; 19] = [
        "A",
        "Cx",
        "Cy",
        "Ix",
        "Iy",
        "Ixy",
        "J",
        "I1",
        "I2",
        "theta",
        "rx",
        "ry",
        "Wx",
        "Wy",
        "K_torsion",
        "Q_na",
        "J_sv",
        "J_s_vroark",
        "J_s_vroark_fidelity",
    ];

    /// `(key, value)` pairs in `KEYS` order.
    pub fn entries(&self) -> [(&'static str, f64); 19] {
        let values = [
            self.a,
            self.cx,
            self.cy,
            self.ix,
            self.iy,
            self.ixy,
            self.j,
            self.i1,
            self.i2,
            self.theta,
            self.rx,
            self.ry,
            self.wx,
            self.wy,
            self.k_torsion,
            self.q_na,
            self.j_sv,
            self.j_s_vroark,
            self.j_s_vroark_fidelity,
        ];
        let mut out = [("", 0.0); 19];
        for (slot, (key, value)) in out.iter_mut().zip(Self::KEYS.iter().zip(values)) {
            *slot = (*key, value);
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

/// Full analysis of one section, merged into a single record.
pub fn full_analysis(section: &Section) -> Result<PropertyRecord, SectionError> {
    full_analysis_with_diagnostics(section).map(|(record, _)| record)
}

/// [`full_analysis`] plus a `LowTorsionFidelity` diagnostic for stout sections.
pub fn full_analysis_with_diagnostics(
    section: &Section,
) -> Result<(PropertyRecord, Vec<Diagnostic>), SectionError> {
    let props = section_properties(section)?;
    let derived = derived_properties(&props);
    let (wx, wy) = section_moduli(section, &props);
    let roark = saint_venant_roark(TorsionTarget::Section(section));
    let record = PropertyRecord {
        a: props.a,
        cx: props.cx,
        cy: props.cy,
        ix: props.ix,
        iy: props.iy,
        ixy: props.ixy,
        j: props.j,
        i1: derived.i1,
        i2: derived.i2,
        theta: derived.theta,
        rx: derived.rx,
        ry: derived.ry,
        wx,
        wy,
        k_torsion: empirical_torsion_constant(props.a, props.j),
        q_na: statical_moment_at_neutral_axis(section, &props),
        j_sv: saint_venant_thickness(TorsionTarget::Section(section)),
        j_s_vroark: roark.j,
        j_s_vroark_fidelity: roark.fidelity.confidence,
    };
    let mut diagnostics = Vec::new();
    if roark.fidelity.stout {
        let d = Diagnostic::LowTorsionFidelity {
            z: section.z(),
            confidence: roark.fidelity.confidence,
            aspect_ratio: roark.fidelity.aspect_ratio,
        };
        d.emit();
        diagnostics.push(d);
    }
    tracing::debug!(z = section.z(), a = props.a, "section analysed");
    Ok((record, diagnostics))
}
