use super::*;
use crate::field::FieldCfg;
use crate::geom::rand::rectangle;
use crate::geom::Polygon;
use crate::section::TorsionMethod;
use nalgebra::SVector;

fn rect(w: f64, h: f64, center: (f64, f64), weight: f64) -> Polygon {
    rectangle("r", w, h, center, weight).unwrap()
}

fn prism(w: f64, h: f64, center: (f64, f64), l: f64) -> ContinuousSectionField {
    ContinuousSectionField::new(
        Section::new(0.0, vec![rect(w, h, center, 1.0)]).unwrap(),
        Section::new(l, vec![rect(w, h, center, 1.0)]).unwrap(),
    )
    .unwrap()
}

fn rel_close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1e-300)
}

#[test]
fn gauss_legendre_rules() {
    let (x, w) = gauss_legendre(2).unwrap();
    let r = 1.0 / 3f64.sqrt();
    assert!((x[0] + r).abs() < 1e-15 && (x[1] - r).abs() < 1e-15);
    assert!((w[0] - 1.0).abs() < 1e-14 && (w[1] - 1.0).abs() < 1e-14);

    for n in 1..=10 {
        let (x, w) = gauss_legendre(n).unwrap();
        assert!((w.iter().sum::<f64>() - 2.0).abs() < 1e-13, "n={n}");
        assert!(x.windows(2).all(|p| p[0] < p[1]));
        // Exact for degree 2n-2 (even): ∫ x^(2n-2) = 2/(2n-1).
        let deg = 2 * n - 2;
        let q: f64 = x.iter().zip(&w).map(|(x, w)| w * x.powi(deg as i32)).sum();
        assert!((q - 2.0 / (deg as f64 + 1.0)).abs() < 1e-13, "n={n}");
    }
    assert!(matches!(
        gauss_legendre(0),
        Err(StiffnessError::QuadratureOrder { requested: 0, minimum: 1 })
    ));
}

#[test]
fn gauss_lobatto_rules() {
    let (x, w) = gauss_lobatto(4).unwrap();
    let r = 1.0 / 5f64.sqrt();
    assert_eq!(x[0], -1.0);
    assert_eq!(x[3], 1.0);
    assert!((x[1] + r).abs() < 1e-15 && (x[2] - r).abs() < 1e-15);
    assert!((w[0] - 1.0 / 6.0).abs() < 1e-14 && (w[1] - 5.0 / 6.0).abs() < 1e-14);

    for n in 2..=10 {
        let (x, w) = gauss_lobatto(n).unwrap();
        assert_eq!((x[0], x[n - 1]), (-1.0, 1.0));
        assert!((w.iter().sum::<f64>() - 2.0).abs() < 1e-13, "n={n}");
        // Exact for degree 2n-3; check the even degree 2n-4.
        let deg = 2 * n - 4;
        let q: f64 = x.iter().zip(&w).map(|(x, w)| w * x.powi(deg as i32)).sum();
        assert!((q - 2.0 / (deg as f64 + 1.0)).abs() < 1e-13, "n={n}");
    }
    assert!(gauss_lobatto(1).is_err());
}

#[test]
fn section_matrix_of_centered_rectangle() {
    let s = Section::new(0.0, vec![rect(2.0, 4.0, (0.0, 0.0), 1.0)]).unwrap();
    let d = section_stiffness_matrix(&s, 10.0);
    assert!((d[(0, 0)] - 80.0).abs() < 1e-12);
    assert!((d[(1, 1)] - 10.0 * 2.0 * 64.0 / 12.0).abs() < 1e-12);
    assert!((d[(2, 2)] - 10.0 * 4.0 * 8.0 / 12.0).abs() < 1e-12);
    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        assert!(d[(i, j)].abs() < 1e-12 && d[(j, i)].abs() < 1e-12);
    }
}

#[test]
fn section_matrix_couples_offset_sections() {
    // Unit square in the first quadrant, weight 2.
    let s = Section::new(0.0, vec![rect(1.0, 1.0, (0.5, 0.5), 2.0)]).unwrap();
    let d = section_stiffness_matrix(&s, 1.0);
    assert!((d[(0, 0)] - 2.0).abs() < 1e-12);
    assert!((d[(0, 1)] - 1.0).abs() < 1e-12 && (d[(0, 2)] - 1.0).abs() < 1e-12);
    assert!((d[(1, 2)] - 0.5).abs() < 1e-12);
    assert_eq!(d, d.transpose());
}

#[test]
fn prismatic_element_matches_closed_form() {
    let (w, h, l, e, nu) = (0.3, 0.5, 2.0, 200.0, 0.3);
    let f = prism(w, h, (0.0, 0.0), l);
    let k = assemble_element_stiffness(&f, e, nu, 3).unwrap();
    let a = w * h;
    let ix = w * h.powi(3) / 12.0;
    let iy = h * w.powi(3) / 12.0;
    let tol = 1e-9;
    assert!(rel_close(k[(2, 2)], e * a / l, tol));
    assert!(rel_close(k[(2, 8)], -e * a / l, tol));
    assert!(rel_close(k[(1, 1)], 12.0 * e * ix / l.powi(3), tol));
    assert!(rel_close(k[(0, 0)], 12.0 * e * iy / l.powi(3), tol));
    assert!(rel_close(k[(3, 3)], 4.0 * e * ix / l, tol));
    assert!(rel_close(k[(3, 9)], 2.0 * e * ix / l, tol));
    assert!(rel_close(k[(1, 3)], -6.0 * e * ix / l.powi(2), tol));
    assert!(rel_close(k[(0, 4)], 6.0 * e * iy / l.powi(2), tol));

    let s = f.section(0.0).unwrap();
    let props = section_properties(&s).unwrap();
    let j = torsion_constant(&s, &props, TorsionMethod::SaintVenant);
    let g = e / (2.0 * (1.0 + nu));
    assert!(rel_close(k[(5, 5)], g * j / l, tol));
    assert!(rel_close(k[(5, 11)], -g * j / l, tol));
    assert!((k - k.transpose()).amax() <= 1e-12 * k.amax());
}

#[test]
fn rigid_body_modes_carry_no_force() {
    let f = prism(0.4, 0.2, (0.1, -0.3), 1.5);
    let k = assemble_element_stiffness(&f, 70.0, 0.33, 4).unwrap();
    let scale = k.amax();

    let mut shift = SVector::<f64, 12>::zeros();
    for i in [0, 1, 2, 6, 7, 8] {
        shift[i] = 1.0;
    }
    assert!((k * shift).amax() < 1e-9 * scale);

    // Rotation θ about x: θx = θ at both nodes, uy2 = −θ·L.
    let mut rot = SVector::<f64, 12>::zeros();
    rot[3] = 1.0;
    rot[9] = 1.0;
    rot[7] = -1.5;
    assert!((k * rot).amax() < 1e-9 * scale);

    // Rotation about z.
    let mut twist = SVector::<f64, 12>::zeros();
    twist[5] = 1.0;
    twist[11] = 1.0;
    assert!((k * twist).amax() < 1e-9 * scale);
}

#[test]
fn eccentric_section_couples_axial_and_bending() {
    // Centroid at y = 2, so Sx = A·2 = 2.
    let f = prism(1.0, 1.0, (0.0, 2.0), 2.0);
    let k = assemble_element_stiffness(&f, 1.0, 0.0, 2).unwrap();
    assert!((k[(2, 3)] - 1.0).abs() < 1e-12);
    assert!((k[(3, 2)] - 1.0).abs() < 1e-12);
}

#[test]
fn torsion_method_follows_field_cfg() {
    let cfg = FieldCfg {
        torsion_method: TorsionMethod::Empirical,
        ..FieldCfg::default()
    };
    let f = prism(1.0, 2.0, (0.0, 0.0), 4.0).with_cfg(cfg);
    let k = assemble_element_stiffness(&f, 3.0, 0.5, 2).unwrap();
    let r = f.properties_at(0.0).unwrap();
    assert!(rel_close(k[(5, 5)], 1.0 * r.k_torsion / 4.0, 1e-9));
}

#[test]
fn tapered_element_is_symmetric_and_bounded() {
    let f = ContinuousSectionField::new(
        Section::new(0.0, vec![rect(2.0, 1.0, (0.0, 0.0), 1.0)]).unwrap(),
        Section::new(10.0, vec![rect(4.0, 2.0, (0.0, 0.0), 1.0)]).unwrap(),
    )
    .unwrap();
    let k = assemble_element_stiffness(&f, 1.0, 0.25, 5).unwrap();
    assert!((k - k.transpose()).amax() <= 1e-12 * k.amax());
    assert!((0..12).all(|i| k[(i, i)] >= 0.0));
    let ea = k[(2, 2)] * 10.0;
    assert!(ea > 2.0 && ea < 8.0);
}

#[test]
fn assembly_errors() {
    let f = prism(1.0, 1.0, (0.0, 0.0), 1.0);
    assert!(matches!(
        assemble_element_stiffness(&f, 1.0, 0.3, 1),
        Err(StiffnessError::QuadratureOrder { requested: 1, minimum: 2 })
    ));
    assert!(matches!(
        assemble_element_stiffness(&f, -1.0, 0.3, 2),
        Err(StiffnessError::NegativeDiagonal { index: 0, .. })
    ));
}

#[test]
fn prismatic_volume_is_area_times_length() {
    let f = prism(0.3, 0.7, (1.0, 1.0), 12.5);
    let v = total_volume(&f).unwrap();
    assert!(rel_close(v, 0.21 * 12.5, 1e-9));
}

#[test]
fn tapered_volume_with_weight_ramp() {
    // A(t) = (1 + 2t) · 2(1 + t)², integrated over 10 units.
    let f = ContinuousSectionField::new(
        Section::new(0.0, vec![rect(2.0, 1.0, (0.0, 0.0), 1.0)]).unwrap(),
        Section::new(10.0, vec![rect(4.0, 2.0, (0.0, 0.0), 3.0)]).unwrap(),
    )
    .unwrap();
    assert!(rel_close(total_volume(&f).unwrap(), 310.0 / 3.0, 1e-9));
}

#[test]
fn voids_reduce_volume() {
    let section = |z: f64| {
        Section::new(
            z,
            vec![
                rectangle("outer", 2.0, 2.0, (0.0, 0.0), 1.0).unwrap(),
                rectangle("inner", 1.0, 1.0, (0.0, 0.0), -1.0).unwrap(),
            ],
        )
        .unwrap()
    };
    let f = ContinuousSectionField::new(section(3.0), section(1.0)).unwrap();
    assert!(rel_close(total_volume(&f).unwrap(), 3.0 * 2.0, 1e-9));
}
