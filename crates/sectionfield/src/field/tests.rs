use std::fs;

use proptest::prelude::*;

use super::*;
use crate::error::FormulaError;
use crate::geom::rand::{draw_polygon_radial, rectangle, RadialCfg, ReplayToken, VertexCount};

fn rect(name: &str, w: f64, h: f64, weight: f64) -> Polygon {
    rectangle(name, w, h, (0.0, 0.0), weight).unwrap()
}

/// 2×1 rectangle at z=0 tapering to 4×2 at z=10, weights 1 → 3.
fn tapered() -> ContinuousSectionField {
    let s0 = Section::new(0.0, vec![rect("web", 2.0, 1.0, 1.0)]).unwrap();
    let s1 = Section::new(10.0, vec![rect("web", 4.0, 2.0, 3.0)]).unwrap();
    ContinuousSectionField::new(s0, s1).unwrap()
}

/// Outer rectangle plus a centered void, named with model tags.
fn hollow() -> ContinuousSectionField {
    let s0 = Section::new(
        0.0,
        vec![rect("shell@Wall", 4.0, 4.0, 1.0), rect("hole@cell_1", 2.0, 2.0, -1.0)],
    )
    .unwrap();
    let s1 = Section::new(
        5.0,
        vec![rect("shell@Wall", 6.0, 6.0, 1.0), rect("hole@cell_1", 3.0, 3.0, -1.0)],
    )
    .unwrap();
    ContinuousSectionField::new(s0, s1).unwrap()
}

#[test]
fn construction_checks_homology() {
    let a = Section::new(0.0, vec![rect("a", 1.0, 1.0, 1.0)]).unwrap();
    let ab = Section::new(
        1.0,
        vec![rect("a", 1.0, 1.0, 1.0), rect("b", 1.0, 1.0, 1.0).translated(3.0, 0.0)],
    )
    .unwrap();
    assert_eq!(
        ContinuousSectionField::new(a.clone(), ab).unwrap_err(),
        FieldError::PolygonCountMismatch { s0: 1, s1: 2 }
    );

    let tri = regular_tri();
    let t = Section::new(1.0, vec![tri]).unwrap();
    assert_eq!(
        ContinuousSectionField::new(a.clone(), t).unwrap_err(),
        FieldError::VertexCountMismatch { index: 0, s0: 4, s1: 3 }
    );

    assert_eq!(
        ContinuousSectionField::new(a.clone(), a).unwrap_err(),
        FieldError::EqualBoundaryZ { z: 0.0 }
    );
}

fn regular_tri() -> Polygon {
    crate::geom::rand::regular_polygon("a", 3, 1.0, (0.0, 0.0), 1.0).unwrap()
}

#[test]
fn endpoints_reproduce_boundaries() {
    let f = tapered();
    assert_eq!(&f.section(0.0).unwrap(), f.s0());
    assert_eq!(&f.section(10.0).unwrap(), f.s1());
}

#[test]
fn midpoint_is_elementwise_lerp() {
    let f = tapered();
    let mid = f.section(5.0).unwrap();
    let p = &mid.polygons()[0];
    for ((v, a), b) in p
        .vertices()
        .iter()
        .zip(f.s0().polygons()[0].vertices())
        .zip(f.s1().polygons()[0].vertices())
    {
        assert_eq!(*v, a.lerp(b, 0.5));
    }
    assert_eq!(p.name(), "web");
    assert_eq!(mid.z(), 5.0);
}

#[test]
fn default_weight_is_linear() {
    let f = tapered();
    for z in [0.0, 2.5, 7.0, 10.0] {
        let w = f.section(z).unwrap().polygons()[0].weight();
        assert!((w - (1.0 + 2.0 * z / 10.0)).abs() < 1e-12, "z={z}");
    }
}

#[test]
fn domain_is_enforced_in_either_direction() {
    let f = tapered();
    assert_eq!(
        f.section(10.5).unwrap_err(),
        FieldError::OutOfDomain { z: 10.5, min: 0.0, max: 10.0 }
    );
    assert!(f.section(-1e-3).is_err());

    let reversed = ContinuousSectionField::new(f.s1().clone(), f.s0().clone()).unwrap();
    assert_eq!(reversed.z_bounds(), (0.0, 10.0));
    assert_eq!(reversed.length(), 10.0);
    let w = reversed.section(2.5).unwrap().polygons()[0].weight();
    assert!((w - 1.5).abs() < 1e-12);
}

#[test]
fn constant_law_freezes_weight() {
    let mut f = tapered();
    f.set_weight_laws(&WeightLawSet::from_list(["web,web: w0"])).unwrap();
    for z in [0.0, 3.0, 10.0] {
        assert_eq!(f.section(z).unwrap().polygons()[0].weight(), 1.0);
    }
    assert_eq!(f.weight_law(0).map(|l| l.source()), Some("w0"));
    assert!(f.weight_law(1).is_none());
    f.clear_weight_laws();
    assert_eq!(f.section(10.0).unwrap().polygons()[0].weight(), 3.0);
}

#[test]
fn laws_see_length_and_vertices() {
    let mut f = tapered();
    f.set_weight_laws(&WeightLawSet::from_map([(0usize, "d(1, 2) * L / 10")]))
        .unwrap();
    // Width grows from 2 to 4.
    let w = f.section(5.0).unwrap().polygons()[0].weight();
    assert!((w - 3.0).abs() < 1e-12);
    let f = tapered()
        .with_weight_laws(&WeightLawSet::from_map([("web", "d1(1, 2) - d0(1, 2)")]))
        .unwrap();
    assert_eq!(f.section(0.0).unwrap().polygons()[0].weight(), 2.0);
}

#[test]
fn names_match_after_tag_stripping() {
    let mut f = hollow();
    f.set_weight_laws(&WeightLawSet::from_list(["shell, shell@WALL: 2", "hole,hole: -2"]))
        .unwrap();
    let s = f.section(2.5).unwrap();
    assert_eq!(s.polygons()[0].weight(), 2.0);
    assert_eq!(s.polygons()[1].weight(), -2.0);
    assert_eq!(base_name("hole@Cell_1"), "hole");
    assert_eq!(base_name("web @closed x"), "web");
    assert_eq!(base_name("plain"), "plain");
}

#[test]
fn registration_errors() {
    let mut f = hollow();
    assert!(matches!(
        f.set_weight_laws(&WeightLawSet::from_list(["shell w0"])),
        Err(FieldError::MalformedLaw { .. })
    ));
    assert!(matches!(
        f.set_weight_laws(&WeightLawSet::from_list(["shell: w0"])),
        Err(FieldError::MalformedLaw { .. })
    ));
    assert_eq!(
        f.set_weight_laws(&WeightLawSet::from_list(["flange,flange: w0"])),
        Err(FieldError::UnknownPolygon { key: "flange".into() })
    );
    assert!(matches!(
        f.set_weight_laws(&WeightLawSet::from_list(["shell,hole: w0"])),
        Err(FieldError::AmbiguousLawTarget { start: 0, end: 1, .. })
    ));
    assert!(matches!(
        f.set_weight_laws(&WeightLawSet::from_map([(7usize, "w0")])),
        Err(FieldError::UnknownPolygon { .. })
    ));
}

#[test]
fn failed_validation_keeps_previous_laws() {
    let mut f = tapered();
    f.set_weight_laws(&WeightLawSet::from_list(["web,web: w1"])).unwrap();
    let err = f
        .set_weight_laws(&WeightLawSet::from_list(["web,web: d(1, 10)"]))
        .unwrap_err();
    match err {
        FieldError::WeightLaw {
            polygon,
            formula,
            z,
            source,
        } => {
            assert_eq!(polygon, 0);
            assert_eq!(formula, "d(1, 10)");
            assert_eq!(z, 5.0);
            assert_eq!(source, FormulaError::VertexIndex { index: 10, count: 4 });
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        f.set_weight_laws(&WeightLawSet::from_list(["web,web: youngs"])),
        Err(FieldError::WeightLaw {
            source: FormulaError::UndefinedSymbol { .. },
            ..
        })
    ));
    assert!(matches!(
        f.set_weight_laws(&WeightLawSet::from_list(["web,web: 1 +"])),
        Err(FieldError::WeightLaw {
            source: FormulaError::Parse { .. },
            ..
        })
    ));
    assert_eq!(f.weight_law(0).map(|l| l.source()), Some("w1"));
    assert_eq!(f.section(0.0).unwrap().polygons()[0].weight(), 3.0);
}

#[test]
fn weight_law_failure_at_query_reports_coordinate() {
    let mut f = tapered();
    // Valid at the midpoint, divides by zero at the start.
    f.set_weight_laws(&WeightLawSet::from_list(["web,web: 1 / t"])).unwrap();
    assert!(matches!(
        f.section(0.0),
        Err(FieldError::WeightLaw {
            z,
            source: FormulaError::DivisionByZero,
            ..
        }) if z == 0.0
    ));
}

#[test]
fn negative_weight_is_a_diagnostic() {
    let mut f = hollow();
    f.set_weight_laws(&WeightLawSet::from_map([(LawTarget::Index(0), "w0 - 3 * t")]))
        .unwrap();
    let (s, diags) = f.section_with_diagnostics(5.0).unwrap();
    assert_eq!(s.polygons()[0].weight(), -2.0);
    assert!(matches!(
        diags.as_slice(),
        [Diagnostic::NegativeWeight { polygon: 0, weight, .. }] if *weight == -2.0
    ));
}

#[test]
fn twisted_sweep_reports_self_intersection() {
    let notch = |y: f64| {
        Polygon::new(
            "m",
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(2.0, y),
                Point::new(0.0, 4.0),
            ],
            1.0,
        )
        .unwrap()
    };
    let f = ContinuousSectionField::new(
        Section::new(0.0, vec![notch(1.0)]).unwrap(),
        Section::new(1.0, vec![notch(-1.0)]).unwrap(),
    )
    .unwrap();
    let (_, clean) = f.section_with_diagnostics(0.0).unwrap();
    assert!(clean.is_empty());
    let (_, diags) = f.section_with_diagnostics(0.75).unwrap();
    assert!(matches!(
        diags.as_slice(),
        [Diagnostic::SelfIntersection { polygon: 0, .. }]
    ));
    assert_eq!(diags[0].z(), 0.75);
}

#[test]
fn doubled_vertex_sweep_stays_clean() {
    let square = |s: f64| {
        Polygon::new(
            "sq",
            vec![
                Point::new(0.0, 0.0),
                Point::new(s, 0.0),
                Point::new(s, 0.0),
                Point::new(s, s),
                Point::new(0.0, s),
            ],
            1.0,
        )
        .unwrap()
    };
    let f = ContinuousSectionField::new(
        Section::new(0.0, vec![square(1.0)]).unwrap(),
        Section::new(2.0, vec![square(3.0)]).unwrap(),
    )
    .unwrap();
    for z in [0.0, 0.5, 1.0, 2.0] {
        let (_, diags) = f.section_with_diagnostics(z).unwrap();
        assert!(diags.is_empty(), "z={z}: {diags:?}");
    }
}

#[test]
fn properties_and_samples() {
    let f = tapered();
    let r = f.properties_at(10.0).unwrap();
    // 4×2 rectangle with weight 3.
    assert!((r.a - 24.0).abs() < 1e-12);
    assert!((r.ix - 3.0 * 4.0 * 8.0 / 12.0).abs() < 1e-9);

    let samples = f.sample_properties(3).unwrap();
    let zs: Vec<f64> = samples.iter().map(|(z, _)| *z).collect();
    assert_eq!(zs, vec![0.0, 5.0, 10.0]);
    assert!((samples[0].1.a - 2.0).abs() < 1e-12);
    assert!(f.sample_properties(0).unwrap().is_empty());
    assert_eq!(f.stations(1), vec![0.0]);
}

#[test]
fn integration_points_span_the_field() {
    let f = tapered();
    assert_eq!(f.integration_points(2).unwrap(), vec![0.0, 10.0]);
    let pts = f.integration_points(3).unwrap();
    assert_eq!(pts.len(), 3);
    assert!((pts[0] - 0.0).abs() < 1e-12 && (pts[2] - 10.0).abs() < 1e-12);
    assert!((pts[1] - 5.0).abs() < 1e-12);
    assert!(matches!(
        f.integration_points(1),
        Err(StiffnessError::QuadratureOrder { requested: 1, minimum: 2 })
    ));
}

#[test]
fn lookup_dir_comes_from_cfg() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("e.csv"), "# z,E\n0,1\n10,5\n").unwrap();
    let cfg = FieldCfg {
        lookup_dir: Some(dir.path().to_path_buf()),
        ..FieldCfg::default()
    };
    let f = tapered()
        .with_cfg(cfg)
        .with_weight_laws(&WeightLawSet::from_list(["web,web: E_lookup('e.csv')"]))
        .unwrap();
    let w = f.section(2.5).unwrap().polygons()[0].weight();
    assert!((w - 2.0).abs() < 1e-12);

    let missing = tapered().with_weight_laws(&WeightLawSet::from_list(["web,web: E_lookup('e.csv')"]));
    assert!(matches!(
        missing,
        Err(FieldError::WeightLaw {
            source: FormulaError::LookupFileMissing { .. },
            ..
        })
    ));
}

proptest! {
    #[test]
    fn random_fields_reproduce_endpoints(index in 0u64..100, n in 3usize..12) {
        let cfg = RadialCfg { vertex_count: VertexCount::Fixed(n), ..RadialCfg::default() };
        let p0 = draw_polygon_radial("p", cfg, ReplayToken { seed: 11, index }).unwrap();
        let p1 = draw_polygon_radial("p", RadialCfg { weight: 2.0, base_radius: 3.0, ..cfg }, ReplayToken { seed: 12, index }).unwrap();
        let f = ContinuousSectionField::new(
            Section::new(-1.0, vec![p0]).unwrap(),
            Section::new(4.0, vec![p1]).unwrap(),
        ).unwrap();
        prop_assert_eq!(&f.section(-1.0).unwrap(), f.s0());
        prop_assert_eq!(&f.section(4.0).unwrap(), f.s1());
    }
}
