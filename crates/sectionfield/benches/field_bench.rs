//! Criterion benches for field queries, weight laws and element assembly.
//!
//! - `section(z)` with and without a weight law,
//! - 12×12 element stiffness for Gauss orders {2, 5, 10},
//! - 5-point volume.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sectionfield::api::{
    assemble_element_stiffness, draw_polygon_radial, total_volume, ContinuousSectionField,
    RadialCfg, ReplayToken, Section, VertexCount, WeightLawSet,
};

fn field(n: usize) -> ContinuousSectionField {
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(n),
        ..RadialCfg::default()
    };
    let p0 = draw_polygon_radial("web", cfg, ReplayToken { seed: 1, index: 0 }).unwrap();
    let p1 = draw_polygon_radial(
        "web",
        RadialCfg {
            base_radius: 0.5,
            ..cfg
        },
        ReplayToken { seed: 1, index: 1 },
    )
    .unwrap();
    ContinuousSectionField::new(
        Section::new(0.0, vec![p0]).unwrap(),
        Section::new(3.0, vec![p1]).unwrap(),
    )
    .unwrap()
}

fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");
    let plain = field(32);
    let mut ruled = field(32);
    ruled
        .set_weight_laws(&WeightLawSet::from_list([
            "web,web: w0 + (w1 - w0) * t^2 * d(1, 2) / d0(1, 2)",
        ]))
        .unwrap();

    group.bench_function("section_linear", |b| b.iter(|| plain.section(1.3).unwrap()));
    group.bench_function("section_weight_law", |b| {
        b.iter(|| ruled.section(1.3).unwrap())
    });
    for &n in &[2usize, 5, 10] {
        group.bench_with_input(BenchmarkId::new("element_stiffness", n), &n, |b, &n| {
            b.iter(|| assemble_element_stiffness(&plain, 210e9, 0.3, n).unwrap())
        });
    }
    group.bench_function("total_volume", |b| b.iter(|| total_volume(&plain).unwrap()));
    group.finish();
}

criterion_group!(benches, bench_field);
criterion_main!(benches);
