//! Walk a tapered hollow tower and print a few properties per station.
//!
//! Usage:
//!   cargo run -p sectionfield --example tapered_tower -- [stations]
//!
//! The tower narrows from a 6×6 box (wall 0.5) at z=0 to a 3×3 box (wall
//! 0.25) at z=30; the void's weight law keeps it a full void everywhere.

use sectionfield::api::{
    assemble_element_stiffness, rectangle, total_volume, ContinuousSectionField, Section,
    WeightLawSet,
};

fn main() {
    let stations: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);

    let base = Section::new(
        0.0,
        vec![
            rectangle("shell@wall", 6.0, 6.0, (0.0, 0.0), 1.0).unwrap(),
            rectangle("core@cell", 5.0, 5.0, (0.0, 0.0), -1.0).unwrap(),
        ],
    )
    .unwrap();
    let top = Section::new(
        30.0,
        vec![
            rectangle("shell@wall", 3.0, 3.0, (0.0, 0.0), 1.0).unwrap(),
            rectangle("core@cell", 2.5, 2.5, (0.0, 0.0), -1.0).unwrap(),
        ],
    )
    .unwrap();
    let mut field = ContinuousSectionField::new(base, top).unwrap();
    field
        .set_weight_laws(&WeightLawSet::from_list(["core,core: -1"]))
        .unwrap();

    println!("{:>6} {:>10} {:>10} {:>10} {:>10}", "z", "A", "Ix", "J_sv", "fidelity");
    for (z, r) in field.sample_properties(stations).unwrap() {
        println!(
            "{z:>6.2} {:>10.4} {:>10.4} {:>10.4} {:>10.3}",
            r.a, r.ix, r.j_sv, r.j_s_vroark_fidelity
        );
    }
    println!("volume: {:.4}", total_volume(&field).unwrap());
    let k = assemble_element_stiffness(&field, 30e9, 0.2, 5).unwrap();
    println!("EA/L: {:.4e}  GJ/L: {:.4e}", k[(2, 2)], k[(5, 5)]);
}
