//! Section-plane geometry: primitives and the polygon integrator.
//!
//! Purpose
//! - `Point`, `Polygon`, `Section`: immutable value types validated at
//!   construction (CCW loops, positive area, unique names).
//! - Shoelace integration (area, centroid, second moments about the origin),
//!   self-intersection test, half-plane clip and statical moments.
//!
//! Code cross-refs: `crate::section` (composite digestion), `crate::field`.

mod integrate;
pub mod rand;
mod types;

pub use integrate::{
    clip_above_line, inertia_about_origin, raw_second_moments, raw_statical_moment,
    segments_intersect, self_intersects, signed_area_and_centroid, statical_moment,
    statical_moment_above, weighted_area_and_centroid, SecondMoments,
};
pub use types::{Point, Polygon, Section};
