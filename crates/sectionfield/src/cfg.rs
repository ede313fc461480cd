//! Tolerance defaults (internal).
//!
//! Policy
//! - Defaults are fixed constants so every operation neutralizes near-zero
//!   denominators the same way. Field-level knobs live in `field::FieldCfg`.

/// Polygon/section area below this magnitude is treated as zero.
pub const AREA_EPS: f64 = 1e-14;
/// Vertices closer than this are the same point.
pub const VERTEX_EPS: f64 = 1e-12;
/// Vertex tolerance for the half-plane clip (horizontal edges, on-cut vertices).
pub const CLIP_EPS: f64 = 1e-10;
/// Extreme-fiber distance below which section moduli are reported as zero.
pub const FIBER_EPS: f64 = 1e-12;
/// Polar moment below which the empirical torsion constant is reported as zero.
pub const POLAR_EPS: f64 = 1e-12;
/// Floor for the deduced thin-wall thickness.
pub const THICKNESS_FLOOR: f64 = 1e-6;
/// Mohr radius relative to the mean moment below which a section is isotropic.
pub const ISOTROPY_RATIO: f64 = 1e-14;
/// Equivalent-rectangle side below which the rectangle is degenerate.
pub const RECT_EPS: f64 = 1e-12;
/// Relative asymmetry of an assembled stiffness matrix that triggers symmetrization.
pub const SYMMETRY_TOL: f64 = 1e-9;
/// Relative slack on the field domain check (absorbs round-off in z).
pub const DOMAIN_TOL: f64 = 1e-12;
/// Equivalent-rectangle aspect ratio below which a section is "stout".
pub const STOUT_ASPECT: f64 = 1.5;
/// Aspect ratio mapped to full thin-wall confidence.
pub const FULL_CONFIDENCE_ASPECT: f64 = 10.0;
/// Gauss-Legendre order used for volume integration.
pub const VOLUME_GAUSS_POINTS: usize = 5;
