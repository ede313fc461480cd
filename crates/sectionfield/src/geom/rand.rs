//! Random star-shaped polygons (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic sampler of valid CCW polygons for property tests and
//!   benchmarks. Angles are sorted before radii are applied, so every draw is
//!   a simple loop, star-shaped about its center.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, then translate to the requested center.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Point, Polygon};
use crate::error::GeometryError;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Relative radial jitter. Radii = `base_radius * (1 + u)`, `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    pub center: (f64, f64),
    pub weight: f64,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            center: (0.0, 0.0),
            weight: 1.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random star-shaped CCW polygon named `name`.
pub fn draw_polygon_radial(
    name: &str,
    cfg: RadialCfg,
    tok: ReplayToken,
) -> Result<Polygon, GeometryError> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let mut angles: Vec<f64> = (0..n)
        .map(|k| {
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            (k as f64) * delta + jitter
        })
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let (cx, cy) = cfg.center;
    let vertices = angles
        .into_iter()
        .map(|th| {
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            Point::new(cx + th.cos() * r, cy + th.sin() * r)
        })
        .collect();
    Polygon::new(name, vertices, cfg.weight)
}

/// Regular `n`-gon of circumradius `radius` centered at `center` (CCW).
pub fn regular_polygon(
    name: &str,
    n: usize,
    radius: f64,
    center: (f64, f64),
    weight: f64,
) -> Result<Polygon, GeometryError> {
    let delta = std::f64::consts::TAU / (n.max(1) as f64);
    let vertices = (0..n)
        .map(|k| {
            let th = (k as f64) * delta;
            Point::new(center.0 + radius * th.cos(), center.1 + radius * th.sin())
        })
        .collect();
    Polygon::new(name, vertices, weight)
}

/// Axis-aligned rectangle `width × height` centered at `center` (CCW).
pub fn rectangle(
    name: &str,
    width: f64,
    height: f64,
    center: (f64, f64),
    weight: f64,
) -> Result<Polygon, GeometryError> {
    let (hx, hy) = (0.5 * width, 0.5 * height);
    let (cx, cy) = center;
    Polygon::new(
        name,
        vec![
            Point::new(cx - hx, cy - hy),
            Point::new(cx + hx, cy - hy),
            Point::new(cx + hx, cy + hy),
            Point::new(cx - hx, cy + hy),
        ],
        weight,
    )
}
