//! Core geometric value types: `Point`, `Polygon`, `Section`.
//!
//! Invariants are enforced at construction; every instance is immutable and
//! "changes" (reweighting, translation) produce new instances.

use serde::Serialize;

use super::integrate::signed_area_and_centroid;
use crate::cfg::{AREA_EPS, VERTEX_EPS};
use crate::error::GeometryError;

/// Immutable point in the section plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Linear interpolation `self·(1−t) + other·t`.
    ///
    /// Written in the two-product form so `t=0` and `t=1` reproduce the
    /// endpoints bit-for-bit.
    #[inline]
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        let s = 1.0 - t;
        Point::new(self.x * s + other.x * t, self.y * s + other.y * t)
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Closed vertex loop with a homogenization weight.
///
/// Invariants:
/// - at least 3 vertices, at least 3 of them distinct;
/// - counter-clockwise, signed area > `AREA_EPS`;
/// - finite coordinates and weight, non-empty name.
///
/// A negative weight denotes a void subtracted from the section.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polygon {
    name: String,
    weight: f64,
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Point>,
        weight: f64,
    ) -> Result<Self, GeometryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GeometryError::EmptyName);
        }
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                name,
                found: vertices.len(),
            });
        }
        if let Some(index) = vertices.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate { name, index });
        }
        if !weight.is_finite() {
            return Err(GeometryError::NonFiniteWeight { name });
        }
        let distinct = count_distinct(&vertices);
        let (area, _) = signed_area_and_centroid(&vertices);
        if distinct < 3 || area.abs() <= AREA_EPS {
            return Err(GeometryError::DegeneratePolygon {
                name,
                distinct,
                area,
            });
        }
        if area < 0.0 {
            return Err(GeometryError::NotCounterClockwise { name, area });
        }
        Ok(Self {
            name,
            weight,
            vertices,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: a valid polygon has at least three vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Cyclic edges `(v_i, v_{i+1})`, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn edge_lengths(&self) -> Vec<f64> {
        self.edges().map(|(p, q)| p.distance(&q)).collect()
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(p, q)| p.distance(&q)).sum()
    }

    /// Same loop with a different weight.
    pub fn with_weight(&self, weight: f64) -> Result<Polygon, GeometryError> {
        if !weight.is_finite() {
            return Err(GeometryError::NonFiniteWeight {
                name: self.name.clone(),
            });
        }
        Ok(Polygon {
            weight,
            ..self.clone()
        })
    }

    /// Raw vertex loop in clockwise order (not a valid `Polygon` loop).
    pub fn reversed_vertices(&self) -> Vec<Point> {
        self.vertices.iter().rev().copied().collect()
    }

    /// Rigidly translated copy (area and orientation are preserved).
    pub fn translated(&self, dx: f64, dy: f64) -> Polygon {
        Polygon {
            vertices: self
                .vertices
                .iter()
                .map(|p| Point::new(p.x() + dx, p.y() + dy))
                .collect(),
            ..self.clone()
        }
    }
}

fn count_distinct(points: &[Point]) -> usize {
    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !distinct.iter().any(|q| q.distance(p) <= VERTEX_EPS) {
            distinct.push(*p);
        }
    }
    distinct.len()
}

/// Named, weighted polygons sharing one longitudinal coordinate `z`.
///
/// Invariants: at least one polygon, unique polygon names, finite `z`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    z: f64,
    polygons: Vec<Polygon>,
}

impl Section {
    pub fn new(z: f64, polygons: Vec<Polygon>) -> Result<Self, GeometryError> {
        if !z.is_finite() {
            return Err(GeometryError::NonFiniteZ { z });
        }
        if polygons.is_empty() {
            return Err(GeometryError::EmptySection { z });
        }
        for (i, p) in polygons.iter().enumerate() {
            if polygons[..i].iter().any(|q| q.name() == p.name()) {
                return Err(GeometryError::DuplicatePolygonName {
                    name: p.name().to_string(),
                    z,
                });
            }
        }
        Ok(Self { z, polygons })
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Always false: a valid section holds at least one polygon.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn polygon(&self, name: &str) -> Option<&Polygon> {
        self.polygons.iter().find(|p| p.name() == name)
    }

    /// All vertices of all polygons, in polygon order.
    pub fn vertices(&self) -> impl Iterator<Item = &Point> + '_ {
        self.polygons.iter().flat_map(|p| p.vertices().iter())
    }

    /// Axis-aligned bounding box `(min, max)`.
    pub fn bounding_box(&self) -> (Point, Point) {
        let mut lo = Point::new(f64::INFINITY, f64::INFINITY);
        let mut hi = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in self.vertices() {
            lo = Point::new(lo.x().min(p.x()), lo.y().min(p.y()));
            hi = Point::new(hi.x().max(p.x()), hi.y().max(p.y()));
        }
        (lo, hi)
    }
}
