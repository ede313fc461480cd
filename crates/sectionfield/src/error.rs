//! Error types surfaced by construction, queries and formula evaluation.
//!
//! Construction and query entry points fail fast; recoverable geometric
//! findings are reported through `crate::diagnostics` instead.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid polygon or section geometry (raised at construction time).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon `{name}` has {found} vertices (need at least 3)")]
    TooFewVertices { name: String, found: usize },

    #[error("polygon `{name}` is degenerate ({distinct} distinct vertices, area {area:e})")]
    DegeneratePolygon {
        name: String,
        distinct: usize,
        area: f64,
    },

    #[error("polygon `{name}` is not counter-clockwise (signed area {area:e})")]
    NotCounterClockwise { name: String, area: f64 },

    #[error("polygon `{name}` has a non-finite coordinate at vertex {index}")]
    NonFiniteCoordinate { name: String, index: usize },

    #[error("polygon `{name}` has a non-finite weight")]
    NonFiniteWeight { name: String },

    #[error("polygon name must not be empty")]
    EmptyName,

    #[error("duplicate polygon name `{name}` in section at z={z}")]
    DuplicatePolygonName { name: String, z: f64 },

    #[error("section at z={z} has no polygons")]
    EmptySection { z: f64 },

    #[error("section coordinate must be finite (got {z})")]
    NonFiniteZ { z: f64 },
}

/// Section digestion failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectionError {
    #[error("net weighted area {area:e} of section at z={z} is zero; centroid undefined")]
    ZeroNetArea { z: f64, area: f64 },
}

/// Weight-law parse and evaluation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("undefined symbol `{name}`")]
    UndefinedSymbol { name: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("vertex index {index} out of range (valid: 1..={count})")]
    VertexIndex { index: i64, count: usize },

    #[error("lookup file not found: {}", path.display())]
    LookupFileMissing { path: PathBuf },

    #[error("lookup file {} has no valid data lines", path.display())]
    LookupTableEmpty { path: PathBuf },

    #[error("function `{function}` expects {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("evaluation failed: {message}")]
    Evaluation { message: String },
}

/// Continuous section field construction, configuration and query failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("boundary sections have {s0} and {s1} polygons")]
    PolygonCountMismatch { s0: usize, s1: usize },

    #[error("polygon {index} has {s0} vertices at the start and {s1} at the end")]
    VertexCountMismatch { index: usize, s0: usize, s1: usize },

    #[error("boundary sections share the same coordinate z={z}")]
    EqualBoundaryZ { z: f64 },

    #[error("z={z} is outside the field domain [{min}, {max}]")]
    OutOfDomain { z: f64, min: f64, max: f64 },

    #[error("no polygon matches `{key}`")]
    UnknownPolygon { key: String },

    #[error("weight law `{law}` names polygons at different indices ({start} and {end})")]
    AmbiguousLawTarget {
        law: String,
        start: usize,
        end: usize,
    },

    #[error("malformed weight law `{law}`: expected `startName,endName: expression`")]
    MalformedLaw { law: String },

    #[error("weight law for polygon {polygon} (`{formula}`) failed at z={z}: {source}")]
    WeightLaw {
        polygon: usize,
        formula: String,
        z: f64,
        #[source]
        source: FormulaError,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Section(#[from] SectionError),
}

/// Quadrature and stiffness assembly failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StiffnessError {
    #[error("quadrature order {requested} is below the minimum {minimum}")]
    QuadratureOrder { requested: usize, minimum: usize },

    #[error("stiffness diagonal entry {index} is negative ({value:e})")]
    NegativeDiagonal { index: usize, value: f64 },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Section(#[from] SectionError),
}
