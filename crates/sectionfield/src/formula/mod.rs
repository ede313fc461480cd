//! Weight-law formulas: a small sandboxed expression language.
//!
//! Purpose
//! - Let callers describe how a polygon's homogenization weight varies
//!   along the member, e.g. `w0 + (w1 - w0) * t^2` or
//!   `E_lookup("modulus.txt") * d(1, 2)`.
//!
//! Why
//! - Formulas are parsed into an AST once (`WeightLaw::compile`) and
//!   evaluated against an explicit symbol table (`EvalContext`). There is no
//!   path from a formula to the host beyond the whitelisted lookup reader.
//!
//! Symbols
//! - `w0`, `w1`: boundary weights; `t` / `z`: normalized position; `L`: length.
//! - `pi`, `e`, `tau` and math functions, bare or as `math.*` / `np.*`.
//! - `d(i, j)`, `d0(i, j)`, `d1(i, j)`: distance between 1-based vertices of
//!   the interpolated, start and end polygon.
//! - `E_lookup("file")`: piecewise-linear table value at the physical z.

mod eval;
mod lexer;
mod lookup;
mod parser;

pub use eval::EvalContext;
pub use lookup::{LookupCache, LookupTable};
pub use parser::{BinaryOp, Expr, UnaryOp};

use crate::error::FormulaError;

/// A compiled weight-law formula.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightLaw {
    source: String,
    expr: Expr,
}

impl WeightLaw {
    pub fn compile(source: &str) -> Result<Self, FormulaError> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    /// Formula text as given (trimmed).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate the law; non-finite results are an error.
    ///
    /// Negative results are returned as-is; flagging them is up to the caller.
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
        let value = eval::evaluate(&self.expr, ctx)?;
        if !value.is_finite() {
            return Err(FormulaError::Evaluation {
                message: format!("`{}` produced a non-finite value ({value})", self.source),
            });
        }
        Ok(value)
    }
}
