//! Sandboxed evaluation of formula trees against a fixed symbol table.
//!
//! The only names a formula can reach are listed here: the law variables,
//! a whitelisted math namespace (bare or behind `math.`/`np.`/`numpy.`),
//! the vertex-distance helpers and `E_lookup`. Nothing else in the host is
//! visible.

use std::path::{Path, PathBuf};

use super::lookup::LookupCache;
use super::parser::{BinaryOp, Expr, UnaryOp};
use crate::error::FormulaError;
use crate::geom::Point;

/// Bindings for one evaluation.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    /// Start polygon weight.
    pub w0: f64,
    /// End polygon weight.
    pub w1: f64,
    /// Normalized position in [0, 1]; also bound as `z`.
    pub t: f64,
    /// Physical span length `L`.
    pub length: f64,
    /// Physical coordinate, used by `E_lookup`.
    pub z: f64,
    /// Interpolated polygon at `t` (for `d`).
    pub current: &'a [Point],
    /// Start polygon (for `d0`).
    pub start: &'a [Point],
    /// End polygon (for `d1`).
    pub end: &'a [Point],
    /// Base directory for relative `E_lookup` paths.
    pub lookup_dir: Option<&'a Path>,
    pub lookups: &'a LookupCache,
}

enum Builtin {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
    Fold(fn(f64, f64) -> f64),
    Log,
}

const NAMESPACES: [&str; 3] = ["math.", "np.", "numpy."];

fn strip_namespace(name: &str) -> &str {
    NAMESPACES
        .iter()
        .find_map(|ns| name.strip_prefix(ns))
        .unwrap_or(name)
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        _ => None,
    }
}

fn builtin(name: &str) -> Option<Builtin> {
    use Builtin::*;
    let f = match name {
        "sin" => Unary(f64::sin),
        "cos" => Unary(f64::cos),
        "tan" => Unary(f64::tan),
        "asin" | "arcsin" => Unary(f64::asin),
        "acos" | "arccos" => Unary(f64::acos),
        "atan" | "arctan" => Unary(f64::atan),
        "sinh" => Unary(f64::sinh),
        "cosh" => Unary(f64::cosh),
        "tanh" => Unary(f64::tanh),
        "exp" => Unary(f64::exp),
        "sqrt" => Unary(f64::sqrt),
        "abs" | "fabs" => Unary(f64::abs),
        "floor" => Unary(f64::floor),
        "ceil" => Unary(f64::ceil),
        "ln" => Unary(f64::ln),
        "log10" => Unary(f64::log10),
        "log2" => Unary(f64::log2),
        "degrees" => Unary(f64::to_degrees),
        "radians" => Unary(f64::to_radians),
        "atan2" | "arctan2" => Binary(f64::atan2),
        "pow" | "power" => Binary(f64::powf),
        "hypot" => Binary(f64::hypot),
        "min" => Fold(f64::min),
        "max" => Fold(f64::max),
        "log" => Log,
        _ => return None,
    };
    Some(f)
}

/// Evaluate `expr`; the result may be non-finite (checked by the caller).
pub fn evaluate(expr: &Expr, ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    match expr {
        Expr::Num(n) => Ok(*n),
        Expr::Str(_) => Err(FormulaError::Evaluation {
            message: "string literals are only valid as an `E_lookup` argument".into(),
        }),
        Expr::Var(name) => variable(name, ctx),
        Expr::Unary { op, operand } => {
            let v = evaluate(operand, ctx)?;
            Ok(match op {
                UnaryOp::Neg => -v,
                UnaryOp::Pos => v,
            })
        }
        Expr::Binary { op, left, right } => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            binary(*op, l, r)
        }
        Expr::Call { func, args } => call(func, args, ctx),
    }
}

fn variable(name: &str, ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    match name {
        "w0" => Ok(ctx.w0),
        "w1" => Ok(ctx.w1),
        "t" | "z" => Ok(ctx.t),
        "L" => Ok(ctx.length),
        _ => constant(strip_namespace(name)).ok_or_else(|| FormulaError::UndefinedSymbol {
            name: name.to_string(),
        }),
    }
}

fn binary(op: BinaryOp, l: f64, r: f64) -> Result<f64, FormulaError> {
    match op {
        BinaryOp::Add => Ok(l + r),
        BinaryOp::Sub => Ok(l - r),
        BinaryOp::Mul => Ok(l * r),
        BinaryOp::Div if r == 0.0 => Err(FormulaError::DivisionByZero),
        BinaryOp::Div => Ok(l / r),
        BinaryOp::Mod if r == 0.0 => Err(FormulaError::DivisionByZero),
        // Floored modulo: the result takes the sign of the divisor.
        BinaryOp::Mod => Ok(l - r * (l / r).floor()),
        BinaryOp::Pow if l == 0.0 && r < 0.0 => Err(FormulaError::DivisionByZero),
        BinaryOp::Pow => Ok(l.powf(r)),
    }
}

fn arity(func: &str, args: &[Expr], expected: usize) -> Result<(), FormulaError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(FormulaError::Arity {
            function: func.to_string(),
            expected,
            found: args.len(),
        })
    }
}

fn call(func: &str, args: &[Expr], ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    match func {
        "d" => vertex_distance(func, args, ctx, ctx.current),
        "d0" => vertex_distance(func, args, ctx, ctx.start),
        "d1" => vertex_distance(func, args, ctx, ctx.end),
        "E_lookup" => lookup(args, ctx),
        _ => {
            let name = strip_namespace(func);
            let f = builtin(name).ok_or_else(|| FormulaError::UndefinedSymbol {
                name: func.to_string(),
            })?;
            let values = args
                .iter()
                .map(|a| evaluate(a, ctx))
                .collect::<Result<Vec<f64>, _>>()?;
            let out = apply(name, f, &values)?;
            if out.is_nan() && !values.iter().any(|v| v.is_nan()) {
                return Err(FormulaError::Evaluation {
                    message: format!("math domain error in `{func}`"),
                });
            }
            Ok(out)
        }
    }
}

fn apply(name: &str, f: Builtin, values: &[f64]) -> Result<f64, FormulaError> {
    let arity_err = |expected: usize| FormulaError::Arity {
        function: name.to_string(),
        expected,
        found: values.len(),
    };
    match (f, values) {
        (Builtin::Unary(f), [x]) => Ok(f(*x)),
        (Builtin::Unary(_), _) => Err(arity_err(1)),
        (Builtin::Binary(f), [x, y]) => Ok(f(*x, *y)),
        (Builtin::Binary(_), _) => Err(arity_err(2)),
        (Builtin::Fold(f), [first, rest @ ..]) => Ok(rest.iter().fold(*first, |acc, v| f(acc, *v))),
        (Builtin::Fold(_), []) => Err(arity_err(1)),
        (Builtin::Log, [x]) => Ok(x.ln()),
        (Builtin::Log, [x, base]) => Ok(x.ln() / base.ln()),
        (Builtin::Log, _) => Err(arity_err(1)),
    }
}

fn vertex_distance(
    func: &str,
    args: &[Expr],
    ctx: &EvalContext<'_>,
    points: &[Point],
) -> Result<f64, FormulaError> {
    arity(func, args, 2)?;
    let a = vertex(points, evaluate(&args[0], ctx)?)?;
    let b = vertex(points, evaluate(&args[1], ctx)?)?;
    Ok(a.distance(b))
}

/// 1-based vertex access.
fn vertex(points: &[Point], raw: f64) -> Result<&Point, FormulaError> {
    if !raw.is_finite() || raw.fract() != 0.0 {
        return Err(FormulaError::Evaluation {
            message: format!("vertex index must be an integer, got {raw}"),
        });
    }
    let index = raw as i64;
    if index < 1 || index as usize > points.len() {
        return Err(FormulaError::VertexIndex {
            index,
            count: points.len(),
        });
    }
    Ok(&points[(index - 1) as usize])
}

fn lookup(args: &[Expr], ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    arity("E_lookup", args, 1)?;
    let Expr::Str(file) = &args[0] else {
        return Err(FormulaError::Evaluation {
            message: "`E_lookup` expects a quoted file name".into(),
        });
    };
    let path = resolve_path(file, ctx.lookup_dir);
    let table = ctx.lookups.get_or_load(&path)?;
    Ok(table.interpolate(ctx.z))
}

fn resolve_path(file: &str, dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(file);
    match dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}
