//! One-dimensional piecewise-linear lookup tables for `E_lookup`.
//!
//! File format: one `coordinate value` pair per line, separated by comma,
//! tab or spaces. Lines starting with `#` and lines whose first two fields
//! are not numbers are skipped. Rows are sorted by coordinate on load.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::FormulaError;

/// Sorted `(coordinate, value)` rows.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupTable {
    rows: Vec<(f64, f64)>,
}

impl LookupTable {
    /// Parse table text; `path` is only used for error reporting.
    pub fn parse(text: &str, path: &Path) -> Result<Self, FormulaError> {
        let mut rows: Vec<(f64, f64)> = text.lines().filter_map(parse_row).collect();
        if rows.is_empty() {
            return Err(FormulaError::LookupTableEmpty {
                path: path.to_path_buf(),
            });
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self { rows })
    }

    /// Read and parse a table file.
    pub fn load(path: &Path) -> Result<Self, FormulaError> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FormulaError::LookupFileMissing {
                path: path.to_path_buf(),
            },
            _ => FormulaError::Evaluation {
                message: format!("cannot read {}: {e}", path.display()),
            },
        })?;
        Self::parse(&text, path)
    }

    pub fn rows(&self) -> &[(f64, f64)] {
        &self.rows
    }

    /// Exact match, flat outside the range, linear inside.
    pub fn interpolate(&self, x: f64) -> f64 {
        let rows = &self.rows;
        if let Some(&(_, y)) = rows.iter().find(|(xi, _)| *xi == x) {
            return y;
        }
        let (first, last) = (rows[0], rows[rows.len() - 1]);
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        let i = rows.partition_point(|(xi, _)| *xi < x);
        let (x0, y0) = rows[i - 1];
        let (x1, y1) = rows[i];
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut fields = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let x: f64 = fields.next()?.parse().ok()?;
    let y: f64 = fields.next()?.parse().ok()?;
    (x.is_finite() && y.is_finite()).then_some((x, y))
}

/// Thread-safe cache of parsed tables keyed by resolved path.
#[derive(Debug, Default)]
pub struct LookupCache {
    tables: Mutex<HashMap<PathBuf, Arc<LookupTable>>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first use.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<LookupTable>, FormulaError> {
        if let Some(table) = self.lock().get(path) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(LookupTable::load(path)?);
        tracing::debug!(path = %path.display(), rows = table.rows().len(), "lookup table loaded");
        self.lock()
            .insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<LookupTable>>> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
