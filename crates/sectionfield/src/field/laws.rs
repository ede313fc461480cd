//! Weight-law declarations and their resolution to polygon indices.
//!
//! Two input shapes are accepted:
//! - list entries `"startName,endName: expression"`, where `startName` is
//!   looked up in the start section and `endName` in the end section;
//! - keyed entries `(LawTarget, expression)` by polygon index or name.
//!
//! Names match exactly first, then after stripping a model-tag suffix
//! (`@cell`, `@wall`, `@closed`, case-insensitive, and everything after it).

use std::collections::BTreeMap;

use crate::error::FieldError;
use crate::formula::WeightLaw;
use crate::geom::Section;

const TAG_SUFFIXES: [&str; 3] = ["@cell", "@wall", "@closed"];

/// Polygon a keyed weight law applies to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LawTarget {
    Index(usize),
    Name(String),
}

impl From<usize> for LawTarget {
    fn from(i: usize) -> Self {
        LawTarget::Index(i)
    }
}

impl From<&str> for LawTarget {
    fn from(name: &str) -> Self {
        LawTarget::Name(name.to_string())
    }
}

impl From<String> for LawTarget {
    fn from(name: String) -> Self {
        LawTarget::Name(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum LawEntry {
    Line(String),
    Keyed(LawTarget, String),
}

/// Unresolved weight-law configuration, attached with
/// [`ContinuousSectionField::set_weight_laws`](super::ContinuousSectionField::set_weight_laws).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightLawSet {
    entries: Vec<LawEntry>,
}

impl WeightLawSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered list of `"startName,endName: expression"` lines.
    pub fn from_list<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: lines.into_iter().map(|l| LawEntry::Line(l.into())).collect(),
        }
    }

    /// Keyed mapping of targets to expressions.
    pub fn from_map<I, K, S>(map: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<LawTarget>,
        S: Into<String>,
    {
        Self {
            entries: map
                .into_iter()
                .map(|(k, s)| LawEntry::Keyed(k.into(), s.into()))
                .collect(),
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.entries.push(LawEntry::Line(line.into()));
    }

    pub fn insert(&mut self, target: impl Into<LawTarget>, formula: impl Into<String>) {
        self.entries.push(LawEntry::Keyed(target.into(), formula.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve targets and compile formulas; later entries override earlier
    /// ones for the same polygon. `z` is reported with compile errors.
    pub(crate) fn resolve(
        &self,
        s0: &Section,
        s1: &Section,
        z: f64,
    ) -> Result<BTreeMap<usize, WeightLaw>, FieldError> {
        let mut out = BTreeMap::new();
        for entry in &self.entries {
            let (index, formula) = match entry {
                LawEntry::Line(line) => resolve_line(line, s0, s1)?,
                LawEntry::Keyed(target, formula) => {
                    (resolve_target(target, s0, s1)?, formula.as_str())
                }
            };
            let law = WeightLaw::compile(formula).map_err(|source| FieldError::WeightLaw {
                polygon: index,
                formula: formula.trim().to_string(),
                z,
                source,
            })?;
            out.insert(index, law);
        }
        Ok(out)
    }
}

fn resolve_line<'l>(
    line: &'l str,
    s0: &Section,
    s1: &Section,
) -> Result<(usize, &'l str), FieldError> {
    let malformed = || FieldError::MalformedLaw {
        law: line.to_string(),
    };
    let (head, formula) = line.split_once(':').ok_or_else(malformed)?;
    let (start, end) = head.split_once(',').ok_or_else(malformed)?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() || formula.trim().is_empty() {
        return Err(malformed());
    }
    let i0 = find_by_name(s0, start).ok_or_else(|| FieldError::UnknownPolygon {
        key: start.to_string(),
    })?;
    let i1 = find_by_name(s1, end).ok_or_else(|| FieldError::UnknownPolygon {
        key: end.to_string(),
    })?;
    if i0 != i1 {
        return Err(FieldError::AmbiguousLawTarget {
            law: line.to_string(),
            start: i0,
            end: i1,
        });
    }
    Ok((i0, formula))
}

fn resolve_target(target: &LawTarget, s0: &Section, s1: &Section) -> Result<usize, FieldError> {
    match target {
        LawTarget::Index(i) if *i < s0.len() => Ok(*i),
        LawTarget::Index(i) => Err(FieldError::UnknownPolygon {
            key: format!("#{i}"),
        }),
        LawTarget::Name(name) => match (find_by_name(s0, name), find_by_name(s1, name)) {
            (Some(a), Some(b)) if a != b => Err(FieldError::AmbiguousLawTarget {
                law: name.clone(),
                start: a,
                end: b,
            }),
            (Some(i), _) | (None, Some(i)) => Ok(i),
            (None, None) => Err(FieldError::UnknownPolygon { key: name.clone() }),
        },
    }
}

/// Name with any model-tag suffix removed.
pub fn base_name(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    let cut = TAG_SUFFIXES
        .iter()
        .filter_map(|tag| lower.find(tag))
        .min()
        .unwrap_or(name.len());
    name[..cut].trim()
}

fn find_by_name(section: &Section, key: &str) -> Option<usize> {
    let polygons = section.polygons();
    if let Some(i) = polygons.iter().position(|p| p.name() == key) {
        return Some(i);
    }
    let key = base_name(key);
    polygons.iter().position(|p| base_name(p.name()) == key)
}
