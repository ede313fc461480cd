//! Field input document (JSON) and its conversion into library types.
//!
//! ```json
//! { "s0": { "z": 0.0, "polygons": [{ "name": "web", "weight": 1.0,
//!                                     "vertices": [[0,0],[1,0],[1,1],[0,1]] }] },
//!   "s1": { "z": 5.0, "polygons": [ ... ] },
//!   "weight_laws": ["web,web: w0 + (w1 - w0) * t^2"] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sectionfield::api::{ContinuousSectionField, FieldCfg, Point, Polygon, Section, WeightLawSet};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FieldDoc {
    pub s0: SectionDoc,
    pub s1: SectionDoc,
    #[serde(default)]
    pub weight_laws: Vec<String>,
    /// Base directory for `E_lookup`; defaults to the document's directory.
    #[serde(default)]
    pub lookup_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct SectionDoc {
    pub z: f64,
    pub polygons: Vec<PolygonDoc>,
}

#[derive(Debug, Deserialize)]
pub struct PolygonDoc {
    pub name: String,
    #[serde(default = "unit_weight")]
    pub weight: f64,
    pub vertices: Vec<[f64; 2]>,
}

fn unit_weight() -> f64 {
    1.0
}

impl SectionDoc {
    pub fn to_section(&self) -> Result<Section> {
        let polygons = self
            .polygons
            .iter()
            .map(|p| {
                let vertices = p.vertices.iter().map(|&[x, y]| Point::new(x, y)).collect();
                Polygon::new(p.name.as_str(), vertices, p.weight)
                    .with_context(|| format!("polygon `{}` at z={}", p.name, self.z))
            })
            .collect::<Result<Vec<_>>>()?;
        Section::new(self.z, polygons).with_context(|| format!("section at z={}", self.z))
    }
}

impl FieldDoc {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing field document")
    }

    /// Build the field; `base_dir` resolves a relative or missing `lookup_dir`.
    pub fn into_field(self, base_dir: Option<&Path>) -> Result<ContinuousSectionField> {
        let s0 = self.s0.to_section().context("start section")?;
        let s1 = self.s1.to_section().context("end section")?;
        let lookup_dir = match (self.lookup_dir, base_dir) {
            (Some(dir), Some(base)) if dir.is_relative() => Some(base.join(dir)),
            (Some(dir), _) => Some(dir),
            (None, base) => base.map(Path::to_path_buf),
        };
        let mut field = ContinuousSectionField::new(s0, s1)
            .context("building section field")?
            .with_cfg(FieldCfg {
                lookup_dir,
                ..FieldCfg::default()
            });
        if !self.weight_laws.is_empty() {
            field
                .set_weight_laws(&WeightLawSet::from_list(self.weight_laws))
                .context("registering weight laws")?;
        }
        Ok(field)
    }
}

/// Read a field document from disk.
pub fn load_field(path: &Path) -> Result<ContinuousSectionField> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = FieldDoc::parse(&text).with_context(|| format!("in {}", path.display()))?;
    let field = doc.into_field(path.parent())?;
    tracing::debug!(path = %path.display(), z = ?field.z_bounds(), "field loaded");
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "s0": {"z": 0.0, "polygons": [
            {"name": "web", "vertices": [[0,0],[2,0],[2,1],[0,1]]}
        ]},
        "s1": {"z": 4.0, "polygons": [
            {"name": "web", "weight": 3.0, "vertices": [[0,0],[4,0],[4,2],[0,2]]}
        ]},
        "weight_laws": ["web,web: w0 + (w1 - w0) * t^2"]
    }"#;

    #[test]
    fn document_builds_field_with_laws() {
        let field = FieldDoc::parse(DOC).unwrap().into_field(None).unwrap();
        assert_eq!(field.z_bounds(), (0.0, 4.0));
        assert_eq!(field.s0().polygons()[0].weight(), 1.0);
        let w = field.section(2.0).unwrap().polygons()[0].weight();
        assert!((w - 1.5).abs() < 1e-12);
    }

    #[test]
    fn clockwise_polygon_is_reported_with_context() {
        let doc = DOC.replace("[[0,0],[2,0],[2,1],[0,1]]", "[[0,1],[2,1],[2,0],[0,0]]");
        let err = FieldDoc::parse(&doc).unwrap().into_field(None).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("start section"), "{msg}");
        assert!(msg.contains("not counter-clockwise"), "{msg}");
    }

    #[test]
    fn lookup_dir_resolves_against_document() {
        let mut doc = FieldDoc::parse(DOC).unwrap();
        doc.lookup_dir = Some(PathBuf::from("tables"));
        let field = doc.into_field(Some(Path::new("/data/run"))).unwrap();
        assert_eq!(
            field.cfg().lookup_dir.as_deref(),
            Some(Path::new("/data/run/tables"))
        );
    }

    #[test]
    fn load_field_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.json");
        fs::write(&path, DOC).unwrap();
        let field = load_field(&path).unwrap();
        assert_eq!(field.cfg().lookup_dir.as_deref(), Some(dir.path()));
        assert!(load_field(&dir.path().join("missing.json")).is_err());
    }
}
