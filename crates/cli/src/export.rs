//! Sampled property tables as polars frames (CSV or Parquet on disk).

use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use sectionfield::api::PropertyRecord;

/// One row per station: `z` followed by the record keys in their fixed order.
pub fn samples_frame(samples: &[(f64, PropertyRecord)]) -> PolarsResult<DataFrame> {
    let mut columns = Vec::with_capacity(PropertyRecord::KEYS.len() + 1);
    let z: Vec<f64> = samples.iter().map(|(z, _)| *z).collect();
    columns.push(Series::new("z".into(), z));
    for (i, key) in PropertyRecord::KEYS.iter().enumerate() {
        let values: Vec<f64> = samples.iter().map(|(_, r)| r.entries()[i].1).collect();
        columns.push(Series::new((*key).into(), values));
    }
    DataFrame::new(columns)
}

/// Write by extension: `.csv` or `.parquet`.
pub fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let ext = out
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => {
            let mut file =
                File::create(out).with_context(|| format!("creating {}", out.display()))?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(df)
                .with_context(|| format!("writing {}", out.display()))?;
        }
        Some("parquet") => {
            let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("writing {}", out.display()))?;
        }
        _ => bail!(
            "unsupported output extension for {} (expected .csv or .parquet)",
            out.display()
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sectionfield::api::{rectangle, ContinuousSectionField, Section};

    fn samples() -> Vec<(f64, PropertyRecord)> {
        let s0 = Section::new(0.0, vec![rectangle("web", 2.0, 1.0, (0.0, 0.0), 1.0).unwrap()])
            .unwrap();
        let s1 = Section::new(2.0, vec![rectangle("web", 4.0, 1.0, (0.0, 0.0), 1.0).unwrap()])
            .unwrap();
        ContinuousSectionField::new(s0, s1)
            .unwrap()
            .sample_properties(3)
            .unwrap()
    }

    #[test]
    fn frame_has_z_and_all_keys() {
        let df = samples_frame(&samples()).unwrap();
        assert_eq!(df.shape(), (3, 20));
        let z = df.column("z").unwrap().f64().unwrap();
        assert_eq!(z.get(2), Some(2.0));
        let a = df.column("A").unwrap().f64().unwrap();
        assert!((a.get(0).unwrap() - 2.0).abs() < 1e-12);
        assert!((a.get(1).unwrap() - 3.0).abs() < 1e-12);
        assert!((a.get(2).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn csv_round_trips_through_lazy_reader() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("samples.csv");
        let mut df = samples_frame(&samples()).unwrap();
        write_frame(&mut df, &out).unwrap();
        let back = LazyCsvReader::new(&out).finish().unwrap().collect().unwrap();
        assert_eq!(back.shape(), (3, 20));
    }

    #[test]
    fn parquet_is_written_and_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut df = samples_frame(&samples()).unwrap();
        let out = dir.path().join("samples.parquet");
        write_frame(&mut df, &out).unwrap();
        assert!(out.metadata().unwrap().len() > 0);
        assert!(write_frame(&mut df, &dir.path().join("samples.txt")).is_err());
    }
}
