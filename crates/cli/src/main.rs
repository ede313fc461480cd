use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sectionfield::api::{assemble_element_stiffness, total_volume, FieldCfg, TorsionMethod};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod input;
mod provenance;

use export::{samples_frame, write_frame};
use input::load_field;
use provenance::{write_sidecar, Provenance};

#[derive(Parser, Debug)]
#[command(
    name = "sectionfield-cli",
    version,
    about = "Query continuous section fields of tapered members"
)]
struct Cmd {
    /// Log level for stderr output (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Interpolated section geometry at z (JSON)
    Section {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        z: f64,
    },
    /// Property record at z (JSON), with geometric diagnostics
    Props {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        z: f64,
    },
    /// Sample n equally spaced stations and export a table (.csv or .parquet)
    Sample {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 11)]
        n: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// 12×12 element stiffness matrix (JSON rows)
    Stiffness {
        #[arg(long)]
        input: PathBuf,
        /// Reference Young's modulus
        #[arg(long)]
        e: f64,
        /// Poisson's ratio
        #[arg(long, default_value_t = 0.3)]
        nu: f64,
        /// Gauss points along the member
        #[arg(long, default_value_t = 5)]
        points: usize,
        #[arg(long, value_enum, default_value_t = Torsion::SaintVenant)]
        torsion: Torsion,
    },
    /// Total material volume of the member
    Volume {
        #[arg(long)]
        input: PathBuf,
    },
    /// Gauss-Lobatto integration coordinates along the member
    Points {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 5)]
        n: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Torsion {
    SaintVenant,
    Empirical,
    RoarkYoung,
}

impl From<Torsion> for TorsionMethod {
    fn from(t: Torsion) -> Self {
        match t {
            Torsion::SaintVenant => TorsionMethod::SaintVenant,
            Torsion::Empirical => TorsionMethod::Empirical,
            Torsion::RoarkYoung => TorsionMethod::RoarkYoung,
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(cmd.log_level)
        .with_writer(std::io::stderr)
        .init();

    match cmd.action {
        Action::Section { input, z } => {
            let field = load_field(&input)?;
            let section = field.section(z).with_context(|| format!("section at z={z}"))?;
            println!("{}", serde_json::to_string_pretty(&section)?);
        }
        Action::Props { input, z } => {
            let field = load_field(&input)?;
            let (record, diagnostics) = field
                .properties_at_with_diagnostics(z)
                .with_context(|| format!("properties at z={z}"))?;
            let doc = json!({ "z": z, "record": record, "diagnostics": diagnostics });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Action::Sample { input, n, out } => {
            ensure!(n >= 1, "--n must be at least 1");
            let field = load_field(&input)?;
            let samples = field.sample_properties(n)?;
            let mut df = samples_frame(&samples)?;
            write_frame(&mut df, &out)?;
            let (z0, z1) = field.z_bounds();
            let sidecar = write_sidecar(
                &out,
                &Provenance {
                    command: "sample",
                    inputs: vec![input],
                    params: json!({ "n": n, "z0": z0, "z1": z1 }),
                    rows: df.height(),
                },
            )?;
            info!(rows = df.height(), out = %out.display(), sidecar = %sidecar.display(), "samples written");
        }
        Action::Stiffness {
            input,
            e,
            nu,
            points,
            torsion,
        } => {
            let field = load_field(&input)?;
            let cfg = FieldCfg {
                torsion_method: torsion.into(),
                ..field.cfg().clone()
            };
            let field = field.with_cfg(cfg);
            let k = assemble_element_stiffness(&field, e, nu, points)?;
            let rows: Vec<Vec<f64>> = k
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect();
            info!(e, nu, points, torsion = ?torsion, "element stiffness assembled");
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Action::Volume { input } => {
            let field = load_field(&input)?;
            let volume = total_volume(&field)?;
            println!("{}", json!({ "volume": volume }));
        }
        Action::Points { input, n } => {
            let field = load_field(&input)?;
            let points = field.integration_points(n)?;
            println!("{}", serde_json::to_string(&points)?);
        }
    }
    Ok(())
}
