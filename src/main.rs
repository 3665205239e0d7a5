//! MODIS vs. VIIRS detection timing comparison.
//!
//! Loads FIRMS fire detection archives, pairs MODIS detections with nearby
//! VIIRS detections, reports how far apart in time the two instruments saw
//! the same fire, and flags high-confidence detections at industrial sites
//! as suspected false alarms.
//!
//! Usage:
//!   hotspot_timing --input fire_archive_M-C61.csv --input fire_archive_SV-C2.csv
//!   hotspot_timing --config analysis.toml --out results/ --max-distance-km 3
//!
//! Environment:
//!   RUST_LOG - log filter (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hotspot_timing::analysis::analyze;
use hotspot_timing::config::{load_config, load_config_default, AnalysisConfig};
use hotspot_timing::ingest::firms::load_files;
use hotspot_timing::report::{render_all, summary::render_summary};

#[derive(Parser, Debug)]
#[command(version, about = "Compare MODIS and VIIRS fire detection times")]
struct Cli {
    /// Configuration file (default: ./analysis.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Detection CSV file; repeat for one file per instrument.
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory for report artifacts.
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[arg(long)]
    max_distance_km: Option<f64>,

    #[arg(long)]
    time_window_minutes: Option<i64>,

    /// Confidence threshold (percent) for suspected false alarms.
    #[arg(long)]
    threshold: Option<f64>,

    /// Print the summary only; write no files.
    #[arg(long)]
    no_artifacts: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AnalysisConfig) {
        if let Some(km) = self.max_distance_km {
            config.matching.max_distance_km = km;
        }
        if let Some(minutes) = self.time_window_minutes {
            config.matching.max_time_window_minutes = minutes;
        }
        if let Some(threshold) = self.threshold {
            config.false_alarms.confidence_threshold = threshold;
        }
        if let Some(out) = &self.out {
            config.report.output_dir = out.clone();
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => load_config_default().context("loading default configuration")?,
    };
    cli.apply_overrides(&mut config);
    config.validate().context("invalid settings")?;

    let mut dataset = load_files(&cli.inputs).context("loading detections")?;
    dataset.retain_within(config.dataset.year, config.dataset.region.as_ref());
    if dataset.detections.is_empty() {
        warn!(files = cli.inputs.len(), "no usable detections after filtering");
    }

    let sites = config.sites();
    let outcome = analyze(&config, &dataset, &sites);

    println!("{}", render_summary(&outcome));

    if cli.no_artifacts {
        return Ok(());
    }

    let out_dir = &config.report.output_dir;
    let written = render_all(&outcome, out_dir)
        .with_context(|| format!("writing report to {}", out_dir.display()))?;
    for path in &written {
        println!("📄 {}", path.display());
    }
    info!(files = written.len(), "done");
    Ok(())
}
