//! Suspected False Alarm Inspection
//!
//! Lists high-confidence detections that fall inside known industrial
//! heat sources (steel works, coke ovens), without running the MODIS/VIIRS
//! timing comparison.
//!
//! Usage:
//!   cargo run --bin flag_false_alarms -- --input fire_archive_M-C61.csv
//!
//! Options:
//!   --config PATH      Configuration file (default: ./analysis.toml if present)
//!   --threshold N      Override the confidence threshold (percent)
//!   --geojson PATH     Also write the flagged detections as GeoJSON
//!
//! Environment:
//!   RUST_LOG - log filter (default: info)

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hotspot_timing::analysis::false_alarms::{inspect, summarize_by_site};
use hotspot_timing::config::{load_config, load_config_default};
use hotspot_timing::ingest::firms::load_files;
use hotspot_timing::report::export::false_alarms_geojson;

#[derive(Parser, Debug)]
#[command(version, about = "Flag high-confidence detections at industrial sites")]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Detection CSV file; may be repeated.
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    #[arg(long)]
    threshold: Option<f64>,

    #[arg(long)]
    geojson: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    println!("🏭 Suspected False Alarm Inspection");
    println!("===================================\n");

    let mut config = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => load_config_default().context("loading default configuration")?,
    };
    if let Some(threshold) = cli.threshold {
        config.false_alarms.confidence_threshold = threshold;
    }
    config.validate().context("invalid settings")?;

    let mut dataset = load_files(&cli.inputs).context("loading detections")?;
    dataset.retain_within(config.dataset.year, config.dataset.region.as_ref());

    let sites = config.sites();
    let threshold = config.false_alarms.confidence_threshold;
    let alarms = inspect(&dataset.detections, &sites, threshold);

    println!(
        "✓ {} detections checked against {} sites (confidence >= {:.0})\n",
        dataset.detections.len(),
        sites.len(),
        threshold
    );

    if alarms.is_empty() {
        println!("no suspected false alarms");
        return Ok(());
    }

    println!("{:<32} {:>6} {:>6} {:>6} {:>6}", "site", "count", "MODIS", "VIIRS", "conf");
    println!("{}", "-".repeat(60));
    for s in summarize_by_site(&alarms) {
        println!(
            "{:<32} {:>6} {:>6} {:>6} {:>6.1}",
            s.site_name, s.count, s.modis_count, s.viirs_count, s.mean_confidence
        );
    }

    println!("\n{:<17} {:<6} {:>9} {:>9} {:>5}  site", "time (UTC)", "src", "lat", "lon", "conf");
    for alarm in &alarms {
        let d = alarm.detection;
        println!(
            "{:<17} {:<6} {:>9.4} {:>9.4} {:>5.0}  {}",
            d.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            d.source.as_str(),
            d.latitude,
            d.longitude,
            d.confidence,
            alarm.site.name
        );
    }

    if let Some(path) = &cli.geojson {
        fs::write(path, false_alarms_geojson(&alarms).to_string())
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\n📄 {}", path.display());
    }

    Ok(())
}
