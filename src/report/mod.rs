/// Output artifacts for an analysis run.
///
/// Submodules:
/// - `summary` - console / text report with tables and an ASCII histogram.
/// - `svg`     - static histogram and time-vs-distance scatter plots.
/// - `map`     - Leaflet HTML maps of matches and flagged detections.
/// - `export`  - matched pairs as CSV, flagged detections as GeoJSON.
///
/// Empty result sets are reported in the summary; the plots and maps that
/// would be empty are skipped.

pub mod export;
pub mod map;
pub mod summary;
pub mod svg;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::analysis::AnalysisOutcome;
use crate::analysis::stats::histogram;
use crate::error::{HotspotError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory all artifacts are written to (created if missing).
    pub output_dir: PathBuf,
    pub histogram_bins: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            histogram_bins: 30,
        }
    }
}

pub const SUMMARY_FILE: &str = "summary.txt";
pub const MATCHES_CSV_FILE: &str = "matches.csv";
pub const HISTOGRAM_FILE: &str = "time_diff_histogram.svg";
pub const SCATTER_FILE: &str = "time_vs_distance.svg";
pub const MATCHES_MAP_FILE: &str = "matches_map.html";
pub const FALSE_ALARMS_MAP_FILE: &str = "false_alarms_map.html";
pub const FALSE_ALARMS_GEOJSON_FILE: &str = "false_alarms.geojson";

fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| HotspotError::io(path, e))
}

/// Writes every artifact for `outcome` into `out_dir` and returns the
/// paths written, in order.
pub fn render_all(outcome: &AnalysisOutcome<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| HotspotError::io(out_dir, e))?;
    let mut written = Vec::new();
    let label = &outcome.config.dataset.label;

    let path = out_dir.join(SUMMARY_FILE);
    write_text(&path, &summary::render_summary(outcome))?;
    written.push(path);

    let path = out_dir.join(MATCHES_CSV_FILE);
    let file = File::create(&path).map_err(|e| HotspotError::io(&path, e))?;
    export::write_matches_csv(&outcome.pairs, BufWriter::new(file))?;
    written.push(path);

    let deltas: Vec<f64> = outcome.pairs.iter().map(|p| p.time_diff_minutes()).collect();
    if let Some(hist) = histogram(&deltas, outcome.config.report.histogram_bins) {
        let path = out_dir.join(HISTOGRAM_FILE);
        write_text(&path, &svg::histogram_svg(&hist, label))?;
        written.push(path);

        let points: Vec<(f64, f64)> = outcome
            .pairs
            .iter()
            .map(|p| (p.distance_km(), p.time_diff_minutes()))
            .collect();
        let path = out_dir.join(SCATTER_FILE);
        write_text(&path, &svg::scatter_svg(&points, label))?;
        written.push(path);

        let path = out_dir.join(MATCHES_MAP_FILE);
        write_text(&path, &map::matches_map_html(&outcome.pairs, label)?)?;
        written.push(path);
    }

    if !outcome.false_alarms.is_empty() {
        let path = out_dir.join(FALSE_ALARMS_MAP_FILE);
        write_text(&path, &map::false_alarms_map_html(&outcome.false_alarms, outcome.sites, label)?)?;
        written.push(path);

        let path = out_dir.join(FALSE_ALARMS_GEOJSON_FILE);
        write_text(&path, &export::false_alarms_geojson(&outcome.false_alarms).to_string())?;
        written.push(path);
    }

    info!(dir = %out_dir.display(), files = written.len(), "wrote report artifacts");
    Ok(written)
}
