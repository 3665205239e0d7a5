/// Analysis configuration loader - parses analysis.toml
///
/// Keeps the dataset label, matching tolerances, the false alarm threshold
/// and the industrial site list out of the code, so a different year or
/// region can be analyzed without recompiling.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::analysis::false_alarms::FalseAlarmConfig;
use crate::analysis::matching::{MatchConfig, MAX_TIME_WINDOW_MINUTES};
use crate::error::{config_error, HotspotError, Result};
use crate::model::{BoundingBox, IndustrialSite};
use crate::report::ReportConfig;
use crate::sites::builtin_sites;

/// Upper bound for `histogram_bins`.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "analysis.toml";

/// What the input files cover.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Used in report headings, e.g. "Germany 2023".
    pub label: String,
    /// Keep only detections acquired in this year.
    pub year: Option<i32>,
    /// Keep only detections inside this box.
    pub region: Option<BoundingBox>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            label: "MODIS vs. VIIRS".to_string(),
            year: None,
            region: None,
        }
    }
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub dataset: DatasetConfig,
    pub matching: MatchConfig,
    pub false_alarms: FalseAlarmConfig,
    pub report: ReportConfig,

    /// `[[site]]` entries. Empty means: use the built-in registry.
    #[serde(rename = "site")]
    pub sites: Vec<IndustrialSite>,
}

impl AnalysisConfig {
    /// Configured industrial sites, falling back to `sites::SITE_REGISTRY`.
    pub fn sites(&self) -> Vec<IndustrialSite> {
        if self.sites.is_empty() {
            builtin_sites()
        } else {
            self.sites.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.matching;
        if !(m.max_distance_km > 0.0) {
            return Err(config_error(format!("max_distance_km must be positive, got {}", m.max_distance_km)));
        }
        if !(1..=MAX_TIME_WINDOW_MINUTES).contains(&m.max_time_window_minutes) {
            return Err(config_error(format!(
                "max_time_window_minutes must be within 1..={}, got {}",
                MAX_TIME_WINDOW_MINUTES, m.max_time_window_minutes
            )));
        }

        let threshold = self.false_alarms.confidence_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(config_error(format!("confidence_threshold {} outside 0..=100", threshold)));
        }

        if !(1..=MAX_HISTOGRAM_BINS).contains(&self.report.histogram_bins) {
            return Err(config_error(format!(
                "histogram_bins must be within 1..={}, got {}",
                MAX_HISTOGRAM_BINS, self.report.histogram_bins
            )));
        }

        if let Some(region) = &self.dataset.region {
            region.validate().map_err(|e| config_error(format!("dataset region: {}", e)))?;
        }
        for site in &self.sites {
            site.validate().map_err(config_error)?;
        }
        Ok(())
    }
}

/// Loads and validates a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| HotspotError::io(path, e))?;
    let config = parse_config(&contents).map_err(|e| match e {
        HotspotError::Toml { source, .. } => HotspotError::Toml { path: path.to_path_buf(), source },
        other => other,
    })?;
    info!(file = %path.display(), sites = config.sites().len(), "loaded configuration");
    Ok(config)
}

/// Parses and validates configuration text.
pub fn parse_config(contents: &str) -> Result<AnalysisConfig> {
    let config: AnalysisConfig = toml::from_str(contents)
        .map_err(|source| HotspotError::Toml { path: DEFAULT_CONFIG_PATH.into(), source })?;
    config.validate()?;
    Ok(config)
}

/// Loads `analysis.toml` from the working directory, or the defaults if
/// there is no such file.
pub fn load_config_default() -> Result<AnalysisConfig> {
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        info!("no {} found, using defaults", DEFAULT_CONFIG_PATH);
        Ok(AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [dataset]
        label = "Germany 2023"
        year = 2023
        region = { south = 47.2, west = 5.8, north = 55.1, east = 15.1 }

        [matching]
        max_distance_km = 2.5
        max_time_window_minutes = 45

        [false_alarms]
        confidence_threshold = 70

        [report]
        output_dir = "out"
        histogram_bins = 20

        [[site]]
        name = "Duisburg steel works"
        south = 51.35
        west = 6.68
        north = 51.52
        east = 6.80
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).expect("sample should parse");

        assert_eq!(config.dataset.label, "Germany 2023");
        assert_eq!(config.dataset.year, Some(2023));
        assert_eq!(config.dataset.region.map(|r| r.north), Some(55.1));
        assert_eq!(config.matching.max_distance_km, 2.5);
        assert_eq!(config.matching.max_time_window_minutes, 45);
        assert_eq!(config.false_alarms.confidence_threshold, 70.0);
        assert_eq!(config.report.output_dir, std::path::PathBuf::from("out"));
        assert_eq!(config.report.histogram_bins, 20);
        assert_eq!(config.sites().len(), 1);
        assert!(config.sites()[0].description.is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults_and_builtin_sites() {
        let config = parse_config("").expect("empty config is valid");
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.matching, MatchConfig::default());
        assert_eq!(config.sites().len(), crate::sites::SITE_REGISTRY.len());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[matching]\nmax_distance_km = 1.0\n").unwrap();
        assert_eq!(config.matching.max_distance_km, 1.0);
        assert_eq!(config.matching.max_time_window_minutes, 60);
    }

    #[test]
    fn test_rejects_non_positive_distance() {
        let err = parse_config("[matching]\nmax_distance_km = 0.0\n").unwrap_err();
        assert!(matches!(err, HotspotError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_oversized_time_window() {
        let err = parse_config("[matching]\nmax_time_window_minutes = 1000000000000\n").unwrap_err();
        assert!(matches!(err, HotspotError::InvalidConfig(_)));
        assert!(parse_config("[matching]\nmax_time_window_minutes = -5\n").is_err());

        let one_year = format!("[matching]\nmax_time_window_minutes = {}\n", MAX_TIME_WINDOW_MINUTES);
        assert!(parse_config(&one_year).is_ok());
    }

    #[test]
    fn test_rejects_histogram_bins_out_of_range() {
        let err = parse_config("[report]\nhistogram_bins = 1000000000000\n").unwrap_err();
        assert!(matches!(err, HotspotError::InvalidConfig(_)));
        assert!(parse_config("[report]\nhistogram_bins = 0\n").is_err());
        assert!(parse_config("[report]\nhistogram_bins = 1000\n").is_ok());
    }

    #[test]
    fn test_rejects_threshold_above_100() {
        assert!(parse_config("[false_alarms]\nconfidence_threshold = 101\n").is_err());
    }

    #[test]
    fn test_rejects_inverted_site_box() {
        let text = "[[site]]\nname = \"x\"\nsouth = 52.0\nwest = 6.0\nnorth = 51.0\neast = 7.0\n";
        assert!(parse_config(text).is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(parse_config("[matching"), Err(HotspotError::Toml { .. })));
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/analysis.toml");
        let config = load_config(path).expect("analysis.toml should load");
        assert!(config.sites().iter().any(|s| s.name.contains("Dillingen")));
    }
}
