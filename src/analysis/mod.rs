/// Detection comparison analyses.
///
/// Submodules:
/// - `matching`     - pairs MODIS detections with their nearest VIIRS partner.
/// - `stats`        - time difference distribution and histogram binning.
/// - `false_alarms` - high-confidence detections inside industrial site boxes.
///
/// `analyze` runs all of them over one loaded dataset.

pub mod false_alarms;
pub mod matching;
pub mod stats;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::ingest::firms::LoadedDataset;
use crate::model::{IndustrialSite, MatchedPair};

use false_alarms::{inspect, summarize_by_site, SiteSummary, SuspectedFalseAlarm};
use matching::match_detections;
use stats::DeltaStats;

/// Everything the report renderers need.
#[derive(Debug)]
pub struct AnalysisOutcome<'a> {
    pub config: &'a AnalysisConfig,
    pub dataset: &'a LoadedDataset,
    pub sites: &'a [IndustrialSite],
    pub pairs: Vec<MatchedPair>,
    /// `None` when nothing matched.
    pub stats: Option<DeltaStats>,
    pub false_alarms: Vec<SuspectedFalseAlarm<'a>>,
    pub site_summaries: Vec<SiteSummary>,
}

pub fn analyze<'a>(
    config: &'a AnalysisConfig,
    dataset: &'a LoadedDataset,
    sites: &'a [IndustrialSite],
) -> AnalysisOutcome<'a> {
    let pairs = match_detections(&dataset.detections, &config.matching);
    let stats = DeltaStats::from_pairs(&pairs);
    match &stats {
        Some(s) => info!(pairs = s.count, mean_minutes = s.mean, median_minutes = s.median, "compared detection times"),
        None => info!("no matched pairs"),
    }

    let false_alarms = inspect(&dataset.detections, sites, config.false_alarms.confidence_threshold);
    let site_summaries = summarize_by_site(&false_alarms);
    info!(flagged = false_alarms.len(), sites = site_summaries.len(), "inspected industrial sites");

    AnalysisOutcome {
        config,
        dataset,
        sites,
        pairs,
        stats,
        false_alarms,
        site_summaries,
    }
}
