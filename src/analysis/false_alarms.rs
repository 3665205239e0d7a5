/// Suspected false alarms near industrial heat sources.
///
/// A detection is flagged when its confidence is at or above the configured
/// threshold and it lies inside one of the industrial site boxes. Blast
/// furnaces and slag heaps are hot enough to pass the fire algorithms'
/// contextual tests, so these detections are most likely not fires.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::{Detection, IndustrialSite, Source};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FalseAlarmConfig {
    /// Minimum confidence (percent) for a detection to be flagged.
    pub confidence_threshold: f64,
}

impl Default for FalseAlarmConfig {
    fn default() -> Self {
        Self { confidence_threshold: 80.0 }
    }
}

/// A flagged detection and the site it fell into.
#[derive(Debug, Clone, PartialEq)]
pub struct SuspectedFalseAlarm<'a> {
    pub detection: &'a Detection,
    pub site: &'a IndustrialSite,
}

/// Flags high-confidence detections inside any site box.
///
/// When boxes overlap, the first site in `sites` wins. Detections below
/// `threshold` are never flagged.
pub fn inspect<'a>(
    detections: &'a [Detection],
    sites: &'a [IndustrialSite],
    threshold: f64,
) -> Vec<SuspectedFalseAlarm<'a>> {
    detections
        .iter()
        .filter(|d| d.confidence >= threshold)
        .filter_map(|d| {
            sites
                .iter()
                .find(|s| s.contains(d.latitude, d.longitude))
                .map(|site| SuspectedFalseAlarm { detection: d, site })
        })
        .collect()
}

/// Per-site roll-up of flagged detections.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub site_name: String,
    pub count: usize,
    pub modis_count: usize,
    pub viirs_count: usize,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub mean_confidence: f64,
}

/// Groups flagged detections by site, most frequently flagged first
/// (ties broken by site name).
pub fn summarize_by_site(alarms: &[SuspectedFalseAlarm<'_>]) -> Vec<SiteSummary> {
    let mut grouped: HashMap<&str, Vec<&Detection>> = HashMap::new();
    for alarm in alarms {
        grouped.entry(alarm.site.name.as_str()).or_default().push(alarm.detection);
    }

    let mut summaries: Vec<SiteSummary> = grouped
        .into_iter()
        .filter_map(|(name, detections)| {
            let first_seen = detections.iter().map(|d| d.timestamp).min()?;
            let last_seen = detections.iter().map(|d| d.timestamp).max()?;
            let count = detections.len();
            Some(SiteSummary {
                site_name: name.to_string(),
                count,
                modis_count: detections.iter().filter(|d| d.source == Source::Modis).count(),
                viirs_count: detections.iter().filter(|d| d.source == Source::Viirs).count(),
                first_seen,
                last_seen,
                mean_confidence: detections.iter().map(|d| d.confidence).sum::<f64>() / count as f64,
            })
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.site_name.cmp(&b.site_name)));
    summaries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
