/// Pairing of MODIS and VIIRS detections.
///
/// For each MODIS detection the nearest VIIRS detection within the spatial
/// tolerance and the time window becomes its partner. Ranking among
/// candidates is:
///
/// 1. great-circle distance (smaller wins)
/// 2. absolute time difference (smaller wins)
/// 3. input position `(file, line)` of the VIIRS detection (earlier wins)
///
/// MODIS detections without any candidate are dropped. A VIIRS detection can
/// be the partner of several MODIS detections; the comparison is about how
/// early each MODIS observation was seen by the other instrument, not about
/// building a one-to-one assignment.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use geo::{Distance, Haversine};
use serde::Deserialize;
use tracing::debug;

use crate::model::{Detection, MatchedPair, Source};

/// Matching tolerances.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum great-circle distance between partners, inclusive.
    pub max_distance_km: f64,

    /// Maximum absolute time difference between partners, inclusive.
    pub max_time_window_minutes: i64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_distance_km: 5.0,
            max_time_window_minutes: 60,
        }
    }
}

/// Upper bound for `max_time_window_minutes`: one leap year.
pub const MAX_TIME_WINDOW_MINUTES: i64 = 366 * 24 * 60;

impl MatchConfig {
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn max_time_window(&self) -> Duration {
        Duration::try_minutes(self.max_time_window_minutes).unwrap_or(Duration::MAX)
    }
}

/// Great-circle distance between two detections in kilometres.
pub fn distance_km(a: &Detection, b: &Detection) -> f64 {
    Haversine::distance(a.point(), b.point()) / 1000.0
}

struct Candidate<'a> {
    viirs: &'a Detection,
    distance_km: f64,
    abs_dt_ms: i64,
}

impl Candidate<'_> {
    fn rank(&self, other: &Candidate<'_>) -> Ordering {
        self.distance_km
            .total_cmp(&other.distance_km)
            .then(self.abs_dt_ms.cmp(&other.abs_dt_ms))
            .then(self.viirs.input_position().cmp(&other.viirs.input_position()))
    }
}

/// Pairs every MODIS detection with its nearest VIIRS detection.
///
/// The returned pairs follow the input order of the MODIS detections.
pub fn match_detections(detections: &[Detection], config: &MatchConfig) -> Vec<MatchedPair> {
    let mut viirs: Vec<&Detection> = detections
        .iter()
        .filter(|d| d.source == Source::Viirs)
        .collect();
    viirs.sort_by_key(|d| (d.timestamp, d.input_position()));

    let window = config.max_time_window();
    let mut pairs = Vec::new();

    for modis in detections.iter().filter(|d| d.source == Source::Modis) {
        let earliest = modis.timestamp.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let latest = modis.timestamp.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let lo = viirs.partition_point(|v| v.timestamp < earliest);
        let hi = viirs.partition_point(|v| v.timestamp <= latest);

        let mut best: Option<Candidate> = None;
        for v in viirs.get(lo..hi).unwrap_or_default() {
            let dist = distance_km(modis, v);
            if dist > config.max_distance_km {
                continue;
            }
            let candidate = Candidate {
                viirs: v,
                distance_km: dist,
                abs_dt_ms: modis.timestamp.signed_duration_since(v.timestamp).num_milliseconds().abs(),
            };
            let better = match &best {
                Some(b) => candidate.rank(b) == Ordering::Less,
                None => true,
            };
            if better {
                best = Some(candidate);
            }
        }

        if let Some(b) = best {
            debug!(
                modis_line = modis.line,
                viirs_line = b.viirs.line,
                distance_km = b.distance_km,
                "matched detection"
            );
            if let Some(pair) = MatchedPair::new(modis.clone(), b.viirs.clone(), b.distance_km) {
                pairs.push(pair);
            }
        }
    }

    pairs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::detection;

    fn with_line(mut d: Detection, line: u64) -> Detection {
        d.line = line;
        d
    }

    #[test]
    fn test_reference_pair_has_three_minute_delta() {
        let detections = vec![
            detection(Source::Modis, 51.43, 6.76, 12, 0, 90.0),
            detection(Source::Viirs, 51.43, 6.76, 12, 3, 85.0),
        ];
        let pairs = match_detections(&detections, &MatchConfig::default());

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].time_diff_minutes(), -3.0);
        assert_eq!(pairs[0].time_diff_minutes().abs(), 3.0);
        assert!(pairs[0].distance_km() < 1e-9);
    }

    #[test]
    fn test_pairs_always_mix_sources() {
        let detections = vec![
            detection(Source::Modis, 51.00, 7.00, 10, 0, 80.0),
            detection(Source::Modis, 51.01, 7.00, 10, 5, 80.0),
            detection(Source::Viirs, 51.00, 7.01, 10, 20, 55.0),
            detection(Source::Viirs, 51.02, 7.00, 10, 30, 90.0),
        ];
        let pairs = match_detections(&detections, &MatchConfig::default());

        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            assert_eq!(pair.modis().source, Source::Modis);
            assert_eq!(pair.viirs().source, Source::Viirs);
        }
    }

    #[test]
    fn test_nearest_in_space_wins_over_nearest_in_time() {
        let detections = vec![
            detection(Source::Modis, 50.000, 8.000, 12, 0, 90.0),
            // ~2.2 km away but only one minute apart
            with_line(detection(Source::Viirs, 50.020, 8.000, 12, 1, 90.0), 3),
            // ~0.1 km away but 40 minutes apart
            with_line(detection(Source::Viirs, 50.001, 8.000, 12, 40, 90.0), 4),
        ];
        let pairs = match_detections(&detections, &MatchConfig::default());

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].viirs().line, 4);
    }

    #[test]
    fn test_equal_distance_breaks_tie_on_time() {
        let detections = vec![
            detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0),
            with_line(detection(Source::Viirs, 50.0, 8.0, 12, 30, 90.0), 3),
            with_line(detection(Source::Viirs, 50.0, 8.0, 11, 50, 90.0), 4),
        ];
        let pairs = match_detections(&detections, &MatchConfig::default());

        assert_eq!(pairs[0].viirs().line, 4);
        assert_eq!(pairs[0].time_diff_minutes(), 10.0);
    }

    #[test]
    fn test_full_tie_prefers_earlier_input_line() {
        let detections = vec![
            detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0),
            with_line(detection(Source::Viirs, 50.0, 8.0, 12, 10, 90.0), 7),
            with_line(detection(Source::Viirs, 50.0, 8.0, 11, 50, 90.0), 5),
        ];
        let pairs = match_detections(&detections, &MatchConfig::default());

        assert_eq!(pairs[0].viirs().line, 5);
    }

    #[test]
    fn test_candidates_outside_tolerances_are_excluded() {
        let config = MatchConfig { max_distance_km: 1.0, max_time_window_minutes: 30 };
        let detections = vec![
            detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0),
            // close in space, too late
            detection(Source::Viirs, 50.0, 8.0, 12, 31, 90.0),
            // in time, ~11 km away
            detection(Source::Viirs, 50.1, 8.0, 12, 0, 90.0),
        ];
        assert!(match_detections(&detections, &config).is_empty());
    }

    #[test]
    fn test_time_window_bound_is_inclusive() {
        let config = MatchConfig { max_distance_km: 1.0, max_time_window_minutes: 30 };
        let detections = vec![
            detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0),
            detection(Source::Viirs, 50.0, 8.0, 11, 30, 90.0),
        ];
        let pairs = match_detections(&detections, &config);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].time_diff_minutes(), 30.0);
    }

    #[test]
    fn test_distance_bound_is_inclusive() {
        let modis = detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0);
        let viirs = detection(Source::Viirs, 50.03, 8.0, 12, 5, 90.0);
        let exact = distance_km(&modis, &viirs);
        let detections = vec![modis, viirs];

        let at_bound = MatchConfig { max_distance_km: exact, max_time_window_minutes: 30 };
        let pairs = match_detections(&detections, &at_bound);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].distance_km(), exact);

        let just_inside = MatchConfig { max_distance_km: exact - 1e-6, max_time_window_minutes: 30 };
        assert!(match_detections(&detections, &just_inside).is_empty());
    }

    #[test]
    fn test_oversized_window_does_not_overflow() {
        let detections = vec![
            detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0),
            detection(Source::Viirs, 50.0, 8.0, 12, 3, 90.0),
        ];
        for minutes in [1_000_000_000_000, 1_000_000_000_000_000, i64::MAX] {
            let config = MatchConfig { max_distance_km: 1.0, max_time_window_minutes: minutes };
            assert_eq!(match_detections(&detections, &config).len(), 1, "window {minutes}");
        }
    }

    #[test]
    fn test_negative_window_matches_nothing() {
        let config = MatchConfig { max_distance_km: 1.0, max_time_window_minutes: -10 };
        let detections = vec![
            detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0),
            detection(Source::Viirs, 50.0, 8.0, 12, 3, 90.0),
        ];
        assert!(match_detections(&detections, &config).is_empty());
    }

    #[test]
    fn test_tie_on_line_prefers_earlier_file() {
        let mut second_file = with_line(detection(Source::Viirs, 50.0, 8.0, 12, 10, 90.0), 2);
        second_file.file = 2;
        let mut first_file = with_line(detection(Source::Viirs, 50.0, 8.0, 11, 50, 90.0), 5);
        first_file.file = 1;
        let detections = vec![detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0), second_file, first_file];

        let pairs = match_detections(&detections, &MatchConfig::default());
        assert_eq!(pairs[0].viirs().input_position(), (1, 5));
    }

    #[test]
    fn test_viirs_may_serve_several_modis_detections() {
        let detections = vec![
            detection(Source::Modis, 50.000, 8.000, 12, 0, 90.0),
            detection(Source::Modis, 50.001, 8.000, 12, 2, 90.0),
            detection(Source::Viirs, 50.0005, 8.000, 12, 5, 90.0),
        ];
        let pairs = match_detections(&detections, &MatchConfig::default());
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].viirs(), pairs[1].viirs());
    }

    #[test]
    fn test_single_source_input_produces_no_pairs() {
        let detections = vec![
            detection(Source::Viirs, 50.0, 8.0, 12, 0, 90.0),
            detection(Source::Viirs, 50.0, 8.0, 12, 5, 90.0),
        ];
        assert!(match_detections(&detections, &MatchConfig::default()).is_empty());
        assert!(match_detections(&[], &MatchConfig::default()).is_empty());
    }

    #[test]
    fn test_distance_is_roughly_111_km_per_degree_latitude() {
        let a = detection(Source::Modis, 50.0, 8.0, 12, 0, 90.0);
        let b = detection(Source::Viirs, 51.0, 8.0, 12, 0, 90.0);
        let d = distance_km(&a, &b);
        assert!((d - 111.2).abs() < 0.5, "got {d} km");
    }
}
