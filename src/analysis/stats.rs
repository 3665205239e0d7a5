/// Distribution of detection-time differences across matched pairs.
///
/// All values are minutes with the MODIS − VIIRS sign convention: a negative
/// difference means MODIS observed the fire first.

use crate::model::MatchedPair;

#[derive(Debug, Clone, PartialEq)]
pub struct DeltaStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    pub modis_earlier: usize,
    pub viirs_earlier: usize,
    pub simultaneous: usize,
    pub mean_distance_km: f64,
    pub median_distance_km: f64,
}

impl DeltaStats {
    /// Returns `None` for an empty set of pairs.
    pub fn from_pairs(pairs: &[MatchedPair]) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }

        let mut deltas: Vec<f64> = pairs.iter().map(|p| p.time_diff_minutes()).collect();
        deltas.sort_by(f64::total_cmp);
        let mut distances: Vec<f64> = pairs.iter().map(|p| p.distance_km()).collect();
        distances.sort_by(f64::total_cmp);

        let count = deltas.len();
        let mean = deltas.iter().sum::<f64>() / count as f64;
        let variance = deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / count as f64;

        Some(DeltaStats {
            count,
            mean,
            median: quantile(&deltas, 0.5),
            std_dev: variance.sqrt(),
            min: deltas[0],
            max: deltas[count - 1],
            q1: quantile(&deltas, 0.25),
            q3: quantile(&deltas, 0.75),
            modis_earlier: deltas.iter().filter(|d| **d < 0.0).count(),
            viirs_earlier: deltas.iter().filter(|d| **d > 0.0).count(),
            simultaneous: deltas.iter().filter(|d| **d == 0.0).count(),
            mean_distance_km: distances.iter().sum::<f64>() / count as f64,
            median_distance_km: quantile(&distances, 0.5),
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Linear-interpolation quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram over `[start, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.counts.len() as f64
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(lower, upper)` edges of bin `i`.
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let lower = self.start + self.bin_width * i as f64;
        (lower, lower + self.bin_width)
    }
}

/// Bins `values` into `bins` equal-width buckets spanning their range.
///
/// The maximum value lands in the last bin. When all values are equal a
/// single unit-width range centred on the value is used. Returns `None`
/// for empty input or zero bins.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (start, span) = if max > min { (min, max - min) } else { (min - 0.5, 1.0) };
    let bin_width = span / bins as f64;

    let mut counts = vec![0; bins];
    for v in values {
        let idx = (((v - start) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { start, bin_width, counts })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
