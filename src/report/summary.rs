/// Plain text report.
///
/// The same text is printed to the console and written to `summary.txt`.

use std::fmt;

use crate::analysis::AnalysisOutcome;
use crate::analysis::stats::{histogram, Histogram};
use crate::model::Source;

/// How many skipped-row reasons and flagged detections are listed in full.
const MAX_LISTED: usize = 20;

const BAR_WIDTH: usize = 40;

/// Renders the complete text report.
pub fn render_summary(outcome: &AnalysisOutcome<'_>) -> String {
    Summary(outcome).to_string()
}

struct Summary<'a, 'b>(&'a AnalysisOutcome<'b>);

impl fmt::Display for Summary<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        let title = format!("Fire detection timing: {}", o.config.dataset.label);
        writeln!(f, "{}", title)?;
        writeln!(f, "{}\n", "=".repeat(title.chars().count()))?;

        write_dataset(f, o)?;
        write_matching(f, o)?;
        write_false_alarms(f, o)
    }
}

fn write_dataset(f: &mut fmt::Formatter<'_>, o: &AnalysisOutcome<'_>) -> fmt::Result {
    let ds = o.dataset;
    writeln!(f, "Dataset")?;
    writeln!(f, "  MODIS detections      {:>8}", ds.count(Source::Modis))?;
    writeln!(f, "  VIIRS detections      {:>8}", ds.count(Source::Viirs))?;
    writeln!(f, "  skipped rows          {:>8}", ds.skipped.len())?;
    writeln!(f, "  outside year/region   {:>8}", ds.filtered_out)?;
    for err in ds.skipped.iter().take(MAX_LISTED) {
        writeln!(f, "    {}: {}", err.location(), err.reason)?;
    }
    if ds.skipped.len() > MAX_LISTED {
        writeln!(f, "    ... {} more", ds.skipped.len() - MAX_LISTED)?;
    }
    writeln!(f)
}

fn write_matching(f: &mut fmt::Formatter<'_>, o: &AnalysisOutcome<'_>) -> fmt::Result {
    let m = &o.config.matching;
    writeln!(
        f,
        "Matching (within {:.1} km and ±{} min)",
        m.max_distance_km, m.max_time_window_minutes
    )?;

    let modis_total = o.dataset.count(Source::Modis);
    let Some(stats) = &o.stats else {
        writeln!(f, "  no matched pairs among {} MODIS detections\n", modis_total)?;
        return Ok(());
    };

    let share = 100.0 * stats.count as f64 / modis_total.max(1) as f64;
    writeln!(
        f,
        "  matched pairs         {:>8}  of {} MODIS detections ({:.1}%)\n",
        stats.count, modis_total, share
    )?;

    writeln!(f, "Time difference, MODIS - VIIRS (minutes)")?;
    writeln!(f, "  mean                  {:>8.1}", stats.mean)?;
    writeln!(f, "  median                {:>8.1}", stats.median)?;
    writeln!(f, "  std dev               {:>8.1}", stats.std_dev)?;
    writeln!(f, "  min / max             {:>8.1} / {:.1}", stats.min, stats.max)?;
    writeln!(f, "  q1 / q3 (IQR)         {:>8.1} / {:.1} ({:.1})", stats.q1, stats.q3, stats.iqr())?;
    writeln!(f, "  MODIS earlier         {:>8}", stats.modis_earlier)?;
    writeln!(f, "  VIIRS earlier         {:>8}", stats.viirs_earlier)?;
    writeln!(f, "  simultaneous          {:>8}", stats.simultaneous)?;
    writeln!(f, "  mean distance (km)    {:>8.2}", stats.mean_distance_km)?;
    writeln!(f, "  median distance (km)  {:>8.2}\n", stats.median_distance_km)?;

    let deltas: Vec<f64> = o.pairs.iter().map(|p| p.time_diff_minutes()).collect();
    if let Some(hist) = histogram(&deltas, o.config.report.histogram_bins) {
        writeln!(f, "Histogram (negative = MODIS earlier, positive = VIIRS earlier)")?;
        f.write_str(&ascii_histogram(&hist))?;
        writeln!(f)?;
    }
    Ok(())
}

fn write_false_alarms(f: &mut fmt::Formatter<'_>, o: &AnalysisOutcome<'_>) -> fmt::Result {
    let threshold = o.config.false_alarms.confidence_threshold;
    writeln!(
        f,
        "Suspected false alarms (confidence >= {:.0}, {} industrial sites)",
        threshold,
        o.sites.len()
    )?;

    if o.false_alarms.is_empty() {
        return writeln!(f, "  no suspected false alarms");
    }

    writeln!(
        f,
        "  {:<32} {:>6} {:>6} {:>6}  {:<16}  {:<16}  {:>5}",
        "site", "count", "MODIS", "VIIRS", "first", "last", "conf"
    )?;
    for s in &o.site_summaries {
        writeln!(
            f,
            "  {:<32} {:>6} {:>6} {:>6}  {:<16}  {:<16}  {:>5.1}",
            s.site_name,
            s.count,
            s.modis_count,
            s.viirs_count,
            s.first_seen.format("%Y-%m-%d %H:%M"),
            s.last_seen.format("%Y-%m-%d %H:%M"),
            s.mean_confidence
        )?;
    }

    writeln!(f)?;
    writeln!(
        f,
        "  {:<16}  {:<5} {:>9} {:>9} {:>5}  site",
        "time (UTC)", "src", "lat", "lon", "conf"
    )?;
    for alarm in o.false_alarms.iter().take(MAX_LISTED) {
        let d = alarm.detection;
        writeln!(
            f,
            "  {:<16}  {:<5} {:>9.4} {:>9.4} {:>5.0}  {}",
            d.timestamp.format("%Y-%m-%d %H:%M"),
            d.source,
            d.latitude,
            d.longitude,
            d.confidence,
            alarm.site.name
        )?;
    }
    if o.false_alarms.len() > MAX_LISTED {
        writeln!(f, "  ... {} more", o.false_alarms.len() - MAX_LISTED)?;
    }
    Ok(())
}

/// One line per bin: `[lower, upper)  ####### count`.
pub fn ascii_histogram(hist: &Histogram) -> String {
    let max = hist.max_count().max(1);
    let mut out = String::new();
    for (i, count) in hist.counts.iter().enumerate() {
        let (lower, upper) = hist.bin_edges(i);
        let bar = "#".repeat(count * BAR_WIDTH / max);
        out.push_str(&format!("  [{:>8.1}, {:>8.1})  {:<width$} {}\n", lower, upper, bar, count, width = BAR_WIDTH));
    }
    out
}
