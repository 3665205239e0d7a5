/// FIRMS detection CSV loader.
///
/// Reads both the per-instrument archive files as downloaded from
/// https://firms.modaps.eosdis.nasa.gov/download/ and normalized tables with
/// an explicit `source` column. Columns are located by header name, so
/// their order does not matter and unknown columns are ignored.
///
/// Accepted headers (case-insensitive):
/// - source:     `source`, `instrument`
/// - latitude:   `latitude`, `lat`
/// - longitude:  `longitude`, `lon`
/// - time:       `acq_datetime`, `timestamp` - or `acq_date` + `acq_time` (HHMM, UTC)
/// - confidence: `confidence`
/// - optional:   `brightness` / `bright_ti4` (K), `frp` (MW)
///
/// A missing required column fails the whole file. A bad value in a row only
/// skips that row; the reason is logged and returned in
/// `LoadedDataset::skipped`.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::error::{HotspotError, MalformedRecordError, Result};
use crate::model::{parse_confidence, BoundingBox, Detection, Source};

// ---------------------------------------------------------------------------
// Loaded dataset
// ---------------------------------------------------------------------------

/// Detections read from one or more files plus what was dropped on the way.
#[derive(Debug, Default)]
pub struct LoadedDataset {
    pub detections: Vec<Detection>,
    pub skipped: Vec<MalformedRecordError>,
    /// Valid detections removed by `retain_within`.
    pub filtered_out: usize,
}

impl LoadedDataset {
    pub fn count(&self, source: Source) -> usize {
        self.detections.iter().filter(|d| d.source == source).count()
    }

    /// Appends another file's detections (FIRMS ships one file per instrument).
    pub fn merge(&mut self, other: LoadedDataset) {
        self.detections.extend(other.detections);
        self.skipped.extend(other.skipped);
        self.filtered_out += other.filtered_out;
    }

    /// Drops detections outside the given acquisition year and/or region.
    pub fn retain_within(&mut self, year: Option<i32>, region: Option<&BoundingBox>) {
        let before = self.detections.len();
        self.detections.retain(|d| {
            year.is_none_or(|y| d.timestamp.year() == y)
                && region.is_none_or(|r| r.contains(d.latitude, d.longitude))
        });
        self.filtered_out += before - self.detections.len();
    }
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

enum TimeColumns {
    Combined(usize),
    Split { date: usize, time: usize },
}

struct Columns {
    source: usize,
    latitude: usize,
    longitude: usize,
    time: TimeColumns,
    confidence: usize,
    brightness: Option<usize>,
    frp: Option<usize>,
}

fn find(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

fn require(headers: &StringRecord, names: &[&'static str]) -> Result<usize> {
    find(headers, names).ok_or(HotspotError::MissingColumn(names[0]))
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let time = match find(headers, &["acq_datetime", "timestamp"]) {
            Some(idx) => TimeColumns::Combined(idx),
            None => TimeColumns::Split {
                date: require(headers, &["acq_date"])?,
                time: require(headers, &["acq_time"])?,
            },
        };

        Ok(Columns {
            source: require(headers, &["source", "instrument"])?,
            latitude: require(headers, &["latitude", "lat"])?,
            longitude: require(headers, &["longitude", "lon"])?,
            time,
            confidence: require(headers, &["confidence"])?,
            brightness: find(headers, &["brightness", "bright_ti4"]),
            frp: find(headers, &["frp"]),
        })
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

fn field<'r>(record: &'r StringRecord, idx: usize, name: &str) -> std::result::Result<&'r str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing {}", name))
}

fn parse_coordinate(s: &str, name: &str, limit: f64) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("invalid {} '{}'", name, s))?;
    if !(-limit..=limit).contains(&value) {
        return Err(format!("{} {} outside -{}..={}", name, value, limit, limit));
    }
    Ok(value)
}

/// RFC 3339, or a naive `YYYY-MM-DD[ T]HH:MM[:SS]` taken as UTC.
pub fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    const FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}'", s))
}

/// FIRMS `acq_time`: UTC `HHMM` with leading zeros dropped (`945` = 09:45).
/// `HH:MM` is accepted as well.
pub fn parse_acq_time(s: &str) -> std::result::Result<NaiveTime, String> {
    let invalid = || format!("invalid acq_time '{}'", s);

    if s.contains(':') {
        return NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| invalid());
    }
    if s.len() > 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hhmm: u32 = s.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hhmm / 100, hhmm % 100, 0).ok_or_else(invalid)
}

fn parse_optional(record: &StringRecord, idx: Option<usize>) -> Option<f64> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn parse_record(record: &StringRecord, cols: &Columns, line: u64) -> std::result::Result<Detection, String> {
    let source: Source = field(record, cols.source, "source")?.parse()?;
    let latitude = parse_coordinate(field(record, cols.latitude, "latitude")?, "latitude", 90.0)?;
    let longitude = parse_coordinate(field(record, cols.longitude, "longitude")?, "longitude", 180.0)?;

    let timestamp = match cols.time {
        TimeColumns::Combined(idx) => parse_timestamp(field(record, idx, "timestamp")?)?,
        TimeColumns::Split { date, time } => {
            let date_str = field(record, date, "acq_date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|_| format!("invalid acq_date '{}'", date_str))?;
            let time = parse_acq_time(field(record, time, "acq_time")?)?;
            date.and_time(time).and_utc()
        }
    };

    let confidence = parse_confidence(field(record, cols.confidence, "confidence")?)?;

    Ok(Detection {
        source,
        latitude,
        longitude,
        timestamp,
        confidence,
        brightness: parse_optional(record, cols.brightness),
        frp: parse_optional(record, cols.frp),
        file: 0,
        line,
    })
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses detection CSV from any reader.
pub fn parse_detections<R: io::Read>(reader: R) -> Result<LoadedDataset> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let cols = Columns::from_headers(&headers)?;

    let mut dataset = LoadedDataset::default();
    for (idx, result) in csv_reader.records().enumerate() {
        // header is line 1
        let fallback_line = idx as u64 + 2;
        let outcome = match result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |p| p.line());
                parse_record(&record, &cols, line).map_err(|reason| MalformedRecordError::new(line, reason))
            }
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                Err(MalformedRecordError::new(line, e.to_string()))
            }
        };

        match outcome {
            Ok(detection) => dataset.detections.push(detection),
            Err(err) => {
                warn!(line = err.line, reason = %err.reason, "skipping malformed record");
                dataset.skipped.push(err);
            }
        }
    }

    Ok(dataset)
}

pub fn parse_detections_str(text: &str) -> Result<LoadedDataset> {
    parse_detections(text.as_bytes())
}

/// Loads one detection file from disk.
pub fn load_file(path: impl AsRef<Path>) -> Result<LoadedDataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| HotspotError::io(path, e))?;
    let mut dataset = parse_detections(io::BufReader::new(file))?;
    for err in &mut dataset.skipped {
        err.file = Some(path.to_path_buf());
    }

    info!(
        file = %path.display(),
        modis = dataset.count(Source::Modis),
        viirs = dataset.count(Source::Viirs),
        skipped = dataset.skipped.len(),
        "loaded detections"
    );
    Ok(dataset)
}

/// Loads and merges several files in the given order. Each detection is
/// tagged with the index of its file so `(file, line)` follows input order
/// across the merged set.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedDataset> {
    let mut dataset = LoadedDataset::default();
    for (idx, path) in paths.iter().enumerate() {
        let mut loaded = load_file(path)?;
        let file = u32::try_from(idx).unwrap_or(u32::MAX);
        for d in &mut loaded.detections {
            d.file = file;
        }
        dataset.merge(loaded);
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
