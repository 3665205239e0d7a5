/// Machine-readable exports: matched pairs as CSV and suspected false
/// alarms as a GeoJSON feature collection.

use std::io;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;

use crate::analysis::false_alarms::SuspectedFalseAlarm;
use crate::error::Result;
use crate::model::MatchedPair;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One row of `matches.csv`.
#[derive(Debug, Serialize)]
struct MatchRow {
    modis_latitude: f64,
    modis_longitude: f64,
    modis_time: String,
    modis_confidence: f64,
    modis_brightness: Option<f64>,
    viirs_latitude: f64,
    viirs_longitude: f64,
    viirs_time: String,
    viirs_confidence: f64,
    viirs_brightness: Option<f64>,
    distance_km: f64,
    time_diff_minutes: f64,
}

impl From<&MatchedPair> for MatchRow {
    fn from(p: &MatchedPair) -> Self {
        let (m, v) = (p.modis(), p.viirs());
        MatchRow {
            modis_latitude: m.latitude,
            modis_longitude: m.longitude,
            modis_time: m.timestamp.format(TIME_FORMAT).to_string(),
            modis_confidence: m.confidence,
            modis_brightness: m.brightness,
            viirs_latitude: v.latitude,
            viirs_longitude: v.longitude,
            viirs_time: v.timestamp.format(TIME_FORMAT).to_string(),
            viirs_confidence: v.confidence,
            viirs_brightness: v.brightness,
            distance_km: p.distance_km(),
            time_diff_minutes: p.time_diff_minutes(),
        }
    }
}

/// Writes matched pairs as CSV with a header row. Missing brightness
/// values are written as empty fields.
pub fn write_matches_csv<W: io::Write>(pairs: &[MatchedPair], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    if pairs.is_empty() {
        // serialize() only emits the header along with the first record
        wtr.write_record([
            "modis_latitude",
            "modis_longitude",
            "modis_time",
            "modis_confidence",
            "modis_brightness",
            "viirs_latitude",
            "viirs_longitude",
            "viirs_time",
            "viirs_confidence",
            "viirs_brightness",
            "distance_km",
            "time_diff_minutes",
        ])?;
    }
    for pair in pairs {
        wtr.serialize(MatchRow::from(pair))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// One point feature per flagged detection.
pub fn false_alarms_geojson(alarms: &[SuspectedFalseAlarm<'_>]) -> FeatureCollection {
    let features = alarms
        .iter()
        .map(|a| {
            let d = a.detection;
            let mut properties = JsonObject::new();
            properties.insert("site".to_string(), json!(a.site.name));
            properties.insert("source".to_string(), json!(d.source.as_str()));
            properties.insert("time".to_string(), json!(d.timestamp.format(TIME_FORMAT).to_string()));
            properties.insert("confidence".to_string(), json!(d.confidence));
            properties.insert("brightness".to_string(), json!(d.brightness));
            properties.insert("frp".to_string(), json!(d.frp));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![d.longitude, d.latitude]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}
