/// Shared data types for the detection comparison.
///
/// `Detection` is what the loader produces and everything downstream
/// consumes. `MatchedPair` and `IndustrialSite` are the two derived /
/// reference types the analyses are built on.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use geo::{Coord, Intersects, Point, Rect};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Instrument source
// ---------------------------------------------------------------------------

/// The satellite instrument a detection was reported by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    Modis,
    Viirs,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Modis => "MODIS",
            Source::Viirs => "VIIRS",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    /// Accepts the bare instrument names as well as FIRMS product names
    /// such as `VIIRS_SNPP_SP` or `MODIS_Aqua`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper.starts_with("MODIS") {
            Ok(Source::Modis)
        } else if upper.starts_with("VIIRS") {
            Ok(Source::Viirs)
        } else {
            Err(format!("unknown instrument source '{}'", s.trim()))
        }
    }
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Representative percentages for the VIIRS confidence classes.
pub const CONFIDENCE_LOW: f64 = 15.0;
pub const CONFIDENCE_NOMINAL: f64 = 55.0;
pub const CONFIDENCE_HIGH: f64 = 90.0;

/// Parses a confidence value into a percentage in `[0, 100]`.
///
/// MODIS archives report a numeric percentage, VIIRS archives a class
/// letter (`l`, `n`, `h`). Both end up on the same scale so a single
/// threshold applies to either instrument.
pub fn parse_confidence(s: &str) -> Result<f64, String> {
    let s = s.trim();
    let value = match s.to_ascii_lowercase().as_str() {
        "l" | "low" => CONFIDENCE_LOW,
        "n" | "nominal" => CONFIDENCE_NOMINAL,
        "h" | "high" => CONFIDENCE_HIGH,
        other => other
            .parse::<f64>()
            .map_err(|_| format!("invalid confidence '{}'", s))?,
    };

    if !(0.0..=100.0).contains(&value) {
        return Err(format!("confidence {} outside 0..=100", value));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// A single thermal anomaly detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub source: Source,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    /// Percentage in `[0, 100]`, see `parse_confidence`.
    pub confidence: f64,
    /// Brightness temperature in Kelvin, if the archive provides it.
    pub brightness: Option<f64>,
    /// Fire radiative power in MW, if the archive provides it.
    pub frp: Option<f64>,
    /// Index of the input file in load order.
    pub file: u32,
    /// 1-based line in the input file.
    pub line: u64,
}

impl Detection {
    /// Position as a `geo` point (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// `(file, line)`, ordering detections by their position in the input.
    pub fn input_position(&self) -> (u32, u64) {
        (self.file, self.line)
    }
}

// ---------------------------------------------------------------------------
// Matched pair
// ---------------------------------------------------------------------------

/// One MODIS and one VIIRS detection judged to observe the same fire.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair {
    modis: Detection,
    viirs: Detection,
    distance_km: f64,
}

impl MatchedPair {
    /// Builds a pair from two detections in either order. Returns `None`
    /// unless exactly one of them is MODIS and the other VIIRS.
    pub fn new(a: Detection, b: Detection, distance_km: f64) -> Option<Self> {
        match (a.source, b.source) {
            (Source::Modis, Source::Viirs) => Some(MatchedPair { modis: a, viirs: b, distance_km }),
            (Source::Viirs, Source::Modis) => Some(MatchedPair { modis: b, viirs: a, distance_km }),
            _ => None,
        }
    }

    pub fn modis(&self) -> &Detection {
        &self.modis
    }

    pub fn viirs(&self) -> &Detection {
        &self.viirs
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// MODIS time minus VIIRS time. Negative means MODIS saw it first.
    pub fn time_diff(&self) -> Duration {
        self.modis.timestamp.signed_duration_since(self.viirs.timestamp)
    }

    pub fn time_diff_minutes(&self) -> f64 {
        self.time_diff().num_seconds() as f64 / 60.0
    }
}

// ---------------------------------------------------------------------------
// Bounding boxes and industrial sites
// ---------------------------------------------------------------------------

/// An axis-aligned lat/lon box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.west, y: self.south },
            Coord { x: self.east, y: self.north },
        )
    }

    /// Inclusive of the box edges.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.rect().intersects(&Coord { x: longitude, y: latitude })
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.south) || !(-90.0..=90.0).contains(&self.north) {
            return Err("latitude outside -90..=90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.west) || !(-180.0..=180.0).contains(&self.east) {
            return Err("longitude outside -180..=180".to_string());
        }
        if self.south > self.north || self.west > self.east {
            return Err("box corners are inverted".to_string());
        }
        Ok(())
    }
}

/// A named box around a known industrial heat source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustrialSite {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub bounds: BoundingBox,
}

impl IndustrialSite {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.bounds.contains(latitude, longitude)
    }

    pub fn center(&self) -> (f64, f64) {
        self.bounds.center()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("site name must not be empty".to_string());
        }
        self.bounds.validate().map_err(|e| format!("{}: {}", self.name, e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
