//! hotspot_timing: MODIS vs. VIIRS active fire detection comparison.
//!
//! # Module structure
//!
//! ```text
//! hotspot_timing
//! ├── model       - shared data types (Detection, MatchedPair, IndustrialSite, ...)
//! ├── error       - error enum and Result alias
//! ├── config      - analysis configuration loader (analysis.toml)
//! ├── sites       - built-in registry of industrial heat sources
//! ├── ingest
//! │   ├── firms   - FIRMS archive / normalized CSV loading
//! │   └── fixtures (test only) - representative archive extracts
//! ├── analysis
//! │   ├── matching     - MODIS to VIIRS nearest-partner matching
//! │   ├── stats        - time difference statistics and histogram
//! │   └── false_alarms - high-confidence detections at industrial sites
//! └── report
//!     ├── summary - text report
//!     ├── svg     - histogram and scatter plots
//!     ├── map     - Leaflet maps
//!     └── export  - matches CSV, false alarm GeoJSON
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod model;
pub mod report;
pub mod sites;
