/// Built-in registry of industrial heat sources.
///
/// Defines the known sites whose thermal signature regularly trips the
/// MODIS and VIIRS fire algorithms. Each entry is a lat/lon bounding box
/// drawn generously around the plant footprint (blast furnaces, coke ovens,
/// slag heaps). The registry is used whenever the configuration does not
/// list its own `[[site]]` entries.

use crate::model::{BoundingBox, IndustrialSite};

// ---------------------------------------------------------------------------
// Site metadata
// ---------------------------------------------------------------------------

/// Static description of a single site.
pub struct SiteEntry {
    /// Short name used in reports and as lookup key.
    pub name: &'static str,
    /// What is there and why it shows up as a hotspot.
    pub description: &'static str,
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Known German steel works, ordered roughly north to south.
pub static SITE_REGISTRY: &[SiteEntry] = &[
    SiteEntry {
        name: "Bremen steel works",
        description: "Integrated steel works on the Weser with two blast furnaces.",
        south: 53.110,
        west: 8.650,
        north: 53.150,
        east: 8.720,
    },
    SiteEntry {
        name: "Eisenhüttenstadt steel works",
        description: "Integrated steel works on the Oder-Spree canal.",
        south: 52.150,
        west: 14.590,
        north: 52.180,
        east: 14.660,
    },
    SiteEntry {
        name: "Salzgitter steel works",
        description: "Integrated steel works with blast furnaces and coking plant.",
        south: 52.140,
        west: 10.360,
        north: 52.190,
        east: 10.440,
    },
    SiteEntry {
        name: "Duisburg steel works",
        description: "Largest steel cluster in Europe along the Rhine: \
                      Bruckhausen, Schwelgern, Beeckerwerth, Hüttenheim. \
                      Flaring and slag tipping are detected year round.",
        south: 51.350,
        west: 6.680,
        north: 51.520,
        east: 6.800,
    },
    SiteEntry {
        name: "Völklingen steel works",
        description: "Steel works and rolling mills on the Saar.",
        south: 49.235,
        west: 6.820,
        north: 49.265,
        east: 6.870,
    },
    SiteEntry {
        name: "Dillingen steel works",
        description: "Heavy plate mill and blast furnaces at Dillingen/Saar.",
        south: 49.340,
        west: 6.700,
        north: 49.370,
        east: 6.760,
    },
];

impl From<&SiteEntry> for IndustrialSite {
    fn from(entry: &SiteEntry) -> Self {
        IndustrialSite {
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            bounds: BoundingBox {
                south: entry.south,
                west: entry.west,
                north: entry.north,
                east: entry.east,
            },
        }
    }
}

/// All registry entries as owned `IndustrialSite`s.
pub fn builtin_sites() -> Vec<IndustrialSite> {
    SITE_REGISTRY.iter().map(IndustrialSite::from).collect()
}

/// Looks up a site by name (case-insensitive). Returns `None` if not found.
pub fn find_site(name: &str) -> Option<&'static SiteEntry> {
    SITE_REGISTRY.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
