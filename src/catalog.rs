//! Object catalog boundary.
//!
//! The tracking engine consumes an external catalog service for name/ID
//! search, element-set resolution, nearest-neighbor queries, and conjunction
//! events. The service itself is outside the engine; [`CatalogSource`] is its
//! interface, and [`BuiltinCatalog`] is an in-memory snapshot so the
//! application runs without a network.

use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use crate::elements::mean_motion_to_altitude_km;

/// A catalog record: the raw element lines plus descriptive metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSetRecord {
    pub name: String,
    pub norad_cat_id: u64,
    pub line1: String,
    pub line2: String,
}

/// An autocomplete hit.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub name: String,
    pub norad_cat_id: u64,
}

/// A conjunction (close-approach) event, consumed read-only for display.
#[derive(Clone, Debug)]
pub struct CdmEvent {
    pub message_id: String,
    pub primary_name: String,
    pub secondary_name: String,
    /// Collision probability, dimensionless.
    pub probability: f64,
    /// Predicted miss distance at closest approach, km.
    pub miss_distance_km: f64,
    /// Time of closest approach, Unix milliseconds.
    pub tca_unix_ms: f64,
}

/// Catalog request failure.
#[derive(Clone, Debug, Error)]
pub enum CatalogError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// The external catalog service interface.
///
/// Implementations are called from background tasks; they block their task,
/// never the frame loop.
pub trait CatalogSource: Send + Sync + 'static {
    /// Name/ID autocomplete.
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, CatalogError>;
    /// Resolve a record by exact name.
    fn resolve_by_name(&self, name: &str) -> Result<ElementSetRecord, CatalogError>;
    /// Resolve a record by catalog number.
    fn resolve_by_catalog_id(&self, id: u64) -> Result<ElementSetRecord, CatalogError>;
    /// The `count` objects nearest to the given object, excluding itself.
    fn fetch_nearby(&self, catalog_id: u64, count: usize)
    -> Result<Vec<ElementSetRecord>, CatalogError>;
    /// Currently active conjunction events.
    fn fetch_active_events(&self) -> Result<Vec<CdmEvent>, CatalogError>;
}

/// Resource handle to the configured catalog source.
#[derive(Resource, Clone)]
pub struct Catalog(pub Arc<dyn CatalogSource>);

impl Catalog {
    pub fn new(source: impl CatalogSource) -> Self {
        Self(Arc::new(source))
    }
}

/// Maximum autocomplete hits returned per query.
const MAX_SEARCH_HITS: usize = 8;

struct CatalogEntry {
    record: ElementSetRecord,
    mean_altitude_km: f64,
}

/// In-memory demo catalog seeded with a snapshot of earth-orbiting objects.
///
/// One record (the ISS) carries its real published element lines; the rest
/// are generated around realistic orbits with valid checksums so every entry
/// parses and propagates.
pub struct BuiltinCatalog {
    entries: Vec<CatalogEntry>,
    events: Vec<CdmEvent>,
}

/// Real ISS element set (epoch 2025-05-02), used verbatim.
pub const ISS_LINE1: &str =
    "1 25544U 98067A   25122.54440123  .00015063  00000+0  27814-3 0  9994";
pub const ISS_LINE2: &str =
    "2 25544  51.6345 173.1350 0002187  74.2134 285.9096 15.49297959508085";

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        let mut entries = Vec::new();

        entries.push(CatalogEntry::from_lines(
            "ISS (ZARYA)",
            25544,
            ISS_LINE1.to_owned(),
            ISS_LINE2.to_owned(),
        ));

        // Generated snapshot entries: (name, norad, incl, raan, ecc*1e7, argp, mean anomaly, mean motion)
        let seeded: [(&str, u32, f64, f64, u32, f64, f64, f64); 9] = [
            ("HST", 20580, 28.4702, 60.1420, 2541, 104.8300, 301.7421, 15.0929924),
            ("TIANGONG", 48274, 41.4680, 210.2280, 4455, 30.1120, 98.4410, 15.61843581),
            ("NOAA 19", 33591, 99.1920, 140.7710, 13800, 52.4410, 307.8110, 14.12652380),
            ("TERRA", 25994, 98.2012, 320.5540, 1210, 90.1230, 270.0410, 14.57109110),
            ("ENVISAT", 27386, 98.5421, 188.2310, 1350, 85.7710, 274.5120, 14.37951210),
            ("STARLINK-1007", 44713, 53.0540, 25.3310, 1440, 95.2210, 265.1120, 15.06391300),
            ("COSMOS 2251 DEB", 34427, 74.0312, 285.1120, 25110, 140.2210, 221.5310, 14.10211870),
            ("LEMUR-2-GREENBERG", 42841, 51.6210, 170.4410, 3120, 60.3310, 300.1210, 15.47122010),
            ("NAVSTAR 43 (GPS)", 24876, 55.6120, 120.3310, 78100, 250.1120, 109.4410, 2.00561960),
        ];

        for (name, norad, incl, raan, ecc7, argp, ma, mm) in seeded {
            let line1 = make_line1(norad);
            let line2 = make_line2(norad, incl, raan, ecc7, argp, ma, mm);
            entries.push(CatalogEntry::from_lines(name, u64::from(norad), line1, line2));
        }

        let now = crate::types::now_unix_ms();
        let hour_ms = 3_600_000.0;
        let events = vec![
            CdmEvent {
                message_id: "CDM-2026-081522".to_owned(),
                primary_name: "ISS (ZARYA)".to_owned(),
                secondary_name: "COSMOS 2251 DEB".to_owned(),
                probability: 1.4e-5,
                miss_distance_km: 0.912,
                tca_unix_ms: now + 18.0 * hour_ms,
            },
            CdmEvent {
                message_id: "CDM-2026-081547".to_owned(),
                primary_name: "STARLINK-1007".to_owned(),
                secondary_name: "LEMUR-2-GREENBERG".to_owned(),
                probability: 3.1e-6,
                miss_distance_km: 2.350,
                tca_unix_ms: now + 41.0 * hour_ms,
            },
            CdmEvent {
                message_id: "CDM-2026-081563".to_owned(),
                primary_name: "ENVISAT".to_owned(),
                secondary_name: "NOAA 19".to_owned(),
                probability: 8.7e-7,
                miss_distance_km: 4.118,
                tca_unix_ms: now + 63.0 * hour_ms,
            },
        ];

        Self { entries, events }
    }
}

impl CatalogEntry {
    fn from_lines(name: &str, norad: u64, line1: String, line2: String) -> Self {
        // Column 53..63 of line 2 is the mean motion in rev/day.
        let mean_motion: f64 = line2[52..63].trim().parse().unwrap_or(0.0);
        Self {
            record: ElementSetRecord {
                name: name.to_owned(),
                norad_cat_id: norad,
                line1,
                line2,
            },
            mean_altitude_km: mean_motion_to_altitude_km(mean_motion),
        }
    }
}

impl CatalogSource for BuiltinCatalog {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, CatalogError> {
        let needle = query.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let hits = self
            .entries
            .iter()
            .filter(|e| {
                e.record.name.to_ascii_lowercase().contains(&needle)
                    || e.record.norad_cat_id.to_string().contains(&needle)
            })
            .take(MAX_SEARCH_HITS)
            .map(|e| SearchHit {
                name: e.record.name.clone(),
                norad_cat_id: e.record.norad_cat_id,
            })
            .collect();
        Ok(hits)
    }

    fn resolve_by_name(&self, name: &str) -> Result<ElementSetRecord, CatalogError> {
        self.entries
            .iter()
            .find(|e| e.record.name.eq_ignore_ascii_case(name.trim()))
            .map(|e| e.record.clone())
            .ok_or_else(|| CatalogError::NotFound(name.to_owned()))
    }

    fn resolve_by_catalog_id(&self, id: u64) -> Result<ElementSetRecord, CatalogError> {
        self.entries
            .iter()
            .find(|e| e.record.norad_cat_id == id)
            .map(|e| e.record.clone())
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn fetch_nearby(
        &self,
        catalog_id: u64,
        count: usize,
    ) -> Result<Vec<ElementSetRecord>, CatalogError> {
        let target = self
            .entries
            .iter()
            .find(|e| e.record.norad_cat_id == catalog_id)
            .ok_or_else(|| CatalogError::NotFound(catalog_id.to_string()))?;
        let target_alt = target.mean_altitude_km;

        let mut others: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|e| e.record.norad_cat_id != catalog_id)
            .collect();
        others.sort_by(|a, b| {
            let da = (a.mean_altitude_km - target_alt).abs();
            let db = (b.mean_altitude_km - target_alt).abs();
            da.total_cmp(&db)
        });

        Ok(others
            .into_iter()
            .take(count)
            .map(|e| e.record.clone())
            .collect())
    }

    fn fetch_active_events(&self) -> Result<Vec<CdmEvent>, CatalogError> {
        Ok(self.events.clone())
    }
}

/// Standard two-line-element checksum: sum of digits, minus signs count 1,
/// everything else 0, over the first 68 columns, modulo 10.
pub fn tle_checksum(line: &str) -> u32 {
    line.bytes()
        .take(68)
        .map(|b| match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'-' => 1,
            _ => 0,
        })
        .sum::<u32>()
        % 10
}

/// Build a line 1 for a generated entry by re-numbering the ISS template.
///
/// Epoch and drag fields are shared across the snapshot, which is what a
/// single-epoch catalog dump looks like.
fn make_line1(norad: u32) -> String {
    let mut line = String::from(ISS_LINE1);
    line.replace_range(2..7, &format!("{:05}", norad));
    let checksum = tle_checksum(&line);
    line.replace_range(68..69, &checksum.to_string());
    line
}

/// Build a fixed-width line 2 from element values and append the checksum.
fn make_line2(norad: u32, incl: f64, raan: f64, ecc7: u32, argp: f64, ma: f64, mm: f64) -> String {
    let mut line = format!(
        "2 {:05} {:8.4} {:8.4} {:07} {:8.4} {:8.4} {:11.8}{:5}",
        norad, incl, raan, ecc7, argp, ma, mm, 10432
    );
    let checksum = tle_checksum(&line);
    line.push_str(&checksum.to_string());
    line
}
