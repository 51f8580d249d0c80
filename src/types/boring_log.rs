//! Boring log types

use serde::{Deserialize, Serialize};

/// One soil/rock stratum observed at a boring location.
///
/// `start_elevation_ft >= end_elevation_ft` is expected (top of zone first)
/// but not enforced; lookups treat the pair as an unordered interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoringLogLayer {
    #[serde(rename = "Station")]
    pub station_ft: f64,
    #[serde(rename = "StartElevation")]
    pub start_elevation_ft: f64,
    #[serde(rename = "EndElevation")]
    pub end_elevation_ft: f64,
    #[serde(rename = "SoilDescription")]
    pub soil_description: String,
    /// Hex color derived from the description
    #[serde(rename = "Color")]
    pub color_code: String,
    /// Name of the file the layer was read from
    #[serde(rename = "FileName")]
    pub source_file: String,
}

impl BoringLogLayer {
    /// Upper elevation of the zone regardless of column order
    pub fn top_elevation_ft(&self) -> f64 {
        self.start_elevation_ft.max(self.end_elevation_ft)
    }

    /// Lower elevation of the zone regardless of column order
    pub fn bottom_elevation_ft(&self) -> f64 {
        self.start_elevation_ft.min(self.end_elevation_ft)
    }
}
