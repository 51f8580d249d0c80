//! Surface terrain types

use serde::{Deserialize, Serialize};

/// Ground elevation at a station along the bore's centerline projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    #[serde(rename = "Station")]
    pub station_ft: f64,
    #[serde(rename = "Elevation")]
    pub elevation_ft: f64,
    /// Lateral offset; surface shots are always on the centerline
    #[serde(rename = "Offset")]
    pub offset_ft: f64,
}

impl SurfacePoint {
    pub fn new(station_ft: f64, elevation_ft: f64) -> Self {
        Self {
            station_ft,
            elevation_ft,
            offset_ft: 0.0,
        }
    }
}
