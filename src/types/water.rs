//! Water body types

use serde::{Deserialize, Serialize};

/// A surface-water crossing interval along the bore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterBodyRegion {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "BeginStation")]
    pub begin_station_ft: f64,
    #[serde(rename = "EndStation")]
    pub end_station_ft: f64,
    #[serde(rename = "WaterElevation")]
    pub water_elevation_ft: f64,
}

/// Reasons a water body definition is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaterBodyError {
    #[error("water body '{0}' has zero length")]
    ZeroLength(String),

    #[error("water body '{name}' has a non-finite {field}")]
    NonFinite { name: String, field: &'static str },
}

impl WaterBodyRegion {
    /// Build a region, swapping begin/end so that begin <= end.
    pub fn new(
        name: impl Into<String>,
        begin_station_ft: f64,
        end_station_ft: f64,
        water_elevation_ft: f64,
    ) -> Result<Self, WaterBodyError> {
        let name = name.into();

        for (field, value) in [
            ("begin station", begin_station_ft),
            ("end station", end_station_ft),
            ("water elevation", water_elevation_ft),
        ] {
            if !value.is_finite() {
                return Err(WaterBodyError::NonFinite { name, field });
            }
        }

        if (end_station_ft - begin_station_ft).abs() < f64::EPSILON {
            return Err(WaterBodyError::ZeroLength(name));
        }

        let (begin, end) = if begin_station_ft <= end_station_ft {
            (begin_station_ft, end_station_ft)
        } else {
            (end_station_ft, begin_station_ft)
        };

        Ok(Self {
            name,
            begin_station_ft: begin,
            end_station_ft: end,
            water_elevation_ft,
        })
    }

    /// Whether a station falls inside the crossing (inclusive)
    pub fn contains_station(&self, station_ft: f64) -> bool {
        station_ft >= self.begin_station_ft && station_ft <= self.end_station_ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_stations_are_normalized() {
        let w = WaterBodyRegion::new("Mill Creek", 400.0, 250.0, 92.0).expect("valid");
        assert_eq!(w.begin_station_ft, 250.0);
        assert_eq!(w.end_station_ft, 400.0);
        assert!(w.contains_station(300.0));
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = WaterBodyRegion::new("Pond", 100.0, 100.0, 50.0).unwrap_err();
        assert_eq!(err, WaterBodyError::ZeroLength("Pond".to_string()));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(WaterBodyRegion::new("Pond", f64::NAN, 100.0, 50.0).is_err());
    }
}
