//! Nearest-boring soil-layer resolution
//!
//! Each joint is annotated with the soil layer it is expected to pass
//! through, taken from the boring closest to it along the station axis.
//! Two matching methods are supported:
//!
//! - **Depth**: layer elevations are converted to depth below the ground at
//!   the boring, and the joint's depth below ground is matched against them.
//! - **Elevation**: the joint's elevation is matched against the layer
//!   elevations directly; no surface data needed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::interpolate::interpolate;
use super::same_station;
use crate::types::{BoreJoint, BoringLogLayer, SurfacePoint};

// ============================================================================
// Method
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerMethod {
    /// Depth when surface data is present, elevation otherwise
    #[default]
    Auto,
    Depth,
    Elevation,
}

impl LayerMethod {
    /// Replace `Auto` with the concrete method for the available data.
    pub fn resolve(self, has_surface: bool) -> Self {
        match self {
            Self::Auto if has_surface => Self::Depth,
            Self::Auto => Self::Elevation,
            other => other,
        }
    }
}

impl fmt::Display for LayerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Depth => "depth",
            Self::Elevation => "elevation",
        })
    }
}

impl FromStr for LayerMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "depth" => Ok(Self::Depth),
            "elevation" => Ok(Self::Elevation),
            other => Err(format!("unknown layer method '{other}' (expected auto, depth or elevation)")),
        }
    }
}

// ============================================================================
// Lookup Result
// ============================================================================

/// Interval of the matched layer, in the units of the method used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerRange {
    /// Feet below ground at the boring
    Depth { start_ft: f64, end_ft: f64 },
    /// Elevation of the zone top and bottom
    Elevation { top_ft: f64, bottom_ft: f64 },
}

impl fmt::Display for LayerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Depth { start_ft, end_ft } => write!(f, "{start_ft:.1}-{end_ft:.1} ft depth"),
            Self::Elevation { top_ft, bottom_ft } => write!(f, "{top_ft:.1}-{bottom_ft:.1} ft elev"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerMatch {
    pub soil_description: String,
    pub color: String,
    pub boring_station_ft: f64,
    /// Station distance from the joint to the boring
    pub distance_ft: f64,
    pub range: LayerRange,
}

/// Outcome of a soil-layer lookup for one joint.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerLookup {
    Matched(LayerMatch),
    NoBoringLogs,
    NoSurfaceData,
    /// Joint is deeper than the deepest logged layer
    InsufficientBoringDepth { boring_station_ft: f64, max_depth_ft: f64 },
    /// Joint falls in a gap between logged layers
    NoMatchingLayer { boring_station_ft: f64 },
    AboveRange { boring_station_ft: f64, top_ft: f64 },
    BelowRange { boring_station_ft: f64, bottom_ft: f64 },
}

impl LayerLookup {
    pub fn matched(&self) -> Option<&LayerMatch> {
        match self {
            Self::Matched(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for LayerLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched(m) => write!(f, "{} ({})", m.soil_description, m.range),
            Self::NoBoringLogs => f.write_str("No boring log data"),
            Self::NoSurfaceData => f.write_str("No surface data for depth calculation"),
            Self::InsufficientBoringDepth { boring_station_ft, max_depth_ft } => write!(
                f,
                "Insufficient boring depth (boring at STA {boring_station_ft:.1} reaches {max_depth_ft:.1} ft)"
            ),
            Self::NoMatchingLayer { boring_station_ft } => {
                write!(f, "No matching layer in boring at STA {boring_station_ft:.1}")
            }
            Self::AboveRange { boring_station_ft, top_ft } => write!(
                f,
                "Above boring range (boring at STA {boring_station_ft:.1} starts at {top_ft:.1} ft)"
            ),
            Self::BelowRange { boring_station_ft, bottom_ft } => write!(
                f,
                "Below boring range (boring at STA {boring_station_ft:.1} ends at {bottom_ft:.1} ft)"
            ),
        }
    }
}

// ============================================================================
// Boring Index
// ============================================================================

/// All layers logged at one station, sorted by start elevation descending.
#[derive(Debug, Clone, PartialEq)]
pub struct Boring {
    pub station_ft: f64,
    pub layers: Vec<BoringLogLayer>,
}

/// Layers grouped into borings, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoringLogIndex {
    borings: Vec<Boring>,
}

impl BoringLogIndex {
    pub fn new(layers: &[BoringLogLayer]) -> Self {
        let mut borings: Vec<Boring> = Vec::new();

        for layer in layers {
            match borings.iter_mut().find(|b| same_station(b.station_ft, layer.station_ft)) {
                Some(boring) => boring.layers.push(layer.clone()),
                None => borings.push(Boring {
                    station_ft: layer.station_ft,
                    layers: vec![layer.clone()],
                }),
            }
        }

        for boring in &mut borings {
            boring
                .layers
                .sort_by(|a, b| b.start_elevation_ft.total_cmp(&a.start_elevation_ft));
        }

        Self { borings }
    }

    pub fn borings(&self) -> &[Boring] {
        &self.borings
    }

    pub fn is_empty(&self) -> bool {
        self.borings.is_empty()
    }

    /// Boring closest to `station`; the earliest one wins ties.
    pub fn nearest(&self, station: f64) -> Option<&Boring> {
        let mut best: Option<(&Boring, f64)> = None;
        for boring in &self.borings {
            let distance = (boring.station_ft - station).abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((boring, distance));
            }
        }
        best.map(|(b, _)| b)
    }

    /// Resolve the layer a joint is expected to be in.
    ///
    /// `depth_ft` is the joint's depth below ground (see
    /// [`depth_to_surface`](super::depth_to_surface)). `Auto` is resolved
    /// against `surface`.
    pub fn find_expected_layer(
        &self,
        joint: &BoreJoint,
        depth_ft: Option<f64>,
        method: LayerMethod,
        surface: &[SurfacePoint],
    ) -> LayerLookup {
        let Some(boring) = self.nearest(joint.station_ft) else {
            return LayerLookup::NoBoringLogs;
        };
        let distance_ft = (boring.station_ft - joint.station_ft).abs();

        match method.resolve(!surface.is_empty()) {
            LayerMethod::Depth => {
                let (Some(depth), Some(ground)) = (depth_ft, interpolate(boring.station_ft, surface)) else {
                    return LayerLookup::NoSurfaceData;
                };
                match_by_depth(boring, depth, ground, distance_ft)
            }
            LayerMethod::Elevation | LayerMethod::Auto => match_by_elevation(boring, joint.elevation_ft, distance_ft),
        }
    }
}

fn matched(layer: &BoringLogLayer, boring: &Boring, distance_ft: f64, range: LayerRange) -> LayerLookup {
    LayerLookup::Matched(LayerMatch {
        soil_description: layer.soil_description.clone(),
        color: layer.color_code.clone(),
        boring_station_ft: boring.station_ft,
        distance_ft,
        range,
    })
}

fn match_by_depth(boring: &Boring, depth: f64, ground: f64, distance_ft: f64) -> LayerLookup {
    let mut max_depth_ft = f64::NEG_INFINITY;

    for layer in &boring.layers {
        let start_ft = ground - layer.top_elevation_ft();
        let end_ft = ground - layer.bottom_elevation_ft();
        if start_ft <= depth && depth <= end_ft {
            return matched(layer, boring, distance_ft, LayerRange::Depth { start_ft, end_ft });
        }
        max_depth_ft = max_depth_ft.max(end_ft);
    }

    if depth > max_depth_ft {
        LayerLookup::InsufficientBoringDepth {
            boring_station_ft: boring.station_ft,
            max_depth_ft,
        }
    } else {
        LayerLookup::NoMatchingLayer {
            boring_station_ft: boring.station_ft,
        }
    }
}

fn match_by_elevation(boring: &Boring, elevation: f64, distance_ft: f64) -> LayerLookup {
    for layer in &boring.layers {
        let top_ft = layer.top_elevation_ft();
        let bottom_ft = layer.bottom_elevation_ft();
        if bottom_ft <= elevation && elevation <= top_ft {
            return matched(layer, boring, distance_ft, LayerRange::Elevation { top_ft, bottom_ft });
        }
    }

    let top_ft = boring
        .layers
        .iter()
        .map(BoringLogLayer::top_elevation_ft)
        .fold(f64::NEG_INFINITY, f64::max);
    let bottom_ft = boring
        .layers
        .iter()
        .map(BoringLogLayer::bottom_elevation_ft)
        .fold(f64::INFINITY, f64::min);

    if elevation > top_ft {
        LayerLookup::AboveRange {
            boring_station_ft: boring.station_ft,
            top_ft,
        }
    } else if elevation < bottom_ft {
        LayerLookup::BelowRange {
            boring_station_ft: boring.station_ft,
            bottom_ft,
        }
    } else {
        LayerLookup::NoMatchingLayer {
            boring_station_ft: boring.station_ft,
        }
    }
}
