//! Bore joint types

use serde::{Deserialize, Serialize};

/// One pipe joint of the as-built bore path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoreJoint {
    /// Joint number as logged by the steering hand
    #[serde(rename = "Joint")]
    pub joint_number: i64,
    /// Joint length (ft)
    #[serde(rename = "Length")]
    pub length_ft: f64,
    /// Inclination (degrees)
    #[serde(rename = "Inclination")]
    pub inclination_deg: f64,
    /// Left/right offset from the design line (ft)
    #[serde(rename = "LR")]
    pub left_right_offset_ft: f64,
    /// Raw azimuth reading (degrees)
    #[serde(rename = "RawAzi")]
    pub raw_azimuth_deg: f64,
    /// Distance away from the entry rig (ft)
    #[serde(rename = "Away")]
    pub station_ft: f64,
    /// Joint elevation (ft)
    #[serde(rename = "Elev")]
    pub elevation_ft: f64,
}

/// The bore endpoints: joints with the minimum and maximum station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryExitPoints {
    pub entry: BoreJoint,
    pub exit: BoreJoint,
}

impl EntryExitPoints {
    /// Derive entry/exit from a joint list, as if stable-sorted by station:
    /// on equal stations the entry is the first such joint and the exit is
    /// the last.
    pub fn from_joints(joints: &[BoreJoint]) -> Option<Self> {
        let mut iter = joints.iter();
        let first = iter.next()?;
        let (mut entry, mut exit) = (first, first);

        for joint in iter {
            if joint.station_ft < entry.station_ft {
                entry = joint;
            }
            if joint.station_ft >= exit.station_ft {
                exit = joint;
            }
        }

        Some(Self {
            entry: entry.clone(),
            exit: exit.clone(),
        })
    }

    /// Station span covered by the bore (ft)
    pub fn span_ft(&self) -> f64 {
        self.exit.station_ft - self.entry.station_ft
    }

    /// Whether a station falls inside the bore range (inclusive)
    pub fn contains_station(&self, station_ft: f64) -> bool {
        station_ft >= self.entry.station_ft && station_ft <= self.exit.station_ft
    }
}
