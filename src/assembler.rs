//! Visualization Data Assembler
//!
//! Turns parsed records into everything the viewer draws: adjusted lateral
//! offsets, the ground-following centerline and its corridor ribbon, the
//! water volume mesh, boring-log layer boxes and per-joint annotations.
//! Every output is plain data; nothing here renders.
//!
//! Overlays are optional. The same assembly runs whether the bore comes
//! alone or with surface, boring logs and a water body.

use serde::Serialize;
use thiserror::Error;

use crate::config::VizConfig;
use crate::geometry::{
    bounded_step, box_mesh, build_centerline, depth_to_surface, interpolate_sorted, slab_mesh, sort_by_station,
    BoringLogIndex, LayerMatch, LayerMethod, Mesh3d, SlabSection, Trace, MAX_STATION_SAMPLES,
};
use crate::types::{BoreJoint, BoringLogLayer, EntryExitPoints, SurfacePoint, WaterBodyRegion};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("bore dataset has no joints")]
    NoJoints,
}

// ============================================================================
// Output Types
// ============================================================================

/// Depth and soil annotation shown per joint in the table and tooltips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointAnnotation {
    pub joint_number: i64,
    pub station_ft: f64,
    pub elevation_ft: f64,
    /// Lateral offset after the correction angle
    pub adjusted_offset_ft: f64,
    /// Feet below ground, `None` without surface data
    pub depth_ft: Option<f64>,
    /// Two decimals or "N/A"
    pub depth_display: String,
    pub layer: Option<LayerMatch>,
    /// Human-readable lookup outcome
    pub layer_note: String,
}

/// Flat ribbon either side of the centerline as a 2×N surface grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorridorGrid {
    pub x: [Vec<f64>; 2],
    pub y: [Vec<f64>; 2],
    pub z: [Vec<f64>; 2],
}

/// One boring-log layer drawn as a box at its boring station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoringBox {
    pub station_ft: f64,
    pub top_ft: f64,
    pub bottom_ft: f64,
    pub soil_description: String,
    pub color: String,
    pub source_file: String,
    pub mesh: Mesh3d,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterVolumeMode {
    /// Flat bottom at a fixed depth below the water surface
    Box,
    /// Bottom follows the interpolated ground
    Terrain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterVolume {
    pub region: WaterBodyRegion,
    pub mode: WaterVolumeMode,
    pub mesh: Mesh3d,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub joint_count: usize,
    pub entry_station_ft: f64,
    pub exit_station_ft: f64,
    pub bore_span_ft: f64,
    pub min_elevation_ft: f64,
    pub max_elevation_ft: f64,
    pub surface_point_count: usize,
    pub boring_station_count: usize,
    pub boring_file_count: usize,
    pub layer_method: LayerMethod,
}

/// Everything the viewer needs, derived once per export run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VizDataset {
    pub joints: Vec<BoreJoint>,
    pub entry_exit: EntryExitPoints,
    pub annotations: Vec<JointAnnotation>,
    pub centerline: Trace,
    pub corridor: CorridorGrid,
    /// Surface points within the bore range, sorted by station
    pub surface_profile: Vec<SurfacePoint>,
    pub boring_logs: Vec<BoringLogLayer>,
    pub boring_boxes: Vec<BoringBox>,
    pub water_volume: Option<WaterVolume>,
    /// Symmetric lateral axis limit for the 3D view
    pub lr_axis_range_ft: f64,
    pub summary: DatasetSummary,
}

// ============================================================================
// Assembly
// ============================================================================

/// Optional overlays for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlays<'a> {
    pub surface: &'a [SurfacePoint],
    pub boring_logs: &'a [BoringLogLayer],
    pub water_body: Option<&'a WaterBodyRegion>,
}

/// Build the full visualization dataset.
pub fn assemble(
    joints: &[BoreJoint],
    overlays: Overlays<'_>,
    method: LayerMethod,
    config: &VizConfig,
) -> Result<VizDataset, AssembleError> {
    let entry_exit = EntryExitPoints::from_joints(joints).ok_or(AssembleError::NoJoints)?;
    let surface = overlays.surface;
    let method = method.resolve(!surface.is_empty());
    let geometry = &config.geometry;

    let centerline = build_centerline(&entry_exit, surface, geometry.centerline_step_ft);
    let corridor = corridor_grid(&centerline, geometry.corridor_half_width_ft);

    let index = BoringLogIndex::new(overlays.boring_logs);
    let annotations = joints
        .iter()
        .map(|joint| annotate_joint(joint, surface, &index, method, geometry.offset_correction_angle_deg))
        .collect::<Vec<_>>();

    let unresolved = annotations.iter().filter(|a| a.layer.is_none()).count();
    if !index.is_empty() && unresolved > 0 {
        tracing::debug!(unresolved, method = %method, "Joints without a matching soil layer");
    }

    let surface_profile = sort_by_station(
        &surface
            .iter()
            .filter(|p| entry_exit.contains_station(p.station_ft))
            .copied()
            .collect::<Vec<_>>(),
    );

    let boring_boxes = boring_boxes(&index, &entry_exit, config);
    let water_volume = overlays.water_body.map(|w| water_volume(w, surface, config));

    let summary = DatasetSummary {
        joint_count: joints.len(),
        entry_station_ft: entry_exit.entry.station_ft,
        exit_station_ft: entry_exit.exit.station_ft,
        bore_span_ft: entry_exit.span_ft(),
        min_elevation_ft: joints.iter().map(|j| j.elevation_ft).fold(f64::INFINITY, f64::min),
        max_elevation_ft: joints.iter().map(|j| j.elevation_ft).fold(f64::NEG_INFINITY, f64::max),
        surface_point_count: surface.len(),
        boring_station_count: index.borings().len(),
        boring_file_count: unique_files(overlays.boring_logs),
        layer_method: method,
    };

    tracing::info!(
        joints = summary.joint_count,
        span_ft = summary.bore_span_ft,
        centerline_points = centerline.len(),
        borings = summary.boring_station_count,
        boxes = boring_boxes.len(),
        water = water_volume.is_some(),
        "Assembled visualization data"
    );

    Ok(VizDataset {
        joints: joints.to_vec(),
        entry_exit,
        annotations,
        centerline,
        corridor,
        surface_profile,
        boring_logs: overlays.boring_logs.to_vec(),
        boring_boxes,
        water_volume,
        lr_axis_range_ft: lr_axis_range(joints, geometry.lr_axis_padding_ft),
        summary,
    })
}

/// Lateral offset rotated by the correction angle.
pub fn adjusted_offset(left_right_offset_ft: f64, angle_deg: f64) -> f64 {
    left_right_offset_ft * angle_deg.to_radians().cos()
}

/// Depth rendered for display: two decimals, or "N/A".
pub fn format_depth(depth_ft: Option<f64>) -> String {
    depth_ft.map_or_else(|| "N/A".to_string(), |d| format!("{d:.2}"))
}

/// `ceil(max |L/R| + padding)` from the raw offsets.
pub fn lr_axis_range(joints: &[BoreJoint], padding_ft: f64) -> f64 {
    let max_abs = joints
        .iter()
        .map(|j| j.left_right_offset_ft.abs())
        .fold(0.0, f64::max);
    (max_abs + padding_ft).ceil()
}

fn annotate_joint(
    joint: &BoreJoint,
    surface: &[SurfacePoint],
    index: &BoringLogIndex,
    method: LayerMethod,
    angle_deg: f64,
) -> JointAnnotation {
    let depth_ft = depth_to_surface(joint, surface);
    let lookup = index.find_expected_layer(joint, depth_ft, method, surface);

    JointAnnotation {
        joint_number: joint.joint_number,
        station_ft: joint.station_ft,
        elevation_ft: joint.elevation_ft,
        adjusted_offset_ft: adjusted_offset(joint.left_right_offset_ft, angle_deg),
        depth_ft,
        depth_display: format_depth(depth_ft),
        layer_note: lookup.to_string(),
        layer: lookup.matched().cloned(),
    }
}

fn corridor_grid(centerline: &Trace, half_width_ft: f64) -> CorridorGrid {
    let n = centerline.len();
    CorridorGrid {
        x: [centerline.x.clone(), centerline.x.clone()],
        y: [vec![-half_width_ft; n], vec![half_width_ft; n]],
        z: [centerline.z.clone(), centerline.z.clone()],
    }
}

fn boring_boxes(index: &BoringLogIndex, entry_exit: &EntryExitPoints, config: &VizConfig) -> Vec<BoringBox> {
    let hl = config.boring_boxes.half_length_ft;
    let hw = config.boring_boxes.half_width_ft;

    index
        .borings()
        .iter()
        .filter(|b| entry_exit.contains_station(b.station_ft))
        .flat_map(|boring| boring.layers.iter())
        .map(|layer| BoringBox {
            station_ft: layer.station_ft,
            top_ft: layer.top_elevation_ft(),
            bottom_ft: layer.bottom_elevation_ft(),
            soil_description: layer.soil_description.clone(),
            color: layer.color_code.clone(),
            source_file: layer.source_file.clone(),
            mesh: box_mesh(
                [layer.station_ft - hl, -hw, layer.bottom_elevation_ft()],
                [layer.station_ft + hl, hw, layer.top_elevation_ft()],
            ),
        })
        .collect()
}

/// Water volume mesh: a box when no surface point lies inside the water
/// range, otherwise a slab whose bottom follows the ground.
pub fn water_volume(region: &WaterBodyRegion, surface: &[SurfacePoint], config: &VizConfig) -> WaterVolume {
    let params = &config.water_volume;
    let top = region.water_elevation_ft;
    let begin = region.begin_station_ft;
    let end = region.end_station_ft;

    let has_terrain = surface.iter().any(|p| region.contains_station(p.station_ft));

    let (mode, sections) = if has_terrain {
        let sorted = sort_by_station(surface);
        let sections = sample_stations(begin, end, params.sample_step_ft)
            .into_iter()
            .map(|station| {
                let ground = interpolate_sorted(station, &sorted).unwrap_or(top - params.default_depth_ft);
                SlabSection {
                    station_ft: station,
                    top_ft: top,
                    bottom_ft: ground.min(top),
                }
            })
            .collect::<Vec<_>>();
        (WaterVolumeMode::Terrain, sections)
    } else {
        let bottom = top - params.default_depth_ft;
        let sections = vec![
            SlabSection { station_ft: begin, top_ft: top, bottom_ft: bottom },
            SlabSection { station_ft: end, top_ft: top, bottom_ft: bottom },
        ];
        (WaterVolumeMode::Box, sections)
    };

    tracing::debug!(
        water = %region.name,
        mode = ?mode,
        sections = sections.len(),
        "Built water volume"
    );

    WaterVolume {
        region: region.clone(),
        mode,
        mesh: slab_mesh(&sections, params.half_width_ft),
    }
}

/// Stations from `begin` every `step` up to `end`, always ending at `end`.
fn sample_stations(begin: f64, end: f64, step: f64) -> Vec<f64> {
    let mut stations = Vec::new();
    if step.is_finite() && step > 0.0 {
        let step = bounded_step(begin, end, step);
        let mut k = 0u32;
        loop {
            let station = f64::from(k).mul_add(step, begin);
            if station >= end - crate::geometry::STATION_EPSILON || k > MAX_STATION_SAMPLES {
                break;
            }
            stations.push(station);
            k += 1;
        }
    } else {
        stations.push(begin);
    }
    stations.push(end);
    stations
}

fn unique_files(layers: &[BoringLogLayer]) -> usize {
    let mut files: Vec<&str> = layers.iter().map(|l| l.source_file.as_str()).collect();
    files.sort_unstable();
    files.dedup();
    files.len()
}
