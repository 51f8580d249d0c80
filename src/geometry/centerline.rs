//! Centerline and depth to surface

use super::interpolate::{interpolate, interpolate_sorted, sort_by_station};
use super::{bounded_step, same_station, Trace, MAX_STATION_SAMPLES};
use crate::types::{BoreJoint, EntryExitPoints, SurfacePoint};

/// Build the ground-following centerline between the bore endpoints.
///
/// With surface data, ground elevation is sampled every `step_ft` from the
/// entry station up to the exit station (surface restricted to that range),
/// and the exact entry and exit stations are always included. Endpoints fall
/// back to the joint elevation when no ground elevation is available.
/// Without surface data the centerline is the straight entry-to-exit segment.
pub fn build_centerline(points: &EntryExitPoints, surface: &[SurfacePoint], step_ft: f64) -> Trace {
    let entry = &points.entry;
    let exit = &points.exit;
    let mut trace = Trace::default();

    if surface.is_empty() {
        trace.push(entry.station_ft, 0.0, entry.elevation_ft);
        trace.push(exit.station_ft, 0.0, exit.elevation_ft);
        return trace;
    }

    let in_range: Vec<SurfacePoint> = surface
        .iter()
        .filter(|p| p.station_ft >= entry.station_ft && p.station_ft <= exit.station_ft)
        .copied()
        .collect();
    let sorted = sort_by_station(&in_range);

    if step_ft.is_finite() && step_ft > 0.0 {
        let step_ft = bounded_step(entry.station_ft, exit.station_ft, step_ft);
        // entry + k*step rather than repeated addition keeps samples on the grid
        let mut k = 0u32;
        loop {
            let station = f64::from(k).mul_add(step_ft, entry.station_ft);
            if station > exit.station_ft || k > MAX_STATION_SAMPLES {
                break;
            }
            if let Some(elevation) = interpolate_sorted(station, &sorted) {
                trace.push(station, 0.0, elevation);
            }
            k += 1;
        }
    }

    let endpoint_elevation = |joint: &BoreJoint| interpolate_sorted(joint.station_ft, &sorted).unwrap_or(joint.elevation_ft);

    if !trace.x.first().is_some_and(|x| same_station(*x, entry.station_ft)) {
        let z = endpoint_elevation(entry);
        trace.x.insert(0, entry.station_ft);
        trace.y.insert(0, 0.0);
        trace.z.insert(0, z);
    }
    if !trace.x.last().is_some_and(|x| same_station(*x, exit.station_ft)) {
        trace.push(exit.station_ft, 0.0, endpoint_elevation(exit));
    }

    trace
}

/// Depth of a joint below the ground surface (positive = below ground).
///
/// `None` when there is no surface data.
pub fn depth_to_surface(joint: &BoreJoint, surface: &[SurfacePoint]) -> Option<f64> {
    interpolate(joint.station_ft, surface).map(|ground| ground - joint.elevation_ft)
}
