//! Station-axis linear interpolation

use crate::types::SurfacePoint;

/// Copy of `points` stably sorted by station.
pub fn sort_by_station(points: &[SurfacePoint]) -> Vec<SurfacePoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.station_ft.total_cmp(&b.station_ft));
    sorted
}

/// Interpolate elevation at `station` from unsorted points.
///
/// Returns `None` only for an empty point set. Stations outside the covered
/// range clamp to the nearest endpoint; nothing is extrapolated.
pub fn interpolate(station: f64, points: &[SurfacePoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    interpolate_sorted(station, &sort_by_station(points))
}

/// Same as [`interpolate`] for points already sorted by station.
pub fn interpolate_sorted(station: f64, sorted: &[SurfacePoint]) -> Option<f64> {
    let first = sorted.first()?;
    let last = sorted.last()?;

    if station <= first.station_ft {
        return Some(first.elevation_ft);
    }
    if station >= last.station_ft {
        return Some(last.elevation_ft);
    }

    // station is strictly inside the range, so idx >= 1
    let idx = sorted.iter().position(|p| p.station_ft >= station)?;
    let before = &sorted[idx - 1];
    let after = &sorted[idx];

    let width = after.station_ft - before.station_ft;
    if width.abs() < f64::EPSILON {
        return Some(before.elevation_ft);
    }

    let ratio = (station - before.station_ft) / width;
    Some(before.elevation_ft + ratio * (after.elevation_ft - before.elevation_ft))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(values: &[(f64, f64)]) -> Vec<SurfacePoint> {
        values.iter().map(|(s, e)| SurfacePoint::new(*s, *e)).collect()
    }

    #[test]
    fn test_empty_returns_none() {
        assert_eq!(interpolate(10.0, &[]), None);
    }

    #[test]
    fn test_linear_between_points() {
        let points = pts(&[(100.0, 90.0), (0.0, 100.0)]);
        let z = interpolate(25.0, &points).expect("value");
        assert!((z - 97.5).abs() < 1e-9, "got {z}");
    }

    #[test]
    fn test_exact_station_returns_point_elevation() {
        let points = pts(&[(0.0, 100.0), (50.0, 95.0), (100.0, 98.0)]);
        assert!((interpolate(50.0, &points).expect("value") - 95.0).abs() < 1e-12);
        assert!((interpolate(100.0, &points).expect("value") - 98.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamps_outside_range() {
        let points = pts(&[(10.0, 100.0), (20.0, 80.0)]);
        assert!((interpolate(-500.0, &points).expect("value") - 100.0).abs() < 1e-12);
        assert!((interpolate(1e6, &points).expect("value") - 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_result_within_bracketing_elevations() {
        let points = pts(&[(0.0, 100.0), (10.0, 104.0), (30.0, 96.0), (45.0, 101.0)]);
        let mut station = 0.0;
        while station <= 45.0 {
            let z = interpolate(station, &points).expect("value");
            assert!(z.is_finite());
            assert!((96.0..=104.0).contains(&z), "station {station} gave {z}");
            station += 0.75;
        }
    }

    #[test]
    fn test_duplicate_stations() {
        let points = pts(&[(0.0, 100.0), (10.0, 90.0), (10.0, 70.0), (20.0, 60.0)]);
        let sorted = sort_by_station(&points);
        assert!((sorted[1].elevation_ft - 90.0).abs() < 1e-12, "sort must be stable");

        let z = interpolate(10.0, &points).expect("value");
        assert!(z.is_finite());
        assert!((z - 90.0).abs() < 1e-12, "got {z}");

        let z = interpolate(15.0, &points).expect("value");
        assert!((z - 65.0).abs() < 1e-12, "got {z}");
    }

    #[test]
    fn test_input_order_is_untouched() {
        let points = pts(&[(30.0, 1.0), (10.0, 2.0)]);
        let _ = interpolate(20.0, &points);
        assert!((points[0].station_ft - 30.0).abs() < f64::EPSILON);
    }
}
