//! Geometry / Interpolation Engine
//!
//! Station-based geometry shared by every overlay:
//! - Linear interpolation of ground elevation along the station axis
//! - Centerline construction and depth to surface
//! - Nearest-boring soil-layer resolution
//! - Triangle mesh construction for boxes and swept slabs
//!
//! All coordinates are in feet. `x` is station (distance along the bore),
//! `y` is lateral offset and `z` is elevation.

mod centerline;
mod interpolate;
mod layers;
mod mesh;

pub use centerline::{build_centerline, depth_to_surface};
pub use interpolate::{interpolate, interpolate_sorted, sort_by_station};
pub use layers::{Boring, BoringLogIndex, LayerLookup, LayerMatch, LayerMethod, LayerRange};
pub use mesh::{box_mesh, slab_mesh, Mesh3d, SlabSection};

#[cfg(test)]
pub(crate) use mesh::tests::assert_watertight;

use serde::Serialize;

/// A polyline as parallel coordinate arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Trace {
    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate points as `(x, y, z)`
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| (*x, *y, *z))
    }
}

/// Upper bound on samples taken along one station sweep.
pub const MAX_STATION_SAMPLES: u32 = 100_000;

/// Sample step for a sweep over `[begin, end]`, widened when `step` would
/// need more than [`MAX_STATION_SAMPLES`] samples.
pub(crate) fn bounded_step(begin: f64, end: f64, step: f64) -> f64 {
    let min_step = (end - begin).abs() / f64::from(MAX_STATION_SAMPLES);
    if step < min_step {
        tracing::warn!(
            requested_ft = step,
            used_ft = min_step,
            span_ft = (end - begin).abs(),
            "Sample step too fine for span, widening"
        );
        min_step
    } else {
        step
    }
}

/// Station comparison tolerance
pub(crate) const STATION_EPSILON: f64 = 1e-9;

pub(crate) fn same_station(a: f64, b: f64) -> bool {
    (a - b).abs() <= STATION_EPSILON
}
