//! Synthetic HDD Crossing Generator
//!
//! Writes a bore joint log, a terrain profile and a set of boring logs as
//! CSV files that `hddviz` can read directly. The crossing is a simple
//! entry dive, a level run at target depth and an exit climb under rolling
//! terrain, with steering noise on every joint.
//!
//! # Usage
//! ```bash
//! bore-sim --out-dir demo --joints 60 --borings 3 --seed 7
//! hddviz --bore demo/bore.csv --surface demo/surface.csv \
//!     --boring-log demo/boring_1.csv --boring-log demo/boring_2.csv --boring-log demo/boring_3.csv
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use tracing::info;

// ============================================================================
// Crossing Constants
// ============================================================================

/// Ground elevation at the entry rig (ft)
const BASE_GROUND_FT: f64 = 100.0;
/// Amplitude of the terrain undulation (ft)
const TERRAIN_AMPLITUDE_FT: f64 = 4.0;
/// Wavelength of the terrain undulation (ft)
const TERRAIN_WAVELENGTH_FT: f64 = 360.0;
/// Entry and exit angle (degrees)
const ENTRY_ANGLE_DEG: f64 = 12.0;
/// Surface sampling interval (ft)
const SURFACE_STEP_FT: f64 = 10.0;
/// Nominal bore azimuth (degrees)
const BORE_AZIMUTH_DEG: f64 = 90.0;

const SOIL_DESCRIPTIONS: &[&str] = &[
    "Lean clay (CL), brown, stiff",
    "Silty sand (SM), fine grained, medium dense",
    "Poorly graded sand with gravel (SP), dense",
    "Fat clay (CH), gray, very stiff",
    "Clayey sand (SC), loose, moist",
    "Weathered limestone",
    "Sandstone, moderately hard",
    "Shale, gray, fissile",
    "Organic silt (OL), soft",
];

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "bore-sim")]
#[command(about = "Synthetic HDD crossing data for hddviz testing")]
#[command(version = "1.0")]
struct Args {
    /// Directory the CSV files are written to
    #[arg(short, long, default_value = "sim_data")]
    out_dir: PathBuf,

    /// Number of pipe joints
    #[arg(short, long, default_value = "40", value_parser = clap::value_parser!(u32).range(5..=2000))]
    joints: u32,

    /// Joint length (ft)
    #[arg(long, default_value = "15.0")]
    joint_length: f64,

    /// Target depth of the level run below ground (ft)
    #[arg(long, default_value = "25.0")]
    depth: f64,

    /// Number of boring logs along the crossing
    #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u32).range(0..=20))]
    borings: u32,

    /// Layers per boring log
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=12))]
    layers: u32,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Simulation State
// ============================================================================

struct CrossingSim {
    rng: StdRng,
    span_ft: f64,
    depth_ft: f64,
    phase: f64,
    steering_noise: Normal<f64>,
    elevation_noise: Normal<f64>,
    azimuth_noise: Normal<f64>,
}

impl CrossingSim {
    fn new(args: &Args) -> Result<Self> {
        let mut rng = match args.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let phase = rng.gen_range(0.0..std::f64::consts::TAU);

        Ok(Self {
            rng,
            span_ft: f64::from(args.joints - 1) * args.joint_length,
            depth_ft: args.depth,
            phase,
            steering_noise: Normal::new(0.0, 0.6).context("steering noise")?,
            elevation_noise: Normal::new(0.0, 0.15).context("elevation noise")?,
            azimuth_noise: Normal::new(0.0, 0.4).context("azimuth noise")?,
        })
    }

    fn ground(&self, station_ft: f64) -> f64 {
        let angle = station_ft / TERRAIN_WAVELENGTH_FT * std::f64::consts::TAU + self.phase;
        TERRAIN_AMPLITUDE_FT.mul_add(angle.sin() - self.phase.sin(), BASE_GROUND_FT)
    }

    /// Design elevation: dive at the entry angle, hold depth, climb out.
    fn design_elevation(&self, station_ft: f64) -> f64 {
        let ramp_ft = self.depth_ft / ENTRY_ANGLE_DEG.to_radians().tan();
        let from_end = (self.span_ft - station_ft).max(0.0);
        let fraction = (station_ft.min(from_end) / ramp_ft).clamp(0.0, 1.0);
        self.depth_ft.mul_add(-fraction, self.ground(station_ft))
    }

    fn bore_csv(&mut self, joints: u32, joint_length: f64) -> String {
        let mut csv = String::from("Joint #,Length,Inclination,L/R,Raw Azi.,Away,Elev.\n");
        let mut lr = 0.0_f64;
        let mut prev: Option<(f64, f64)> = None;

        for n in 0..joints {
            let station = f64::from(n) * joint_length;
            let elevation = self.design_elevation(station) + self.elevation_noise.sample(&mut self.rng);
            let inclination = prev.map_or(-ENTRY_ANGLE_DEG, |(s, e)| {
                ((elevation - e) / (station - s)).atan().to_degrees()
            });
            // Steering drifts and gets corrected back toward the line
            lr = 0.8f64.mul_add(lr, self.steering_noise.sample(&mut self.rng));
            let azimuth = BORE_AZIMUTH_DEG + self.azimuth_noise.sample(&mut self.rng);

            let _ = writeln!(
                csv,
                "{},{joint_length:.1},{inclination:.2},{lr:.2},{azimuth:.2},{station:.1},{elevation:.2}",
                n + 1
            );
            prev = Some((station, elevation));
        }
        csv
    }

    fn surface_csv(&self) -> String {
        let mut csv = String::from("Station,Elevation\n");
        let mut station = -2.0 * SURFACE_STEP_FT;
        while station <= self.span_ft + 2.0 * SURFACE_STEP_FT {
            let _ = writeln!(csv, "{station:.1},{:.2}", self.ground(station));
            station += SURFACE_STEP_FT;
        }
        csv
    }

    fn boring_csv(&mut self, station_ft: f64, layers: u32) -> String {
        let mut csv = String::from("STA,Zone Start Elevation (ft),Zone End Elevation (ft),Soil Description\n");
        let mut top = self.ground(station_ft);

        for _ in 0..layers {
            let thickness = self.rng.gen_range(4.0..14.0);
            let bottom = top - thickness;
            let description = SOIL_DESCRIPTIONS.choose(&mut self.rng).copied().unwrap_or("Unclassified fill");
            let _ = writeln!(csv, "{station_ft:.1},{top:.2},{bottom:.2},\"{description}\"");
            top = bottom;
        }
        csv
    }
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(file = %path.display(), bytes = contents.len(), "Wrote");
    Ok(path)
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    anyhow::ensure!(
        args.joint_length.is_finite() && args.joint_length > 0.0,
        "--joint-length must be a positive number"
    );
    anyhow::ensure!(args.depth.is_finite() && args.depth > 0.0, "--depth must be a positive number");

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let mut sim = CrossingSim::new(&args)?;
    info!(
        joints = args.joints,
        span_ft = sim.span_ft,
        depth_ft = sim.depth_ft,
        borings = args.borings,
        seed = ?args.seed,
        "Generating synthetic crossing"
    );

    let bore = sim.bore_csv(args.joints, args.joint_length);
    write_file(&args.out_dir, "bore.csv", &bore)?;
    write_file(&args.out_dir, "surface.csv", &sim.surface_csv())?;

    for b in 1..=args.borings {
        let station = sim.span_ft * f64::from(b) / f64::from(args.borings + 1);
        let csv = sim.boring_csv(station.round(), args.layers);
        write_file(&args.out_dir, &format!("boring_{b}.csv"), &csv)?;
    }

    Ok(())
}
