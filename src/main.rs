//! hddviz - HDD bore path visualizer
//!
//! Reads an as-built bore spreadsheet plus optional terrain, boring-log and
//! water-crossing inputs, and writes one self-contained HTML report.
//!
//! # Usage
//!
//! ```bash
//! # Bore only
//! hddviz --bore joints.xlsx
//!
//! # Full crossing with terrain, two boring logs and a creek
//! hddviz --bore joints.xlsx --surface terrain.csv \
//!     --boring-log B-1.xlsx --boring-log B-2.xlsx \
//!     --water-name "Mill Creek" --water-begin 250 --water-end 400 --water-elevation 92 \
//!     --output crossing
//! ```
//!
//! # Environment Variables
//!
//! - `HDDVIZ_CONFIG`: Path to a run config (default: ./hddviz.toml, then built-ins)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use hddviz::config::VizConfig;
use hddviz::export::{export_html, resolve_output_path, ExportOptions};
use hddviz::geometry::LayerMethod;
use hddviz::session::{DatasetState, Session};
use hddviz::types::WaterBodyRegion;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "hddviz")]
#[command(about = "Render HDD bore spreadsheets as a self-contained 3D/2D HTML report")]
#[command(version)]
struct CliArgs {
    /// Bore joint spreadsheet (.xlsx or .csv)
    #[arg(long, value_name = "FILE")]
    bore: PathBuf,

    /// Surface elevation spreadsheet
    #[arg(long, value_name = "FILE")]
    surface: Option<PathBuf>,

    /// Boring log spreadsheet (repeat for several borings)
    #[arg(long = "boring-log", value_name = "FILE")]
    boring_logs: Vec<PathBuf>,

    /// Water crossing name
    #[arg(long)]
    water_name: Option<String>,

    /// Water crossing begin station (ft)
    #[arg(long, allow_hyphen_values = true)]
    water_begin: Option<f64>,

    /// Water crossing end station (ft)
    #[arg(long, allow_hyphen_values = true)]
    water_end: Option<f64>,

    /// Water surface elevation (ft)
    #[arg(long, allow_hyphen_values = true)]
    water_elevation: Option<f64>,

    /// Output file name (".html" is appended when no extension is given)
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Run config file (overrides $HDDVIZ_CONFIG and ./hddviz.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report title
    #[arg(long)]
    title: Option<String>,

    /// Soil layer lookup method: auto, depth or elevation
    #[arg(long, value_name = "METHOD")]
    layer_method: Option<LayerMethod>,
}

impl CliArgs {
    /// Water body from flags, if any water flag was given.
    fn water_body(&self) -> Result<Option<WaterBodyRegion>> {
        let (begin, end, elevation) = (self.water_begin, self.water_end, self.water_elevation);
        if self.water_name.is_none() && begin.is_none() && end.is_none() && elevation.is_none() {
            return Ok(None);
        }

        let (Some(begin), Some(end), Some(elevation)) = (begin, end, elevation) else {
            bail!("--water-begin, --water-end and --water-elevation must be given together");
        };
        let name = self.water_name.clone().unwrap_or_else(|| "Water Body".to_string());

        let region = WaterBodyRegion::new(name, begin, end, elevation).context("Invalid water body")?;
        Ok(Some(region))
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => VizConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => VizConfig::load(),
    };

    let mut session = Session::new();

    session.load_bore(&args.bore).await?;
    if let DatasetState::Failed(e) = &session.bore {
        bail!("Bore data could not be loaded from {}: {e}", args.bore.display());
    }
    if let Some(bore) = session.bore.ready() {
        info!(
            file = %args.bore.display(),
            joints = bore.records.len(),
            dropped = bore.dropped_rows.len(),
            "Bore data loaded"
        );
        for w in &bore.dropped_rows {
            warn!("Bore: {}", w);
        }
    }

    if let Some(path) = &args.surface {
        session.load_surface(path).await?;
        if let Some(surface) = session.surface.ready() {
            info!(
                file = %path.display(),
                points = surface.records.len(),
                dropped = surface.dropped_rows.len(),
                "Surface data loaded"
            );
        }
    }

    if !args.boring_logs.is_empty() {
        session.load_boring_logs(&args.boring_logs).await?;
        if let Some(batch) = session.boring_logs.ready() {
            info!(
                files = batch.file_count(),
                layers = batch.layers.len(),
                skipped = batch.skipped_files.len(),
                "Boring logs loaded"
            );
            for skipped in &batch.skipped_files {
                warn!("{}", skipped);
            }
        }
    }

    let water = match args.water_body()? {
        Some(region) => Some(region),
        None => config
            .water_body
            .as_ref()
            .map(|w| w.to_region())
            .transpose()
            .context("Invalid [water_body] in config")?,
    };
    session.set_water_body(water);

    let method = args.layer_method.unwrap_or(config.layers.method);
    let dataset = session.assemble(method, &config)?;

    let s = &dataset.summary;
    info!(
        joints = s.joint_count,
        entry_ft = s.entry_station_ft,
        exit_ft = s.exit_station_ft,
        borings = s.boring_station_count,
        layer_method = %s.layer_method,
        "Visualization assembled"
    );

    let mut options = ExportOptions::from_config(&config.export);
    if let Some(title) = &args.title {
        options = options.with_title(title.clone());
    }

    let output = resolve_output_path(args.output.as_deref(), &args.bore);
    export_html(&dataset, &options, &output)?;
    info!(path = %output.display(), "Export complete");

    Ok(())
}
