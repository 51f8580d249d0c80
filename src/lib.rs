//! hddviz: HDD bore path visualization
//!
//! Turns as-built horizontal directional drilling spreadsheets into a single
//! self-contained HTML report with 3D and 2D Plotly views.
//!
//! ## Pipeline
//!
//! - **Sheet reader**: first sheet of an xlsx or csv file as a cell grid
//! - **Ingest**: header matching and row coercion into typed records
//! - **Geometry**: interpolation, centerline, soil layer lookup, meshes
//! - **Assembler**: joins bore, terrain, boring logs and water body
//! - **Export**: fills the embedded viewer shell and writes the page

pub mod assembler;
pub mod config;
pub mod export;
pub mod geometry;
pub mod ingest;
pub mod session;
pub mod sheet;
pub mod soil;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, VizConfig};

// Re-export commonly used types
pub use types::{BoreJoint, BoringLogLayer, EntryExitPoints, SurfacePoint, WaterBodyRegion};

pub use assembler::{assemble, AssembleError, Overlays, VizDataset};
pub use export::{export_html, render_html, resolve_output_path, ExportError, ExportOptions};
pub use geometry::{LayerLookup, LayerMatch, LayerMethod};
pub use ingest::{DatasetKind, ParseError};
pub use session::{DatasetState, Session, SessionError};
pub use sheet::{read_sheet, Cell, Sheet, SheetError};
