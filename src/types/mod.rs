//! Shared data structures for HDD bore visualization
//!
//! Records produced by the spreadsheet parsers and consumed by the geometry
//! engine, the assembler and the HTML export:
//! - BoreJoint (one pipe joint of the as-built bore)
//! - SurfacePoint (ground elevation along the bore centerline)
//! - BoringLogLayer (one soil/rock stratum at a boring location)
//! - WaterBodyRegion (optional surface-water crossing)
//! - EntryExitPoints (bore endpoints, derived once per dataset)
//!
//! Serde names match the field names the viewer shell reads from the
//! embedded JSON.

mod bore;
mod boring_log;
mod surface;
mod water;

pub use bore::*;
pub use boring_log::*;
pub use surface::*;
pub use water::*;
