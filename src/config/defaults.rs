//! Built-in default constants.
//!
//! Every tunable here has a matching field in [`VizConfig`](super::VizConfig);
//! these are the values used when no config file sets them.

// ============================================================================
// Config Discovery
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "HDDVIZ_CONFIG";

/// Config file looked up in the current working directory.
pub const LOCAL_CONFIG_FILE: &str = "hddviz.toml";

// ============================================================================
// Geometry
// ============================================================================

/// Lateral-offset correction angle (degrees). Adjusted offset is
/// `L/R * cos(angle)`; 233.5 is the field calibration the tool shipped with.
pub const OFFSET_CORRECTION_ANGLE_DEG: f64 = 233.5;

/// Station spacing of ground samples along the centerline (ft).
pub const CENTERLINE_STEP_FT: f64 = 10.0;

/// Smallest accepted sampling step for the centerline and water sections (ft).
pub const MIN_SAMPLE_STEP_FT: f64 = 0.1;

/// Half width of the centerline corridor ribbon (ft).
pub const CORRIDOR_HALF_WIDTH_FT: f64 = 5.0;

/// Padding added to the largest lateral offset for the 3D axis range (ft).
pub const LR_AXIS_PADDING_FT: f64 = 5.0;

// ============================================================================
// Water Volume
// ============================================================================

/// Lateral half width of the water volume (ft).
pub const WATER_HALF_WIDTH_FT: f64 = 50.0;

/// Station spacing of terrain-following water sections (ft).
pub const WATER_SAMPLE_STEP_FT: f64 = 10.0;

/// Depth of the flat-bottomed water box when no terrain is available (ft).
pub const WATER_DEFAULT_DEPTH_FT: f64 = 10.0;

// ============================================================================
// Boring Boxes
// ============================================================================

/// Half length (along station) of a boring-log layer box (ft).
pub const BORING_BOX_HALF_LENGTH_FT: f64 = 7.5;

/// Half width (lateral) of a boring-log layer box (ft).
pub const BORING_BOX_HALF_WIDTH_FT: f64 = 1.5;

// ============================================================================
// Export
// ============================================================================

pub const DEFAULT_TITLE: &str = "HDD Bore Geometry Visualization";

/// Plotting library loaded by the generated page.
pub const PLOTLY_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/plotly.js/2.27.1/plotly.min.js";
