//! Visualization Configuration - geometry, mesh and export settings as TOML
//!
//! Each struct implements `Default` with the values in [`super::defaults`],
//! so a missing file or a missing section behaves exactly like the built-in
//! tool.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::geometry::LayerMethod;
use crate::types::{WaterBodyError, WaterBodyRegion};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an export run.
///
/// Load with `VizConfig::load()` which searches:
/// 1. `$HDDVIZ_CONFIG` env var
/// 2. `./hddviz.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VizConfig {
    /// Centerline, corridor and offset settings
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Water volume mesh sizing
    #[serde(default)]
    pub water_volume: WaterVolumeConfig,

    /// Boring-log layer box footprint
    #[serde(default)]
    pub boring_boxes: BoringBoxConfig,

    /// Soil-layer lookup
    #[serde(default)]
    pub layers: LayerConfig,

    /// HTML output
    #[serde(default)]
    pub export: ExportConfig,

    /// Optional water crossing for this run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_body: Option<WaterBodyConfig>,
}

impl VizConfig {
    /// Load configuration using the standard search order:
    /// 1. `$HDDVIZ_CONFIG` environment variable
    /// 2. `./hddviz.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./hddviz.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No config file found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate config text. Unknown keys are logged, not fatal.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!(field = %w.field, "{}", w);
        }

        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;

        for w in super::validation::validate_typical_ranges(&config) {
            warn!(field = %w.field, "{}", w);
        }
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate every value that would make the geometry meaningless.
    ///
    /// Rules:
    /// - All numbers must be finite
    /// - Sampling steps must be at least 0.1 ft, widths must be positive
    /// - A configured water body must have non-zero length
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let g = &self.geometry;
        let w = &self.water_volume;
        let b = &self.boring_boxes;

        Self::check_finite(g.offset_correction_angle_deg, "geometry.offset_correction_angle_deg", &mut errors);
        Self::check_at_least(g.centerline_step_ft, defaults::MIN_SAMPLE_STEP_FT, "geometry.centerline_step_ft", &mut errors);
        Self::check_positive(g.corridor_half_width_ft, "geometry.corridor_half_width_ft", &mut errors);
        Self::check_non_negative(g.lr_axis_padding_ft, "geometry.lr_axis_padding_ft", &mut errors);

        Self::check_positive(w.half_width_ft, "water_volume.half_width_ft", &mut errors);
        Self::check_at_least(w.sample_step_ft, defaults::MIN_SAMPLE_STEP_FT, "water_volume.sample_step_ft", &mut errors);
        Self::check_positive(w.default_depth_ft, "water_volume.default_depth_ft", &mut errors);

        Self::check_positive(b.half_length_ft, "boring_boxes.half_length_ft", &mut errors);
        Self::check_positive(b.half_width_ft, "boring_boxes.half_width_ft", &mut errors);

        if self.export.title.trim().is_empty() {
            errors.push("export.title: must not be empty".to_string());
        }
        if self.export.plotly_url.trim().is_empty() {
            errors.push("export.plotly_url: must not be empty".to_string());
        }

        if let Some(water) = &self.water_body {
            if let Err(e) = water.to_region() {
                errors.push(format!("water_body: {e}"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_finite(value: f64, name: &str, errors: &mut Vec<String>) -> bool {
        // NaN/Inf comparisons silently pass, catch them explicitly
        if value.is_finite() {
            true
        } else {
            errors.push(format!("{name}: value must be finite (got {value})"));
            false
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        if Self::check_finite(value, name, errors) && value <= 0.0 {
            errors.push(format!("{name}: must be > 0 (got {value})"));
        }
    }

    fn check_at_least(value: f64, min: f64, name: &str, errors: &mut Vec<String>) {
        if Self::check_finite(value, name, errors) && value < min {
            errors.push(format!("{name}: must be >= {min} (got {value})"));
        }
    }

    fn check_non_negative(value: f64, name: &str, errors: &mut Vec<String>) {
        if Self::check_finite(value, name, errors) && value < 0.0 {
            errors.push(format!("{name}: must be >= 0 (got {value})"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            Self::Parse(path, e) if path.as_os_str().is_empty() => write!(f, "Config parse error: {e}"),
            Self::Parse(path, e) => write!(f, "Config parse error ({}): {}", path.display(), e),
            Self::Serialize(e) => write!(f, "Config serialization error: {e}"),
            Self::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, e) => Some(e),
            Self::Parse(_, e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Adjusted lateral offset = `L/R * cos(angle)`. The shipped value has
    /// no documented derivation; review per project.
    #[serde(default = "default_offset_angle")]
    pub offset_correction_angle_deg: f64,

    #[serde(default = "default_centerline_step")]
    pub centerline_step_ft: f64,

    #[serde(default = "default_corridor_half_width")]
    pub corridor_half_width_ft: f64,

    #[serde(default = "default_lr_axis_padding")]
    pub lr_axis_padding_ft: f64,
}

fn default_offset_angle() -> f64 { defaults::OFFSET_CORRECTION_ANGLE_DEG }
fn default_centerline_step() -> f64 { defaults::CENTERLINE_STEP_FT }
fn default_corridor_half_width() -> f64 { defaults::CORRIDOR_HALF_WIDTH_FT }
fn default_lr_axis_padding() -> f64 { defaults::LR_AXIS_PADDING_FT }

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            offset_correction_angle_deg: default_offset_angle(),
            centerline_step_ft: default_centerline_step(),
            corridor_half_width_ft: default_corridor_half_width(),
            lr_axis_padding_ft: default_lr_axis_padding(),
        }
    }
}

// ============================================================================
// Water Volume
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterVolumeConfig {
    #[serde(default = "default_water_half_width")]
    pub half_width_ft: f64,

    /// Section spacing for the terrain-following slab
    #[serde(default = "default_water_step")]
    pub sample_step_ft: f64,

    /// Box depth below the water surface when no terrain is available
    #[serde(default = "default_water_depth")]
    pub default_depth_ft: f64,
}

fn default_water_half_width() -> f64 { defaults::WATER_HALF_WIDTH_FT }
fn default_water_step() -> f64 { defaults::WATER_SAMPLE_STEP_FT }
fn default_water_depth() -> f64 { defaults::WATER_DEFAULT_DEPTH_FT }

impl Default for WaterVolumeConfig {
    fn default() -> Self {
        Self {
            half_width_ft: default_water_half_width(),
            sample_step_ft: default_water_step(),
            default_depth_ft: default_water_depth(),
        }
    }
}

// ============================================================================
// Boring Boxes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoringBoxConfig {
    #[serde(default = "default_box_half_length")]
    pub half_length_ft: f64,

    #[serde(default = "default_box_half_width")]
    pub half_width_ft: f64,
}

fn default_box_half_length() -> f64 { defaults::BORING_BOX_HALF_LENGTH_FT }
fn default_box_half_width() -> f64 { defaults::BORING_BOX_HALF_WIDTH_FT }

impl Default for BoringBoxConfig {
    fn default() -> Self {
        Self {
            half_length_ft: default_box_half_length(),
            half_width_ft: default_box_half_width(),
        }
    }
}

// ============================================================================
// Layers
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(default)]
    pub method: LayerMethod,
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_plotly_url")]
    pub plotly_url: String,
}

fn default_title() -> String {
    defaults::DEFAULT_TITLE.to_string()
}

fn default_plotly_url() -> String {
    defaults::PLOTLY_URL.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            plotly_url: default_plotly_url(),
        }
    }
}

// ============================================================================
// Water Body
// ============================================================================

/// `[water_body]` table. Stations may be given in either order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterBodyConfig {
    #[serde(default = "default_water_name")]
    pub name: String,
    pub begin_station_ft: f64,
    pub end_station_ft: f64,
    pub water_elevation_ft: f64,
}

fn default_water_name() -> String {
    "Water Body".to_string()
}

impl WaterBodyConfig {
    pub fn to_region(&self) -> Result<WaterBodyRegion, WaterBodyError> {
        WaterBodyRegion::new(
            self.name.clone(),
            self.begin_station_ft,
            self.end_station_ft,
            self.water_elevation_ft,
        )
    }
}
