//! HTML Export
//!
//! Fills the embedded viewer shell with the assembled dataset and writes a
//! single self-contained HTML file. Data goes in as JSON literals inside the
//! page's script block; the title goes in as escaped text.

mod template;

pub use template::{
    escape_html, fill_placeholders, placeholders_in, script_safe_json, viewer_template, PLACEHOLDERS,
    VIEWER_TEMPLATE,
};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::assembler::{BoringBox, CorridorGrid, DatasetSummary, JointAnnotation, VizDataset, WaterVolume};
use crate::config::ExportConfig;
use crate::geometry::Trace;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize visualization data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("viewer template '{0}' is not embedded or not UTF-8")]
    MissingTemplate(String),

    #[error("template placeholder(s) left unresolved: {0}")]
    UnresolvedPlaceholder(String),

    #[error("failed to write {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Page-level settings for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub title: String,
    pub plotly_url: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportOptions {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            title: config.title.clone(),
            plotly_url: config.plotly_url.clone(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Derived geometry handed to the viewer as one object.
#[derive(Serialize)]
struct DerivedData<'a> {
    annotations: &'a [JointAnnotation],
    centerline: &'a Trace,
    corridor: &'a CorridorGrid,
    boring_boxes: &'a [BoringBox],
    water_volume: Option<&'a WaterVolume>,
    lr_axis_range_ft: f64,
    summary: &'a DatasetSummary,
}

/// Render the complete page for a dataset.
pub fn render_html(dataset: &VizDataset, options: &ExportOptions) -> Result<String, ExportError> {
    let derived = DerivedData {
        annotations: &dataset.annotations,
        centerline: &dataset.centerline,
        corridor: &dataset.corridor,
        boring_boxes: &dataset.boring_boxes,
        water_volume: dataset.water_volume.as_ref(),
        lr_axis_range_ft: dataset.lr_axis_range_ft,
        summary: &dataset.summary,
    };

    let values: HashMap<&str, String> = HashMap::from([
        ("TITLE", escape_html(&options.title)),
        ("PLOTLY_URL", escape_html(&options.plotly_url)),
        ("GENERATED_AT", options.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ("HDD_DATA", script_safe_json(&dataset.joints)?),
        ("SURFACE_DATA", script_safe_json(&dataset.surface_profile)?),
        ("BORING_LOG_DATA", script_safe_json(&dataset.boring_logs)?),
        (
            "WATER_BODY",
            script_safe_json(&dataset.water_volume.as_ref().map(|w| &w.region))?,
        ),
        ("ENTRY_POINT", script_safe_json(&dataset.entry_exit.entry)?),
        ("EXIT_POINT", script_safe_json(&dataset.entry_exit.exit)?),
        ("DERIVED_DATA", script_safe_json(&derived)?),
    ]);

    fill_placeholders(&viewer_template()?, &values)
}

/// Output file for an export.
///
/// A requested name without an extension gets `.html`; with no request the
/// bore file's stem is used.
pub fn resolve_output_path(requested: Option<&str>, bore_path: &Path) -> PathBuf {
    let mut path = match requested.map(str::trim).filter(|r| !r.is_empty()) {
        Some(name) => PathBuf::from(name),
        None => PathBuf::from(
            bore_path
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("hdd_visualization"),
        ),
    };

    if path.extension().is_none() {
        path.set_extension("html");
    }
    path
}

/// Render and write the page. Returns the number of bytes written.
pub fn export_html(dataset: &VizDataset, options: &ExportOptions, path: &Path) -> Result<usize, ExportError> {
    let html = render_html(dataset, options)?;
    std::fs::write(path, &html).map_err(|e| ExportError::Io(path.to_path_buf(), e))?;

    tracing::info!(
        path = %path.display(),
        bytes = html.len(),
        joints = dataset.joints.len(),
        "Wrote HTML visualization"
    );
    Ok(html.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble, Overlays};
    use crate::config::VizConfig;
    use crate::geometry::LayerMethod;
    use crate::types::BoreJoint;
    use chrono::TimeZone;

    fn dataset() -> VizDataset {
        let joint = |n: i64, station: f64, elev: f64| BoreJoint {
            joint_number: n,
            length_ft: 15.0,
            inclination_deg: -8.0,
            left_right_offset_ft: 0.4,
            raw_azimuth_deg: 90.0,
            station_ft: station,
            elevation_ft: elev,
        };
        assemble(
            &[joint(1, 0.0, 100.0), joint(2, 15.0, 98.0), joint(3, 30.0, 97.5)],
            Overlays::default(),
            LayerMethod::Auto,
            &VizConfig::default(),
        )
        .expect("assemble")
    }

    fn options(title: &str) -> ExportOptions {
        ExportOptions {
            title: title.to_string(),
            plotly_url: "https://cdn.example/plotly.js".to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).single().expect("time"),
        }
    }

    #[test]
    fn test_render_replaces_everything() {
        let html = render_html(&dataset(), &options("Bore <A> & B")).expect("render");
        assert!(placeholders_in(&html).is_empty());
        assert!(html.contains("<title>Bore &lt;A&gt; &amp; B</title>"));
        assert!(html.contains("Generated 2026-03-04 05:06 UTC"));
        assert!(html.contains(r#""Joint":2"#));
        assert!(html.contains("const waterBody = null;"));
    }

    #[test]
    fn test_script_tag_in_data_cannot_escape() {
        let mut data = dataset();
        data.annotations[0].layer_note = "</script><script>alert(1)</script>".to_string();
        let html = render_html(&data, &options("t")).expect("render");
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains(r"<\/script><script>alert(1)<\/script>"));
    }

    #[test]
    fn test_output_path_defaults() {
        let bore = Path::new("/data/Crossing-7.xlsx");
        assert_eq!(resolve_output_path(None, bore), PathBuf::from("Crossing-7.html"));
        assert_eq!(resolve_output_path(Some("  "), bore), PathBuf::from("Crossing-7.html"));
        assert_eq!(resolve_output_path(Some("report"), bore), PathBuf::from("report.html"));
        assert_eq!(resolve_output_path(Some("out/report.htm"), bore), PathBuf::from("out/report.htm"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bore.html");
        let bytes = export_html(&dataset(), &options("Bore"), &path).expect("export");
        let written = std::fs::read_to_string(&path).expect("read");
        assert_eq!(written.len(), bytes);
        assert!(written.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_export_to_missing_directory() {
        let result = export_html(&dataset(), &options("Bore"), Path::new("/nonexistent/dir/out.html"));
        assert!(matches!(result, Err(ExportError::Io(_, _))));
    }
}
