//! Config Validation Tests
//!
//! Typo detection on raw TOML, typical-range warnings and hard validation
//! of `VizConfig`, exercised through the public config API.

use hddviz::config::validation::{
    known_config_keys, suggest_correction, validate_typical_ranges, validate_unknown_keys,
};
use hddviz::config::{ConfigError, VizConfig};
use hddviz::geometry::LayerMethod;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_geometry_key_warns_with_suggestion() {
    let toml_str = r#"
[geometry]
centerline_stp_ft = 5.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("centerline_stp_ft"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("geometry.centerline_step_ft")
    );
    assert!(warnings[0].to_string().contains("did you mean"));
}

#[test]
fn typo_in_layers_section_warns() {
    let toml_str = r#"
[layers]
metod = "depth"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("layers.method"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[geometry]
offset_correction_angle_deg = 233.5
centerline_step_ft = 10.0
corridor_half_width_ft = 5.0
lr_axis_padding_ft = 5.0

[water_volume]
half_width_ft = 50.0
sample_step_ft = 10.0
default_depth_ft = 10.0

[boring_boxes]
half_length_ft = 7.5
half_width_ft = 1.5

[layers]
method = "auto"

[export]
title = "Mill Creek Crossing"

[water_body]
name = "Mill Creek"
begin_station_ft = 250.0
end_station_ft = 400.0
water_elevation_ft = 92.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

#[test]
fn unknown_section_warns_for_table_and_keys() {
    let toml_str = r#"
[rendering]
opacity = 0.5
"#;
    let warnings = validate_unknown_keys(toml_str);
    let fields: Vec<&str> = warnings.iter().map(|w| w.field.as_str()).collect();
    assert_eq!(fields, vec!["rendering", "rendering.opacity"]);
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn malformed_toml_is_left_to_the_parser() {
    assert!(validate_unknown_keys("[geometry\nx = ").is_empty());
    assert!(matches!(
        VizConfig::from_toml_str("[geometry\nx = "),
        Err(ConfigError::Parse(_, _))
    ));
}

#[test]
fn known_keys_cover_every_serialized_field() {
    let mut config = VizConfig::default();
    config.water_body = Some(hddviz::config::WaterBodyConfig {
        name: "Creek".to_string(),
        begin_station_ft: 10.0,
        end_station_ft: 20.0,
        water_elevation_ft: 90.0,
    });
    let serialized = config.to_toml().expect("serialize");
    let warnings = validate_unknown_keys(&serialized);
    assert!(warnings.is_empty(), "known key set is missing: {warnings:?}");
    assert!(known_config_keys().contains("water_body.water_elevation_ft"));
}

#[test]
fn suggest_correction_returns_none_for_garbage() {
    let known = known_config_keys();
    assert_eq!(suggest_correction("zzzzzzzzzzzzzzzz", &known), None);
}

// ============================================================================
// Typical Ranges
// ============================================================================

#[test]
fn defaults_have_no_range_warnings() {
    assert!(validate_typical_ranges(&VizConfig::default()).is_empty());
}

#[test]
fn sub_foot_sampling_warns() {
    let mut config = VizConfig::default();
    config.geometry.centerline_step_ft = 0.25;
    let warnings = validate_typical_ranges(&config);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "geometry.centerline_step_ft");
}

#[test]
fn angle_outside_circle_warns_but_is_valid() {
    let config = VizConfig::from_toml_str("[geometry]\noffset_correction_angle_deg = 450.0\n")
        .expect("out-of-circle angle is still a valid config");
    let warnings = validate_typical_ranges(&config);
    assert!(warnings
        .iter()
        .any(|w| w.field == "geometry.offset_correction_angle_deg"));
}

// ============================================================================
// Hard Validation
// ============================================================================

#[test]
fn zero_corridor_width_is_error() {
    let result = VizConfig::from_toml_str("[geometry]\ncorridor_half_width_ft = 0.0\n");
    match result {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("corridor_half_width_ft"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn sampling_step_below_floor_is_error() {
    match VizConfig::from_toml_str("[water_volume]\nsample_step_ft = 1e-7\n") {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 1, "{errors:?}");
            assert!(errors[0].starts_with("water_volume.sample_step_ft"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let mut config = VizConfig::default();
    config.geometry.centerline_step_ft = 0.05;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    config.geometry.centerline_step_ft = 0.1;
    assert!(config.validate().is_ok());
}

#[test]
fn negative_padding_is_error() {
    let mut config = VizConfig::default();
    config.geometry.lr_axis_padding_ft = -1.0;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    config.geometry.lr_axis_padding_ft = 0.0;
    assert!(config.validate().is_ok());
}

#[test]
fn zero_length_water_body_is_error() {
    let toml_str = r#"
[water_body]
begin_station_ft = 300.0
end_station_ft = 300.0
water_elevation_ft = 90.0
"#;
    let err = VizConfig::from_toml_str(toml_str).expect_err("zero-length water body");
    assert!(err.to_string().contains("water_body"));
}

#[test]
fn unknown_layer_method_is_parse_error() {
    let result = VizConfig::from_toml_str("[layers]\nmethod = \"nearest\"\n");
    assert!(matches!(result, Err(ConfigError::Parse(_, _))));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn config_roundtrip_preserves_values() {
    let mut config = VizConfig::default();
    config.geometry.offset_correction_angle_deg = 180.0;
    config.layers.method = LayerMethod::Depth;
    config.export.title = "Crossing 7".to_string();

    let text = config.to_toml().expect("serialize");
    let parsed = VizConfig::from_toml_str(&text).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn load_from_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hddviz.toml");
    std::fs::write(&path, "[geometry]\ncenterline_step_ft = \"ten\"\n").expect("write");

    let err = VizConfig::load_from_file(&path).expect_err("bad value type");
    match &err {
        ConfigError::Parse(p, _) => assert_eq!(p, &path),
        other => panic!("expected parse error, got {other:?}"),
    }
    assert!(err.to_string().contains("hddviz.toml"));
}

#[test]
fn load_from_missing_file_is_io_error() {
    let result = VizConfig::load_from_file(std::path::Path::new("/nonexistent/hddviz.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_, _))));
}
