//! Config validation: unknown-key detection with Levenshtein suggestions
//! and typical-range checks.
//!
//! Two-pass parse approach: first parse raw TOML into `toml::Value`, walk
//! the key tree, compare against known field names, and emit warnings with
//! "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Complete set of valid dotted key paths for `VizConfig`.
///
/// Maintained by hand to match the struct hierarchy in `viz_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [geometry]
        "geometry",
        "geometry.offset_correction_angle_deg",
        "geometry.centerline_step_ft",
        "geometry.corridor_half_width_ft",
        "geometry.lr_axis_padding_ft",
        // [water_volume]
        "water_volume",
        "water_volume.half_width_ft",
        "water_volume.sample_step_ft",
        "water_volume.default_depth_ft",
        // [boring_boxes]
        "boring_boxes",
        "boring_boxes.half_length_ft",
        "boring_boxes.half_width_ft",
        // [layers]
        "layers",
        "layers.method",
        // [export]
        "export",
        "export.title",
        "export.plotly_url",
        // [water_body]
        "water_body",
        "water_body.name",
        "water_body.begin_station_ft",
        "water_body.end_station_ft",
        "water_body.water_elevation_ft",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties go to the alphabetically first key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        match best {
            Some((best_key, best_dist)) if dist > best_dist || (dist == best_dist && k >= best_key) => {}
            _ => best = Some((k, dist)),
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        // parse errors are reported by serde later
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Typical Range Validation
// ============================================================================

/// Values that are legal but probably not what the user meant.
pub fn validate_typical_ranges(config: &super::VizConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let g = &config.geometry;

    if !(0.0..360.0).contains(&g.offset_correction_angle_deg) {
        warnings.push(ValidationWarning {
            field: "geometry.offset_correction_angle_deg".to_string(),
            message: format!(
                "offset_correction_angle_deg = {:.1} is outside 0-360 degrees",
                g.offset_correction_angle_deg
            ),
            suggestion: None,
        });
    }

    // Sub-foot sampling of a long bore produces very large pages
    if g.centerline_step_ft < 1.0 {
        warnings.push(ValidationWarning {
            field: "geometry.centerline_step_ft".to_string(),
            message: format!("centerline_step_ft = {} is below 1 ft", g.centerline_step_ft),
            suggestion: None,
        });
    }
    if config.water_volume.sample_step_ft < 1.0 {
        warnings.push(ValidationWarning {
            field: "water_volume.sample_step_ft".to_string(),
            message: format!("sample_step_ft = {} is below 1 ft", config.water_volume.sample_step_ft),
            suggestion: None,
        });
    }

    if config.water_volume.half_width_ft > 1000.0 {
        warnings.push(ValidationWarning {
            field: "water_volume.half_width_ft".to_string(),
            message: format!(
                "half_width_ft = {:.1} is wider than 1000 ft",
                config.water_volume.half_width_ft
            ),
            suggestion: None,
        });
    }

    warnings
}

// ============================================================================
// Tests
// ============================================================================
