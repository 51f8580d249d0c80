//! Viewer shell and placeholder substitution
//!
//! The shell is a single HTML file compiled into the binary. Placeholders
//! look like `{{NAME}}`; every one must be supplied or rendering fails.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use rust_embed::Embed;

use super::ExportError;

/// Static viewer assets compiled from `assets/`.
#[derive(Embed)]
#[folder = "assets/"]
struct ViewerAssets;

/// File name of the HTML shell inside the embedded assets.
pub const VIEWER_TEMPLATE: &str = "viewer.html";

/// Every placeholder the shell is expected to contain.
pub const PLACEHOLDERS: &[&str] = &[
    "TITLE",
    "PLOTLY_URL",
    "GENERATED_AT",
    "HDD_DATA",
    "SURFACE_DATA",
    "BORING_LOG_DATA",
    "WATER_BODY",
    "ENTRY_POINT",
    "EXIT_POINT",
    "DERIVED_DATA",
];

#[allow(clippy::unwrap_used)]
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Literal pattern, cannot fail
    PATTERN.get_or_init(|| Regex::new(r"\{\{([A-Z][A-Z0-9_]*)\}\}").unwrap())
}

/// The embedded viewer shell as text.
pub fn viewer_template() -> Result<String, ExportError> {
    let file = ViewerAssets::get(VIEWER_TEMPLATE).ok_or_else(|| ExportError::MissingTemplate(VIEWER_TEMPLATE.to_string()))?;
    String::from_utf8(file.data.into_owned()).map_err(|_| ExportError::MissingTemplate(VIEWER_TEMPLATE.to_string()))
}

/// Names of all placeholders in `template`, in order of first appearance.
pub fn placeholders_in(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_pattern().captures_iter(template) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Replace every `{{NAME}}` in one pass. Substituted values are not
/// rescanned, so data containing braces is inserted verbatim.
pub fn fill_placeholders(template: &str, values: &HashMap<&str, String>) -> Result<String, ExportError> {
    let mut unresolved: Vec<String> = Vec::new();

    let rendered = placeholder_pattern().replace_all(template, |caps: &Captures<'_>| {
        let name = &caps[1];
        values.get(name).cloned().unwrap_or_else(|| {
            if !unresolved.iter().any(|n| n == name) {
                unresolved.push(name.to_string());
            }
            caps[0].to_string()
        })
    });

    if unresolved.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(ExportError::UnresolvedPlaceholder(unresolved.join(", ")))
    }
}

/// Serialize to JSON that cannot terminate an enclosing `<script>` block.
pub fn script_safe_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/"))
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_shell_has_every_placeholder() {
        let template = viewer_template().expect("template");
        let found = placeholders_in(&template);
        for name in PLACEHOLDERS {
            assert!(found.iter().any(|f| f == name), "shell is missing {{{{{name}}}}}");
        }
        assert_eq!(found.len(), PLACEHOLDERS.len(), "unexpected placeholders: {found:?}");
    }

    #[test]
    fn test_fill_single_pass() {
        let values: HashMap<&str, String> = [("A", "{{B}}".to_string()), ("B", "x".to_string())].into_iter().collect();
        let out = fill_placeholders("<{{A}}|{{B}}|{{A}}>", &values).expect("fill");
        assert_eq!(out, "<{{B}}|x|{{B}}>");
    }

    #[test]
    fn test_unresolved_placeholder() {
        let values: HashMap<&str, String> = [("A", "1".to_string())].into_iter().collect();
        match fill_placeholders("{{A}} {{MISSING}} {{MISSING}} {{OTHER}}", &values) {
            Err(ExportError::UnresolvedPlaceholder(names)) => assert_eq!(names, "MISSING, OTHER"),
            other => panic!("expected unresolved placeholder, got {other:?}"),
        }
    }

    #[test]
    fn test_script_safe_json() {
        let json = script_safe_json(&vec!["</script><script>alert(1)</script>"]).expect("json");
        assert!(!json.contains("</"));
        let back: Vec<String> = serde_json::from_str(&json).expect("valid json");
        assert_eq!(back[0], "</script><script>alert(1)</script>");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"Bore <A&B> "1""#), "Bore &lt;A&amp;B&gt; &quot;1&quot;");
    }
}
