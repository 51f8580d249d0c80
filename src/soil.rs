//! Soil-Color Classifier
//!
//! Maps a free-text geotechnical description to the display color used for
//! its layer. Keyword groups are checked in a fixed order and the first hit
//! wins, so "Sandy CLAY" renders as sand.

/// Keyword groups in priority order.
const SOIL_COLORS: &[(&[&str], &str)] = &[
    (&["SAND", "SANDY"], "#e6c35c"),
    (&["CLAY"], "#8b4513"),
    (&["SILT"], "#d2b48c"),
    (&["GRAVEL"], "#a0a0a0"),
    (&["LIMESTONE", "BEDROCK", "ROCK"], "#696969"),
    (&["TOP SOIL", "TOPSOIL"], "#3d2314"),
    (&["SHALE"], "#2f4f4f"),
    (&["ORGANIC", "PEAT"], "#000000"),
];

/// Color for descriptions that match no keyword
pub const DEFAULT_SOIL_COLOR: &str = "#a52a2a";

/// Classify a soil description into a hex color code.
pub fn classify_soil(description: &str) -> &'static str {
    let upper = description.to_uppercase();
    SOIL_COLORS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| upper.contains(k)))
        .map_or(DEFAULT_SOIL_COLOR, |(_, color)| color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_group_wins() {
        assert_eq!(classify_soil("Sandy Clay Loam"), "#e6c35c");
        assert_eq!(classify_soil("silty CLAY"), "#8b4513");
        assert_eq!(classify_soil("Clayey gravel"), "#8b4513");
    }

    #[test]
    fn test_each_group() {
        assert_eq!(classify_soil("silt"), "#d2b48c");
        assert_eq!(classify_soil("GRAVEL w/ cobbles"), "#a0a0a0");
        assert_eq!(classify_soil("Weathered bedrock"), "#696969");
        assert_eq!(classify_soil("Top soil"), "#3d2314");
        assert_eq!(classify_soil("TOPSOIL"), "#3d2314");
        assert_eq!(classify_soil("Gray shale"), "#2f4f4f");
        assert_eq!(classify_soil("Peat"), "#000000");
    }

    #[test]
    fn test_default_color() {
        assert_eq!(classify_soil("Fill"), DEFAULT_SOIL_COLOR);
        assert_eq!(classify_soil(""), DEFAULT_SOIL_COLOR);
    }
}
