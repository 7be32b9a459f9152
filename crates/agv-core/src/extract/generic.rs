//! Generic `Label: value` scanning.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Labels scanned by the generic tool.
pub const GENERIC_FEATURES: [&str; 5] = [
    "dimensions",
    "payload",
    "speed",
    "weight",
    "turning radius",
];

lazy_static! {
    /// Compiled label patterns for [`GENERIC_FEATURES`].
    static ref GENERIC_LABELS: Vec<(&'static str, Regex)> = GENERIC_FEATURES
        .iter()
        .map(|feature| (*feature, Regex::new(&label_pattern(feature)).unwrap()))
        .collect();
}

fn label_pattern(feature: &str) -> String {
    format!(r"(?i){}\s*[:\-]\s*([^\n\r]+)", regex::escape(feature))
}

fn capture_value(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Find `Feature: value` or `Feature - value` for each feature.
///
/// Matching is case-insensitive; the value runs to the end of the line. Every
/// requested feature appears in the result, `None` when not found. The
/// standard labels use precompiled patterns.
pub fn extract_features(text: &str, features: &[&str]) -> IndexMap<String, Option<String>> {
    let mut data = IndexMap::new();

    for feature in features {
        let cached = GENERIC_LABELS
            .iter()
            .find(|(label, _)| label == feature)
            .map(|(_, re)| re);

        let value = match cached {
            Some(re) => capture_value(re, text),
            None => match Regex::new(&label_pattern(feature)) {
                Ok(re) => capture_value(&re, text),
                Err(e) => {
                    debug!("Skipping feature {}: {}", feature, e);
                    None
                }
            },
        };
        data.insert(feature.to_string(), value);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generic_labels() {
        let text = "Product sheet\nDimensions: 1500 x 800 x 1200 mm\nPAYLOAD - 500 kg \nSpeed:2 m/s\n";
        let found = extract_features(text, &GENERIC_FEATURES);

        assert_eq!(found.len(), 5);
        assert_eq!(found["dimensions"].as_deref(), Some("1500 x 800 x 1200 mm"));
        assert_eq!(found["payload"].as_deref(), Some("500 kg"));
        assert_eq!(found["speed"].as_deref(), Some("2 m/s"));
        assert_eq!(found["weight"], None);
        assert_eq!(found["turning radius"], None);
    }

    #[test]
    fn test_label_table_matches_features() {
        let labels: Vec<&str> = GENERIC_LABELS.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, GENERIC_FEATURES.to_vec());
    }

    #[test]
    fn test_custom_feature() {
        let found = extract_features("Lift height - 1600 mm\n", &["lift height", "payload"]);
        assert_eq!(found["lift height"].as_deref(), Some("1600 mm"));
        assert_eq!(found["payload"], None);
    }
}
