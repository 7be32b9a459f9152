//! The closed set of extraction tools.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One extraction technique, each with its own confidence profile.
///
/// The planner can only emit these variants and the orchestrator dispatches
/// on them with an exhaustive match, so an unknown tool cannot be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Vendor brochure patterns (AGILOX, FTS Move).
    #[serde(rename = "regex_agilox")]
    VendorPatterns,
    /// `Key: Value` harvesting into a raw table.
    #[serde(rename = "key_value")]
    KeyValue,
    /// Generic `Label: value` scanning for a fixed feature list.
    #[serde(rename = "regex_generic")]
    GenericLabels,
    /// Model-assisted field filling.
    #[serde(rename = "llm")]
    ModelAssisted,
}

impl Tool {
    /// Identifier written to tool traces and `source_<field>` columns.
    pub fn id(self) -> &'static str {
        match self {
            Tool::VendorPatterns => "regex_agilox",
            Tool::KeyValue => "key_value",
            Tool::GenericLabels => "regex_generic",
            Tool::ModelAssisted => "llm",
        }
    }

    /// Flat confidence assigned to every field this tool proposes.
    pub fn default_confidence(self) -> f64 {
        match self {
            Tool::KeyValue => 0.55,
            Tool::VendorPatterns | Tool::GenericLabels | Tool::ModelAssisted => 0.65,
        }
    }

    /// Whether this tool needs a configured model backend.
    pub fn needs_model_backend(self) -> bool {
        matches!(self, Tool::ModelAssisted)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_serde_names() {
        for tool in [
            Tool::VendorPatterns,
            Tool::KeyValue,
            Tool::GenericLabels,
            Tool::ModelAssisted,
        ] {
            let json = serde_json::to_string(&tool).unwrap();
            assert_eq!(json, format!("\"{}\"", tool.id()));
        }
    }

    #[test]
    fn test_key_value_is_least_trusted() {
        assert!(Tool::KeyValue.default_confidence() < Tool::VendorPatterns.default_confidence());
        assert!(Tool::ModelAssisted.needs_model_backend());
        assert!(!Tool::KeyValue.needs_model_backend());
    }
}
