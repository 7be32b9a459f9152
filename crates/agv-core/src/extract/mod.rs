//! Text-to-raw-fields extractors, one per tool.

pub mod agilox;
pub mod generic;
pub mod key_value;
pub mod llm;
pub mod patterns;

pub use agilox::extract_vendor_rows;
pub use generic::{GENERIC_FEATURES, extract_features};
pub use key_value::extract_key_values;
pub use llm::{FieldOracle, oracle_for};

use regex::Regex;

use patterns::WHITESPACE;

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// First capture group of the first match (or the whole match), trimmed.
pub fn find_first(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    let m = caps.get(1).or_else(|| caps.get(0))?;
    Some(m.as_str().trim().to_string())
}
