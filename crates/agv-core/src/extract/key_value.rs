//! Raw `Key: Value` harvesting.

use indexmap::IndexMap;

use super::normalize_whitespace;

/// Keys longer than this are treated as prose, not labels.
pub const MAX_KEY_CHARS: usize = 80;

/// Collect `Key: Value` pairs line by line.
///
/// Splits on the first colon and collapses whitespace on both sides. Pairs
/// with an empty side or an over-long key are dropped. A repeated key keeps
/// its first position but takes the last value.
pub fn extract_key_values(text: &str) -> IndexMap<String, String> {
    let mut kv = IndexMap::new();

    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };

        let key = normalize_whitespace(key);
        let value = normalize_whitespace(value);

        if key.is_empty() || value.is_empty() {
            continue;
        }
        if key.chars().count() > MAX_KEY_CHARS {
            continue;
        }

        kv.insert(key, value);
    }

    kv
}
