//! Vendor brochure patterns (AGILOX device sections, FTS Move).

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use super::patterns::{AGILOX_PATTERNS, AGILOX_SECTIONS, FTS_MOVE_PATTERNS, FTS_TRIGGER};
use super::{find_first, normalize_whitespace};

/// Placeholder for a label the brochure does not mention.
pub const MISSING: &str = "NA";

/// Section name used when no device anchor is found.
pub const FULL_TEXT_SECTION: &str = "AGILOX (full_text)";

/// Device name for the FTS Move row.
pub const FTS_MOVE_DEVICE: &str = "FTS Move Standard";

/// Split brochure text into device sections.
///
/// Each anchor contributes at most its first hit; sections run from one hit to
/// the next in text order.
pub fn split_sections(text: &str) -> Vec<(&'static str, &str)> {
    let mut hits: Vec<(usize, &'static str)> = AGILOX_SECTIONS
        .iter()
        .filter_map(|(name, anchor)| anchor.find(text).map(|m| (m.start(), *name)))
        .collect();

    if hits.is_empty() {
        return vec![(FULL_TEXT_SECTION, text)];
    }

    hits.sort_by_key(|(pos, _)| *pos);

    hits.iter()
        .enumerate()
        .map(|(i, (start, name))| {
            let end = hits.get(i + 1).map(|(next, _)| *next).unwrap_or(text.len());
            (*name, &text[*start..end])
        })
        .collect()
}

fn pattern_row(
    vendor: &str,
    device: &str,
    patterns: &[(&'static str, Regex)],
    text: &str,
) -> IndexMap<String, String> {
    let mut row = IndexMap::new();
    row.insert("vendor".to_string(), vendor.to_string());
    row.insert("device".to_string(), device.to_string());

    for (key, pattern) in patterns {
        let value = find_first(pattern, text)
            .map(|v| normalize_whitespace(&v))
            .unwrap_or_else(|| MISSING.to_string());
        row.insert(key.to_string(), value);
    }

    row
}

/// Extract one AGILOX row from a section of text.
pub fn extract_agilox_specs(text: &str, device: &str) -> IndexMap<String, String> {
    pattern_row("AGILOX", device, &AGILOX_PATTERNS, text)
}

/// Extract the FTS Move row.
pub fn extract_fts_move_specs(text: &str) -> IndexMap<String, String> {
    pattern_row("WEWO/FTS", FTS_MOVE_DEVICE, &FTS_MOVE_PATTERNS, text)
}

/// Run all vendor patterns over a document: one row per AGILOX section, plus
/// an FTS Move row when the text mentions that product line.
pub fn extract_vendor_rows(text: &str) -> Vec<IndexMap<String, String>> {
    let mut rows: Vec<_> = split_sections(text)
        .into_iter()
        .map(|(device, section)| extract_agilox_specs(section, device))
        .collect();

    if FTS_TRIGGER.is_match(text) {
        debug!("FTS Move markers found, adding FTS row");
        rows.push(extract_fts_move_specs(text));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NFK_BROCHURE: &str = "AGILOX NFK\n\
        ABMASSE (L x B x H) 1680 x 830 x 2150 MM (66.1 x 32.7 x 84.6 in)\n\
        EIGENGEWICHT 580KG (1279 lbs)\n\
        MAX. LAST 1200 KG (2646 lbs)\n\
        DREHKREIS 1200 MM (47.2 in)\n";

    #[test]
    fn test_split_sections_orders_by_position() {
        let text = "intro AGILOX ONE specs ... later the NFK model";
        let sections = split_sections(text);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, "AGILOX ONE");
        assert!(sections[0].1.starts_with("AGILOX ONE"));
        assert_eq!(sections[1].0, "AGILOX Narrowfork (NFK)");
        assert_eq!(sections[1].1, "NFK model");
    }

    #[test]
    fn test_split_sections_without_anchor() {
        let sections = split_sections("Tragfähigkeit: 500 kg");
        assert_eq!(sections, vec![(FULL_TEXT_SECTION, "Tragfähigkeit: 500 kg")]);
    }

    #[test]
    fn test_agilox_row() {
        let rows = extract_vendor_rows(NFK_BROCHURE);
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row["vendor"], "AGILOX");
        assert_eq!(row["device"], "AGILOX Narrowfork (NFK)");
        assert_eq!(row["abmasse"], "1680 x 830 x 2150 MM (66.1 x 32.7 x 84.6 in)");
        assert_eq!(row["eigengewicht"], "580KG (1279 lbs)");
        assert_eq!(row["max_last"], "1200 KG (2646 lbs)");
        assert_eq!(row["drehkreis"], "1200 MM (47.2 in)");
        assert_eq!(row["max_hubhoehe"], MISSING);
        assert_eq!(row["ladezeit"], MISSING);
    }

    #[test]
    fn test_fts_row_added_on_trigger() {
        let text = "WEWO FTS Move\nAbmessungen: 1200 x 800 x 300 mm (LxBxH)\nTragfähigkeit: 1000 kg\n";
        let rows = extract_vendor_rows(text);

        assert_eq!(rows.len(), 2);
        let fts = &rows[1];
        assert_eq!(fts["vendor"], "WEWO/FTS");
        assert_eq!(fts["device"], FTS_MOVE_DEVICE);
        assert_eq!(fts["abmessungen"], "1200 x 800 x 300 mm (LxBxH)");
        assert_eq!(fts["tragfaehigkeit"], "1000 kg");
        assert_eq!(fts["zertifizierung"], MISSING);
    }
}
