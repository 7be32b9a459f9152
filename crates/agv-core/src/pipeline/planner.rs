//! Per-document tool selection.

use crate::models::Tool;

/// Lowercase markers of AGILOX brochure text.
const VENDOR_MARKERS: [&str; 4] = ["agilox", "nfk", "drehkreis", "eigengewicht"];

/// Whether the text looks like an AGILOX brochure.
pub fn looks_like_vendor_brochure(text: &str) -> bool {
    let text = text.to_lowercase();
    VENDOR_MARKERS.iter().any(|m| text.contains(m))
}

/// Tool order for a document.
pub fn plan(text: &str) -> Vec<Tool> {
    if looks_like_vendor_brochure(text) {
        vec![Tool::VendorPatterns, Tool::KeyValue, Tool::ModelAssisted]
    } else {
        vec![Tool::KeyValue, Tool::GenericLabels, Tool::ModelAssisted]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vendor_plan() {
        for text in ["AGILOX ONE", "Typ: nfk", "DREHKREIS 1200 MM", "Eigengewicht: 580 kg"] {
            assert_eq!(
                plan(text),
                vec![Tool::VendorPatterns, Tool::KeyValue, Tool::ModelAssisted],
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_generic_plan() {
        assert_eq!(
            plan("Payload: 500 kg"),
            vec![Tool::KeyValue, Tool::GenericLabels, Tool::ModelAssisted]
        );
        assert_eq!(plan("").len(), 3);
    }
}
