//! Mapping raw vendor vocabulary onto canonical fields.

use tracing::trace;

use crate::extract::patterns::{DIMENSION_NUMBER, NUMBER_TOKEN};
use crate::models::{Candidate, Evidence, Field, FieldValue, RAW_TABLE_FIELD};

/// Raw-key fragments (lowercase, substring match) per target.
const DIMENSION_KEYS: [&str; 3] = ["abmess", "abmasse", "dimensions"];
const KV_VOCABULARY: [(Field, &[&str]); 5] = [
    (Field::PayloadKg, &["trag", "payload", "last"]),
    (Field::SpeedMS, &["geschwind", "speed"]),
    (Field::WeightKg, &["eigengewicht", "weight"]),
    (Field::TurningRadiusMm, &["drehkreis", "turn"]),
    (Field::LiftHeightMm, &["hubh", "lift"]),
];

/// Exact raw field names from the vendor and label tools, used only to fill
/// canonical fields that are still unset.
const DIMENSION_ALIASES: [&str; 3] = ["abmasse", "abmessungen", "dimensions"];
const FIELD_ALIASES: [(Field, &[&str]); 5] = [
    (Field::PayloadKg, &["max_last", "tragfaehigkeit", "payload"]),
    (Field::WeightKg, &["eigengewicht", "weight"]),
    (Field::TurningRadiusMm, &["drehkreis", "turning radius"]),
    (Field::LiftHeightMm, &["max_hubhoehe", "hubhoehe"]),
    (Field::SpeedMS, &["hoechstgeschwindigkeit", "speed"]),
];

/// First number in a string, accepting `,` or `.` as decimal separator.
///
/// Units and bracketed alternates are ignored: `"1.200 KG (2646 lbs)"` gives
/// `1.2`, `"1,5 m/s"` gives `1.5`.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.replace(',', ".");
    NUMBER_TOKEN
        .find(&s)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Length, width and height from the first three numbers of a dimension
/// string. Fewer than three numbers is no result.
pub fn parse_dimensions(s: &str) -> Option<[f64; 3]> {
    let nums: Vec<f64> = DIMENSION_NUMBER
        .find_iter(&s.to_lowercase())
        .filter_map(|m| parse_number(m.as_str()))
        .take(3)
        .collect();

    match nums.as_slice() {
        [l, w, h] => Some([*l, *w, *h]),
        _ => None,
    }
}

fn number_or_null(s: &str) -> FieldValue {
    parse_number(s).map(FieldValue::Number).unwrap_or(FieldValue::Null)
}

/// Write a derived field, inheriting confidence from its source field.
fn derive(
    candidate: &mut Candidate,
    field: Field,
    value: FieldValue,
    confidence: f64,
    snippet: &str,
) {
    trace!("{} -> {} = {:?}", candidate.tool, field.name(), value);
    let evidence = Evidence {
        snippet: Some(snippet.to_string()),
        source_tool: candidate.tool,
        source_document: candidate.document_id.clone(),
    };
    let name = field.name().to_string();
    candidate.fields.insert(name.clone(), value);
    candidate.confidence.insert(name.clone(), confidence);
    candidate.evidence.insert(name, evidence);
}

fn source_confidence(candidate: &Candidate, name: &str) -> f64 {
    candidate
        .confidence
        .get(name)
        .copied()
        .unwrap_or_else(|| candidate.tool.default_confidence())
}

/// Coerce canonical fields to their declared types.
fn coerce_canonical(candidate: &mut Candidate) {
    for field in Field::ALL {
        let Some(value) = candidate.fields.get_mut(field.name()) else {
            continue;
        };
        let coerced = match (&*value, field.is_numeric()) {
            (FieldValue::Text(s), true) => number_or_null(s),
            (FieldValue::Number(n), false) => FieldValue::Text(n.to_string()),
            (FieldValue::Table(_), _) => FieldValue::Null,
            _ => continue,
        };
        *value = coerced;
    }
}

/// Interpret a raw key/value table. Keys are visited in insertion order, so
/// the last matching key wins.
fn apply_raw_table(candidate: &mut Candidate) {
    let Some(FieldValue::Table(kv)) = candidate.fields.get(RAW_TABLE_FIELD).cloned() else {
        return;
    };
    let confidence = source_confidence(candidate, RAW_TABLE_FIELD);

    for (key, value) in &kv {
        let key_lower = key.to_lowercase();
        let snippet = format!("{}: {}", key, value);

        if DIMENSION_KEYS.iter().any(|k| key_lower.contains(k)) {
            if let Some(dims) = parse_dimensions(value) {
                for (field, n) in Field::DIMENSIONS.into_iter().zip(dims) {
                    derive(candidate, field, FieldValue::Number(n), confidence, &snippet);
                }
            }
        }

        for (field, fragments) in KV_VOCABULARY {
            if fragments.iter().any(|k| key_lower.contains(k)) {
                derive(candidate, field, number_or_null(value), confidence, &snippet);
            }
        }
    }
}

/// Fill still-unset canonical fields from vendor/tool raw names.
fn apply_aliases(candidate: &mut Candidate) {
    for alias in DIMENSION_ALIASES {
        let Some(raw) = candidate.fields.get(alias).and_then(FieldValue::as_text) else {
            continue;
        };
        let raw = raw.to_string();
        let Some(dims) = parse_dimensions(&raw) else {
            continue;
        };
        let confidence = source_confidence(candidate, alias);
        for (field, n) in Field::DIMENSIONS.into_iter().zip(dims) {
            if candidate.is_unset(field.name()) {
                derive(candidate, field, FieldValue::Number(n), confidence, &raw);
            }
        }
    }

    for (field, aliases) in FIELD_ALIASES {
        for alias in aliases.iter().copied() {
            if !candidate.is_unset(field.name()) {
                break;
            }
            let Some(raw) = candidate.fields.get(alias).and_then(FieldValue::as_text) else {
                continue;
            };
            let raw = raw.to_string();
            if let Some(n) = parse_number(&raw) {
                let confidence = source_confidence(candidate, alias);
                derive(candidate, field, FieldValue::Number(n), confidence, &raw);
            }
        }
    }
}

/// Copy a raw `device` alias into `device_name` when that is missing.
fn apply_device_alias(candidate: &mut Candidate) {
    if candidate.fields.contains_key(Field::DeviceName.name()) {
        return;
    }
    let Some(device) = candidate.fields.get("device").cloned() else {
        return;
    };
    let confidence = source_confidence(candidate, "device");
    let snippet = device.as_text().unwrap_or_default().to_string();
    derive(candidate, Field::DeviceName, device, confidence, &snippet);
}

/// Rewrite a candidate so that canonical fields hold typed values.
///
/// Raw keys stay in place; the merger ignores anything non-canonical. Never
/// fails: unparseable values become null or are left unset.
pub fn normalize_candidate(mut candidate: Candidate) -> Candidate {
    coerce_canonical(&mut candidate);
    apply_raw_table(&mut candidate);
    apply_aliases(&mut candidate);
    apply_device_alias(&mut candidate);
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tool;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn kv(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn number(c: &Candidate, field: Field) -> Option<f64> {
        c.fields.get(field.name()).and_then(FieldValue::as_number)
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("500 kg"), Some(500.0));
        assert_eq!(parse_number("1,5 m/s"), Some(1.5));
        assert_eq!(parse_number("max. 2.2 m/s (7.9 km/h)"), Some(2.2));
        assert_eq!(parse_number("-3 mm"), Some(-3.0));
        assert_eq!(parse_number("NA"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("1500 x 800 x 1200 mm"), Some([1500.0, 800.0, 1200.0]));
        assert_eq!(parse_dimensions("1500x800x1200MM"), Some([1500.0, 800.0, 1200.0]));
        assert_eq!(
            parse_dimensions("1680 × 830 × 2150 MM (66.1 x 32.7 x 84.6 in)"),
            Some([1680.0, 830.0, 2150.0])
        );
        assert_eq!(parse_dimensions("1500 x 800"), None);
    }

    #[test]
    fn test_raw_table_scenario() {
        let table = kv(&[
            ("Abmessungen", "1500 x 800 x 1200 mm"),
            ("Tragfähigkeit", "500 kg"),
        ]);
        let c = normalize_candidate(Candidate::from_key_values(table, "doc.txt", Tool::KeyValue));

        assert_eq!(number(&c, Field::LengthMm), Some(1500.0));
        assert_eq!(number(&c, Field::WidthMm), Some(800.0));
        assert_eq!(number(&c, Field::HeightMm), Some(1200.0));
        assert_eq!(number(&c, Field::PayloadKg), Some(500.0));
        assert_eq!(c.confidence["payload_kg"], 0.55);
        assert_eq!(
            c.evidence["payload_kg"].snippet.as_deref(),
            Some("Tragfähigkeit: 500 kg")
        );
        assert_eq!(c.evidence["length_mm"].source_tool, Tool::KeyValue);
    }

    #[test]
    fn test_raw_table_last_matching_key_wins() {
        let table = kv(&[("Max. Last", "800 kg"), ("Payload", "1000 kg")]);
        let c = normalize_candidate(Candidate::from_key_values(table, "doc", Tool::KeyValue));
        assert_eq!(number(&c, Field::PayloadKg), Some(1000.0));

        let table = kv(&[("Payload", "1000 kg"), ("Max. Last", "800 kg")]);
        let c = normalize_candidate(Candidate::from_key_values(table, "doc", Tool::KeyValue));
        assert_eq!(number(&c, Field::PayloadKg), Some(800.0));
    }

    #[test]
    fn test_raw_table_unparseable_is_null() {
        let table = kv(&[("Speed", "fast"), ("Dimensions", "compact")]);
        let c = normalize_candidate(Candidate::from_key_values(table, "doc", Tool::KeyValue));

        assert_eq!(c.fields.get("speed_m_s"), Some(&FieldValue::Null));
        assert!(!c.fields.contains_key("length_mm"));
    }

    #[test]
    fn test_vendor_aliases_fill_unset_only() {
        let c = Candidate::new("brochure.pdf", Tool::VendorPatterns)
            .with_field("device_name", FieldValue::Text("AGILOX ONE".into()), 0.65, None)
            .with_field("abmasse", FieldValue::Text("1500 x 800 x 1200 MM".into()), 0.65, None)
            .with_field("max_last", FieldValue::Text("1.200 KG (2646 lbs)".into()), 0.65, None)
            .with_field("eigengewicht", FieldValue::Text("NA".into()), 0.65, None)
            .with_field("drehkreis", FieldValue::Text("1200 MM (47.2 in)".into()), 0.65, None)
            .with_field("weight_kg", FieldValue::Number(580.0), 0.9, None);
        let c = normalize_candidate(c);

        assert_eq!(number(&c, Field::LengthMm), Some(1500.0));
        assert_eq!(number(&c, Field::PayloadKg), Some(1.2));
        assert_eq!(number(&c, Field::TurningRadiusMm), Some(1200.0));
        assert_eq!(number(&c, Field::WeightKg), Some(580.0));
        assert_eq!(c.confidence["weight_kg"], 0.9);
        assert_eq!(
            c.evidence["turning_radius_mm"].snippet.as_deref(),
            Some("1200 MM (47.2 in)")
        );
        assert!(!c.fields.contains_key("lift_height_mm"));
    }

    #[test]
    fn test_generic_labels_become_canonical() {
        let mut row = IndexMap::new();
        row.insert("dimensions".to_string(), FieldValue::Text("1200 x 600 x 400 mm".into()));
        row.insert("payload".to_string(), FieldValue::Text("300 kg".into()));
        row.insert("speed".to_string(), FieldValue::Null);
        row.insert("turning radius".to_string(), FieldValue::Text("900 mm".into()));
        let c = normalize_candidate(Candidate::from_flat(row, "doc", Tool::GenericLabels));

        assert_eq!(number(&c, Field::WidthMm), Some(600.0));
        assert_eq!(number(&c, Field::PayloadKg), Some(300.0));
        assert_eq!(number(&c, Field::TurningRadiusMm), Some(900.0));
        assert!(c.is_unset("speed_m_s"));
    }

    #[test]
    fn test_canonical_values_are_coerced() {
        let c = Candidate::new("doc", Tool::ModelAssisted)
            .with_field("payload_kg", FieldValue::Text("500 kg".into()), 0.65, None)
            .with_field("speed_m_s", FieldValue::Text("unknown".into()), 0.65, None)
            .with_field("device_name", FieldValue::Number(7.0), 0.65, None);
        let c = normalize_candidate(c);

        assert_eq!(number(&c, Field::PayloadKg), Some(500.0));
        assert!(c.fields["speed_m_s"].is_null());
        assert_eq!(c.fields["device_name"], FieldValue::Text("7".into()));
    }

    #[test]
    fn test_device_alias_copied() {
        let c = Candidate::new("doc", Tool::VendorPatterns)
            .with_field("device", FieldValue::Text("FTS Move".into()), 0.65, None);
        let c = normalize_candidate(c);

        assert_eq!(c.fields["device_name"], FieldValue::Text("FTS Move".into()));
        assert_eq!(c.confidence["device_name"], 0.65);
    }
}
