//! Completeness score over the core fields.

use crate::models::{CanonicalSpec, Field, FieldValue};

/// Fraction of core fields that are populated; text must be non-blank.
pub fn completeness_score(spec: &CanonicalSpec) -> f64 {
    let filled = Field::CORE
        .iter()
        .filter(|field| match spec.value(**field) {
            Some(FieldValue::Text(s)) => !s.trim().is_empty(),
            Some(FieldValue::Number(_)) => true,
            _ => false,
        })
        .count();

    filled as f64 / Field::CORE.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(spec: &mut CanonicalSpec, field: Field, value: FieldValue) {
        assert!(spec.set(field, &value, 0.5, None));
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(completeness_score(&CanonicalSpec::default()), 0.0);
    }

    #[test]
    fn test_only_core_fields_count() {
        let mut spec = CanonicalSpec::default();
        set(&mut spec, Field::Vendor, FieldValue::Text("AGILOX".into()));
        set(&mut spec, Field::WeightKg, FieldValue::Number(580.0));
        set(&mut spec, Field::LiftHeightMm, FieldValue::Number(1600.0));
        assert_eq!(completeness_score(&spec), 0.0);

        set(&mut spec, Field::PayloadKg, FieldValue::Number(500.0));
        set(&mut spec, Field::SpeedMS, FieldValue::Number(1.2));
        set(&mut spec, Field::LengthMm, FieldValue::Number(1500.0));
        assert_eq!(completeness_score(&spec), 0.5);
    }

    #[test]
    fn test_blank_name_not_counted() {
        let mut spec = CanonicalSpec::default();
        set(&mut spec, Field::DeviceName, FieldValue::Text("   ".into()));
        assert_eq!(completeness_score(&spec), 0.0);

        set(&mut spec, Field::DeviceName, FieldValue::Text("ONE".into()));
        for field in Field::DIMENSIONS {
            set(&mut spec, field, FieldValue::Number(1.0));
        }
        set(&mut spec, Field::PayloadKg, FieldValue::Number(1.0));
        set(&mut spec, Field::SpeedMS, FieldValue::Number(1.0));
        assert_eq!(completeness_score(&spec), 1.0);
    }
}
