//! Confidence-weighted reconciliation of candidates into one record.

use indexmap::IndexMap;

use crate::models::{Candidate, CanonicalSpec, Evidence, Field, FieldValue};

struct Best<'a> {
    confidence: f64,
    value: &'a FieldValue,
    evidence: Option<&'a Evidence>,
}

fn fits(field: Field, value: &FieldValue) -> bool {
    match value {
        FieldValue::Number(_) => field.is_numeric(),
        FieldValue::Text(_) => !field.is_numeric(),
        FieldValue::Null | FieldValue::Table(_) => false,
    }
}

/// Merge candidates in order into a canonical record.
///
/// Per canonical field the value with the highest confidence wins; on a tie
/// the earliest candidate keeps it. Non-canonical names, nulls and values of
/// the wrong type are skipped. A missing confidence counts as 0.0.
pub fn merge_candidates(candidates: &[Candidate]) -> CanonicalSpec {
    let mut spec = CanonicalSpec::default();
    let Some(last) = candidates.last() else {
        return spec;
    };

    let mut best: IndexMap<Field, Best<'_>> = IndexMap::new();
    for candidate in candidates {
        for (name, value) in &candidate.fields {
            let Some(field) = Field::from_name(name) else {
                continue;
            };
            if !fits(field, value) {
                continue;
            }

            let confidence = candidate.confidence.get(name).copied().unwrap_or(0.0);
            let beats = best
                .get(&field)
                .is_none_or(|current| confidence > current.confidence);
            if beats {
                best.insert(
                    field,
                    Best {
                        confidence,
                        value,
                        evidence: candidate.evidence.get(name),
                    },
                );
            }
        }
    }

    for (field, winner) in best {
        spec.set(field, winner.value, winner.confidence, winner.evidence.cloned());
    }

    spec.document_id = Some(last.document_id.clone());
    spec.tool_trace = candidates.iter().map(|c| c.tool).collect();
    spec
}
