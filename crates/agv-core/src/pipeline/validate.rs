//! Plausibility checks that lower confidence without discarding values.

use tracing::debug;

use crate::models::{Candidate, Field};

/// Upper bound for a plausible payload in kg.
pub const MAX_PAYLOAD_KG: f64 = 100_000.0;

/// Upper bound for a plausible vehicle dimension in mm.
pub const MAX_DIMENSION_MM: f64 = 50_000.0;

/// Factor applied to the confidence of an implausible value.
pub const PENALTY: f64 = 0.5;

fn penalize_outside(candidate: &mut Candidate, field: Field, max: f64) {
    let Some(value) = candidate.fields.get(field.name()).and_then(|v| v.as_number()) else {
        return;
    };
    if value > 0.0 && value <= max {
        return;
    }
    if let Some(conf) = candidate.confidence.get_mut(field.name()) {
        debug!(
            "Implausible {} = {} from {}, confidence {} -> {}",
            field.name(),
            value,
            candidate.tool,
            *conf,
            *conf * PENALTY
        );
        *conf *= PENALTY;
    }
}

/// Halve the confidence of a payload outside (0, 100000] kg and of any
/// dimension outside (0, 50000] mm.
pub fn validate_candidate(mut candidate: Candidate) -> Candidate {
    penalize_outside(&mut candidate, Field::PayloadKg, MAX_PAYLOAD_KG);
    for field in Field::DIMENSIONS {
        penalize_outside(&mut candidate, field, MAX_DIMENSION_MM);
    }
    candidate
}
