//! The reconciliation pipeline: planning, normalization, validation, merge,
//! scoring and the run loop that ties them together.

pub mod merge;
pub mod normalize;
pub mod orchestrator;
pub mod planner;
pub mod scoring;
pub mod validate;

pub use merge::merge_candidates;
pub use normalize::{normalize_candidate, parse_dimensions, parse_number};
pub use orchestrator::{
    ExtractionToolbox, Orchestrator, RunOutcome, RunState, StopReason, Toolbox, advance,
};
pub use planner::plan;
pub use scoring::completeness_score;
pub use validate::validate_candidate;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Field, FieldValue, Tool};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_candidate_round_trips() {
        let candidate = Candidate::new("doc.txt", Tool::ModelAssisted)
            .with_field("device_name", FieldValue::Text("AGILOX ONE".into()), 0.65, None)
            .with_field("vendor", FieldValue::Text("AGILOX".into()), 0.65, None)
            .with_field("length_mm", FieldValue::Number(1600.0), 0.65, None)
            .with_field("payload_kg", FieldValue::Number(1500.0), 0.65, None)
            .with_field("speed_m_s", FieldValue::Number(1.2), 0.65, None)
            .with_field("lift_height_mm", FieldValue::Number(1600.0), 0.65, None);

        let spec = merge_candidates(&[validate_candidate(normalize_candidate(candidate))]);

        assert_eq!(spec.text(Field::DeviceName), Some("AGILOX ONE"));
        assert_eq!(spec.text(Field::Vendor), Some("AGILOX"));
        assert_eq!(spec.number(Field::LengthMm), Some(1600.0));
        assert_eq!(spec.number(Field::PayloadKg), Some(1500.0));
        assert_eq!(spec.number(Field::SpeedMS), Some(1.2));
        assert_eq!(spec.number(Field::LiftHeightMm), Some(1600.0));
        assert_eq!(spec.confidence(Field::PayloadKg), Some(0.65));
    }
}
