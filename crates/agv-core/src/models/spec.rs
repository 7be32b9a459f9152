//! Canonical AGV spec record and its schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::candidate::FieldValue;
use super::tool::Tool;

/// A member of the fixed output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DeviceName,
    Vendor,
    LengthMm,
    WidthMm,
    HeightMm,
    PayloadKg,
    #[serde(rename = "speed_m_s")]
    SpeedMS,
    WeightKg,
    TurningRadiusMm,
    LiftHeightMm,
}

impl Field {
    /// All canonical fields in output column order.
    pub const ALL: [Field; 10] = [
        Field::DeviceName,
        Field::Vendor,
        Field::LengthMm,
        Field::WidthMm,
        Field::HeightMm,
        Field::PayloadKg,
        Field::SpeedMS,
        Field::WeightKg,
        Field::TurningRadiusMm,
        Field::LiftHeightMm,
    ];

    /// Fields counted by the completeness score.
    pub const CORE: [Field; 6] = [
        Field::DeviceName,
        Field::LengthMm,
        Field::WidthMm,
        Field::HeightMm,
        Field::PayloadKg,
        Field::SpeedMS,
    ];

    /// Length, width, height.
    pub const DIMENSIONS: [Field; 3] = [Field::LengthMm, Field::WidthMm, Field::HeightMm];

    /// Canonical field name as used in candidates and output columns.
    pub fn name(self) -> &'static str {
        match self {
            Field::DeviceName => "device_name",
            Field::Vendor => "vendor",
            Field::LengthMm => "length_mm",
            Field::WidthMm => "width_mm",
            Field::HeightMm => "height_mm",
            Field::PayloadKg => "payload_kg",
            Field::SpeedMS => "speed_m_s",
            Field::WeightKg => "weight_kg",
            Field::TurningRadiusMm => "turning_radius_mm",
            Field::LiftHeightMm => "lift_height_mm",
        }
    }

    /// Look up a canonical field by its exact name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether the field holds a number (as opposed to text).
    pub fn is_numeric(self) -> bool {
        !matches!(self, Field::DeviceName | Field::Vendor)
    }
}

/// Why a field took its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Text excerpt backing the value.
    pub snippet: Option<String>,
    /// Tool that proposed the value.
    pub source_tool: Tool,
    /// Document the value came from.
    pub source_document: String,
}

/// A canonical value together with its confidence and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl<T> Sourced<T> {
    pub fn new(value: T, confidence: f64, evidence: Option<Evidence>) -> Self {
        Self {
            value,
            confidence,
            evidence,
        }
    }
}

/// The one record per document that is written to output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSpec {
    /// Source document identifier.
    pub document_id: Option<String>,

    /// Tools of all merged candidates, in merge order.
    pub tool_trace: Vec<Tool>,

    pub device_name: Option<Sourced<String>>,
    pub vendor: Option<Sourced<String>>,

    pub length_mm: Option<Sourced<f64>>,
    pub width_mm: Option<Sourced<f64>>,
    pub height_mm: Option<Sourced<f64>>,

    pub payload_kg: Option<Sourced<f64>>,
    pub speed_m_s: Option<Sourced<f64>>,
    pub weight_kg: Option<Sourced<f64>>,
    pub turning_radius_mm: Option<Sourced<f64>>,
    pub lift_height_mm: Option<Sourced<f64>>,
}

impl CanonicalSpec {
    fn text_slot(&self, field: Field) -> Option<&Option<Sourced<String>>> {
        match field {
            Field::DeviceName => Some(&self.device_name),
            Field::Vendor => Some(&self.vendor),
            _ => None,
        }
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut Option<Sourced<String>>> {
        match field {
            Field::DeviceName => Some(&mut self.device_name),
            Field::Vendor => Some(&mut self.vendor),
            _ => None,
        }
    }

    fn number_slot(&self, field: Field) -> Option<&Option<Sourced<f64>>> {
        match field {
            Field::LengthMm => Some(&self.length_mm),
            Field::WidthMm => Some(&self.width_mm),
            Field::HeightMm => Some(&self.height_mm),
            Field::PayloadKg => Some(&self.payload_kg),
            Field::SpeedMS => Some(&self.speed_m_s),
            Field::WeightKg => Some(&self.weight_kg),
            Field::TurningRadiusMm => Some(&self.turning_radius_mm),
            Field::LiftHeightMm => Some(&self.lift_height_mm),
            Field::DeviceName | Field::Vendor => None,
        }
    }

    fn number_slot_mut(&mut self, field: Field) -> Option<&mut Option<Sourced<f64>>> {
        match field {
            Field::LengthMm => Some(&mut self.length_mm),
            Field::WidthMm => Some(&mut self.width_mm),
            Field::HeightMm => Some(&mut self.height_mm),
            Field::PayloadKg => Some(&mut self.payload_kg),
            Field::SpeedMS => Some(&mut self.speed_m_s),
            Field::WeightKg => Some(&mut self.weight_kg),
            Field::TurningRadiusMm => Some(&mut self.turning_radius_mm),
            Field::LiftHeightMm => Some(&mut self.lift_height_mm),
            Field::DeviceName | Field::Vendor => None,
        }
    }

    /// Current value of a field, if populated.
    pub fn value(&self, field: Field) -> Option<FieldValue> {
        if let Some(slot) = self.text_slot(field) {
            return slot.as_ref().map(|s| FieldValue::Text(s.value.clone()));
        }
        self.number_slot(field)
            .and_then(|slot| slot.as_ref().map(|s| FieldValue::Number(s.value)))
    }

    /// Numeric value of a field, if populated.
    pub fn number(&self, field: Field) -> Option<f64> {
        self.number_slot(field)
            .and_then(|slot| slot.as_ref().map(|s| s.value))
    }

    /// Text value of a field, if populated.
    pub fn text(&self, field: Field) -> Option<&str> {
        self.text_slot(field)
            .and_then(|slot| slot.as_ref().map(|s| s.value.as_str()))
    }

    /// Confidence recorded for a populated field.
    pub fn confidence(&self, field: Field) -> Option<f64> {
        match self.text_slot(field) {
            Some(slot) => slot.as_ref().map(|s| s.confidence),
            None => self
                .number_slot(field)
                .and_then(|slot| slot.as_ref().map(|s| s.confidence)),
        }
    }

    /// Evidence recorded for a populated field.
    pub fn evidence(&self, field: Field) -> Option<&Evidence> {
        match self.text_slot(field) {
            Some(slot) => slot.as_ref().and_then(|s| s.evidence.as_ref()),
            None => self
                .number_slot(field)
                .and_then(|slot| slot.as_ref().and_then(|s| s.evidence.as_ref())),
        }
    }

    /// Store a value for a field.
    ///
    /// Returns `false` (and leaves the record untouched) when the value does
    /// not fit the field's type.
    pub fn set(
        &mut self,
        field: Field,
        value: &FieldValue,
        confidence: f64,
        evidence: Option<Evidence>,
    ) -> bool {
        match (value, field.is_numeric()) {
            (FieldValue::Number(n), true) => match self.number_slot_mut(field) {
                Some(slot) => {
                    *slot = Some(Sourced::new(*n, confidence, evidence));
                    true
                }
                None => false,
            },
            (FieldValue::Text(s), false) => match self.text_slot_mut(field) {
                Some(slot) => {
                    *slot = Some(Sourced::new(s.clone(), confidence, evidence));
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Canonical fields that currently hold a value.
    pub fn populated_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.value(*f).is_some())
            .collect()
    }

    /// Comma-joined tool trace.
    pub fn tool_trace_string(&self) -> String {
        self.tool_trace
            .iter()
            .map(|t| t.id())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Flatten the record into `column -> cell` pairs for tabular export.
    ///
    /// Only populated cells are present; missing columns are empty cells.
    pub fn to_row(&self) -> IndexMap<String, String> {
        let mut row = IndexMap::new();

        if let Some(id) = &self.document_id {
            row.insert("document_id".to_string(), id.clone());
        }
        if !self.tool_trace.is_empty() {
            row.insert("tool_trace".to_string(), self.tool_trace_string());
        }

        for field in Field::ALL {
            match self.value(field) {
                Some(FieldValue::Number(n)) => {
                    row.insert(field.name().to_string(), n.to_string());
                }
                Some(FieldValue::Text(s)) => {
                    row.insert(field.name().to_string(), s);
                }
                _ => {}
            }
        }

        for field in Field::ALL {
            if let Some(ev) = self.evidence(field) {
                if let Some(snippet) = &ev.snippet {
                    row.insert(format!("evidence_{}", field.name()), snippet.clone());
                }
                row.insert(format!("source_{}", field.name()), ev.source_tool.id().to_string());
            }
        }

        for field in Field::ALL {
            if let Some(conf) = self.confidence(field) {
                row.insert(format!("confidence_{}", field.name()), conf.to_string());
            }
        }

        row
    }

    /// Column set for a table of records.
    ///
    /// Canonical columns always appear; `evidence_*`/`source_*` columns appear
    /// for every field that received evidence in any record, `confidence_*`
    /// columns for every field that received a confidence.
    pub fn table_columns(specs: &[CanonicalSpec]) -> Vec<String> {
        let mut columns = vec!["document_id".to_string(), "tool_trace".to_string()];
        columns.extend(Field::ALL.iter().map(|f| f.name().to_string()));

        for field in Field::ALL {
            if specs.iter().any(|s| s.evidence(field).is_some()) {
                columns.push(format!("evidence_{}", field.name()));
                columns.push(format!("source_{}", field.name()));
            }
        }
        for field in Field::ALL {
            if specs.iter().any(|s| s.confidence(field).is_some()) {
                columns.push(format!("confidence_{}", field.name()));
            }
        }

        columns
    }
}
