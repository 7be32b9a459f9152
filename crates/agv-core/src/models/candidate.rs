//! Per-tool candidate records.

use indexmap::IndexMap;

use super::spec::{CanonicalSpec, Evidence, Field};
use super::tool::Tool;

/// Reserved field name holding a whole raw key/value table.
pub const RAW_TABLE_FIELD: &str = "_kv";

/// A value proposed by a tool, before or after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
    /// Raw `key -> value` rows in source order.
    Table(IndexMap<String, String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::Text).unwrap_or(FieldValue::Null)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(_) => FieldValue::Text(value.to_string()),
            Value::Object(map) => FieldValue::Table(
                map.into_iter()
                    .map(|(k, v)| {
                        let v = match v {
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        (k, v)
                    })
                    .collect(),
            ),
        }
    }
}

/// One tool's proposed partial record for a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Source document identifier.
    pub document_id: String,
    /// Tool that produced this candidate.
    pub tool: Tool,
    /// Proposed values, keyed by canonical or raw field name.
    pub fields: IndexMap<String, FieldValue>,
    /// Confidence per field name.
    pub confidence: IndexMap<String, f64>,
    /// Evidence per field name.
    pub evidence: IndexMap<String, Evidence>,
}

impl Candidate {
    /// Create an empty candidate.
    pub fn new(document_id: impl Into<String>, tool: Tool) -> Self {
        Self {
            document_id: document_id.into(),
            tool,
            fields: IndexMap::new(),
            confidence: IndexMap::new(),
            evidence: IndexMap::new(),
        }
    }

    /// Evidence attributed to this candidate's tool and document.
    pub fn evidence_for(&self, snippet: Option<String>) -> Evidence {
        Evidence {
            snippet,
            source_tool: self.tool,
            source_document: self.document_id.clone(),
        }
    }

    /// Insert a field with its confidence and evidence snippet.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: FieldValue,
        confidence: f64,
        snippet: Option<String>,
    ) {
        let name = name.into();
        let evidence = self.evidence_for(snippet);
        self.fields.insert(name.clone(), value);
        self.confidence.insert(name.clone(), confidence);
        self.evidence.insert(name, evidence);
    }

    /// Builder form of [`Candidate::insert`].
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: FieldValue,
        confidence: f64,
        snippet: Option<String>,
    ) -> Self {
        self.insert(name, value, confidence, snippet);
        self
    }

    /// Build a candidate from a flat raw row.
    ///
    /// `device` is accepted as an alias for `device_name`; every other key is
    /// kept as-is for the normalizer. Every field gets the tool's flat
    /// confidence.
    pub fn from_flat(
        row: IndexMap<String, FieldValue>,
        document_id: impl Into<String>,
        tool: Tool,
    ) -> Self {
        let mut candidate = Candidate::new(document_id, tool);
        let confidence = tool.default_confidence();

        for (key, value) in row {
            let name = match key.as_str() {
                "device" | "device_name" => Field::DeviceName.name().to_string(),
                _ => key,
            };
            let snippet = value.as_text().map(str::to_string);
            candidate.insert(name, value, confidence, snippet);
        }

        candidate
    }

    /// Build a candidate holding a raw key/value table under [`RAW_TABLE_FIELD`].
    pub fn from_key_values(
        kv: IndexMap<String, String>,
        document_id: impl Into<String>,
        tool: Tool,
    ) -> Self {
        let preview = kv
            .iter()
            .take(5)
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ");

        Candidate::new(document_id, tool).with_field(
            RAW_TABLE_FIELD,
            FieldValue::Table(kv),
            tool.default_confidence(),
            Some(preview),
        )
    }

    /// Re-wrap a merged record as a candidate, keeping per-field confidence
    /// and evidence.
    pub fn from_spec(spec: &CanonicalSpec, tool: Tool) -> Self {
        let mut candidate = Candidate::new(spec.document_id.clone().unwrap_or_default(), tool);

        for field in spec.populated_fields() {
            let Some(value) = spec.value(field) else {
                continue;
            };
            let name = field.name().to_string();
            candidate.fields.insert(name.clone(), value);
            if let Some(conf) = spec.confidence(field) {
                candidate.confidence.insert(name.clone(), conf);
            }
            if let Some(ev) = spec.evidence(field) {
                candidate.evidence.insert(name, ev.clone());
            }
        }

        candidate
    }

    /// Whether a field is absent or null.
    pub fn is_unset(&self, name: &str) -> bool {
        self.fields.get(name).is_none_or(FieldValue::is_null)
    }
}
