//! Data models: canonical schema, candidates, tools and configuration.

pub mod candidate;
pub mod config;
pub mod spec;
pub mod tool;

pub use candidate::{Candidate, FieldValue, RAW_TABLE_FIELD};
pub use config::{AgvConfig, LlmBackend, PdfEngine};
pub use spec::{CanonicalSpec, Evidence, Field, Sourced};
pub use tool::Tool;
