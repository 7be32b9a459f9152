//! Core library for AGV technical spec extraction.
//!
//! This crate provides:
//! - Document ingest (PDF and plain text, input discovery, vendor web pages)
//! - Text-to-raw-fields extractors (vendor patterns, key/value, generic labels, LLM)
//! - The reconciliation pipeline: normalization, plausibility checks,
//!   confidence-weighted merge and the early-stopping run loop
//! - The canonical spec record with per-field confidence and evidence

pub mod error;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod pdf;
pub mod pipeline;

pub use error::{AgvError, InputError, PdfError, Result};
pub use extract::{FieldOracle, oracle_for};
pub use ingest::{Document, is_url, iter_inputs, load_document};
pub use models::{AgvConfig, Candidate, CanonicalSpec, Evidence, Field, FieldValue, Tool};
pub use pdf::{PdfProcessor, TextStats};
pub use pipeline::{ExtractionToolbox, Orchestrator, RunOutcome, StopReason, Toolbox};

#[cfg(feature = "native")]
pub use ingest::web::{ScrapeReport, VendorScraper};
