//! Configuration structures for the extraction pipeline.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AgvError, Result};

/// Main configuration for the agv pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgvConfig {
    /// Run-loop bounds.
    pub orchestration: OrchestrationConfig,

    /// Model-assisted extraction configuration.
    pub llm: LlmConfig,

    /// Vendor website scraping configuration.
    pub scrape: ScrapeConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Bounds for the per-document tool loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Stop once the completeness score reaches this value (0.0 - 1.0).
    pub min_completeness: f64,

    /// Maximum tool attempts per document.
    pub max_steps: usize,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            min_completeness: 0.60,
            max_steps: 4,
        }
    }
}

/// Which model backend fills fields when rules fall short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// No model backend; the model-assisted tool is skipped.
    #[default]
    None,
    /// OpenAI-compatible chat completions API.
    #[serde(rename = "openai")]
    OpenAi,
    /// Local HTTP endpoint accepting `{prompt, fields}`.
    Local,
}

impl FromStr for LlmBackend {
    type Err = AgvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "openai" => Ok(Self::OpenAi),
            "local" => Ok(Self::Local),
            other => Err(AgvError::Config(format!("unknown LLM backend: {}", other))),
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmBackend::None => write!(f, "none"),
            LlmBackend::OpenAi => write!(f, "openai"),
            LlmBackend::Local => write!(f, "local"),
        }
    }
}

/// Model-assisted extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend selector.
    pub backend: LlmBackend,

    /// Chat model name (overridden by `OPENAI_MODEL`).
    pub openai_model: String,

    /// API base URL for the OpenAI backend.
    pub openai_base_url: String,

    /// Endpoint for the local backend (overridden by `LOCAL_LLM_URL`).
    pub local_url: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Characters of document text sent to the OpenAI backend.
    pub openai_max_chars: usize,

    /// Characters of document text sent to the local backend.
    pub local_max_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            local_url: None,
            timeout_secs: 60,
            openai_max_chars: 12_000,
            local_max_chars: 8_000,
        }
    }
}

/// Vendor website scraping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// HTTP timeout per page in seconds.
    pub timeout_secs: u64,

    /// Pause between device page fetches in milliseconds.
    pub delay_ms: u64,

    /// Maximum device pages scraped from one listing.
    pub max_devices: usize,

    /// Minimum entries for a table or definition list to count as a spec table.
    pub min_spec_entries: usize,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            delay_ms: 400,
            max_devices: 100,
            min_spec_entries: 3,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Text extraction engine for PDFs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfEngine {
    /// pdf-extract first, lopdf page text as fallback.
    #[default]
    Auto,
    /// Force pdf-extract.
    PdfExtract,
    /// Force lopdf.
    Lopdf,
}

impl FromStr for PdfEngine {
    type Err = AgvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "pdf-extract" | "pdf_extract" => Ok(Self::PdfExtract),
            "lopdf" => Ok(Self::Lopdf),
            other => Err(AgvError::Config(format!(
                "PDF engine must be one of: auto, pdf-extract, lopdf (got {})",
                other
            ))),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Text extraction engine.
    pub engine: PdfEngine,
}

impl AgvConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject bounds the run loop cannot honor.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.orchestration.min_completeness;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AgvError::Config(format!(
                "min_completeness must be within [0, 1], got {}",
                threshold
            )));
        }
        Ok(())
    }
}
