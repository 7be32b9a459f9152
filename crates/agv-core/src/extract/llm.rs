//! Model-assisted field filling.
//!
//! A [`FieldOracle`] turns document text into canonical field values. Oracles
//! never fail: missing credentials, transport errors and unparseable replies
//! are logged and yield an empty mapping.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::patterns::JSON_BLOCK;
use crate::models::config::{LlmBackend, LlmConfig};
use crate::models::{Field, FieldValue};

/// Reasons a model call produced nothing.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("{0} is not set")]
    MissingSetting(&'static str),

    #[cfg(feature = "native")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reply contained no JSON object")]
    NoJson,

    #[error("invalid JSON in reply: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of canonical field values for a document text.
pub trait FieldOracle: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Propose values keyed by canonical field name.
    fn fill(&self, text: &str) -> IndexMap<String, FieldValue>;
}

/// Canonical field names requested from the model.
pub fn requested_fields() -> Vec<&'static str> {
    Field::ALL.iter().map(|f| f.name()).collect()
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Instruction prompt for chat models.
pub fn build_prompt(text: &str, max_chars: usize) -> String {
    let fields = serde_json::to_string(&requested_fields()).unwrap_or_default();
    format!(
        "Extract AGV technical specifications from the text below.\n\
         Return ONLY valid JSON with these keys:\n\
         {}\n\n\
         Rules:\n\
         - Use numbers for *_mm, *_kg, *_m_s\n\
         - Use null if unknown\n\n\
         TEXT:\n\
         {}",
        fields,
        truncate_chars(text, max_chars)
    )
}

/// Convert a JSON object into field values; anything else is an empty map.
pub fn object_to_fields(value: serde_json::Value) -> IndexMap<String, FieldValue> {
    match value {
        serde_json::Value::Object(map) => map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        _ => IndexMap::new(),
    }
}

/// Pull the JSON object out of a free-form model reply.
pub fn parse_json_block(reply: &str) -> Result<IndexMap<String, FieldValue>, OracleError> {
    let block = JSON_BLOCK.find(reply).ok_or(OracleError::NoJson)?;
    let value: serde_json::Value = serde_json::from_str(block.as_str())?;
    Ok(object_to_fields(value))
}

/// Build the oracle for a configured backend.
pub fn oracle_for(config: &LlmConfig) -> Option<Box<dyn FieldOracle>> {
    match config.backend {
        LlmBackend::None => None,
        #[cfg(feature = "native")]
        LlmBackend::OpenAi => Some(Box::new(http::OpenAiOracle::from_config(config))),
        #[cfg(feature = "native")]
        LlmBackend::Local => Some(Box::new(http::LocalOracle::from_config(config))),
        #[cfg(not(feature = "native"))]
        backend => {
            warn!("LLM backend {} needs the native feature; skipping", backend);
            None
        }
    }
}

#[cfg(feature = "native")]
pub use http::{LocalOracle, OpenAiOracle};

#[cfg(feature = "native")]
mod http {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize)]
    struct ChatMessage<'a> {
        role: &'a str,
        content: &'a str,
    }

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: Vec<ChatMessage<'a>>,
        temperature: f32,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<ChatChoice>,
    }

    #[derive(Deserialize)]
    struct ChatChoice {
        message: ChatReply,
    }

    #[derive(Deserialize)]
    struct ChatReply {
        content: Option<String>,
    }

    #[derive(Serialize)]
    struct LocalRequest<'a> {
        prompt: &'a str,
        fields: Vec<&'static str>,
    }

    fn client(timeout: Duration) -> Result<reqwest::blocking::Client, OracleError> {
        Ok(reqwest::blocking::Client::builder().timeout(timeout).build()?)
    }

    /// OpenAI-compatible chat completions backend.
    pub struct OpenAiOracle {
        model: String,
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
        max_chars: usize,
    }

    impl OpenAiOracle {
        /// Read model and key from `OPENAI_MODEL` / `OPENAI_API_KEY`, falling
        /// back to the configured model.
        pub fn from_config(config: &LlmConfig) -> Self {
            Self {
                model: std::env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| config.openai_model.clone()),
                base_url: config.openai_base_url.trim_end_matches('/').to_string(),
                api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
                timeout: Duration::from_secs(config.timeout_secs),
                max_chars: config.openai_max_chars,
            }
        }

        fn request(&self, text: &str) -> Result<IndexMap<String, FieldValue>, OracleError> {
            let api_key = self
                .api_key
                .as_deref()
                .ok_or(OracleError::MissingSetting("OPENAI_API_KEY"))?;

            let prompt = build_prompt(text, self.max_chars);
            let body = ChatRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: &prompt,
                }],
                temperature: 0.0,
            };

            let response: ChatResponse = client(self.timeout)?
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(api_key)
                .json(&body)
                .send()?
                .error_for_status()?
                .json()?;

            let reply = response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default();
            info!("LLM raw response length: {}", reply.len());

            parse_json_block(&reply)
        }
    }

    impl FieldOracle for OpenAiOracle {
        fn name(&self) -> &'static str {
            "openai"
        }

        fn fill(&self, text: &str) -> IndexMap<String, FieldValue> {
            debug!("LLM backend=openai, key set: {}", self.api_key.is_some());
            self.request(text).unwrap_or_else(|e| {
                warn!("OpenAI extraction returned nothing: {}", e);
                IndexMap::new()
            })
        }
    }

    /// Local HTTP endpoint accepting `{prompt, fields}` and answering with a
    /// JSON object.
    pub struct LocalOracle {
        url: Option<String>,
        timeout: Duration,
        max_chars: usize,
    }

    impl LocalOracle {
        /// Endpoint from `LOCAL_LLM_URL`, falling back to the configured URL.
        pub fn from_config(config: &LlmConfig) -> Self {
            Self::new(
                std::env::var("LOCAL_LLM_URL").ok().or_else(|| config.local_url.clone()),
                Duration::from_secs(config.timeout_secs),
                config.local_max_chars,
            )
        }

        pub fn new(url: Option<String>, timeout: Duration, max_chars: usize) -> Self {
            Self {
                url: url.filter(|u| !u.is_empty()),
                timeout,
                max_chars,
            }
        }

        fn request(&self, text: &str) -> Result<IndexMap<String, FieldValue>, OracleError> {
            let url = self
                .url
                .as_deref()
                .ok_or(OracleError::MissingSetting("LOCAL_LLM_URL"))?;

            let body = LocalRequest {
                prompt: truncate_chars(text, self.max_chars),
                fields: requested_fields(),
            };

            let value: serde_json::Value = client(self.timeout)?
                .post(url)
                .json(&body)
                .send()?
                .error_for_status()?
                .json()?;

            Ok(object_to_fields(value))
        }
    }

    impl FieldOracle for LocalOracle {
        fn name(&self) -> &'static str {
            "local"
        }

        fn fill(&self, text: &str) -> IndexMap<String, FieldValue> {
            self.request(text).unwrap_or_else(|e| {
                warn!("Local LLM extraction returned nothing: {}", e);
                IndexMap::new()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_json_block_in_prose() {
        let reply = "Sure! Here it is:\n```json\n{\"device_name\": \"AGILOX ONE\", \"payload_kg\": 1500, \"speed_m_s\": null}\n```";
        let fields = parse_json_block(reply).unwrap();

        assert_eq!(fields["device_name"], FieldValue::Text("AGILOX ONE".into()));
        assert_eq!(fields["payload_kg"], FieldValue::Number(1500.0));
        assert!(fields["speed_m_s"].is_null());
    }

    #[test]
    fn test_parse_json_block_failures() {
        assert!(matches!(parse_json_block("no json"), Err(OracleError::NoJson)));
        assert!(matches!(parse_json_block("{not json}"), Err(OracleError::Json(_))));
        assert!(object_to_fields(serde_json::json!([1, 2])).is_empty());
    }

    #[test]
    fn test_prompt_truncates_by_chars() {
        let text = "ä".repeat(20);
        let prompt = build_prompt(&text, 5);

        assert!(prompt.contains("\"device_name\""));
        assert!(prompt.contains("\"lift_height_mm\""));
        assert!(prompt.ends_with(&format!("TEXT:\n{}", "ä".repeat(5))));
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }

    #[test]
    fn test_no_backend_no_oracle() {
        assert!(oracle_for(&LlmConfig::default()).is_none());
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_local_without_url_is_empty() {
        let oracle = LocalOracle::new(None, std::time::Duration::from_secs(1), 100);
        assert_eq!(oracle.name(), "local");
        assert!(oracle.fill("Payload: 500 kg").is_empty());
    }
}
