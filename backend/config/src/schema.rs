//! patente configuration schema, typed for serde YAML/JSON deserialization.
//!
//! Every field is optional in the file; [`apply_all_defaults`](crate::apply_all_defaults)
//! fills in what is missing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatenteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Where plate records live
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,

    /// Which OCR engine reads plates from images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognizer: Option<RecognizerConfig>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Emit console logs as JSON instead of human-readable lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Firestore,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<StoreBackend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firestore: Option<FirestoreConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Override for the REST endpoint (e.g., a local emulator).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerProvider {
    #[default]
    Tesseract,
    Openai,
    Gemini,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<RecognizerProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tesseract_bin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PatenteConfig {
    pub fn store_backend(&self) -> StoreBackend {
        self.store
            .as_ref()
            .and_then(|s| s.backend)
            .unwrap_or_default()
    }

    pub fn recognizer_provider(&self) -> RecognizerProvider {
        self.recognizer
            .as_ref()
            .and_then(|r| r.provider)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
store:
  backend: firestore
  collection: patentes
  firestore:
    projectId: demo
    apiKey: abc
recognizer:
  provider: gemini
  tesseractBin: /usr/bin/tesseract
"#;
        let config: PatenteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.store_backend(), StoreBackend::Firestore);
        assert_eq!(config.recognizer_provider(), RecognizerProvider::Gemini);
        let firestore = config.store.unwrap().firestore.unwrap();
        assert_eq!(firestore.project_id.as_deref(), Some("demo"));
    }

    #[test]
    fn empty_document_uses_enum_defaults() {
        let config: PatenteConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.store_backend(), StoreBackend::Memory);
        assert_eq!(config.recognizer_provider(), RecognizerProvider::Tesseract);
        assert_eq!(config.log_level(), "info");
    }
}
