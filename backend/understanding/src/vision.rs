//! Text recognition through a vision LLM, for hosts without a local OCR engine.
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use patente_core::{PlateError, Result};
use patente_logging::redact_secrets;
use tracing::info;

use crate::recognizer::{InputImage, PlateRecognizer};

const OCR_PROMPT: &str = "Transcribe all text visible in this image. \
Write each separate piece of text (sign, sticker, licence plate) on its own line. \
Reply with the transcribed text only, no commentary.";

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Recognition error with API keys scrubbed; Gemini carries its key in the URL.
fn recognition_err(err: impl std::fmt::Display) -> PlateError {
    PlateError::Recognition(redact_secrets(&err.to_string()))
}

/// Supported vision providers.
#[derive(Debug, Clone)]
pub enum VisionProvider {
    OpenAI { api_key: String, model: String },
    Gemini { api_key: String, model: String },
}

impl VisionProvider {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAI {
            api_key: api_key.into(),
            model: "gpt-4o".to_string(),
        }
    }

    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini {
            api_key: api_key.into(),
            model: "gemini-2.0-flash".to_string(),
        }
    }

    pub fn with_model(self, model: impl Into<String>) -> Self {
        match self {
            Self::OpenAI { api_key, .. } => Self::OpenAI {
                api_key,
                model: model.into(),
            },
            Self::Gemini { api_key, .. } => Self::Gemini {
                api_key,
                model: model.into(),
            },
        }
    }
}

pub struct VisionRecognizer {
    provider: VisionProvider,
    client: reqwest::Client,
}

impl VisionRecognizer {
    pub fn new(provider: VisionProvider) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
        }
    }

    async fn transcribe_via_openai(
        &self, api_key: &str, model: &str, b64: &str, mime_type: &str,
    ) -> Result<String> {
        info!("[Vision] Transcribing image via OpenAI {}", model);
        let body = serde_json::json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": OCR_PROMPT },
                    { "type": "image_url",
                      "image_url": { "url": format!("data:{};base64,{}", mime_type, b64) } }
                ]
            }],
            "max_tokens": 512
        });
        let resp = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(recognition_err)?;
        if !resp.status().is_success() {
            return Err(recognition_err(format!(
                "OpenAI vision error: {}",
                resp.text().await.unwrap_or_default()
            )));
        }
        let json: serde_json::Value = resp.json().await.map_err(recognition_err)?;
        Ok(json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string())
    }

    async fn transcribe_via_gemini(
        &self, api_key: &str, model: &str, b64: &str, mime_type: &str,
    ) -> Result<String> {
        info!("[Vision] Transcribing image via Gemini {}", model);
        let url = format!("{GEMINI_URL}/{model}:generateContent");
        let body = serde_json::json!({
            "contents": [{ "parts": [
                { "text": OCR_PROMPT },
                { "inlineData": { "mimeType": mime_type, "data": b64 } }
            ]}]
        });
        let resp = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(recognition_err)?;
        if !resp.status().is_success() {
            return Err(recognition_err(format!(
                "Gemini vision error: {}",
                resp.text().await.unwrap_or_default()
            )));
        }
        let json: serde_json::Value = resp.json().await.map_err(recognition_err)?;
        Ok(json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string())
    }
}

#[async_trait]
impl PlateRecognizer for VisionRecognizer {
    fn name(&self) -> &str {
        match self.provider {
            VisionProvider::OpenAI { .. } => "openai",
            VisionProvider::Gemini { .. } => "gemini",
        }
    }

    async fn recognize(&self, image: &InputImage) -> Result<Vec<String>> {
        let (data, mime_type) = image.read().await?;
        let b64 = STANDARD.encode(&data);
        let reply = match &self.provider {
            VisionProvider::OpenAI { api_key, model } => {
                self.transcribe_via_openai(api_key, model, &b64, &mime_type).await?
            }
            VisionProvider::Gemini { api_key, model } => {
                self.transcribe_via_gemini(api_key, model, &b64, &mime_type).await?
            }
        };
        Ok(reply_lines(&reply))
    }
}

/// One block per non-empty reply line; markdown fences are dropped.
pub fn reply_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(str::to_string)
        .collect()
}
