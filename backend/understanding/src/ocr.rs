//! Optical Character Recognition (OCR) via the Tesseract command-line tool.
//!
//! Tesseract prints recognized text with blank lines between paragraphs; each
//! paragraph becomes one text block.

use std::path::Path;

use async_trait::async_trait;
use patente_core::{PlateError, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::recognizer::{extension_for_mime, InputImage, PlateRecognizer};

pub const DEFAULT_TESSERACT_BIN: &str = "tesseract";
pub const DEFAULT_LANGUAGE: &str = "eng";

pub struct TesseractRecognizer {
    binary: String,
    language: String,
}

impl TesseractRecognizer {
    pub fn new() -> Self {
        Self {
            binary: DEFAULT_TESSERACT_BIN.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    async fn run(&self, path: &Path) -> Result<String> {
        debug!(bin = %self.binary, image = %path.display(), "Running tesseract");
        let output = Command::new(&self.binary)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .await
            .map_err(|e| PlateError::Recognition(format!("failed to run {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlateError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlateRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &InputImage) -> Result<Vec<String>> {
        let text = match image {
            InputImage::Path(path) => self.run(path).await?,
            InputImage::Bytes { data, mime_type } => {
                // Tesseract only reads from files; the dir is removed on drop.
                let dir = tempfile::tempdir().map_err(PlateError::recognition)?;
                let path = dir
                    .path()
                    .join(format!("capture.{}", extension_for_mime(mime_type)));
                tokio::fs::write(&path, data)
                    .await
                    .map_err(PlateError::recognition)?;
                self.run(&path).await?
            }
        };

        let blocks = split_blocks(&text);
        info!(blocks = blocks.len(), "OCR finished");
        Ok(blocks)
    }
}

/// Split OCR output into paragraph blocks separated by blank lines.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}
