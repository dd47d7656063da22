use std::path::{Path, PathBuf};

use async_trait::async_trait;
use patente_core::{PlateError, Result};

/// An image handed to a recognizer: either a file on disk or raw bytes
/// (e.g., straight from a camera capture).
#[derive(Debug, Clone)]
pub enum InputImage {
    Path(PathBuf),
    Bytes { data: Vec<u8>, mime_type: String },
}

impl InputImage {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_bytes(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::Bytes {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Load the image contents along with their MIME type.
    pub async fn read(&self) -> Result<(Vec<u8>, String)> {
        match self {
            Self::Path(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    PlateError::Recognition(format!("cannot read image {}: {e}", path.display()))
                })?;
                Ok((data, mime_from_path(path).to_string()))
            }
            Self::Bytes { data, mime_type } => Ok((data.clone(), mime_type.clone())),
        }
    }
}

/// Guess an image MIME type from the file extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "image/jpeg",
    }
}

/// File extension to use when spilling image bytes to disk.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        _ => "jpg",
    }
}

/// On-device or remote optical character recognition.
///
/// Produces the text blocks found in an image, in reading order. An image
/// with no text yields an empty list; only unreadable images or backend
/// failures are errors.
#[async_trait]
pub trait PlateRecognizer: Send + Sync {
    fn name(&self) -> &str;

    async fn recognize(&self, image: &InputImage) -> Result<Vec<String>>;
}
