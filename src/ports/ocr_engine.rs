//! OCR Engine Port - Text recognition from screenshots.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::image::EncodedImage;

/// Port for recognizing text in an image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognizes the text in `image`. An image with no text yields `""`.
    async fn recognize(&self, image: &EncodedImage) -> Result<String, OcrError>;
}

/// OCR failures.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine is not installed or could not be started.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The engine ran but reported an error.
    #[error("OCR failed: {0}")]
    Failed(String),

    #[error("OCR timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
}
