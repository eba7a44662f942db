//! Tesseract OCR adapter.
//!
//! Writes each image to a temp file and runs the `tesseract` CLI on it,
//! reading recognized text from stdout. The temp file is removed when the
//! handle drops, whether recognition succeeded or not.

use async_trait::async_trait;
use std::io::Write;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::image::EncodedImage;
use crate::ports::{OcrEngine, OcrError};

/// Configuration for the Tesseract adapter.
#[derive(Debug, Clone)]
pub struct TesseractConfig {
    /// Path or name of the `tesseract` binary.
    pub binary: String,
    /// Language pack(s), e.g. `eng` or `eng+deu`.
    pub language: String,
    pub timeout: Duration,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// OCR engine backed by the Tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    config: TesseractConfig,
}

impl TesseractOcr {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    fn write_temp(image: &EncodedImage) -> Result<tempfile::NamedTempFile, OcrError> {
        let mut file = tempfile::Builder::new()
            .prefix("solve-relay-")
            .suffix(&format!(".{}", image.extension()))
            .tempfile()?;
        file.write_all(image.bytes())?;
        file.flush()?;
        Ok(file)
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &EncodedImage) -> Result<String, OcrError> {
        let file = Self::write_temp(image)?;

        let child = Command::new(&self.config.binary)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => OcrError::Unavailable(format!(
                    "binary '{}' not found",
                    self.config.binary
                )),
                _ => OcrError::Io(e),
            })?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| OcrError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, stderr = %stderr, "tesseract exited with failure");
            return Err(OcrError::Failed(stderr));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(
            media_type = image.media_type(),
            chars = text.len(),
            "tesseract recognized text"
        );
        Ok(text)
    }
}
