//! OCR engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Tesseract settings
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Path or name of the `tesseract` binary
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Language pack(s) passed to `-l`
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-image timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.binary.trim().is_empty() {
            return Err(ValidationError::InvalidOcrConfig("binary is empty"));
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::InvalidOcrConfig("language is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidOcrConfig("timeout must be positive"));
        }
        Ok(())
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_binary() -> String {
    "tesseract".to_string()
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_timeout() -> u64 {
    30
}
