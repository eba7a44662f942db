//! Mock OCR engine for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::image::EncodedImage;
use crate::ports::{OcrEngine, OcrError};

/// Canned OCR result.
#[derive(Debug, Clone)]
pub enum MockOcrResult {
    Text(String),
    Failed(String),
    Unavailable,
}

/// Returns queued results in order, then a fixed fallback text.
#[derive(Debug, Clone)]
pub struct MockOcr {
    results: Arc<Mutex<VecDeque<MockOcrResult>>>,
    fallback: String,
    calls: Arc<Mutex<usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOcr {
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::new())),
            fallback: String::new(),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// An engine that recognizes `text` in every image.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            fallback: text.into(),
            ..Self::new()
        }
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        lock(&self.results).push_back(MockOcrResult::Text(text.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        lock(&self.results).push_back(MockOcrResult::Failed(message.into()));
        self
    }

    pub fn with_unavailable(self) -> Self {
        lock(&self.results).push_back(MockOcrResult::Unavailable);
        self
    }

    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    async fn recognize(&self, _image: &EncodedImage) -> Result<String, OcrError> {
        *lock(&self.calls) += 1;
        match lock(&self.results).pop_front() {
            Some(MockOcrResult::Text(text)) => Ok(text),
            Some(MockOcrResult::Failed(message)) => Err(OcrError::Failed(message)),
            Some(MockOcrResult::Unavailable) => {
                Err(OcrError::Unavailable("mock engine unavailable".to_string()))
            }
            None => Ok(self.fallback.clone()),
        }
    }
}
