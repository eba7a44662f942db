use thiserror::Error;

use crate::domain::image::ImageDecodeError;
use crate::ports::{AIError, OcrError};

/// Error type shared by the solving handlers.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The command carried nothing to work on.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid image at index {index}: {source}")]
    Image {
        index: usize,
        #[source]
        source: ImageDecodeError,
    },

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error("upstream model call failed: {0}")]
    Upstream(#[from] AIError),
}

impl SolveError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        SolveError::InvalidInput(message.into())
    }
}
