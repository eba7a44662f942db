//! ExtractProblemHandler - Turn screenshots of a problem into a structured statement.

use std::sync::Arc;

use super::pipeline::Pipeline;
use super::SolveError;
use crate::config::FlowSettings;
use crate::domain::normalization::ExtractRecord;
use crate::domain::prompts::{extract_prompt, Flow};
use crate::ports::{AIProvider, OcrEngine};

/// Command to extract a problem.
#[derive(Debug, Clone, Default)]
pub struct ExtractProblemCommand {
    /// Base64 or data-URL screenshots, in reading order.
    pub images: Vec<String>,
    /// Extra text typed by the user.
    pub text: Option<String>,
    pub trace_id: String,
}

pub struct ExtractProblemHandler {
    pipeline: Pipeline,
}

impl ExtractProblemHandler {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        ocr: Arc<dyn OcrEngine>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            pipeline: Pipeline::new(Flow::Extract, ai_provider, ocr, settings),
        }
    }

    pub async fn handle(&self, cmd: ExtractProblemCommand) -> Result<ExtractRecord, SolveError> {
        let input = self
            .pipeline
            .gather_input(&cmd.images, cmd.text.as_deref(), &cmd.trace_id)
            .await?;

        self.pipeline
            .solve(extract_prompt(&input), &cmd.trace_id)
            .await
    }
}
