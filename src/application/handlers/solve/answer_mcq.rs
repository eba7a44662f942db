//! AnswerMcqHandler - Pick the correct option of a multiple-choice question.

use std::sync::Arc;

use super::pipeline::Pipeline;
use super::SolveError;
use crate::config::FlowSettings;
use crate::domain::normalization::McqAnswerRecord;
use crate::domain::prompts::{mcq_prompt, Flow};
use crate::ports::{AIProvider, OcrEngine};

/// Command to answer a question from screenshots, typed text, or both.
#[derive(Debug, Clone, Default)]
pub struct AnswerMcqCommand {
    pub images: Vec<String>,
    pub text: Option<String>,
    pub trace_id: String,
}

pub struct AnswerMcqHandler {
    pipeline: Pipeline,
}

impl AnswerMcqHandler {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        ocr: Arc<dyn OcrEngine>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            pipeline: Pipeline::new(Flow::Mcq, ai_provider, ocr, settings),
        }
    }

    pub async fn handle(&self, cmd: AnswerMcqCommand) -> Result<McqAnswerRecord, SolveError> {
        let question = self
            .pipeline
            .gather_input(&cmd.images, cmd.text.as_deref(), &cmd.trace_id)
            .await?;

        self.pipeline
            .solve(mcq_prompt(&question), &cmd.trace_id)
            .await
    }
}
