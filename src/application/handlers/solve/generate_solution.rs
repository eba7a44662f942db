//! GenerateSolutionHandler - Produce code for an extracted problem.

use std::sync::Arc;

use super::pipeline::Pipeline;
use super::SolveError;
use crate::config::FlowSettings;
use crate::domain::normalization::{ExtractRecord, SolutionRecord};
use crate::domain::prompts::{generate_prompt, Flow};
use crate::ports::{AIProvider, OcrEngine};

#[derive(Debug, Clone)]
pub struct GenerateSolutionCommand {
    pub problem: ExtractRecord,
    /// Target language; `python` when absent.
    pub language: Option<String>,
    pub trace_id: String,
}

pub struct GenerateSolutionHandler {
    pipeline: Pipeline,
}

impl GenerateSolutionHandler {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        ocr: Arc<dyn OcrEngine>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            pipeline: Pipeline::new(Flow::Generate, ai_provider, ocr, settings),
        }
    }

    pub async fn handle(&self, cmd: GenerateSolutionCommand) -> Result<SolutionRecord, SolveError> {
        if cmd.problem.problem_statement.trim().is_empty() {
            return Err(SolveError::invalid_input("problem statement is empty"));
        }
        let language = super::language_or_default(cmd.language.as_deref());

        self.pipeline
            .solve(generate_prompt(&cmd.problem, language), &cmd.trace_id)
            .await
    }
}
