//! DebugSolutionHandler - Fix the user's code shown in screenshots.

use std::sync::Arc;

use super::pipeline::Pipeline;
use super::SolveError;
use crate::config::FlowSettings;
use crate::domain::normalization::{ExtractRecord, SolutionRecord};
use crate::domain::prompts::{debug_prompt, Flow};
use crate::ports::{AIProvider, OcrEngine};

#[derive(Debug, Clone)]
pub struct DebugSolutionCommand {
    pub problem: ExtractRecord,
    /// Screenshots of the failing code and its output.
    pub images: Vec<String>,
    pub language: Option<String>,
    pub trace_id: String,
}

pub struct DebugSolutionHandler {
    pipeline: Pipeline,
}

impl DebugSolutionHandler {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        ocr: Arc<dyn OcrEngine>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            pipeline: Pipeline::new(Flow::Debug, ai_provider, ocr, settings),
        }
    }

    pub async fn handle(&self, cmd: DebugSolutionCommand) -> Result<SolutionRecord, SolveError> {
        if cmd.images.is_empty() {
            return Err(SolveError::invalid_input("at least one screenshot is required"));
        }
        let code_text = self
            .pipeline
            .gather_input(&cmd.images, None, &cmd.trace_id)
            .await?;
        let language = super::language_or_default(cmd.language.as_deref());

        self.pipeline
            .solve(debug_prompt(&cmd.problem, &code_text, language), &cmd.trace_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::ocr::MockOcr;
    use crate::domain::normalization::NO_THOUGHTS;
    use crate::ports::AIError;

    fn command(images: usize) -> DebugSolutionCommand {
        DebugSolutionCommand {
            problem: ExtractRecord {
                problem_statement: "Add two numbers".to_string(),
                test_cases: Vec::new(),
            },
            images: vec!["aGVsbG8=".to_string(); images],
            language: Some("rust".to_string()),
            trace_id: "trace-debug".to_string(),
        }
    }

    #[tokio::test]
    async fn sends_problem_and_ocr_code() {
        let ai = MockAIProvider::new()
            .with_response(r#"{"code": "fn add(a: i32, b: i32) -> i32 { a + b }", "thoughts": ["used - instead of +"], "time_complexity": "O(1)", "space_complexity": "O(1)"}"#);
        let ocr = MockOcr::always("fn add(a: i32, b: i32) -> i32 { a - b }");
        let handler = DebugSolutionHandler::new(
            Arc::new(ai.clone()),
            Arc::new(ocr),
            FlowSettings::default(),
        );

        let solution = handler.handle(command(1)).await.unwrap();
        assert_eq!(solution.thoughts, vec!["used - instead of +"]);

        let call = &ai.get_calls()[0];
        assert_eq!(call.metadata.flow, Flow::Debug);
        assert!(call.messages[0].content.contains("Add two numbers"));
        assert!(call.messages[0].content.contains("{ a - b }"));
        assert!(call.system_prompt.as_deref().unwrap_or_default().contains("writing rust"));
    }

    #[tokio::test]
    async fn missing_thoughts_default_to_placeholder() {
        let ai = MockAIProvider::new().with_response(r#"{"code": "x"}"#);
        let handler = DebugSolutionHandler::new(
            Arc::new(ai),
            Arc::new(MockOcr::always("code")),
            FlowSettings::default(),
        );

        let solution = handler.handle(command(1)).await.unwrap();
        assert_eq!(solution.thoughts, vec![NO_THOUGHTS]);
    }

    #[tokio::test]
    async fn requires_screenshots() {
        let handler = DebugSolutionHandler::new(
            Arc::new(MockAIProvider::new()),
            Arc::new(MockOcr::new()),
            FlowSettings::default(),
        );

        let err = handler.handle(command(0)).await.unwrap_err();
        assert!(matches!(err, SolveError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn upstream_timeout_is_surfaced() {
        let ai = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 60 });
        let handler = DebugSolutionHandler::new(
            Arc::new(ai),
            Arc::new(MockOcr::always("code")),
            FlowSettings::default(),
        );

        let err = handler.handle(command(1)).await.unwrap_err();
        assert!(matches!(err, SolveError::Upstream(AIError::Timeout { .. })));
    }
}
