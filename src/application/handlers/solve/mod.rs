//! Solving Command Handlers
//!
//! One handler per flow. Each gathers input text (OCR and typed text),
//! builds the flow's prompt, makes a single model call and normalizes the
//! reply into the flow's record.
//!
//! ## Commands
//! - `ExtractProblem` - Screenshots to problem statement and test cases
//! - `GenerateSolution` - Problem to code with reasoning and complexity
//! - `DebugSolution` - Problem plus screenshots of failing code to fixed code
//! - `AnswerMcq` - Multiple-choice question to chosen option and explanation

mod answer_mcq;
mod debug_solution;
mod error;
mod extract_problem;
mod generate_solution;
mod pipeline;

pub use answer_mcq::{AnswerMcqCommand, AnswerMcqHandler};
pub use debug_solution::{DebugSolutionCommand, DebugSolutionHandler};
pub use error::SolveError;
pub use extract_problem::{ExtractProblemCommand, ExtractProblemHandler};
pub use generate_solution::{GenerateSolutionCommand, GenerateSolutionHandler};

use crate::domain::prompts::DEFAULT_LANGUAGE;

fn language_or_default(language: Option<&str>) -> &str {
    language
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
}
