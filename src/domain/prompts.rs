//! Prompt templates for the four solving flows.
//!
//! Every system prompt names the exact JSON keys of its flow's contract, so
//! the normalizer and the model agree on the response shape.

use std::fmt;

use super::normalization::{ExtractRecord, FieldContract};

/// Language used when the client does not name one.
pub const DEFAULT_LANGUAGE: &str = "python";

/// A solving flow, one per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Extract,
    Generate,
    Debug,
    Mcq,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Extract => "extract",
            Flow::Generate => "generate",
            Flow::Debug => "debug",
            Flow::Mcq => "mcq",
        }
    }

    /// Contract the flow's response is normalized against.
    pub fn contract(&self) -> &'static FieldContract {
        match self {
            Flow::Extract => FieldContract::extract(),
            Flow::Generate | Flow::Debug => FieldContract::solution(),
            Flow::Mcq => FieldContract::mcq(),
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System and user prompt for a single completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Prompt that turns OCR text into a structured problem.
pub fn extract_prompt(ocr_text: &str) -> PromptPair {
    PromptPair {
        system: EXTRACT_SYSTEM.to_string(),
        user: format!(
            "Extract the coding problem from the following screenshot text.\n\n{}",
            ocr_text.trim()
        ),
    }
}

/// Prompt that asks for a solution to an extracted problem.
pub fn generate_prompt(problem: &ExtractRecord, language: &str) -> PromptPair {
    PromptPair {
        system: SOLUTION_SYSTEM.replace("{language}", language),
        user: format!(
            "Solve the following problem in {}.\n\n{}",
            language,
            describe_problem(problem)
        ),
    }
}

/// Prompt that asks for a corrected solution given the user's attempt.
pub fn debug_prompt(problem: &ExtractRecord, ocr_text: &str, language: &str) -> PromptPair {
    PromptPair {
        system: format!(
            "{}\n\n{}",
            SOLUTION_SYSTEM.replace("{language}", language),
            DEBUG_ADDENDUM
        ),
        user: format!(
            "{}\n\nMy current code and its output, read from screenshots:\n\n{}",
            describe_problem(problem),
            ocr_text.trim()
        ),
    }
}

/// Prompt that asks for the correct option of a multiple-choice question.
pub fn mcq_prompt(question_text: &str) -> PromptPair {
    PromptPair {
        system: MCQ_SYSTEM.to_string(),
        user: format!(
            "Answer the following multiple-choice question.\n\n{}",
            question_text.trim()
        ),
    }
}

fn describe_problem(problem: &ExtractRecord) -> String {
    let mut out = format!("Problem:\n{}", problem.problem_statement.trim());
    let cases = problem.typed_test_cases();
    if !cases.is_empty() {
        out.push_str("\n\nExamples:");
        for (i, case) in cases.iter().enumerate() {
            out.push_str(&format!(
                "\n{}. input: {} output: {}",
                i + 1,
                render(case.input.as_ref()),
                render(case.output.as_ref())
            ));
        }
    }
    out
}

fn render(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

// ============================================================================
// System Prompts
// ============================================================================

const EXTRACT_SYSTEM: &str = r#"You read text captured from screenshots of coding problems. The text may contain OCR noise.

Reply with a single JSON object and nothing else, using exactly these keys:
{
  "problem_statement": "the full problem statement, cleaned up",
  "test_cases": [{"input": "...", "output": "..."}]
}

Use an empty array for "test_cases" when the problem shows no examples."#;

const SOLUTION_SYSTEM: &str = r#"You are an expert competitive programmer writing {language}.

Reply with a single JSON object and nothing else, using exactly these keys:
{
  "code": "the complete {language} solution",
  "thoughts": ["each reasoning step as a separate string"],
  "time_complexity": "e.g. O(n log n) with a short justification",
  "space_complexity": "e.g. O(n) with a short justification"
}

Escape every double quote and newline inside string values."#;

const DEBUG_ADDENDUM: &str = r#"The user already has code that fails. Find what is wrong, return the corrected program in "code" and describe each fix in "thoughts"."#;

const MCQ_SYSTEM: &str = r#"You answer multiple-choice questions about programming and computer science.

Reply with a single JSON object and nothing else, using exactly these keys:
{
  "correctOption": "the letter of the correct option",
  "thoughts": ["each reasoning step", "Final answer: <letter>"],
  "explanation": "why the chosen option is correct"
}

The last element of "thoughts" must state the final answer."#;
