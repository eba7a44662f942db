//! Structured extraction of a JSON object embedded in model output.
//!
//! Models routinely wrap their JSON in prose or markdown fences. Extraction
//! first parses the reply as sent, then retries with fences stripped. Each
//! attempt takes the greedy span from the first `{` to the last `}` and
//! parses it strictly. Stray braces in the surrounding prose can corrupt that
//! span; field recovery covers that case.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// A fenced block that makes up the entire payload.
static WHOLE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A```[ \t]*(?:json|JSON)?[ \t]*\r?\n?(.*?)\r?\n?[ \t]*```\z")
        .expect("fence pattern is valid")
});

/// An opening or closing fence marker at the start of a line.
static FENCE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*```[ \t]*(?:json|JSON)?").expect("fence marker pattern is valid")
});

/// Removes markdown code fences.
///
/// When a single fenced block is the whole payload only its inner content is
/// kept; otherwise fence markers that open a line are removed and the prose
/// is left for brace matching to skip. Backticks inside a line are kept.
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(caps) = WHOLE_FENCE.captures(trimmed) {
        if let Some(inner) = caps.get(1) {
            if !inner.as_str().contains("```") {
                return inner.as_str().trim().to_string();
            }
        }
    }
    FENCE_MARKER.replace_all(trimmed, "").trim().to_string()
}

/// Greedy span from the first `{` to the last `}`.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Locates and strictly parses the JSON payload in `raw`.
///
/// The reply is tried as sent before fences are stripped, so fence text
/// inside string values survives. Returns `None` when no attempt parses,
/// which tells the caller to fall back to field recovery.
pub fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Some(value) = parse_candidate(trimmed) {
        return Some(value);
    }

    let cleaned = strip_fences(trimmed);
    if cleaned == trimmed {
        return None;
    }
    parse_candidate(&cleaned)
}

/// Brace span first, then the whole text.
fn parse_candidate(text: &str) -> Option<Value> {
    if let Some(span) = brace_span(text) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Some(value);
        }
    }
    serde_json::from_str::<Value>(text).ok()
}
