//! Field-by-field recovery from near-JSON model output.
//!
//! Used when strict parsing fails, typically because the model left quotes
//! unescaped inside a long text field. Each field is located independently so
//! corruption in one field does not block recovery of the others. Every
//! strategy is a standalone function returning `None` when the field cannot
//! be found; [`recover_fields`] substitutes the contract sentinel in that case.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::contract::{FieldContract, Recovery};
use super::record::{FieldValue, Record};

/// Recovers every field of `contract` from `raw`.
///
/// The result always carries all contract fields: unrecoverable fields (and
/// sequences shorter than their minimum) are filled with the field's
/// sentinel and tagged as defaulted.
pub fn recover_fields(raw: &str, contract: &FieldContract) -> Record {
    let mut record = Record::new(contract);

    for spec in &contract.fields {
        let recovered = match spec.recovery {
            Recovery::Scalar => recover_scalar(raw, spec.name).map(Value::String),
            Recovery::FreeText => {
                let siblings: Vec<&str> = contract
                    .field_names()
                    .filter(|name| *name != spec.name)
                    .collect();
                recover_free_text(raw, spec.name, &siblings).map(Value::String)
            }
            Recovery::Sequence => recover_sequence(raw, spec.name)
                .filter(|items| items.len() >= spec.min_items)
                .map(|items| Value::Array(items.into_iter().map(Value::String).collect())),
            Recovery::Structured => recover_structured(raw, spec.name)
                .filter(|items| items.len() >= spec.min_items)
                .map(Value::Array),
        };

        let value = match recovered {
            Some(value) => FieldValue::recovered(value),
            None => {
                debug!(
                    contract = contract.name,
                    field = spec.name,
                    "field not recoverable, using sentinel"
                );
                FieldValue::defaulted(spec.sentinel.clone())
            }
        };
        record.push(spec.name, value);
    }

    record
}

fn key_pattern(name: &str) -> String {
    format!(r#""{}"\s*:\s*"#, regex::escape(name))
}

/// Compiled field patterns keyed by source; contracts name a fixed set of fields.
static FIELD_PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn field_pattern(pattern: String) -> Option<Regex> {
    let mut cache = FIELD_PATTERNS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(re) = cache.get(&pattern) {
        return Some(re.clone());
    }
    let re = Regex::new(&pattern).ok()?;
    cache.insert(pattern, re.clone());
    Some(re)
}

/// Recovers `"name": "value"` where the value holds no quotes.
pub fn recover_scalar(raw: &str, name: &str) -> Option<String> {
    let re = field_pattern(format!(r#"{}"([^"]+)""#, key_pattern(name)))?;
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Recovers a string array, splitting only on commas that precede a quote.
///
/// Returns `Some` (possibly empty) whenever the array span is present.
pub fn recover_sequence(raw: &str, name: &str) -> Option<Vec<String>> {
    let re = field_pattern(format!(r"{}\[([\s\S]*?)\]", key_pattern(name)))?;
    let inner = re.captures(raw)?.get(1)?.as_str();

    let items = split_quoted_items(inner)
        .into_iter()
        .map(quoted_content)
        .filter(|item| !item.trim().is_empty())
        .collect();
    Some(items)
}

/// Splits on `,` followed by optional whitespace and a quote.
fn split_quoted_items(inner: &str) -> Vec<&str> {
    static ITEM_BOUNDARY: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#",\s*""#).expect("item boundary pattern is valid"));

    let mut items = Vec::new();
    let mut start = 0;
    for m in ITEM_BOUNDARY.find_iter(inner) {
        items.push(&inner[start..m.start()]);
        start = m.start() + 1;
    }
    items.push(&inner[start..]);
    items
}

/// Content between the first and last quote of an item, unescaped.
fn quoted_content(item: &str) -> String {
    let item = item.trim();
    let content = match (item.find('"'), item.rfind('"')) {
        (Some(first), Some(last)) if last > first => &item[first + 1..last],
        (Some(first), _) => &item[first + 1..],
        _ => item,
    };
    unescape(content)
}

/// Recovers a long text value that may contain unescaped quotes.
///
/// The value starts at the quote after the key's colon and ends at the first
/// quote that is not preceded by a backslash and is followed, after
/// whitespace, by `}`. A quote followed by `,` and one of `siblings` as the
/// next key also ends the value, so non-final fields can be recovered.
pub fn recover_free_text(raw: &str, name: &str, siblings: &[&str]) -> Option<String> {
    let re = field_pattern(key_pattern(name))?;
    let key = re.find(raw)?;

    let rest = &raw[key.end()..];
    if !rest.starts_with('"') {
        return None;
    }
    let body = &rest[1..];
    let bytes = body.as_bytes();

    let end = bytes
        .iter()
        .enumerate()
        .filter(|(i, b)| **b == b'"' && (*i == 0 || bytes[*i - 1] != b'\\'))
        .map(|(i, _)| i)
        .find(|&i| closes_value(&body[i + 1..], siblings))?;

    Some(unescape(&body[..end]))
}

fn closes_value(after_quote: &str, siblings: &[&str]) -> bool {
    let after = after_quote.trim_start();
    if after.starts_with('}') {
        return true;
    }
    let Some(next) = after.strip_prefix(',') else {
        return false;
    };
    let next = next.trim_start();
    siblings.iter().any(|sibling| {
        next.strip_prefix('"')
            .and_then(|s| s.strip_prefix(*sibling))
            .and_then(|s| s.strip_prefix('"'))
            .is_some_and(|s| s.trim_start().starts_with(':'))
    })
}

/// Recovers an array of arbitrary JSON values by bracket matching.
pub fn recover_structured(raw: &str, name: &str) -> Option<Vec<Value>> {
    let re = field_pattern(format!(r"{}\[", key_pattern(name)))?;
    let open = re.find(raw)?.end() - 1;
    let span = balanced_span(&raw[open..], '[', ']')?;
    serde_json::from_str::<Vec<Value>>(span).ok()
}

/// Span from the opening delimiter at the start of `s` to its match.
fn balanced_span(s: &str, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[..i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Reverses the JSON escapes models commonly emit.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalization::contract::{NOT_SPECIFIED, NO_THOUGHTS};
    use serde_json::json;

    const BROKEN_MCQ: &str = r#"{
  "correctOption": "B",
  "thoughts": ["First, rule out A", "Then, compare B and C", "Final answer: B"],
  "explanation": "The answer is "B" because it is the only stable option.\nC overflows."
}"#;

    #[test]
    fn field_patterns_are_compiled_once() {
        let raw = r#"{"cached_scalar_field": "kept"}"#;
        assert_eq!(recover_scalar(raw, "cached_scalar_field").as_deref(), Some("kept"));
        assert_eq!(recover_scalar(raw, "cached_scalar_field").as_deref(), Some("kept"));

        let pattern = format!(r#"{}"([^"]+)""#, key_pattern("cached_scalar_field"));
        let cache = FIELD_PATTERNS.lock().unwrap();
        assert!(cache.contains_key(&pattern));
    }

    #[test]
    fn scalar_is_recovered_by_key() {
        assert_eq!(recover_scalar(BROKEN_MCQ, "correctOption").as_deref(), Some("B"));
        assert_eq!(recover_scalar(BROKEN_MCQ, "missing"), None);
    }

    #[test]
    fn scalar_rejects_empty_value() {
        assert_eq!(recover_scalar(r#"{"time_complexity": ""}"#, "time_complexity"), None);
    }

    #[test]
    fn sequence_keeps_commas_inside_items() {
        let raw = r#"{"thoughts": ["First, consider X", "Then, apply Y"]}"#;
        assert_eq!(
            recover_sequence(raw, "thoughts").unwrap(),
            vec!["First, consider X", "Then, apply Y"]
        );
    }

    #[test]
    fn sequence_drops_empty_items_and_unescapes() {
        let raw = "{\"thoughts\": [\"a \\\"quoted\\\" word\", \"\", \"line\\nbreak\"]}";
        assert_eq!(
            recover_sequence(raw, "thoughts").unwrap(),
            vec!["a \"quoted\" word", "line\nbreak"]
        );
    }

    #[test]
    fn sequence_absent_without_array_span() {
        assert_eq!(recover_sequence(r#"{"thoughts": "one"}"#, "thoughts"), None);
    }

    #[test]
    fn free_text_tolerates_embedded_quotes() {
        let text = recover_free_text(BROKEN_MCQ, "explanation", &["correctOption", "thoughts"]).unwrap();
        assert_eq!(
            text,
            "The answer is \"B\" because it is the only stable option.\nC overflows."
        );
    }

    #[test]
    fn free_text_stops_before_sibling_key() {
        let raw = r#"{"code": "print("hi")", "thoughts": ["x"], "time_complexity": "O(1)"}"#;
        let code = recover_free_text(raw, "code", &["thoughts", "time_complexity"]).unwrap();
        assert_eq!(code, r#"print("hi")"#);
    }

    #[test]
    fn free_text_ignores_escaped_terminators() {
        let raw = r#"{"explanation": "ends with \"}\" inside"}"#;
        assert_eq!(
            recover_free_text(raw, "explanation", &[]).as_deref(),
            Some(r#"ends with "}" inside"#)
        );
    }

    #[test]
    fn free_text_requires_terminator() {
        let truncated = r#"{"explanation": "The answer is "B" becau"#;
        assert_eq!(recover_free_text(truncated, "explanation", &[]), None);
    }

    #[test]
    fn free_text_requires_string_value() {
        assert_eq!(recover_free_text(r#"{"explanation": null}"#, "explanation", &[]), None);
    }

    #[test]
    fn structured_sequence_is_bracket_balanced() {
        let raw = r#"{"problem_statement": "Sum "two" numbers", "test_cases": [{"input": "[1, 2]", "output": 3}]}"#;
        assert_eq!(
            recover_structured(raw, "test_cases").unwrap(),
            vec![json!({"input": "[1, 2]", "output": 3})]
        );
    }

    #[test]
    fn recover_fields_fills_every_mcq_field() {
        let record = recover_fields(BROKEN_MCQ, FieldContract::mcq());
        assert_eq!(record.string("correctOption"), "B");
        assert_eq!(record.strings("thoughts").len(), 3);
        assert!(!record.is_defaulted("explanation"));
        assert_ne!(record.string("explanation"), NOT_SPECIFIED);
    }

    #[test]
    fn recover_fields_uses_sentinels_for_missing_fields() {
        let record = recover_fields("the model said nothing useful", FieldContract::solution());
        assert_eq!(record.string("code"), "");
        assert_eq!(record.strings("thoughts"), vec![NO_THOUGHTS]);
        assert_eq!(record.string("time_complexity"), NOT_SPECIFIED);
        assert_eq!(record.string("space_complexity"), NOT_SPECIFIED);
        assert!(record.fields().all(|(_, f)| f.is_defaulted()));
    }

    #[test]
    fn empty_recovered_sequence_falls_back_to_sentinel() {
        let record = recover_fields(r#"{"thoughts": []"#, FieldContract::mcq());
        assert_eq!(record.strings("thoughts"), vec![NOT_SPECIFIED]);
        assert!(record.is_defaulted("thoughts"));
    }
}
