//! Contract-shaped records and their typed views.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::contract::{FieldContract, NOT_SPECIFIED};

/// How a field's value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Taken from the model's output.
    Recovered,
    /// Filled in from the contract's default or sentinel.
    Defaulted,
}

/// A single field value tagged with its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub value: Value,
    pub outcome: FieldOutcome,
}

impl FieldValue {
    pub fn recovered(value: Value) -> Self {
        Self {
            value,
            outcome: FieldOutcome::Recovered,
        }
    }

    pub fn defaulted(value: Value) -> Self {
        Self {
            value,
            outcome: FieldOutcome::Defaulted,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        self.outcome == FieldOutcome::Defaulted
    }
}

/// Ordered field map satisfying a complete [`FieldContract`].
///
/// Only the validator and the recoverer build records, and both emit every
/// contract field, so no partial record can be observed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    contract: &'static str,
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub(crate) fn new(contract: &FieldContract) -> Self {
        Self {
            contract: contract.name,
            fields: Vec::with_capacity(contract.fields.len()),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: FieldValue) {
        self.fields.push((name, value));
    }

    /// Name of the contract this record satisfies.
    pub fn contract_name(&self) -> &'static str {
        self.contract
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Whether the named field was filled in rather than recovered.
    pub fn is_defaulted(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::is_defaulted)
    }

    /// String value of a field, or `""` if the field is not a string.
    pub fn string(&self, name: &str) -> String {
        self.get(name)
            .and_then(|f| f.value.as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// String elements of a sequence field; non-string elements are skipped.
    pub fn strings(&self, name: &str) -> Vec<String> {
        self.values(name)
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Elements of a sequence field.
    pub fn values(&self, name: &str) -> Vec<Value> {
        self.get(name)
            .and_then(|f| f.value.as_array())
            .cloned()
            .unwrap_or_default()
    }

    /// Converts to a plain JSON object.
    ///
    /// `serde_json::Map` sorts its keys, so contract order is kept only when
    /// the record itself is serialized.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, field)| (name.to_string(), field.value.clone()))
                .collect(),
        )
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, &field.value)?;
        }
        map.end()
    }
}

/// A typed view over a record of a specific contract.
pub trait ContractRecord: Sized {
    fn contract() -> &'static FieldContract;

    /// Builds the typed view. Total for any record of [`Self::contract`].
    fn from_record(record: &Record) -> Self;
}

/// Output of the code generation and debug flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub code: String,
    pub thoughts: Vec<String>,
    pub time_complexity: String,
    pub space_complexity: String,
}

impl ContractRecord for SolutionRecord {
    fn contract() -> &'static FieldContract {
        FieldContract::solution()
    }

    fn from_record(record: &Record) -> Self {
        Self {
            code: record.string("code"),
            thoughts: record.strings("thoughts"),
            time_complexity: record.string("time_complexity"),
            space_complexity: record.string("space_complexity"),
        }
    }
}

/// Output of the multiple-choice flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqAnswerRecord {
    #[serde(rename = "correctOption")]
    pub correct_option: String,
    /// Reasoning steps; the last one states the final answer.
    pub thoughts: Vec<String>,
    pub explanation: String,
}

/// A lowercase letter counts only in parentheses or after "option".
static FINAL_ANSWER_LETTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:final\s+answer|correct\s+(?:option|answer)|answer)\b(?:\s+is)?\s*[:\-]?\s*(?:(?:option\s+)?\(([A-H])\)|option\s+([A-H])|(?-i:([A-H])))(?:[\s.,;:!)]|$)",
    )
    .expect("final answer pattern is valid")
});

impl McqAnswerRecord {
    /// The stated final answer (the last reasoning step).
    pub fn final_answer(&self) -> Option<&str> {
        self.thoughts.last().map(String::as_str)
    }

    /// Option letter explicitly named in a thought such as "Final answer: B".
    pub fn letter_in(thought: &str) -> Option<String> {
        FINAL_ANSWER_LETTER
            .captures(thought)
            .and_then(|caps| caps.iter().skip(1).flatten().next())
            .map(|m| m.as_str().to_ascii_uppercase())
    }
}

impl ContractRecord for McqAnswerRecord {
    fn contract() -> &'static FieldContract {
        FieldContract::mcq()
    }

    fn from_record(record: &Record) -> Self {
        let thoughts = record.strings("thoughts");
        let mut correct_option = record.string("correctOption").trim().to_string();

        if record.is_defaulted("correctOption") {
            if let Some(letter) = thoughts.last().and_then(|t| Self::letter_in(t)) {
                correct_option = letter;
            }
        }
        if correct_option.is_empty() {
            correct_option = NOT_SPECIFIED.to_string();
        }

        Self {
            correct_option,
            thoughts,
            explanation: record.string("explanation"),
        }
    }
}

/// A single example from the problem statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

/// Output of the problem extraction flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractRecord {
    pub problem_statement: String,
    /// Opaque example values; usually `{input, output}` objects.
    #[serde(default)]
    pub test_cases: Vec<Value>,
}

impl ExtractRecord {
    /// Test cases that have the `{input, output}` shape.
    pub fn typed_test_cases(&self) -> Vec<TestCase> {
        self.test_cases
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect()
    }
}

impl ContractRecord for ExtractRecord {
    fn contract() -> &'static FieldContract {
        FieldContract::extract()
    }

    fn from_record(record: &Record) -> Self {
        Self {
            problem_statement: record.string("problem_statement"),
            test_cases: record.values("test_cases"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mcq_record(option: FieldValue, thoughts: Value) -> Record {
        let mut record = Record::new(FieldContract::mcq());
        record.push("correctOption", option);
        record.push("thoughts", FieldValue::recovered(thoughts));
        record.push("explanation", FieldValue::recovered(json!("because")));
        record
    }

    #[test]
    fn record_serializes_in_contract_order() {
        let mut record = Record::new(FieldContract::solution());
        record.push("code", FieldValue::recovered(json!("x")));
        record.push("thoughts", FieldValue::recovered(json!(["a"])));
        record.push("time_complexity", FieldValue::defaulted(json!("Not specified")));
        record.push("space_complexity", FieldValue::recovered(json!("O(1)")));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"code":"x","thoughts":["a"],"time_complexity":"Not specified","space_complexity":"O(1)"}"#
        );
        assert!(record.is_defaulted("time_complexity"));
        assert!(!record.is_defaulted("code"));
    }

    #[test]
    fn mcq_uses_letter_from_last_thought_when_option_defaulted() {
        let record = mcq_record(
            FieldValue::defaulted(json!(NOT_SPECIFIED)),
            json!(["Option A is too small", "Final answer: C"]),
        );
        let answer = McqAnswerRecord::from_record(&record);
        assert_eq!(answer.correct_option, "C");
        assert_eq!(answer.final_answer(), Some("Final answer: C"));
    }

    #[test]
    fn mcq_keeps_recovered_option() {
        let record = mcq_record(
            FieldValue::recovered(json!("B")),
            json!(["Final answer: B"]),
        );
        let answer = McqAnswerRecord::from_record(&record);
        assert_eq!(answer.correct_option, "B");
        assert_eq!(
            McqAnswerRecord::letter_in(answer.final_answer().unwrap()).as_deref(),
            Some("B")
        );
    }

    #[test]
    fn mcq_serializes_camel_case_option() {
        let answer = McqAnswerRecord {
            correct_option: "D".to_string(),
            thoughts: vec!["The answer is D".to_string()],
            explanation: "x".to_string(),
        };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["correctOption"], "D");
    }

    #[test]
    fn letter_in_recognizes_common_phrasings() {
        assert_eq!(McqAnswerRecord::letter_in("The answer is (b).").as_deref(), Some("B"));
        assert_eq!(McqAnswerRecord::letter_in("Correct option: D").as_deref(), Some("D"));
        assert_eq!(McqAnswerRecord::letter_in("Final answer - option A").as_deref(), Some("A"));
        assert_eq!(McqAnswerRecord::letter_in("No clear answer here"), None);
        assert_eq!(McqAnswerRecord::letter_in("The correct answer is option c").as_deref(), Some("C"));
    }

    #[test]
    fn lowercase_article_is_not_an_option_letter() {
        assert_eq!(McqAnswerRecord::letter_in("The answer is a prime number"), None);
        assert_eq!(McqAnswerRecord::letter_in("Final answer: a"), None);

        let record = mcq_record(
            FieldValue::defaulted(json!(NOT_SPECIFIED)),
            json!(["x", "The answer is a prime number"]),
        );
        assert_eq!(McqAnswerRecord::from_record(&record).correct_option, NOT_SPECIFIED);
    }

    #[test]
    fn to_json_carries_every_field() {
        let record = mcq_record(FieldValue::recovered(json!("B")), json!(["Final answer: B"]));
        assert_eq!(
            record.to_json(),
            json!({"correctOption": "B", "thoughts": ["Final answer: B"], "explanation": "because"})
        );
        let serialized = serde_json::to_string(&record).unwrap();
        assert!(serialized.starts_with(r#"{"correctOption":"B","thoughts""#));
    }

    #[test]
    fn extract_record_exposes_typed_test_cases() {
        let record = ExtractRecord {
            problem_statement: "Sum".to_string(),
            test_cases: vec![json!({"input": "1 2", "output": "3"}), json!("loose note")],
        };
        let cases = record.typed_test_cases();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].output, Some(json!("3")));
    }
}
