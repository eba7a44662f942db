//! Field contracts - the fixed set of named, typed fields each flow returns.
//!
//! A contract drives both the strict validator and the field-by-field
//! recoverer, so the two tiers always agree on field names, kinds and
//! placeholder values.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Placeholder emitted when a scalar field cannot be recovered.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Placeholder thought emitted for solutions without reasoning steps.
pub const NO_THOUGHTS: &str = "No thoughts provided";

/// Expected JSON kind of a contract field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    String,
    /// A JSON array whose elements are all strings.
    StringSequence,
    /// A JSON array of arbitrary values.
    ArbitrarySequence,
}

impl FieldKind {
    /// Name used in validation error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::StringSequence => "array of strings",
            FieldKind::ArbitrarySequence => "array",
        }
    }

    /// The empty value of this kind (`""` or `[]`).
    pub fn empty_value(&self) -> Value {
        match self {
            FieldKind::String => Value::String(String::new()),
            FieldKind::StringSequence | FieldKind::ArbitrarySequence => Value::Array(Vec::new()),
        }
    }
}

/// Pattern-matching strategy used when strict parsing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// `"name": "value"` with no embedded quotes.
    Scalar,
    /// `"name": ["a", "b"]`, split on comma-quote boundaries.
    Sequence,
    /// Long text scanned up to its terminating quote; tolerates embedded quotes.
    FreeText,
    /// Bracket-balanced array parsed as JSON.
    Structured,
}

/// A single named field of a contract.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Filled in by the validator when the field is absent.
    pub default: Option<Value>,
    /// Substituted by the recoverer when the field cannot be located.
    pub sentinel: Value,
    /// Minimum element count for sequence kinds.
    pub min_items: usize,
    pub recovery: Recovery,
}

impl FieldSpec {
    fn new(name: &'static str, kind: FieldKind, recovery: Recovery, sentinel: Value) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            sentinel,
            min_items: 0,
            recovery,
        }
    }

    /// Required string field recovered with the scalar pattern.
    pub fn scalar(name: &'static str, sentinel: &str) -> Self {
        Self::new(name, FieldKind::String, Recovery::Scalar, json!(sentinel))
    }

    /// Required string field recovered with the free-text scan.
    pub fn free_text(name: &'static str, sentinel: &str) -> Self {
        Self::new(name, FieldKind::String, Recovery::FreeText, json!(sentinel))
    }

    /// Required, non-empty string sequence.
    pub fn string_sequence(name: &'static str, sentinel: &[&str]) -> Self {
        let mut spec = Self::new(
            name,
            FieldKind::StringSequence,
            Recovery::Sequence,
            json!(sentinel),
        );
        spec.min_items = 1;
        spec
    }

    /// Sequence of opaque structured values.
    pub fn structured_sequence(name: &'static str) -> Self {
        Self::new(
            name,
            FieldKind::ArbitrarySequence,
            Recovery::Structured,
            Value::Array(Vec::new()),
        )
    }

    /// Fill this value in when the field is missing instead of failing validation.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Use the sentinel as the validator default as well.
    pub fn defaulting_to_sentinel(self) -> Self {
        let sentinel = self.sentinel.clone();
        self.with_default(sentinel)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Ordered list of fields a caller expects in a response record.
#[derive(Debug, Clone)]
pub struct FieldContract {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl FieldContract {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of all fields, in contract order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Contract for code generation and debugging responses.
    pub fn solution() -> &'static FieldContract {
        &SOLUTION_CONTRACT
    }

    /// Contract for multiple-choice answers.
    pub fn mcq() -> &'static FieldContract {
        &MCQ_CONTRACT
    }

    /// Contract for problem extraction responses.
    pub fn extract() -> &'static FieldContract {
        &EXTRACT_CONTRACT
    }
}

static SOLUTION_CONTRACT: Lazy<FieldContract> = Lazy::new(|| {
    FieldContract::new(
        "solution",
        vec![
            FieldSpec::free_text("code", "").defaulting_to_sentinel(),
            FieldSpec::string_sequence("thoughts", &[NO_THOUGHTS]).defaulting_to_sentinel(),
            FieldSpec::scalar("time_complexity", NOT_SPECIFIED).defaulting_to_sentinel(),
            FieldSpec::scalar("space_complexity", NOT_SPECIFIED).defaulting_to_sentinel(),
        ],
    )
});

static MCQ_CONTRACT: Lazy<FieldContract> = Lazy::new(|| {
    FieldContract::new(
        "mcq",
        vec![
            FieldSpec::scalar("correctOption", NOT_SPECIFIED),
            FieldSpec::string_sequence("thoughts", &[NOT_SPECIFIED]),
            FieldSpec::free_text("explanation", NOT_SPECIFIED),
        ],
    )
});

static EXTRACT_CONTRACT: Lazy<FieldContract> = Lazy::new(|| {
    FieldContract::new(
        "extract",
        vec![
            FieldSpec::free_text("problem_statement", NOT_SPECIFIED),
            FieldSpec::structured_sequence("test_cases")
                .optional()
                .with_default(Value::Array(Vec::new())),
        ],
    )
});
