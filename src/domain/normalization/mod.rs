//! Normalization of free-form model output into contract-shaped records.
//!
//! Two tiers run in order: strict extraction plus schema validation, then
//! field-by-field recovery when the first tier fails. The entry point,
//! [`normalize`], never fails.

mod contract;
mod extractor;
mod normalizer;
mod record;
mod recoverer;
mod validator;

pub use contract::{FieldContract, FieldKind, FieldSpec, Recovery, NOT_SPECIFIED, NO_THOUGHTS};
pub use extractor::{brace_span, extract_json, strip_fences};
pub use normalizer::{normalize, normalize_as, NormalizationPath, Normalized};
pub use record::{
    ContractRecord, ExtractRecord, FieldOutcome, FieldValue, McqAnswerRecord, Record,
    SolutionRecord, TestCase,
};
pub use recoverer::{
    recover_fields, recover_free_text, recover_scalar, recover_sequence, recover_structured,
};
pub use validator::{validate, SchemaValidationError};
