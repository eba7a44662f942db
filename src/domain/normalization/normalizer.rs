//! Response normalization: strict parse, validate, else recover.
//!
//! `normalize` is total. Whatever the model returned, the caller receives a
//! record carrying every field of the contract. Failure is signalled only
//! through defaulted fields, never through an error.

use tracing::debug;

use super::contract::FieldContract;
use super::extractor::extract_json;
use super::record::{ContractRecord, Record};
use super::recoverer::recover_fields;
use super::validator::validate;

/// Which tier produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationPath {
    /// Strict JSON parse followed by successful validation.
    Validated,
    /// Field-by-field recovery from the raw text.
    Recovered,
}

/// A normalized record and the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: Record,
    pub path: NormalizationPath,
}

impl Normalized {
    /// Converts into the typed record for its contract.
    pub fn into_typed<R: ContractRecord>(self) -> R {
        R::from_record(&self.record)
    }
}

/// Normalizes raw model text into a record satisfying `contract`.
pub fn normalize(raw: &str, contract: &FieldContract) -> Normalized {
    match extract_json(raw) {
        Some(candidate) => match validate(&candidate, contract) {
            Ok(record) => {
                debug!(contract = contract.name, "model output validated");
                return Normalized {
                    record,
                    path: NormalizationPath::Validated,
                };
            }
            Err(err) => {
                debug!(
                    contract = contract.name,
                    error = %err,
                    "parsed output failed validation, recovering fields"
                );
            }
        },
        None => {
            debug!(
                contract = contract.name,
                bytes = raw.len(),
                "no parseable JSON in model output, recovering fields"
            );
        }
    }

    Normalized {
        record: recover_fields(raw, contract),
        path: NormalizationPath::Recovered,
    }
}

/// Normalizes raw model text straight into a typed record.
pub fn normalize_as<R: ContractRecord>(raw: &str) -> R {
    normalize(raw, R::contract()).into_typed()
}
