//! Domain layer: pure types and logic with no I/O.
//!
//! # Module Organization
//!
//! - `normalization` - Turning free-form model output into contract-shaped records
//! - `image` - Decoding screenshot payloads
//! - `prompts` - Per-flow prompt construction

pub mod image;
pub mod normalization;
pub mod prompts;
