//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers (OpenAI, Anthropic, mock)
//! - `ocr` - Text recognition (Tesseract CLI, mock)
//! - `http` - axum REST API for the solving flows

pub mod ai;
pub mod http;
pub mod ocr;
