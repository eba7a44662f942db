//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Completion calls to an LLM provider
//! - `OcrEngine` - Text recognition from screenshots

mod ai_provider;
mod ocr_engine;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use ocr_engine::{OcrEngine, OcrError};
