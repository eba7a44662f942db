//! Solve Relay - Problem solving relay between a client and LLM providers
//!
//! Accepts screenshots or text describing a coding problem or a
//! multiple-choice question, runs OCR, prompts a model and normalizes the
//! model's free-form reply into a fixed JSON record.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
