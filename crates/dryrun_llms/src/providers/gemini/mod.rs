//! Gemini provider module
//!
//! Implements the Provider trait for Google's Generative Language API.
//! API docs: https://ai.google.dev/api/generate-content

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::GeminiProvider;
pub use types::{GeminiConfig, GeminiRequest, GeminiResponse};
