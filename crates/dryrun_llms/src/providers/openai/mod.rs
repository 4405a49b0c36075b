//! OpenAI-compatible provider module
//!
//! Works with any endpoint that speaks the chat completions API.

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::OpenAiProvider;
pub use types::{OpenAiConfig, OpenAiRequest, OpenAiResponse};
