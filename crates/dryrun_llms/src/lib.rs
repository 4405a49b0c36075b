//! dryrun_llms: provider-agnostic text generation with streaming support.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               ProviderRegistry               │
//! │   HashMap<String, Arc<dyn Provider>>         │
//! │                     │                        │
//! │          ┌──────────┴──────────┐             │
//! │          ▼                     ▼             │
//! │   ┌─────────────┐       ┌─────────────┐      │
//! │   │   Gemini    │       │   OpenAI    │      │
//! │   │  Provider   │       │ compatible  │      │
//! │   └─────────────┘       └─────────────┘      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dryrun_llms::{GeminiProvider, ProviderRegistry};
//!
//! let provider = GeminiProvider::from_env().unwrap();
//! let registry = ProviderRegistry::new().register("gemini", provider);
//! ```

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use provider::{Provider, ProviderRegistry};

#[cfg(feature = "gemini")]
pub use providers::GeminiProvider;
#[cfg(feature = "openai")]
pub use providers::OpenAiProvider;

pub use types::{
    FinishReason, FinishReasonKind, GenerateOptions, GenerateRequest, GenerateResponse,
    GenerateStream, Headers, Message, Role, StreamEvent, Usage,
};
