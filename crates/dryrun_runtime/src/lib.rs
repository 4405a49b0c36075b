pub mod config;
pub mod error;
pub mod runtime;

pub use config::{LlmProvider, RuntimeConfig};
pub use error::{Result, RuntimeError};
pub use runtime::Runtime;
