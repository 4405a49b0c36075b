//! Provider trait definition

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GenerateRequest, GenerateResponse, GenerateStream, Headers};

/// A remote text-generation service.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier, e.g. `"gemini"`.
    fn provider_id(&self) -> &str;

    /// Headers sent with every request, with `custom_headers` applied on top.
    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers;

    /// Model identifiers the service offers for text generation.
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    async fn stream(&self, request: GenerateRequest) -> Result<GenerateStream>;
}
