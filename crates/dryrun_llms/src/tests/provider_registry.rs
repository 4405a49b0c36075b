use std::sync::Arc;

use crate::error::Error;
use crate::provider::{Provider, ProviderRegistry};
use crate::types::{GenerateRequest, GenerateResponse, GenerateStream, Headers};
use async_trait::async_trait;

struct MockProvider {
    id: &'static str,
}

#[async_trait]
impl Provider for MockProvider {
    fn provider_id(&self) -> &str {
        self.id
    }

    fn build_headers(&self, _custom_headers: Option<&Headers>) -> Headers {
        Headers::new()
    }

    async fn generate(&self, _request: GenerateRequest) -> crate::error::Result<GenerateResponse> {
        Err(Error::Other("mock".to_string()))
    }

    async fn stream(&self, _request: GenerateRequest) -> crate::error::Result<GenerateStream> {
        Err(Error::Other("mock".to_string()))
    }
}

#[test]
fn test_register_and_get_provider() {
    let registry = ProviderRegistry::new().register("gemini", MockProvider { id: "gemini" });

    let provider = registry.get_provider("gemini");
    assert!(provider.is_ok());
    assert_eq!(provider.unwrap().provider_id(), "gemini");
    assert!(registry.contains("gemini"));
}

#[test]
fn test_provider_not_found() {
    let registry = ProviderRegistry::new();
    let result = registry.get_provider("nonexistent");
    assert!(matches!(result, Err(Error::ProviderNotFound(id)) if id == "nonexistent"));
}

#[test]
fn test_list_providers_sorted() {
    let registry = ProviderRegistry::new()
        .register("openai", MockProvider { id: "openai" })
        .register("gemini", MockProvider { id: "gemini" });

    assert_eq!(registry.list_providers(), vec!["gemini", "openai"]);
}

#[test]
fn test_register_arc_shares_instance() {
    let provider: Arc<dyn Provider> = Arc::new(MockProvider { id: "shared" });
    let registry = ProviderRegistry::new().register_arc("shared", provider.clone());
    let fetched = registry.get_provider("shared").unwrap();
    assert!(Arc::ptr_eq(&provider, &fetched));
}

#[tokio::test]
async fn test_default_list_models_is_empty() {
    let provider = MockProvider { id: "mock" };
    assert!(provider.list_models().await.unwrap().is_empty());
}

#[test]
fn test_registry_call_reaches_provider() {
    let registry = ProviderRegistry::new().register("gemini", MockProvider { id: "gemini" });
    let provider = registry.get_provider("gemini").unwrap();
    let result = tokio_test::block_on(provider.generate(GenerateRequest::new("m", Vec::new())));
    assert!(matches!(result, Err(Error::Other(msg)) if msg == "mock"));
}
