//! OpenAI-compatible provider implementation

use async_trait::async_trait;
use reqwest::Client;
use reqwest_eventsource::EventSource;

use super::convert::{from_openai_response, to_openai_request};
use super::stream::create_stream;
use super::types::{OpenAiConfig, OpenAiModelList, OpenAiResponse};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::providers::api_error;
use crate::types::{GenerateRequest, GenerateResponse, GenerateStream, Headers};

pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    pub const API_KEY_ENV: &'static str = "OPENAI_API_KEY";
    pub const BASE_URL_ENV: &'static str = "OPENAI_BASE_URL";

    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::MissingApiKey("openai".to_string()));
        }

        let client = Client::new();
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(Self::API_KEY_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::MissingApiKey("openai".to_string()))?;

        let mut config = OpenAiConfig::new(api_key);
        if let Ok(base_url) = std::env::var(Self::BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }
        Self::new(config)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Authorization", format!("Bearer {}", self.config.api_key));
        headers.insert("Content-Type", "application/json");

        if let Some(custom) = custom_headers {
            headers.merge_with(custom);
        }

        headers
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}models", self.config.base_url);
        let headers = self.build_headers(None);

        let response = self
            .client
            .get(&url)
            .headers(headers.to_reqwest_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("openai", response).await);
        }

        let list: OpenAiModelList = response.json().await?;
        let mut models: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
        models.sort();
        Ok(models)
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}chat/completions", self.config.base_url);
        let body = to_openai_request(&request, false);
        let headers = self.build_headers(request.options.headers.as_ref());

        tracing::debug!(target: "dryrun.trace", model = %request.model, "openai chat/completions");

        let response = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("openai", response).await);
        }

        let openai_resp: OpenAiResponse = response.json().await?;
        from_openai_response(openai_resp)
    }

    async fn stream(&self, request: GenerateRequest) -> Result<GenerateStream> {
        let url = format!("{}chat/completions", self.config.base_url);
        let body = to_openai_request(&request, true);
        let headers = self.build_headers(request.options.headers.as_ref());

        tracing::debug!(target: "dryrun.trace", model = %request.model, "openai chat/completions stream");

        let req_builder = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&body);

        let event_source = EventSource::new(req_builder)
            .map_err(|e| Error::stream_error(format!("Failed to create event source: {}", e)))?;

        Ok(create_stream(event_source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, StreamEvent};
    use futures::StreamExt;

    fn provider(server: &mockito::ServerGuard) -> OpenAiProvider {
        OpenAiProvider::new(OpenAiConfig::new("sk-test").with_base_url(server.url())).unwrap()
    }

    fn request() -> GenerateRequest {
        GenerateRequest::new("gpt-4o-mini", vec![Message::user("x = 1")])
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            OpenAiProvider::new(OpenAiConfig::new("")),
            Err(Error::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_base_url_normalized() {
        let config = OpenAiConfig::new("k").with_base_url("http://localhost:11434/v1");
        assert_eq!(config.base_url, "http://localhost:11434/v1/");
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"c1","model":"gpt-4o-mini","choices":[{"index":0,"message":{"role":"assistant","content":"Step 1: x=1"},"finish_reason":"stop"}]}"#,
            )
            .create_async()
            .await;

        let response = provider(&server).generate(request()).await.unwrap();
        assert_eq!(response.text, "Step 1: x=1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_server_error_is_retryable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let err = provider(&server).generate(request()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/models")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"object":"list","data":[{"id":"gpt-4o"},{"id":"gpt-4o-mini"}]}"#)
            .create_async()
            .await;

        let models = provider(&server).list_models().await.unwrap();
        assert_eq!(models, vec!["gpt-4o", "gpt-4o-mini"]);
    }

    #[tokio::test]
    async fn test_stream_until_done() {
        let mut server = mockito::Server::new_async().await;
        let body = concat!(
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Step \"}}]}\n\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"1\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        );
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let stream = provider(&server).stream(request()).await.unwrap();
        let events: Vec<StreamEvent> = stream.map(|e| e.unwrap()).collect().await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], StreamEvent::text_delta("Step "));
        assert!(matches!(events[2], StreamEvent::Finish { .. }));
    }

    #[tokio::test]
    async fn test_stream_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let mut stream = provider(&server).stream(request()).await.unwrap();
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(err.is_auth());
        assert!(stream.next().await.is_none());
    }
}
