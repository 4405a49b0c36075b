//! Gemini provider implementation

use async_trait::async_trait;
use reqwest::Client;
use reqwest_eventsource::EventSource;

use super::convert::{from_gemini_response, to_gemini_request};
use super::stream::create_stream;
use super::types::{GeminiConfig, GeminiModelList, GeminiResponse};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::providers::api_error;
use crate::types::{GenerateRequest, GenerateResponse, GenerateStream, Headers};

/// Upper bound on `models.list` pages followed.
const MAX_MODEL_PAGES: usize = 20;

pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Checked first; `GOOGLE_API_KEY` is the fallback.
    pub const API_KEY_ENV: &'static str = "GEMINI_API_KEY";
    pub const FALLBACK_API_KEY_ENV: &'static str = "GOOGLE_API_KEY";
    pub const BASE_URL_ENV: &'static str = "GEMINI_BASE_URL";

    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::MissingApiKey("gemini".to_string()));
        }

        let client = Client::new();
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        let api_key = [Self::API_KEY_ENV, Self::FALLBACK_API_KEY_ENV]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| Error::MissingApiKey("gemini".to_string()))?;

        let mut config = GeminiConfig::new(api_key);
        if let Ok(base_url) = std::env::var(Self::BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }
        Self::new(config)
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}models/{}:{}", self.config.base_url, model, method)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers {
        let mut headers = Headers::new();
        headers.insert("x-goog-api-key", self.config.api_key.clone());
        headers.insert("Content-Type", "application/json");

        if let Some(custom) = custom_headers {
            headers.merge_with(custom);
        }

        headers
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}models", self.config.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_MODEL_PAGES {
            let mut query = vec![("pageSize", "1000".to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .headers(self.build_headers(None).to_reqwest_headers())
                .query(&query)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(api_error("gemini", response).await);
            }

            let list: GeminiModelList = response.json().await?;
            models.extend(
                list.models
                    .into_iter()
                    .filter(|m| {
                        m.supported_generation_methods
                            .iter()
                            .any(|method| method == "generateContent")
                    })
                    .map(|m| m.name.trim_start_matches("models/").to_string()),
            );

            page_token = list.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        models.sort();
        Ok(models)
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = self.model_url(&request.model, "generateContent");
        let body = to_gemini_request(&request);
        let headers = self.build_headers(request.options.headers.as_ref());

        tracing::debug!(target: "dryrun.trace", model = %request.model, "gemini generateContent");

        let response = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("gemini", response).await);
        }

        let gemini_resp: GeminiResponse = response.json().await?;
        from_gemini_response(gemini_resp)
    }

    async fn stream(&self, request: GenerateRequest) -> Result<GenerateStream> {
        let url = format!("{}?alt=sse", self.model_url(&request.model, "streamGenerateContent"));
        let body = to_gemini_request(&request);
        let headers = self.build_headers(request.options.headers.as_ref());

        tracing::debug!(target: "dryrun.trace", model = %request.model, "gemini streamGenerateContent");

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
    use mockito::Matcher;

    fn provider(server: &mockito::ServerGuard) -> GeminiProvider {
        GeminiProvider::new(GeminiConfig::new("test-key").with_base_url(server.url())).unwrap()
    }

    fn request() -> GenerateRequest {
        GenerateRequest::new("gemini-2.0-flash", vec![Message::user("x = 1")])
    }

    #[test]
    fn test_missing_api_key() {
        let result = GeminiProvider::new(GeminiConfig::new(""));
        assert!(matches!(result, Err(Error::MissingApiKey(_))));
    }

    #[test]
    fn test_headers() {
        let provider = GeminiProvider::new(GeminiConfig::new("abc")).unwrap();
        let mut custom = Headers::new();
        custom.insert("x-request-id", "42");
        let headers = provider.build_headers(Some(&custom));
        assert_eq!(headers.get("x-goog-api-key"), Some("abc"));
        assert_eq!(headers.get("x-request-id"), Some("42"));
    }

    #[test]
    fn test_model_url_strips_prefix() {
        let provider = GeminiProvider::new(GeminiConfig::new("abc")).unwrap();
        assert_eq!(
            provider.model_url("models/gemini-2.0-flash", "generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJsonString(
                r#"{"contents":[{"role":"user","parts":[{"text":"x = 1"}]}]}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Step 1: x=1\n{}"}]},"finishReason":"STOP"}]}"#,
            )
            .create_async()
            .await;

        let response = provider(&server).generate(request()).await.unwrap();
        assert_eq!(response.text, "Step 1: x=1\n{}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"Permission denied","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let err = provider(&server).generate(request()).await.unwrap_err();
        assert!(err.is_auth());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_generate_rate_limited_is_retryable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(429)
            .with_body(r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let err = provider(&server).generate(request()).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_list_models_filters_generation() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/models".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"models":[
                    {"name":"models/gemini-2.0-flash","supportedGenerationMethods":["generateContent","countTokens"]},
                    {"name":"models/text-embedding-004","supportedGenerationMethods":["embedContent"]}
                ]}"#,
            )
            .create_async()
            .await;

        let models = provider(&server).list_models().await.unwrap();
        assert_eq!(models, vec!["gemini-2.0-flash"]);
    }

    #[tokio::test]
    async fn test_list_models_follows_page_token() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", Matcher::Regex(r"^/models".to_string()))
            .match_query(Matcher::Regex(r"^pageSize=1000$".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"models":[{"name":"models/gemini-2.5-pro","supportedGenerationMethods":["generateContent"]}],
                    "nextPageToken":"page-2"}"#,
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", Matcher::Regex(r"^/models".to_string()))
            .match_query(Matcher::UrlEncoded("pageToken".into(), "page-2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"models":[{"name":"models/gemini-2.0-flash","supportedGenerationMethods":["generateContent"]}]}"#,
            )
            .create_async()
            .await;

        let models = provider(&server).list_models().await.unwrap();
        assert_eq!(models, vec!["gemini-2.0-flash", "gemini-2.5-pro"]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_stream_text() {
        let mut server = mockito::Server::new_async().await;
        let body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Step 1\"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\" done\"}]},\"finishReason\":\"STOP\"}],",
            "\"usageMetadata\":{\"promptTokenCount\":3,\"candidatesTokenCount\":2,\"totalTokenCount\":5}}\n\n",
        );
        server
            .mock(
                "POST",
                Matcher::Regex(r"^/models/gemini-2.0-flash:streamGenerateContent".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let mut stream = provider(&server).stream(request()).await.unwrap();
        let mut text = String::new();
        let mut finished = false;
        while let Some(event) = stream.next().await {
            match event.unwrap() {
                StreamEvent::TextDelta { delta } => text.push_str(&delta),
                StreamEvent::Finish { usage, .. } => {
                    assert_eq!(usage.total_tokens, 5);
                    finished = true;
                }
            }
        }
        assert_eq!(text, "Step 1 done");
        assert!(finished);
    }
}
