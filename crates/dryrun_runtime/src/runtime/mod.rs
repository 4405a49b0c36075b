//! Analysis orchestrator for dryrun.
//!
//! The Runtime owns the session state and the provider client. One call to
//! [`Runtime::analyze`] validates the submission, builds the prompt, calls the
//! model with retry and timeout, extracts the summary and stores the record.
//!
//! - **llm**: remote call attempts, retry and streaming

mod llm;

use std::sync::Arc;
use std::time::Instant;

use dryrun_core::{
    AnalysisRecord, AnalysisRequest, PromptBuilder, ResponseExtractor, SessionEvent, SessionState,
};
use dryrun_llms::{GeminiProvider, OpenAiProvider, Provider, ProviderRegistry};
use dryrun_observability::{analysis_span, record_duration, record_error};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

use crate::config::{LlmProvider, RuntimeConfig};
use crate::error::{Result, RuntimeError};

pub struct Runtime {
    /// Session state holding the latest analysis
    pub session: SessionState,
    /// Remote text-generation client
    pub provider: Arc<dyn Provider>,
    /// Event channel for streaming progress to the TUI or CLI
    pub event_tx: mpsc::Sender<SessionEvent>,
    pub config: RuntimeConfig,
    prompt_builder: PromptBuilder,
    extractor: ResponseExtractor,
}

impl Runtime {
    /// Create a Runtime whose provider is built from environment credentials.
    pub fn new(config: RuntimeConfig, event_tx: mpsc::Sender<SessionEvent>) -> Result<Self> {
        let provider = Self::create_provider(config.provider)?;
        Ok(Self::with_provider(config, provider, event_tx))
    }

    /// Create a Runtime around an existing provider client.
    pub fn with_provider(
        config: RuntimeConfig,
        provider: Arc<dyn Provider>,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            session: SessionState::new(),
            provider,
            event_tx,
            config,
            prompt_builder: PromptBuilder::new(),
            extractor: ResponseExtractor::new(),
        }
    }

    /// Create an LLM provider from environment credentials.
    pub fn create_provider(provider: LlmProvider) -> Result<Arc<dyn Provider>> {
        match provider {
            LlmProvider::Gemini => {
                let gemini = GeminiProvider::from_env()
                    .map_err(|e| RuntimeError::ProviderNotFound(format!("Gemini: {}", e)))?;
                Ok(Arc::new(gemini))
            }
            LlmProvider::OpenAI => {
                let openai = OpenAiProvider::from_env()
                    .map_err(|e| RuntimeError::ProviderNotFound(format!("OpenAI: {}", e)))?;
                Ok(Arc::new(openai))
            }
        }
    }

    /// Registry of every provider that has credentials in the environment.
    pub fn provider_registry() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        for provider in LlmProvider::ALL {
            match Self::create_provider(provider) {
                Ok(client) => registry = registry.register_arc(provider.as_str(), client),
                Err(e) => tracing::debug!(provider = %provider, error = %e, "Provider unavailable"),
            }
        }
        registry
    }

    /// Run one dry-run analysis of `code` against `test_case`.
    ///
    /// Input problems are reported before any remote call and leave the
    /// session untouched. A failed or cancelled call keeps the previous record.
    pub async fn analyze(
        &mut self,
        code: &str,
        test_case: &str,
        cancel: CancellationToken,
    ) -> Result<AnalysisRecord> {
        let request = match AnalysisRequest::new(code, test_case) {
            Ok(request) => request,
            Err(e) => {
                let err = RuntimeError::from(e);
                warn!(error = %err, "Analysis input rejected");
                let _ = self.event_tx.send(SessionEvent::error(err.user_message())).await;
                return Err(err);
            }
        };

        let span = analysis_span!(
            self.session.id.as_str(),
            self.config.provider.as_str(),
            self.config.model.as_str()
        );
        self.run_analysis(request, cancel).instrument(span).await
    }

    async fn run_analysis(
        &mut self,
        request: AnalysisRequest,
        cancel: CancellationToken,
    ) -> Result<AnalysisRecord> {
        info!(
            code_chars = request.code().chars().count(),
            test_case_chars = request.test_case().chars().count(),
            "Starting analysis"
        );
        self.session.begin();
        let _ = self
            .event_tx
            .send(SessionEvent::analysis_start(
                self.provider.provider_id(),
                &self.config.model,
            ))
            .await;

        let prompt = self.prompt_builder.build_for(&request);
        tracing::debug!(
            target: "dryrun.trace",
            message = %format!("Prompt model={}\n{}", self.config.model, prompt)
        );

        let start = Instant::now();
        let outcome = self.call_with_retry(&prompt, &cancel).await;
        record_duration("analysis.duration_ms", start.elapsed());

        match outcome {
            Ok(response) => {
                let result = self.extractor.extract(&response.raw_text);
                if let Some(err) = &result.extraction_error {
                    warn!(error = %err, "Summary block not extracted");
                }
                for warning in &result.warnings {
                    warn!(warning = %warning, "Summary value dropped");
                }
                tracing::Span::current().record("analysis.has_summary", result.has_summary());

                let record = AnalysisRecord::new(request, response, result);
                self.session.record(record.clone());
                info!(has_summary = record.result.has_summary(), "Analysis completed");

                let _ = self
                    .event_tx
                    .send(SessionEvent::analysis_done(record.clone()))
                    .await;
                let _ = self
                    .event_tx
                    .send(SessionEvent::analysis_end(self.session.status.clone()))
                    .await;
                Ok(record)
            }
            Err(err) => {
                match &err {
                    RuntimeError::Cancelled => {
                        info!("Analysis cancelled");
                        self.session.cancel();
                    }
                    other => {
                        record_error(other);
                        self.session.fail(other.user_message());
                    }
                }
                let _ = self.event_tx.send(SessionEvent::error(err.user_message())).await;
                let _ = self
                    .event_tx
                    .send(SessionEvent::analysis_end(self.session.status.clone()))
                    .await;
                Err(err)
            }
        }
    }

    /// Drop the stored analysis and start a fresh session.
    pub async fn new_session(&mut self) {
        self.session.reset();
        info!(session.id = %self.session.id.as_str(), "New session");
        let _ = self
            .event_tx
            .send(SessionEvent::status("Started a new session"))
            .await;
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Graceful shutdown.
    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down runtime");
        let _ = self
            .event_tx
            .send(SessionEvent::status("Session ended"))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use dryrun_core::{SessionStatus, SummaryField};
    use dryrun_llms::{
        Error as LlmError, FinishReason, GenerateRequest, GenerateResponse, GenerateStream,
        Headers, StreamEvent, Usage,
    };

    const REPLY: &str = "Step 1: x = 5\nStep 2: y = x + 1 = 6\nStep 3: return 6\n\n\
        SUMMARY_JSON: {\"execution_steps\": 3, \"variables_tracked\": 2, \
        \"errors_found\": 0, \"optimization_suggestions\": 1}";

    enum Reply {
        Text(&'static str),
        Fail(LlmError),
    }

    struct MockProvider {
        replies: Mutex<VecDeque<Reply>>,
        calls: AtomicU32,
        delay: Option<Duration>,
    }

    impl MockProvider {
        fn new(replies: Vec<Reply>) -> Arc<Self> {
            Self::with_delay(replies, None)
        }

        fn with_delay(replies: Vec<Reply>, delay: Option<Duration>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicU32::new(0),
                delay,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        async fn next_reply(&self) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Reply::Text(REPLY))
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn provider_id(&self) -> &str {
            "mock"
        }

        fn build_headers(&self, _custom_headers: Option<&Headers>) -> Headers {
            Headers::new()
        }

        async fn generate(&self, _request: GenerateRequest) -> dryrun_llms::Result<GenerateResponse> {
            match self.next_reply().await {
                Reply::Text(text) => Ok(GenerateResponse {
                    text: text.to_string(),
                    usage: Usage::new(10, 20),
                    finish_reason: FinishReason::other(),
                    metadata: None,
                }),
                Reply::Fail(e) => Err(e),
            }
        }

        async fn stream(&self, _request: GenerateRequest) -> dryrun_llms::Result<GenerateStream> {
            match self.next_reply().await {
                Reply::Text(text) => {
                    let (head, tail) = text.split_at(text.len() / 2);
                    let events = vec![
                        Ok(StreamEvent::text_delta(head)),
                        Ok(StreamEvent::text_delta(tail)),
                        Ok(StreamEvent::finish(Usage::new(10, 20), FinishReason::other())),
                    ];
                    Ok(GenerateStream::new(Box::pin(futures::stream::iter(events))))
                }
                Reply::Fail(e) => Err(e),
            }
        }
    }

    fn test_config() -> RuntimeConfig {
        RuntimeConfig::new()
            .with_model("test-model")
            .with_retry_backoff(Duration::from_millis(1))
            .with_timeout(Duration::from_secs(5))
            .with_stream(false)
    }

    fn runtime(
        config: RuntimeConfig,
        provider: Arc<MockProvider>,
    ) -> (Runtime, mpsc::Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel(256);
        (Runtime::with_provider(config, provider, tx), rx)
    }

    fn drain(rx: &mut mpsc::Receiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_empty_input_never_calls_provider() {
        let provider = MockProvider::new(vec![]);
        let (mut rt, mut rx) = runtime(test_config(), provider.clone());

        let err = rt
            .analyze("   ", "input: 5", CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::InputValidation(_)));
        assert_eq!(provider.calls(), 0);
        assert_eq!(rt.session().status, SessionStatus::Idle);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], SessionEvent::Error { error } if error.contains("code")));
    }

    #[tokio::test]
    async fn test_successful_analysis_records_summary() {
        let provider = MockProvider::new(vec![Reply::Text(REPLY)]);
        let (mut rt, mut rx) = runtime(test_config(), provider.clone());

        let record = rt
            .analyze("x = 5\nreturn x + 1", "none", CancellationToken::new())
            .await
            .unwrap();

        let summary = record.result.summary.clone().unwrap();
        assert_eq!(summary.get(SummaryField::ExecutionSteps), Some(3));
        assert_eq!(summary.get(SummaryField::OptimizationSuggestions), Some(1));
        assert!(record.result.narrative.starts_with("Step 1"));
        assert_eq!(record.response.usage.map(|u| u.total_tokens), Some(30));
        assert_eq!(rt.session().status, SessionStatus::Completed);
        assert!(rt.session().latest().is_some());

        let events = drain(&mut rx);
        assert!(matches!(events.first(), Some(SessionEvent::AnalysisStart { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::AnalysisDone { .. })));
        assert!(matches!(
            events.last(),
            Some(SessionEvent::AnalysisEnd {
                status: SessionStatus::Completed
            })
        ));
    }

    #[tokio::test]
    async fn test_stream_forwards_deltas() {
        let provider = MockProvider::new(vec![Reply::Text(REPLY)]);
        let (mut rt, mut rx) = runtime(test_config().with_stream(true), provider);

        let record = rt
            .analyze("x = 5", "none", CancellationToken::new())
            .await
            .unwrap();

        let streamed: String = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::TextDelta { text } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(streamed, REPLY);
        assert_eq!(record.raw_text(), REPLY);
    }

    #[tokio::test]
    async fn test_retryable_error_is_retried() {
        let provider = MockProvider::new(vec![
            Reply::Fail(LlmError::api("mock", 503, "overloaded")),
            Reply::Text(REPLY),
        ]);
        let (mut rt, mut rx) = runtime(test_config(), provider.clone());

        let record = rt.analyze("x = 5", "none", CancellationToken::new()).await;

        assert!(record.is_ok());
        assert_eq!(provider.calls(), 2);
        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, SessionEvent::Retrying { attempt: 2, .. })));
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let provider = MockProvider::new(vec![
            Reply::Fail(LlmError::api("mock", 429, "slow down")),
            Reply::Fail(LlmError::api("mock", 429, "slow down")),
        ]);
        let (mut rt, _rx) = runtime(test_config().with_max_retries(1), provider.clone());

        let err = rt
            .analyze("x = 5", "none", CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::RemoteCall(_)));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_auth_error_not_retried() {
        let provider = MockProvider::new(vec![Reply::Fail(LlmError::api(
            "mock",
            401,
            "bad key",
        ))]);
        let (mut rt, _rx) = runtime(test_config().with_max_retries(3), provider.clone());

        let err = rt
            .analyze("x = 5", "none", CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::RemoteCall(_)));
        assert_eq!(provider.calls(), 1);
        assert!(matches!(rt.session().status, SessionStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let provider = MockProvider::with_delay(vec![], Some(Duration::from_millis(500)));
        let config = test_config()
            .with_timeout(Duration::from_millis(20))
            .with_max_retries(0);
        let (mut rt, _rx) = runtime(config, provider);

        let err = rt
            .analyze("x = 5", "none", CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_cancel_during_call() {
        let provider = MockProvider::with_delay(vec![], Some(Duration::from_millis(500)));
        let (mut rt, mut rx) = runtime(test_config(), provider);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = rt.analyze("x = 5", "none", cancel).await.unwrap_err();

        assert!(matches!(err, RuntimeError::Cancelled));
        assert_eq!(rt.session().status, SessionStatus::Cancelled);
        assert!(matches!(
            drain(&mut rx).last(),
            Some(SessionEvent::AnalysisEnd {
                status: SessionStatus::Cancelled
            })
        ));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_record() {
        let provider = MockProvider::new(vec![
            Reply::Text(REPLY),
            Reply::Fail(LlmError::api("mock", 400, "bad request")),
        ]);
        let (mut rt, _rx) = runtime(test_config(), provider);

        rt.analyze("x = 5", "none", CancellationToken::new())
            .await
            .unwrap();
        let err = rt.analyze("x = 6", "none", CancellationToken::new()).await;

        assert!(err.is_err());
        let latest = rt.session().latest().unwrap();
        assert_eq!(latest.request.code(), "x = 5");
        assert!(matches!(rt.session().status, SessionStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_reply_without_summary_still_records() {
        let provider = MockProvider::new(vec![Reply::Text("Step 1: nothing to report")]);
        let (mut rt, _rx) = runtime(test_config(), provider);

        let record = rt
            .analyze("pass", "none", CancellationToken::new())
            .await
            .unwrap();

        assert!(!record.result.has_summary());
        assert!(record.chart().is_none());
        assert_eq!(record.raw_text(), "Step 1: nothing to report");
    }

    #[tokio::test]
    async fn test_new_session_clears_record() {
        let provider = MockProvider::new(vec![Reply::Text(REPLY)]);
        let (mut rt, _rx) = runtime(test_config(), provider);

        rt.analyze("x = 5", "none", CancellationToken::new())
            .await
            .unwrap();
        let old_id = rt.session().id.clone();
        rt.new_session().await;

        assert!(rt.session().latest().is_none());
        assert_ne!(rt.session().id, old_id);
        assert_eq!(rt.session().status, SessionStatus::Idle);
    }
}
