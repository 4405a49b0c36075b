//! Remote call attempts with timeout, retry and streaming.

use std::time::Instant;

use dryrun_core::{AnalysisResponse, SessionEvent, TokenUsage};
use dryrun_llms::{Error as LlmError, GenerateRequest, Message, StreamEvent, Usage};
use dryrun_observability::{provider_span, record_duration, record_error};
use futures::StreamExt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

use crate::error::RuntimeError;

use super::Runtime;

/// Outcome of one failed attempt, before retry policy is applied.
#[derive(Debug, Error)]
enum AttemptError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("no reply within the time limit")]
    TimedOut,

    #[error("cancelled")]
    Cancelled,
}

impl AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Provider(e) => e.is_retryable(),
            AttemptError::TimedOut => true,
            AttemptError::Cancelled => false,
        }
    }
}

impl Runtime {
    /// Send `prompt` to the provider, retrying transient failures.
    ///
    /// Network errors, rate limits, 5xx replies and timeouts are retried up to
    /// `max_retries` times with doubling backoff. Every wait is cancellable.
    pub(crate) async fn call_with_retry(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResponse, RuntimeError> {
        let operation = if self.config.stream { "stream" } else { "generate" };
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            tracing::Span::current().record("analysis.attempts", attempt);

            let span = provider_span!(self.provider.provider_id(), operation, attempt);
            let err = match self.attempt(prompt, cancel).instrument(span).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            if matches!(err, AttemptError::Cancelled) {
                return Err(RuntimeError::Cancelled);
            }
            if !err.is_retryable() || attempt > self.config.max_retries {
                return Err(self.into_runtime_error(err));
            }

            let delay = self.config.retry_delay(attempt);
            warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Remote call failed, retrying"
            );
            let _ = self
                .event_tx
                .send(SessionEvent::retrying(
                    attempt + 1,
                    delay.as_millis() as u64,
                    err.to_string(),
                ))
                .await;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RuntimeError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn into_runtime_error(&self, err: AttemptError) -> RuntimeError {
        match err {
            AttemptError::Provider(e) => RuntimeError::RemoteCall(e.to_string()),
            AttemptError::TimedOut => RuntimeError::Timeout(self.config.timeout.as_secs()),
            AttemptError::Cancelled => RuntimeError::Cancelled,
        }
    }

    /// One attempt, bounded by the configured timeout and the cancel token.
    async fn attempt(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResponse, AttemptError> {
        let request = GenerateRequest::new(&self.config.model, vec![Message::user(prompt)])
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);

        let start = Instant::now();
        let call = async {
            if self.config.stream {
                self.stream_once(request).await
            } else {
                self.generate_once(request).await
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AttemptError::Cancelled),
            res = tokio::time::timeout(self.config.timeout, call) => {
                res.unwrap_or(Err(AttemptError::TimedOut))
            }
        };
        record_duration("llm.duration_ms", start.elapsed());

        match &outcome {
            Ok(response) => info!(chars = response.raw_text.len(), "Remote call succeeded"),
            Err(AttemptError::Cancelled) => {}
            Err(e) => record_error(e),
        }
        outcome
    }

    async fn generate_once(&self, request: GenerateRequest) -> Result<AnalysisResponse, AttemptError> {
        let response = self.provider.generate(request).await?;
        tracing::debug!(
            target: "dryrun.trace",
            message = %format!(
                "Generate finished reason={:?} usage={:?}",
                response.finish_reason, response.usage
            )
        );
        self.build_response(response.text, Some(response.usage))
    }

    async fn stream_once(&self, request: GenerateRequest) -> Result<AnalysisResponse, AttemptError> {
        let mut stream = self.provider.stream(request).await?;
        let mut text = String::new();
        let mut usage = None;

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::TextDelta { delta } => {
                    text.push_str(&delta);
                    let _ = self.event_tx.send(SessionEvent::text_delta(delta)).await;
                }
                StreamEvent::Finish { usage: u, reason } => {
                    tracing::debug!(
                        target: "dryrun.trace",
                        message = %format!("Stream finished reason={:?} usage={:?}", reason, u)
                    );
                    usage = Some(u);
                }
            }
        }

        self.build_response(text, usage)
    }

    fn build_response(
        &self,
        text: String,
        usage: Option<Usage>,
    ) -> Result<AnalysisResponse, AttemptError> {
        if text.trim().is_empty() {
            return Err(LlmError::invalid_response("model returned an empty reply").into());
        }
        let mut response =
            AnalysisResponse::new(text, self.provider.provider_id(), &self.config.model);
        if let Some(u) = usage {
            response = response.with_usage(TokenUsage::new(u.prompt_tokens, u.completion_tokens));
        }
        Ok(response)
    }
}
