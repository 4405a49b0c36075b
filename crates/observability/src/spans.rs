//! Span helpers for analysis and provider calls

/// Span covering one analysis from validation to extraction.
///
/// ```rust
/// use dryrun_observability::analysis_span;
///
/// let span = analysis_span!("session-1", "gemini", "gemini-2.0-flash");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! analysis_span {
    ($session_id:expr, $provider:expr, $model:expr) => {
        tracing::info_span!(
            "dryrun.analysis",
            session.id = $session_id,
            llm.provider = $provider,
            llm.model = $model,
            analysis.attempts = tracing::field::Empty,
            analysis.duration_ms = tracing::field::Empty,
            analysis.has_summary = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Span covering one remote call attempt.
///
/// ```rust
/// use dryrun_observability::provider_span;
///
/// let span = provider_span!("gemini", "stream", 1u32);
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! provider_span {
    ($provider:expr, $operation:expr, $attempt:expr) => {
        tracing::info_span!(
            "llm.call",
            llm.provider = $provider,
            llm.operation = $operation,
            llm.attempt = $attempt,
            llm.duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Marks the current span as failed and logs the error.
pub fn record_error<E: std::error::Error>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "Operation failed");
}

/// Records `duration` in milliseconds under `key` on the current span. The
/// field must have been declared when the span was created.
pub fn record_duration(key: &str, duration: std::time::Duration) {
    tracing::Span::current().record(key, duration.as_millis() as u64);
}
